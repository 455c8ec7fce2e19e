//! Food recognition prompt, one per UI language.
//!
//! All languages share the same JSON template so the parser sees one schema;
//! only the framing and the language of the text values differ.

use crate::locale::Language;

/// Prompt name for cache keys, per language.
pub fn recognize_prompt_name(language: Language) -> String {
    format!("recognize_{}", language.code())
}

/// The response shape, filled with the reference samosa values.
const RESPONSE_TEMPLATE: &str = r#"{
  "foodName": "Samosa",
  "confidence": 0.95,
  "ingredients": [
    {"name": "All Purpose Flour", "quantity": "2", "unit": "cups"}
  ],
  "recipe": {
    "name": "Samosa",
    "steps": ["Step 1...", "Step 2..."],
    "prepTime": "30",
    "cookTime": "20",
    "servings": 4,
    "difficulty": "Medium"
  },
  "nutrition": {
    "calories": 262,
    "protein": 4.5,
    "carbs": 28,
    "fat": 16,
    "sugar": 1.5,
    "fiber": 2.5,
    "vitamins": {"A": 80, "C": 4, "D": 0, "E": 1.2, "K": 8, "B1": 0.1, "B2": 0.08, "B3": 1.5, "B6": 0.2, "B12": 0, "Folate": 40},
    "minerals": {"Calcium": 25, "Iron": 1.8, "Magnesium": 30, "Phosphorus": 80, "Potassium": 210, "Sodium": 380, "Zinc": 0.5}
  }
}"#;

fn preamble(language: Language) -> &'static str {
    match language {
        Language::En => "You are a professional chef and nutritionist. Analyze this food image and provide detailed information in the following JSON format.",
        Language::Hi => "आप एक पेशेवर शेफ और पोषण विशेषज्ञ हैं। इस खाद्य छवि का विश्लेषण करें और निम्नलिखित JSON प्रारूप में विस्तृत जानकारी प्रदान करें।",
        Language::Kn => "ನೀವು ವೃತ್ತಿಪರ ಬಾಣಸಿಗ ಮತ್ತು ಪೌಷ್ಟಿಕಾಂಶ ತಜ್ಞರು. ಈ ಆಹಾರ ಚಿತ್ರವನ್ನು ವಿಶ್ಲೇಷಿಸಿ ಮತ್ತು ಕೆಳಗಿನ JSON ಸ್ವರೂಪದಲ್ಲಿ ವಿವರವಾದ ಮಾಹಿತಿಯನ್ನು ನೀಡಿ.",
    }
}

/// Render the recognition prompt for `language`.
pub fn render_recognize_prompt(language: Language) -> String {
    format!(
        r#"{preamble}
{template}

Important instructions:
1. Focus on identifying the main dish and its key ingredients.
2. Provide detailed cooking steps with techniques, temperatures, and timing.
3. For Indian snacks like samosa, use the nutrition values shown above per piece.
4. If the image is unclear, return a low confidence score (below 0.5).
5. If you cannot identify the food, return a low confidence score and empty arrays.
6. Use double quotes for all keys and strings. All numerical values should be numbers, not strings.
7. Do not include any markdown formatting in the response.
8. Keep the JSON keys exactly as shown. Write foodName, ingredient names, units and steps in {language}."#,
        preamble = preamble(language),
        template = RESPONSE_TEMPLATE,
        language = language.english_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_shares_template() {
        for language in Language::ALL {
            let prompt = render_recognize_prompt(*language);
            assert!(prompt.contains(RESPONSE_TEMPLATE));
            assert!(prompt.contains(language.english_name()));
            assert!(prompt.starts_with(preamble(*language)));
        }
    }

    #[test]
    fn test_template_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(RESPONSE_TEMPLATE).unwrap();
        assert_eq!(value["nutrition"]["vitamins"].as_object().unwrap().len(), 11);
        assert_eq!(value["nutrition"]["minerals"].as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_prompt_names() {
        assert_eq!(recognize_prompt_name(Language::Kn), "recognize_kn");
    }
}
