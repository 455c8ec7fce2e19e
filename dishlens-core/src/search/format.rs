//! Text renderings of a found recipe.

use super::SearchRecipe;
use crate::locale::Language;

fn sentence_end(language: Language) -> &'static str {
    match language {
        Language::Hi => "।",
        Language::En | Language::Kn => ".",
    }
}

fn without_terminator(text: &str) -> &str {
    text.trim().trim_end_matches(['.', '!', '?', '।'])
}

/// The recipe as one block of narration text, ready for [`speech_chunks`].
///
/// [`speech_chunks`]: crate::speech::speech_chunks
pub fn speech_script(recipe: &SearchRecipe, language: Language) -> String {
    let end = sentence_end(language);
    let ingredients = recipe.ingredients.join(", ");
    let steps = recipe
        .instructions
        .iter()
        .map(|step| without_terminator(step))
        .filter(|step| !step.is_empty())
        .collect::<Vec<_>>()
        .join(&format!("{end} "));

    match language {
        Language::En => format!(
            "Here's how to make {}. You'll need the following ingredients: {}. Now, let's go through the instructions step by step: {}{end}",
            recipe.title, ingredients, steps
        ),
        Language::Hi => format!(
            "{} बनाने की विधि यह है। आपको इन सामग्रियों की आवश्यकता होगी: {}। अब निर्देशों को एक-एक करके देखते हैं: {}{end}",
            recipe.title, ingredients, steps
        ),
        Language::Kn => format!(
            "{} ಮಾಡುವ ವಿಧಾನ ಇಲ್ಲಿದೆ. ನಿಮಗೆ ಈ ಪದಾರ್ಥಗಳು ಬೇಕಾಗುತ್ತವೆ: {}. ಈಗ ಸೂಚನೆಗಳನ್ನು ಹಂತ ಹಂತವಾಗಿ ನೋಡೋಣ: {}{end}",
            recipe.title, ingredients, steps
        ),
    }
}

/// Plain-text copy of the recipe.
pub fn clipboard_text(recipe: &SearchRecipe) -> String {
    format!(
        "{}\n\nIngredients:\n{}\n\nInstructions:\n{}",
        recipe.title,
        recipe.ingredients.join(", "),
        recipe.instructions.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::speech_chunks;

    fn kheer() -> SearchRecipe {
        SearchRecipe {
            title: "Kheer".to_string(),
            ingredients: vec!["1 litre milk".to_string(), "1/4 cup rice".to_string()],
            instructions: vec!["Boil the milk.".to_string(), "Add rice and simmer".to_string()],
            image_prompt: None,
            cooking_time: None,
            servings: None,
            difficulty: None,
            source: "Ollama".to_string(),
        }
    }

    #[test]
    fn test_english_script() {
        assert_eq!(
            speech_script(&kheer(), Language::En),
            "Here's how to make Kheer. You'll need the following ingredients: 1 litre milk, 1/4 cup rice. \
             Now, let's go through the instructions step by step: Boil the milk. Add rice and simmer."
        );
    }

    #[test]
    fn test_script_chunks_into_sentences() {
        let chunks = speech_chunks(&speech_script(&kheer(), Language::Hi));
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], "Kheer बनाने की विधि यह है।");
        assert_eq!(chunks[3], "Add rice and simmer।");
    }

    #[test]
    fn test_decimal_measures_stay_in_one_utterance() {
        let recipe = SearchRecipe {
            ingredients: vec!["1.5 litres milk".to_string(), "0.25 cup rice".to_string()],
            ..kheer()
        };
        let chunks = speech_chunks(&speech_script(&recipe, Language::En));
        assert_eq!(
            chunks,
            vec![
                "Here's how to make Kheer.",
                "You'll need the following ingredients: 1.5 litres milk, 0.25 cup rice.",
                "Now, let's go through the instructions step by step: Boil the milk.",
                "Add rice and simmer.",
            ]
        );
    }

    #[test]
    fn test_clipboard_text() {
        assert_eq!(
            clipboard_text(&kheer()),
            "Kheer\n\nIngredients:\n1 litre milk, 1/4 cup rice\n\nInstructions:\nBoil the milk. Add rice and simmer"
        );
    }
}
