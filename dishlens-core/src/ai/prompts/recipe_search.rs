//! Prompts for the local recipe and image models.

use crate::locale::Language;

/// Render the recipe generation prompt for a spoken or typed query.
pub fn render_recipe_search_prompt(query: &str, language: Language) -> String {
    format!(
        r#"Generate a recipe based on this query: "{query}".
Write the title, ingredients and instructions in {language}.
Return the response in this exact JSON format and nothing else:
{{
  "title": "Recipe Title",
  "ingredients": ["ingredient 1", "ingredient 2"],
  "instructions": ["step 1", "step 2"],
  "image_prompt": "A detailed prompt to generate an image of this dish",
  "cookingTime": "30 minutes",
  "servings": 4,
  "difficulty": "Easy"
}}"#,
        query = query.trim(),
        language = language.english_name(),
    )
}

/// Render the prompt asking the image model for a picture of a dish.
pub fn render_image_prompt(dish: &str) -> String {
    format!(
        "Generate an appetizing image of: {}. Make it look professional and high quality.",
        dish.trim()
    )
}
