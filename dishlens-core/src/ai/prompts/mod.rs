//! AI prompt templates.

pub mod recipe_search;
pub mod recognize;

pub use recipe_search::{render_image_prompt, render_recipe_search_prompt};
pub use recognize::{recognize_prompt_name, render_recognize_prompt};
