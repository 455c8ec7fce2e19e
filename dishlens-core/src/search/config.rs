//! Recipe search and image generation endpoints.

use std::env;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_RECIPE_MODEL: &str = "mistral";
pub const DEFAULT_IMAGE_MODEL: &str = "llava";
pub const DEFAULT_MEALDB_URL: &str = "https://www.themealdb.com/api/json/v1/1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub ollama_url: String,
    pub recipe_model: String,
    pub image_model: String,
    pub mealdb_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            recipe_model: DEFAULT_RECIPE_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            mealdb_url: DEFAULT_MEALDB_URL.to_string(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables. Everything is optional:
    ///
    /// - `DISHLENS_OLLAMA_URL`
    /// - `DISHLENS_RECIPE_MODEL`
    /// - `DISHLENS_IMAGE_MODEL`
    /// - `DISHLENS_MEALDB_URL`
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            env::var(name)
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            ollama_url: var("DISHLENS_OLLAMA_URL", DEFAULT_OLLAMA_URL),
            recipe_model: var("DISHLENS_RECIPE_MODEL", DEFAULT_RECIPE_MODEL),
            image_model: var("DISHLENS_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            mealdb_url: var("DISHLENS_MEALDB_URL", DEFAULT_MEALDB_URL),
        }
    }
}
