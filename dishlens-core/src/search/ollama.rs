//! Recipes written by a local Ollama model.

use async_trait::async_trait;
use serde_json::json;

use super::{coerce_recipe, RecipeProvider, SearchError, SearchRecipe};
use crate::ai::prompts::render_recipe_search_prompt;
use crate::http::HttpClient;
use crate::locale::Language;
use crate::parse::parse_json_object;

pub const OLLAMA_SOURCE: &str = "Ollama";

pub struct OllamaRecipeProvider<C> {
    http: C,
    base_url: String,
    model: String,
}

impl<C: HttpClient> OllamaRecipeProvider<C> {
    pub fn new(http: C, base_url: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClient> RecipeProvider for OllamaRecipeProvider<C> {
    fn name(&self) -> &str {
        OLLAMA_SOURCE
    }

    async fn fetch(&self, query: &str, language: Language) -> Result<SearchRecipe, SearchError> {
        let body = json!({
            "model": self.model,
            "prompt": render_recipe_search_prompt(query, language),
            "stream": false,
        });
        let response = self.http.post_json(&self.generate_url(), &body).await?;

        let text = response["response"]
            .as_str()
            .ok_or_else(|| SearchError::Invalid("no response text".to_string()))?;
        tracing::debug!(model = %self.model, text = %text, "Ollama recipe response");

        let value = parse_json_object(text)?;
        coerce_recipe(&value, OLLAMA_SOURCE)
    }
}
