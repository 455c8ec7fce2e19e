//! Recipe search by dish name.
//!
//! Several independent providers are raced; the first usable recipe wins.
//!
//! # Configuration
//!
//! See [`SearchConfig::from_env`].

mod config;
mod format;
mod image_gen;
mod mealdb;
mod ollama;
pub mod race;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::locale::Language;
use crate::parse::coerce::{ingredient, loose_number};
use crate::parse::ObjectError;

pub use config::{
    SearchConfig, DEFAULT_IMAGE_MODEL, DEFAULT_MEALDB_URL, DEFAULT_OLLAMA_URL,
    DEFAULT_RECIPE_MODEL,
};
pub use format::{clipboard_text, speech_script};
pub use image_gen::{ImageGenError, ImageGenerator};
pub use mealdb::{MealDbProvider, MEALDB_SOURCE};
pub use ollama::{OllamaRecipeProvider, OLLAMA_SOURCE};
pub use race::{first_success, ProviderFailure, RaceError};

/// A recipe found by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// What to ask the image model for.
    #[serde(rename = "image_prompt", default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Provider that produced the recipe.
    pub source: String,
}

/// Why a single provider produced nothing.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not read recipe: {0}")]
    Unreadable(#[from] ObjectError),

    #[error("No recipe found for \"{0}\"")]
    NotFound(String),

    #[error("Invalid recipe: {0}")]
    Invalid(String),
}

/// A source of recipes.
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, query: &str, language: Language) -> Result<SearchRecipe, SearchError>;
}

/// Races every configured provider for a query.
pub struct RecipeSearch {
    providers: Vec<Arc<dyn RecipeProvider>>,
}

impl RecipeSearch {
    pub fn new(providers: Vec<Arc<dyn RecipeProvider>>) -> Self {
        Self { providers }
    }

    /// The generative model and TheMealDB, sharing one HTTP client.
    pub fn from_config(http: Arc<dyn HttpClient>, config: &SearchConfig) -> Self {
        Self::new(vec![
            Arc::new(OllamaRecipeProvider::new(
                http.clone(),
                &config.ollama_url,
                &config.recipe_model,
            )),
            Arc::new(MealDbProvider::new(http, &config.mealdb_url)),
        ])
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn search(&self, query: &str, language: Language) -> Result<SearchRecipe, RaceError> {
        let query = query.trim();
        tracing::info!(query, language = %language, providers = self.providers.len(), "recipe search");

        let attempts = self
            .providers
            .iter()
            .map(|provider| {
                let provider = provider.clone();
                let query = query.to_string();
                let name = provider.name().to_string();
                (name, async move { provider.fetch(&query, language).await })
            })
            .collect();

        first_success(attempts).await
    }
}

/// Build a [`SearchRecipe`] from model output.
pub(crate) fn coerce_recipe(value: &Value, source: &str) -> Result<SearchRecipe, SearchError> {
    let title = value["title"].as_str().map(str::trim).unwrap_or("");
    if title.is_empty() {
        return Err(SearchError::Invalid("missing title".to_string()));
    }

    let instructions = lines(&value["instructions"]);
    if instructions.is_empty() {
        return Err(SearchError::Invalid("no instructions".to_string()));
    }

    let ingredients = value["ingredients"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(ingredient)
                .map(|i| {
                    [i.quantity.as_str(), i.unit.as_str(), i.name.as_str()]
                        .iter()
                        .filter(|part| !part.is_empty())
                        .copied()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .filter(|line| !line.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let cooking_time = match &value["cookingTime"] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(format!("{} minutes", n)),
        _ => None,
    };

    Ok(SearchRecipe {
        title: title.to_string(),
        ingredients,
        instructions,
        image_prompt: non_empty(&value["image_prompt"]),
        cooking_time,
        servings: loose_number(&value["servings"])
            .filter(|n| *n >= 1.0)
            .map(|n| n.round() as u32),
        difficulty: non_empty(&value["difficulty"]),
        source: source.to_string(),
    })
}

/// A list of strings, or one string with a line per entry.
fn lines(value: &Value) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(text) => text.lines().collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
