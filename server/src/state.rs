use std::sync::Arc;

use anyhow::Context;
use dishlens_core::ai::{create_vision_client_from_env, VisionClient};
use dishlens_core::{
    HttpClient, ImageGenerator, JsonClient, LatestSlot, RecipeSearch, RecognitionOutcome,
    SearchConfig,
};

/// Everything the handlers share.
pub struct Services {
    pub vision: Box<dyn VisionClient>,
    /// Outcome of the most recently started recognition that has finished.
    pub latest: LatestSlot<RecognitionOutcome>,
    pub search: RecipeSearch,
    pub images: ImageGenerator<Arc<dyn HttpClient>>,
}

pub type AppState = Arc<Services>;

impl Services {
    pub fn from_env() -> anyhow::Result<Self> {
        let vision = create_vision_client_from_env().context("Failed to configure recognition")?;

        let http: Arc<dyn HttpClient> =
            Arc::new(JsonClient::new().context("Failed to build HTTP client")?);
        let config = SearchConfig::from_env();
        tracing::info!(
            ollama = %config.ollama_url,
            recipe_model = %config.recipe_model,
            image_model = %config.image_model,
            mealdb = %config.mealdb_url,
            "recipe search configured"
        );

        Ok(Self {
            vision,
            latest: LatestSlot::new(),
            search: RecipeSearch::from_config(http.clone(), &config),
            images: ImageGenerator::new(http, &config.ollama_url, &config.image_model),
        })
    }
}
