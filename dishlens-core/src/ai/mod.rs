//! Client for the image-understanding model.
//!
//! This module provides:
//! - `VisionClient` trait for abstracting the recognition service
//! - `GeminiClient`, talking to Google's `generateContent` endpoint
//! - `CachingVisionClient` with a disk-based response cache
//! - `FakeVisionClient` for tests and offline demos
//! - Prompt templates, one per UI language
//!
//! # Configuration
//!
//! - `DISHLENS_AI_PROVIDER` (optional): "gemini" (default) or "fake"
//! - `GEMINI_API_KEY` (required for gemini)
//! - `DISHLENS_AI_MODEL`, `DISHLENS_AI_BASE_URL` (optional)
//! - `DISHLENS_AI_CACHE_DIR` or `DISHLENS_AI_CACHE=disk` (optional): enable the cache
//! - `DISHLENS_AI_OFFLINE` (optional): "true" to answer from cache only

mod cache;
mod client;
mod config;
mod fake;
pub mod prompts;
mod types;

pub use cache::{CacheKey, CachedVisionResponse, CachingVisionClient, VisionCache};
pub use client::{AiError, GeminiClient, VisionClient};
pub use config::{AiConfig, ConfigError, ProviderKind, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use fake::{FakeVisionClient, SAMPLE_RESPONSE};
pub use types::{InlineImage, Usage, VisionRequest, VisionResponse};

/// Build the vision client selected by the environment.
pub fn create_vision_client_from_env() -> Result<Box<dyn VisionClient>, AiError> {
    match ProviderKind::from_env()? {
        ProviderKind::Fake => {
            tracing::info!("using fake vision client");
            Ok(Box::new(FakeVisionClient::sample()))
        }
        ProviderKind::Gemini => {
            let client = GeminiClient::from_env()?;
            let config = client.config().clone();
            tracing::info!(model = %config.model, cache = ?config.cache_dir, "using Gemini vision client");
            match config.cache_dir {
                Some(dir) => Ok(Box::new(CachingVisionClient::new(client, dir, config.offline))),
                None => Ok(Box::new(client)),
            }
        }
    }
}
