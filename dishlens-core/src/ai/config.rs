//! Recognition service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Default vision model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which [`VisionClient`](super::VisionClient) to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    /// Canned responses, no network.
    Fake,
}

impl ProviderKind {
    /// Read `DISHLENS_AI_PROVIDER` ("gemini" when unset).
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("DISHLENS_AI_PROVIDER").ok().as_deref() {
            None | Some("gemini") => Ok(ProviderKind::Gemini),
            Some("fake") => Ok(ProviderKind::Fake),
            Some(other) => Err(ConfigError::InvalidValue {
                name: "DISHLENS_AI_PROVIDER".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    /// Model name (e.g., "gemini-1.5-flash").
    pub model: String,
    pub base_url: String,
    /// Directory for caching responses. None disables the cache.
    pub cache_dir: Option<PathBuf>,
    /// If true, only use cache, error if not cached.
    pub offline: bool,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`
    ///
    /// Optional:
    /// - `DISHLENS_AI_MODEL` (default: "gemini-1.5-flash")
    /// - `DISHLENS_AI_BASE_URL` (default: the public v1 endpoint)
    /// - `DISHLENS_AI_CACHE_DIR`: cache directory, or `DISHLENS_AI_CACHE=disk`
    ///   for `~/.dishlens/ai-cache`
    /// - `DISHLENS_AI_OFFLINE`: use cache only (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = env::var("DISHLENS_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("DISHLENS_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let cache_dir = match env::var("DISHLENS_AI_CACHE_DIR") {
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => env::var("DISHLENS_AI_CACHE")
                .ok()
                .filter(|v| v == "disk")
                .map(|_| Self::default_cache_dir()),
        };

        let offline = env::var("DISHLENS_AI_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            api_key,
            model,
            base_url,
            cache_dir,
            offline,
        })
    }

    /// Get the default cache directory: ~/.dishlens/ai-cache
    pub fn default_cache_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".dishlens").join("ai-cache"))
            .unwrap_or_else(|| PathBuf::from("data/ai-cache"))
    }

    /// `generateContent` endpoint for the configured model, including the key.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}
