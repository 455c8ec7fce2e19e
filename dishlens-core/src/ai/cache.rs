//! Disk cache for vision responses.
//!
//! Recognition calls are slow and billed, and replaying a stored answer is
//! the easiest way to reproduce a parsing bug. Responses are keyed by a hash
//! of everything sent to the model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use super::client::{AiError, VisionClient};
use super::types::{Usage, VisionRequest, VisionResponse};

/// A cached response with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVisionResponse {
    pub text: String,
    pub usage: Usage,
    pub cached_at: DateTime<Utc>,
    pub model: String,
}

impl From<CachedVisionResponse> for VisionResponse {
    fn from(cached: CachedVisionResponse) -> Self {
        Self {
            text: cached.text,
            usage: cached.usage,
            cached: true,
        }
    }
}

/// Cache key components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub prompt_name: String,
    pub model: String,
    pub input_hash: String,
}

impl CacheKey {
    pub fn new(model: &str, request: &VisionRequest) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(request.prompt.as_bytes());
        hasher.update([0u8]);
        hasher.update(request.image.mime_type.as_bytes());
        hasher.update([0u8]);
        hasher.update(request.image.base64_data.as_bytes());

        Self {
            prompt_name: request.prompt_name.clone(),
            model: model.to_string(),
            input_hash: hex::encode(hasher.finalize()),
        }
    }

    /// Path relative to the cache directory:
    /// `{prompt_name}/{model}/{hash[0:2]}/{hash}.json`
    pub fn to_path(&self) -> PathBuf {
        let model_safe = self.model.replace(['/', ':'], "--");

        PathBuf::new()
            .join(&self.prompt_name)
            .join(model_safe)
            .join(&self.input_hash[..2])
            .join(format!("{}.json", self.input_hash))
    }
}

/// Disk-backed response store.
pub struct VisionCache {
    cache_dir: PathBuf,
}

impl VisionCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CachedVisionResponse> {
        let content = fs::read_to_string(self.cache_dir.join(key.to_path())).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn put(&self, key: &CacheKey, response: &VisionResponse, model: &str) -> std::io::Result<()> {
        let path = self.cache_dir.join(key.to_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cached = CachedVisionResponse {
            text: response.text.clone(),
            usage: response.usage.clone(),
            cached_at: Utc::now(),
            model: model.to_string(),
        };

        let json = serde_json::to_string_pretty(&cached)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&path, json)
    }
}

/// Wraps a [`VisionClient`] with the disk cache.
pub struct CachingVisionClient<V> {
    inner: V,
    cache: VisionCache,
    /// Never call the inner client; a miss is an error.
    offline: bool,
}

impl<V: VisionClient> CachingVisionClient<V> {
    pub fn new(inner: V, cache_dir: PathBuf, offline: bool) -> Self {
        Self {
            inner,
            cache: VisionCache::new(cache_dir),
            offline,
        }
    }
}

#[async_trait]
impl<V: VisionClient> VisionClient for CachingVisionClient<V> {
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, AiError> {
        let key = CacheKey::new(self.inner.model_name(), request);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(prompt_name = %request.prompt_name, "vision response found in cache");
            return Ok(cached.into());
        }

        if self.offline {
            return Err(AiError::OfflineNotCached);
        }

        let response = self.inner.describe(request).await?;

        if let Err(e) = self.cache.put(&key, &response, self.inner.model_name()) {
            tracing::warn!(error = %e, "failed to cache vision response");
        }

        Ok(response)
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{FakeVisionClient, InlineImage};

    fn request(data: &str) -> VisionRequest {
        VisionRequest {
            prompt_name: "recognize_en".to_string(),
            prompt: "Identify".to_string(),
            image: InlineImage {
                mime_type: "image/jpeg".to_string(),
                base64_data: data.to_string(),
            },
        }
    }

    #[test]
    fn test_cache_key_path() {
        let key = CacheKey::new("models/gemini-1.5-flash", &request("abc"));
        let path = key.to_path();
        assert!(path.starts_with("recognize_en/models--gemini-1.5-flash/"));
        assert!(path.to_string_lossy().ends_with(".json"));
        assert_eq!(key.input_hash.len(), 64);
    }

    #[test]
    fn test_cache_key_depends_on_image() {
        let a = CacheKey::new("m", &request("abc"));
        let b = CacheKey::new("m", &request("abd"));
        assert_ne!(a.input_hash, b.input_hash);
        assert_eq!(a, CacheKey::new("m", &request("abc")));
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let client = CachingVisionClient::new(
            FakeVisionClient::new().with_default_response("{\"foodName\": \"Idli\"}"),
            dir.path().to_path_buf(),
            false,
        );

        let first = client.describe(&request("abc")).await.unwrap();
        assert!(!first.cached);
        let second = client.describe(&request("abc")).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.text, first.text);
        assert_eq!(client.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_offline_miss() {
        let dir = tempfile::tempdir().unwrap();
        let client = CachingVisionClient::new(
            FakeVisionClient::new().with_default_response("{}"),
            dir.path().to_path_buf(),
            true,
        );
        assert!(matches!(
            client.describe(&request("abc")).await,
            Err(AiError::OfflineNotCached)
        ));
        assert_eq!(client.inner.calls(), 0);
    }
}
