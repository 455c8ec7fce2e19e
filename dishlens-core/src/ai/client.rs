//! Vision client trait and the Gemini implementation.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::config::{AiConfig, ConfigError};
use super::types::{Usage, VisionRequest, VisionResponse};
use crate::error::FetchError;
use crate::http::{HttpClient, JsonClient};

#[derive(Error, Debug)]
pub enum AiError {
    /// The service answered with an error.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(FetchError),

    #[error("Invalid response from recognition service: {0}")]
    InvalidResponse(String),

    #[error("Response not in cache and offline mode is enabled")]
    OfflineNotCached,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl From<FetchError> for AiError {
    fn from(e: FetchError) -> Self {
        match e {
            // Gemini reports failures as {"error": {"message": ...}}.
            FetchError::Status { status, body } => {
                let message = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                    .unwrap_or(body);
                AiError::Api { status, message }
            }
            other => AiError::Transport(other),
        }
    }
}

/// A multimodal model that describes an image as text.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, AiError>;

    /// Model name (e.g., "gemini-1.5-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: VisionClient + ?Sized> VisionClient for Box<T> {
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, AiError> {
        (**self).describe(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

const GENERATION_TEMPERATURE: f64 = 0.05;
const GENERATION_TOP_K: u32 = 16;
const GENERATION_TOP_P: f64 = 0.7;
const GENERATION_MAX_TOKENS: u32 = 1024;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Google Gemini `generateContent` client.
pub struct GeminiClient<C = JsonClient> {
    http: C,
    config: AiConfig,
}

impl GeminiClient<JsonClient> {
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env()?;
        Ok(Self::new(JsonClient::new()?, config))
    }
}

impl<C: HttpClient> GeminiClient<C> {
    pub fn new(http: C, config: AiConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn request_body(request: &VisionRequest) -> Value {
        let safety_settings: Vec<Value> = HARM_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_NONE"}))
            .collect();

        json!({
            "contents": [{
                "parts": [
                    {"text": request.prompt},
                    {
                        "inline_data": {
                            "mime_type": request.image.mime_type,
                            "data": request.image.base64_data,
                        }
                    }
                ]
            }],
            "generationConfig": {
                "temperature": GENERATION_TEMPERATURE,
                "topK": GENERATION_TOP_K,
                "topP": GENERATION_TOP_P,
                "maxOutputTokens": GENERATION_MAX_TOKENS,
            },
            "safetySettings": safety_settings,
        })
    }
}

/// Pull the answer text and token counts out of a `generateContent` response.
fn parse_generate_response(body: &Value) -> Result<VisionResponse, AiError> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| AiError::InvalidResponse("no text in first candidate".to_string()))?;

    let metadata = &body["usageMetadata"];
    let count = |key: &str| metadata[key].as_u64().unwrap_or(0) as u32;
    let usage = Usage {
        prompt_tokens: count("promptTokenCount"),
        completion_tokens: count("candidatesTokenCount"),
        total_tokens: count("totalTokenCount"),
    };

    Ok(VisionResponse {
        text: text.to_string(),
        usage,
        cached: false,
    })
}

#[async_trait]
impl<C: HttpClient> VisionClient for GeminiClient<C> {
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, AiError> {
        tracing::debug!(
            prompt_name = %request.prompt_name,
            model = %self.config.model,
            image_bytes = request.image.base64_data.len(),
            "Calling Gemini API"
        );

        let body = self
            .http
            .post_json(&self.config.generate_url(), &Self::request_body(request))
            .await?;

        let response = parse_generate_response(&body)?;
        tracing::debug!(
            total_tokens = response.usage.total_tokens,
            text = %response.text,
            "Gemini response"
        );
        Ok(response)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::InlineImage;
    use crate::http::MockClient;

    fn config() -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://gemini.test/v1".to_string(),
            cache_dir: None,
            offline: false,
        }
    }

    const URL: &str = "http://gemini.test/v1/models/gemini-1.5-flash:generateContent?key=test-key";

    fn request() -> VisionRequest {
        VisionRequest {
            prompt_name: "recognize_en".to_string(),
            prompt: "What dish is this?".to_string(),
            image: InlineImage {
                mime_type: "image/png".to_string(),
                base64_data: "aGVsbG8=".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_request_shape_and_answer() {
        let http = MockClient::new().with_json(
            URL,
            json!({
                "candidates": [{"content": {"parts": [{"text": "{\"foodName\": \"Dosa\"}"}]}}],
                "usageMetadata": {"promptTokenCount": 300, "candidatesTokenCount": 20, "totalTokenCount": 320}
            }),
        );
        let client = GeminiClient::new(http, config());

        let response = client.describe(&request()).await.unwrap();
        assert_eq!(response.text, "{\"foodName\": \"Dosa\"}");
        assert_eq!(response.usage.total_tokens, 320);
        assert!(!response.cached);

        let sent = client.http.requests();
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "What dish is this?");
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(body["generationConfig"]["topK"], 16);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][3]["threshold"], "BLOCK_NONE");
    }

    #[tokio::test]
    async fn test_missing_text_is_invalid_response() {
        let http = MockClient::new().with_json(URL, json!({"candidates": []}));
        let client = GeminiClient::new(http, config());
        assert!(matches!(
            client.describe(&request()).await,
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_api_error_message_surfaced() {
        let http = MockClient::new().with_status(
            URL,
            400,
            r#"{"error": {"code": 400, "message": "API key not valid."}}"#,
        );
        let client = GeminiClient::new(http, config());
        match client.describe(&request()).await {
            Err(AiError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = GeminiClient::new(MockClient::new(), config());
        assert!(matches!(
            client.describe(&request()).await,
            Err(AiError::Transport(_))
        ));
    }
}
