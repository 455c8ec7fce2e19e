//! Fake vision client for tests and offline demos.
//!
//! Responses are picked by prompt substring, so one fake can answer
//! differently per language.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::{AiError, VisionClient};
use super::types::{Usage, VisionRequest, VisionResponse};

/// What the `fake` provider answers when nothing else is configured: a
/// fenced, slightly malformed samosa recognition of the kind real models emit.
pub const SAMPLE_RESPONSE: &str = r#"```json
{
  "foodName": "Samosa",
  "confidence": 0.93,
  "ingredients": [
    {"name": "All Purpose Flour", "quantity": "2", "unit": "cups"},
    {"name": "Potatoes", "quantity": 3, "unit": "medium"},
    {'name': 'Green Peas', 'quantity': 1/2, 'unit': 'cup'},
  ],
  "recipe": {
    "steps": [
      "Rub oil into the flour and knead a stiff dough, then rest it for 30 minutes.",
      "Boil and mash the potatoes, then saute with peas and spices.",
      "Roll the dough into cones, fill, and seal the edges.",
      "Deep fry on medium heat until golden and crisp."
    ],
    prepTime: "30",
    cookTime: "20",
    servings: 4,
    difficulty: "Medium"
  },
  "nutrition": {"calories": 262, "protein": 4.5, "carbs": 28, "fat": 16, "sugar": 1.5, "fiber": 2.5}
}
```"#;

/// A fake [`VisionClient`].
#[derive(Debug, Default)]
pub struct FakeVisionClient {
    /// Prompt substring -> response text.
    responses: HashMap<String, String>,
    default_response: Option<String>,
    /// When set, every call fails with this message.
    error: Option<String>,
    calls: AtomicUsize,
}

impl FakeVisionClient {
    /// A fake with no responses; every call fails until one is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fake used by the `fake` provider.
    pub fn sample() -> Self {
        Self::new().with_default_response(SAMPLE_RESPONSE)
    }

    /// Answer `response` to prompts containing `prompt_contains` (case-insensitive).
    pub fn with_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .insert(prompt_contains.to_lowercase(), response.to_string());
        self
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Fail every call as if the service were unreachable.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of `describe` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for FakeVisionClient {
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.error {
            return Err(AiError::Api {
                status: 503,
                message: message.clone(),
            });
        }

        let prompt = request.prompt.to_lowercase();
        let text = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                AiError::InvalidResponse(format!(
                    "FakeVisionClient: no response configured for prompt {}",
                    request.prompt_name
                ))
            })?;

        Ok(VisionResponse {
            text,
            usage: Usage::default(),
            cached: false,
        })
    }

    fn model_name(&self) -> &str {
        "fake-vision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::InlineImage;

    fn request(prompt: &str) -> VisionRequest {
        VisionRequest {
            prompt_name: "test".to_string(),
            prompt: prompt.to_string(),
            image: InlineImage {
                mime_type: "image/png".to_string(),
                base64_data: String::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let fake = FakeVisionClient::new().with_response("HINDI", "नमस्ते");
        let response = fake.describe(&request("Answer in hindi")).await.unwrap();
        assert_eq!(response.text, "नमस्ते");
    }

    #[tokio::test]
    async fn test_no_match_without_default() {
        let fake = FakeVisionClient::new();
        assert!(fake.describe(&request("anything")).await.is_err());
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing() {
        let fake = FakeVisionClient::failing("down");
        assert!(matches!(
            fake.describe(&request("anything")).await,
            Err(AiError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_sample_response() {
        let response = FakeVisionClient::sample()
            .describe(&request("anything"))
            .await
            .unwrap();
        assert!(response.text.contains("Samosa"));
    }
}
