//! Dish pictures from a local image model.

use serde_json::json;
use thiserror::Error;

use crate::ai::prompts::render_image_prompt;
use crate::error::FetchError;
use crate::http::HttpClient;

#[derive(Error, Debug)]
pub enum ImageGenError {
    #[error("Image prompt is empty")]
    EmptyPrompt,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Image model returned no image")]
    NoImage,
}

pub struct ImageGenerator<C> {
    http: C,
    base_url: String,
    model: String,
}

impl<C: HttpClient> ImageGenerator<C> {
    pub fn new(http: C, base_url: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Generate a picture of `prompt` and return it as a `data:` URL.
    pub async fn generate(&self, prompt: &str) -> Result<String, ImageGenError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ImageGenError::EmptyPrompt);
        }

        let body = json!({
            "model": self.model,
            "prompt": render_image_prompt(prompt),
            "stream": false,
        });
        let response = self
            .http
            .post_json(&format!("{}/api/generate", self.base_url), &body)
            .await?;

        let image = response["images"][0]
            .as_str()
            .filter(|data| !data.is_empty())
            .ok_or(ImageGenError::NoImage)?;

        tracing::debug!(model = %self.model, bytes = image.len(), "generated image");
        Ok(format!("data:image/jpeg;base64,{}", image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;

    const URL: &str = "http://ollama.test/api/generate";

    #[tokio::test]
    async fn test_data_url() {
        let http = MockClient::new().with_json(URL, json!({"images": ["/9j/4AAQ"]}));
        let generator = ImageGenerator::new(http, "http://ollama.test", "llava");

        let url = generator.generate("Kheer").await.unwrap();
        assert_eq!(url, "data:image/jpeg;base64,/9j/4AAQ");

        let body = generator.http.requests()[0].body.clone().unwrap();
        assert_eq!(body["model"], "llava");
        assert!(body["prompt"].as_str().unwrap().starts_with("Generate an appetizing image of: Kheer."));
    }

    #[tokio::test]
    async fn test_no_image() {
        let http = MockClient::new().with_json(URL, json!({"response": "I am a text model"}));
        let generator = ImageGenerator::new(http, "http://ollama.test", "llava");
        assert!(matches!(generator.generate("Kheer").await, Err(ImageGenError::NoImage)));
    }

    #[tokio::test]
    async fn test_empty_prompt_not_sent() {
        let generator = ImageGenerator::new(MockClient::new(), "http://ollama.test", "llava");
        assert!(matches!(generator.generate("  ").await, Err(ImageGenError::EmptyPrompt)));
        assert!(generator.http.requests().is_empty());
    }
}
