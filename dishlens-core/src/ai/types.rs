//! Recognition request and response types.

use serde::{Deserialize, Serialize};

/// An image embedded in a request as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub base64_data: String,
}

/// One image plus the instructions for describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisionRequest {
    /// Name of the prompt template, used to organise the response cache.
    pub prompt_name: String,
    pub prompt: String,
    pub image: InlineImage,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text produced by the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionResponse {
    /// The model's answer, unprocessed.
    pub text: String,
    pub usage: Usage,
    /// Whether this response came from cache.
    #[serde(default)]
    pub cached: bool,
}
