//! Photo in, recognition outcome out.

use crate::ai::prompts::{recognize_prompt_name, render_recognize_prompt};
use crate::ai::{VisionClient, VisionRequest};
use crate::image::validate_upload;
use crate::locale::Language;
use crate::parse::interpret_recognition;
use crate::types::{RecognitionFailure, RecognitionOutcome};

/// Validate the photo, ask the model about it, and interpret the answer.
///
/// Never returns an error: every failure is a [`RecognitionOutcome::Failed`]
/// carrying the localisable reason.
pub async fn recognize_food(
    client: &dyn VisionClient,
    image_bytes: Vec<u8>,
    language: Language,
) -> RecognitionOutcome {
    let image = match validate_upload(image_bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::info!(error = %e, "rejected upload");
            return RecognitionOutcome::Failed(e.into());
        }
    };

    let request = VisionRequest {
        prompt_name: recognize_prompt_name(language),
        prompt: render_recognize_prompt(language),
        image: image.inline(),
    };

    let response = match client.describe(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, model = client.model_name(), "recognition request failed");
            return RecognitionOutcome::Failed(RecognitionFailure::Transport(e.to_string()));
        }
    };

    let outcome = interpret_recognition(&response.text);
    tracing::info!(
        language = %language,
        cached = response.cached,
        success = outcome.is_success(),
        food_name = outcome.result().map(|r| r.food_name.as_str()),
        "recognition finished"
    );
    outcome
}
