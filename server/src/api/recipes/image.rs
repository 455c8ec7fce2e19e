use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use dishlens_core::search::ImageGenError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateImageRequest {
    /// Usually the recipe's `image_prompt`.
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateImageResponse {
    /// `data:image/jpeg;base64,...`
    pub image: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes/image",
    tag = "recipes",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated picture", body = GenerateImageResponse),
        (status = 400, description = "Empty prompt", body = ErrorResponse),
        (status = 502, description = "Image model unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<GenerateImageRequest>,
) -> impl IntoResponse {
    match state.images.generate(&request.prompt).await {
        Ok(image) => Json(GenerateImageResponse { image }).into_response(),
        Err(ImageGenError::EmptyPrompt) => {
            error_response(StatusCode::BAD_REQUEST, "Prompt must not be empty")
        }
        Err(e) => {
            tracing::warn!(error = %e, "image generation failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
