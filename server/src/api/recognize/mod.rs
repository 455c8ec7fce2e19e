pub mod latest;
pub mod upload;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use dishlens_core::image::MAX_FILE_SIZE;
use dishlens_core::{
    Difficulty, Ingredient, MacroSplit, NutritionInfo, NutritionSummary, Provenance, Recipe,
    RecognitionResponse, RecognitionResult,
};
use utoipa::OpenApi;

/// Oversized photos must still reach validation to get a localised error.
const BODY_LIMIT: usize = MAX_FILE_SIZE * 2;

/// Returns the router for /api/recognize endpoints (mounted at /api/recognize)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload::recognize))
        .route("/latest", get(latest::get_latest))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

#[derive(OpenApi)]
#[openapi(
    paths(upload::recognize, latest::get_latest),
    components(schemas(
        upload::RecognizeRequest,
        RecognitionResponse,
        RecognitionResult,
        Recipe,
        Ingredient,
        NutritionInfo,
        NutritionSummary,
        MacroSplit,
        Difficulty,
        Provenance,
    ))
)]
pub struct ApiDoc;
