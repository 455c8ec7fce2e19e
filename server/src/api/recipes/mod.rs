pub mod image;
pub mod search;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use dishlens_core::SearchRecipe;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search::search_recipe))
        .route("/image", post(image::generate_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(search::search_recipe, image::generate_image),
    components(schemas(
        search::SearchRecipeRequest,
        search::SearchRecipeResponse,
        search::SearchFailedResponse,
        SearchRecipe,
        image::GenerateImageRequest,
        image::GenerateImageResponse,
    ))
)]
pub struct ApiDoc;
