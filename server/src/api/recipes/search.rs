use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use dishlens_core::search::{clipboard_text, speech_script};
use dishlens_core::{speech_chunks, Language, Message, SearchRecipe};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRecipeRequest {
    /// Dish name, typed or dictated.
    pub query: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecipeResponse {
    pub recipe: SearchRecipe,
    /// The recipe read aloud, one sentence per utterance.
    pub narration: Vec<String>,
    pub clipboard_text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchFailedResponse {
    /// Localised message for the user.
    pub error: String,
    /// What each provider reported.
    pub details: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes/search",
    tag = "recipes",
    request_body = SearchRecipeRequest,
    responses(
        (status = 200, description = "First recipe any provider returned", body = SearchRecipeResponse),
        (status = 400, description = "Empty query", body = ErrorResponse),
        (status = 502, description = "Every provider failed", body = SearchFailedResponse)
    )
)]
pub async fn search_recipe(
    State(state): State<AppState>,
    Json(request): Json<SearchRecipeRequest>,
) -> impl IntoResponse {
    let query = request.query.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Query must not be empty");
    }

    match state.search.search(query, request.language).await {
        Ok(recipe) => {
            let narration = speech_chunks(&speech_script(&recipe, request.language));
            let clipboard_text = clipboard_text(&recipe);
            Json(SearchRecipeResponse {
                recipe,
                narration,
                clipboard_text,
            })
            .into_response()
        }
        Err(e) => {
            tracing::warn!(query, error = %e, "recipe search failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(SearchFailedResponse {
                    error: Message::RecipeSearchFailed.text(request.language).to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
