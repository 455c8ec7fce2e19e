use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dishlens_core::{Language, RecognitionResponse};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LatestParams {
    /// Language for any notice or error text (default "en").
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub language: Language,
}

#[utoipa::path(
    get,
    path = "/api/recognize/latest",
    tag = "recognize",
    params(LatestParams),
    responses(
        (status = 200, description = "Outcome of the most recent recognition", body = RecognitionResponse),
        (status = 404, description = "Nothing recognized yet", body = ErrorResponse)
    )
)]
pub async fn get_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> impl IntoResponse {
    match state.latest.current() {
        Some(outcome) => Json(outcome.to_response(params.language)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No recognition yet"),
    }
}
