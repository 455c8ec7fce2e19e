use crate::AppState;
use axum::routing::get;
use axum::{response::IntoResponse, Json, Router};
use dishlens_core::Language;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub code: Language,
    /// Name in the language itself, for the picker.
    pub name: String,
    pub english_name: String,
    /// Locale to hand to the speech APIs.
    pub speech_locale: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListLanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

/// Returns the router for /api/languages (mounted at /api/languages)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_languages))
}

#[utoipa::path(
    get,
    path = "/api/languages",
    tag = "languages",
    responses(
        (status = 200, description = "Supported UI languages", body = ListLanguagesResponse)
    )
)]
pub async fn list_languages() -> impl IntoResponse {
    let languages = Language::ALL
        .iter()
        .map(|language| LanguageInfo {
            code: *language,
            name: language.native_name().to_string(),
            english_name: language.english_name().to_string(),
            speech_locale: language.speech_locale().to_string(),
        })
        .collect();

    Json(ListLanguagesResponse { languages })
}

#[derive(OpenApi)]
#[openapi(
    paths(list_languages),
    components(schemas(LanguageInfo, ListLanguagesResponse, Language))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get, send};
    use crate::state::testing;
    use axum::http::StatusCode;
    use dishlens_core::ai::FakeVisionClient;
    use dishlens_core::MockClient;

    #[tokio::test]
    async fn test_lists_three_languages() {
        let app = crate::app(testing::state(FakeVisionClient::sample(), MockClient::new()));
        let (status, body) = send(app, get("/api/languages")).await;

        assert_eq!(status, StatusCode::OK);
        let languages = body["languages"].as_array().unwrap();
        assert_eq!(languages.len(), 3);
        assert_eq!(languages[1]["code"], "hi");
        assert_eq!(languages[2]["name"], "ಕನ್ನಡ");
        assert_eq!(languages[2]["speechLocale"], "kn-IN");
    }
}
