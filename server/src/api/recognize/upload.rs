use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dishlens_core::{recognize_food, Language, RecognitionResponse};
use utoipa::ToSchema;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecognizeRequest {
    /// JPEG or PNG photo of the dish.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Language for the recipe and any messages: "en", "hi" or "kn".
    pub language: Option<String>,
}

struct Upload {
    file: Vec<u8>,
    language: Language,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Response> {
    let mut file = None;
    let mut language = Language::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Multipart read error: {}", e);
                return Err(error_response(
                    e.status(),
                    format!("Failed to read multipart data: {}", e.body_text()),
                ));
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => match field.bytes().await {
                Ok(bytes) => file = Some(bytes.to_vec()),
                Err(e) => {
                    tracing::warn!("Field read error: {}", e);
                    return Err(error_response(
                        e.status(),
                        format!("Failed to read file data: {}", e.body_text()),
                    ));
                }
            },
            Some("language") => {
                let text = field.text().await.map_err(|e| {
                    tracing::warn!("Field read error: {}", e);
                    error_response(
                        e.status(),
                        format!("Failed to read language field: {}", e.body_text()),
                    )
                })?;
                language = text.parse().map_err(|e: dishlens_core::locale::UnknownLanguage| {
                    error_response(StatusCode::BAD_REQUEST, e.to_string())
                })?;
            }
            other => tracing::debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let file = file.ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "No file provided"))?;
    Ok(Upload { file, language })
}

#[utoipa::path(
    post,
    path = "/api/recognize",
    tag = "recognize",
    request_body(content_type = "multipart/form-data", content = RecognizeRequest),
    responses(
        (status = 200, description = "Recognition envelope; `success` is false when the dish could not be recognized", body = RecognitionResponse),
        (status = 400, description = "Missing file or unsupported language", body = ErrorResponse)
    )
)]
pub async fn recognize(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let ticket = state.latest.begin();
    tracing::info!(
        language = %upload.language,
        bytes = upload.file.len(),
        ticket = ?ticket,
        "recognition started"
    );

    let outcome = recognize_food(state.vision.as_ref(), upload.file, upload.language).await;
    let response = outcome.to_response(upload.language);

    if !state.latest.commit(ticket, outcome) {
        tracing::info!(ticket = ?ticket, "newer recognition started meanwhile, result not kept");
    }

    Json::<RecognitionResponse>(response).into_response()
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::send;
    use crate::state::testing;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use dishlens_core::ai::FakeVisionClient;
    use dishlens_core::MockClient;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    const BOUNDARY: &str = "dishlens-test-boundary";

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn multipart(file: Option<&[u8]>, language: Option<&str>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(language) = language {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\n{language}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(file) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"dish.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(file);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/api/recognize")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_recognize_and_keep_latest() {
        let state = testing::state(FakeVisionClient::sample(), MockClient::new());
        let app = crate::app(state.clone());

        let (status, body) = send(app, multipart(Some(&png(200, 150)), Some("hi"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["foodName"], "Samosa");
        assert!(body.get("error").is_none());

        let latest = state.latest.current().unwrap();
        assert_eq!(latest.result().unwrap().food_name, "Samosa");
    }

    #[tokio::test]
    async fn test_invalid_image_reported_in_language() {
        let state = testing::state(FakeVisionClient::sample(), MockClient::new());
        let (status, body) = send(
            crate::app(state),
            multipart(Some(&png(40, 40)), Some("kn")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("100x100"));
        assert!(body["error"].as_str().unwrap().contains("ಕನಿಷ್ಠ"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let state = testing::state(FakeVisionClient::sample(), MockClient::new());
        let (status, body) = send(crate::app(state), multipart(None, Some("en"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_truncated_language_field() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\nhi"
        );
        let request = Request::post("/api/recognize")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let state = testing::state(FakeVisionClient::sample(), MockClient::new());
        let (status, body) = send(crate::app(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to read"), "{}", error);
        assert!(!error.contains("Unsupported language"));
    }

    #[tokio::test]
    async fn test_unknown_language() {
        let state = testing::state(FakeVisionClient::sample(), MockClient::new());
        let (status, body) = send(crate::app(state), multipart(Some(&png(200, 200)), Some("fr"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("fr"));
    }
}
