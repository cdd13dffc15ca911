use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

use crate::api::dto::{ErrorResponse, MenuWeekResponse, TextResponse};
use crate::api::state::AppState;
use crate::config::ResponseVariant;
use crate::error::{OcrServiceError, Result};
use crate::ocr::RecognitionOptions;
use crate::upload::receive_upload;

/// Stands in for recognized text that is empty once trimmed.
pub const NO_TEXT_DETECTED: &str = "No text was detected in the image.";

/// `POST /ocr`
///
/// Runs whichever variant the server is configured for (`OCR_VARIANT`).
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    operation_id = "ocr",
    request_body(content_type = "multipart/form-data", content = String, description = "Form with a file field named `image`"),
    responses(
        (status = 200, description = "Recognized text (text variant) or Menu Week label (menu_week variant)", body = TextResponse),
        (status = 400, description = "Missing, invalid or oversized upload", body = ErrorResponse),
        (status = 404, description = "No Menu Week label found (menu_week variant)", body = ErrorResponse),
        (status = 500, description = "Image could not be decoded or recognized", body = ErrorResponse),
        (status = 503, description = "OCR engine unavailable", body = ErrorResponse),
    )
)]
pub async fn ocr(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    match state.config.server.variant {
        ResponseVariant::Text => ocr_text(State(state), multipart).await.into_response(),
        ResponseVariant::MenuWeek => ocr_menu_week(State(state), multipart)
            .await
            .into_response(),
    }
}

/// `POST /ocr/text`
#[utoipa::path(
    post,
    path = "/ocr/text",
    tag = "ocr",
    operation_id = "ocr.text",
    request_body(content_type = "multipart/form-data", content = String, description = "Form with a file field named `image`"),
    responses(
        (status = 200, description = "Recognized text", body = TextResponse),
        (status = 400, description = "Missing, invalid or oversized upload", body = ErrorResponse),
        (status = 500, description = "Image could not be decoded or recognized", body = ErrorResponse),
        (status = 503, description = "OCR engine unavailable", body = ErrorResponse),
    )
)]
pub async fn ocr_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<TextResponse>> {
    let text = recognize_upload(&state, multipart, RecognitionOptions::default()).await?;

    Ok(Json(TextResponse {
        text: text_or_placeholder(text),
    }))
}

/// `POST /ocr/menu-week`
///
/// Recognizes the image as a single uniform block of text and returns the
/// first Menu Week label in it.
#[utoipa::path(
    post,
    path = "/ocr/menu-week",
    tag = "ocr",
    operation_id = "ocr.menuWeek",
    request_body(content_type = "multipart/form-data", content = String, description = "Form with a file field named `image`"),
    responses(
        (status = 200, description = "Menu Week label found", body = MenuWeekResponse),
        (status = 400, description = "Missing, invalid or oversized upload", body = ErrorResponse),
        (status = 404, description = "No Menu Week label in the recognized text", body = ErrorResponse),
        (status = 500, description = "Image could not be decoded or recognized", body = ErrorResponse),
        (status = 503, description = "OCR engine unavailable", body = ErrorResponse),
    )
)]
pub async fn ocr_menu_week(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<MenuWeekResponse>> {
    let options = RecognitionOptions::single_block(state.config.menu_week.page_segmentation_mode);
    let text = recognize_upload(&state, multipart, options).await?;

    match state.menu_week.extract(&text) {
        Some(label) => Ok(Json(MenuWeekResponse {
            menu_week: label.to_string(),
        })),
        None => {
            debug!(chars = text.chars().count(), "No menu week label in recognized text");
            Err(OcrServiceError::NoMenuWeek)
        }
    }
}

fn text_or_placeholder(text: String) -> String {
    if text.trim().is_empty() {
        NO_TEXT_DETECTED.to_string()
    } else {
        text
    }
}

async fn recognize_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
    options: RecognitionOptions,
) -> Result<String> {
    // A body that is not multipart at all has no files in it.
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Request is not a multipart upload");
        OcrServiceError::NoImage
    })?;

    let upload = match receive_upload(&mut multipart, &state.config.upload).await {
        Ok(upload) => upload,
        Err(e) => {
            debug!(error = %e, "Upload rejected");
            return Err(e);
        }
    };
    debug!(
        filename = %upload.filename,
        bytes = upload.bytes.len(),
        "Upload accepted"
    );

    let result = state.ocr.extract_text(upload.bytes, options).await;
    if let Err(e) = &result {
        warn!(filename = %upload.filename, error = %e, "OCR failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_replaced() {
        assert_eq!(text_or_placeholder(String::new()), NO_TEXT_DETECTED);
        assert_eq!(text_or_placeholder(" \n\t\x0c".to_string()), NO_TEXT_DETECTED);
    }

    #[test]
    fn test_text_is_returned_untrimmed() {
        assert_eq!(
            text_or_placeholder("  Lunch\n".to_string()),
            "  Lunch\n".to_string()
        );
    }
}
