use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Menu OCR API",
        version = "1.0.0",
        description = "Upload an image, get its text or its Menu Week label back.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::ocr,
        handlers::ocr::ocr_text,
        handlers::ocr::ocr_menu_week,
    ),
    components(schemas(
        dto::TextResponse,
        dto::MenuWeekResponse,
        dto::ErrorResponse,
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "ocr", description = "Text recognition on uploaded images"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
