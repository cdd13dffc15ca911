use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// Health data for `GET /health`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
    /// Variant served by `POST /ocr`.
    pub variant: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    pub languages: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr_status = OcrStatus {
        status: if state.ocr.is_available() {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
        engine: state.ocr.engine_name().map(str::to_string),
        languages: state.config.ocr.languages.clone(),
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: ocr_status,
        variant: state.config.server.variant.to_string(),
    })
}
