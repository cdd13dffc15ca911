use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::{frontend, openapi};
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The handler reports oversize uploads itself, so the transport cap sits
    // above the per-file limit.
    let body_limit = DefaultBodyLimit::max(state.config.upload.max_body_size);

    Router::new()
        .route("/", get(frontend::serve_root))
        .route("/ocr", post(handlers::ocr::ocr))
        .route("/ocr/text", post(handlers::ocr::ocr_text))
        .route("/ocr/menu-week", post(handlers::ocr::ocr_menu_week))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
