//! JSON bodies returned by the OCR endpoints.

use serde::{Deserialize, Serialize};

/// Returned by the generic variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TextResponse {
    /// Recognized text exactly as the engine produced it, or
    /// `"No text was detected in the image."` when it is blank.
    pub text: String,
}

/// Returned by the menu-week variant when a label was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MenuWeekResponse {
    /// First `<Season> Menu Week <n>` label found, e.g. `"Summer Menu Week 12"`.
    pub menu_week: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
