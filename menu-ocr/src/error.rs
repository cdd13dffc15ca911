use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::MIB;

#[derive(Error, Debug)]
pub enum OcrServiceError {
    #[error("No image uploaded")]
    NoImage,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("File size must be less than {limit_mb}MB")]
    FileTooLarge { limit_mb: usize },

    #[error("Invalid file type. Please upload an image file.")]
    InvalidFileType,

    #[error("Invalid upload: {0}")]
    Multipart(String),

    #[error("Error processing image: {0}")]
    Decode(String),

    #[error("Error processing image: {0}")]
    Recognition(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("No menu week pattern found in the image.")]
    NoMenuWeek,
}

impl OcrServiceError {
    /// Never names a limit above the one enforced.
    pub fn file_too_large(limit_bytes: usize) -> Self {
        Self::FileTooLarge {
            limit_mb: limit_bytes / MIB,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoImage
            | Self::NoSelectedFile
            | Self::FileTooLarge { .. }
            | Self::InvalidFileType
            | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::NoMenuWeek => StatusCode::NOT_FOUND,
            Self::Decode(_) | Self::Recognition(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for OcrServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, OcrServiceError>;
