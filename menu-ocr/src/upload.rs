//! Multipart upload intake and validation.
//!
//! Checks run in a fixed order and stop at the first failure: the `image` file
//! field must be present, its filename non-empty, its size within the limit
//! (when enforced) and its extension on the allow-list. No decoding happens
//! here.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::config::UploadConfig;
use crate::error::{OcrServiceError, Result};

/// Name of the multipart file field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// A validated upload, owned by one request.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Pull the `image` file field out of the form and validate it.
///
/// Only fields that carry a filename count as files; a plain text field named
/// `image` is treated as missing. The first `image` file wins.
pub async fn receive_upload(multipart: &mut Multipart, config: &UploadConfig) -> Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(OcrServiceError::NoSelectedFile);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, config))?;

        validate_upload(&filename, bytes.len(), config)?;

        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(OcrServiceError::NoImage)
}

/// Filename and size checks, in order.
pub fn validate_upload(filename: &str, size: usize, config: &UploadConfig) -> Result<()> {
    if filename.is_empty() {
        return Err(OcrServiceError::NoSelectedFile);
    }

    if let Some(limit) = config.size_limit() {
        if size > limit {
            return Err(OcrServiceError::file_too_large(limit));
        }
    }

    if !allowed_file(filename, &config.allowed_extensions) {
        return Err(OcrServiceError::InvalidFileType);
    }

    Ok(())
}

/// True when the text after the last dot, lowercased, is an allowed extension.
pub fn allowed_file(filename: &str, allowed_extensions: &[String]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            allowed_extensions.iter().any(|allowed| *allowed == ext)
        }
        None => false,
    }
}

fn multipart_error(err: MultipartError, config: &UploadConfig) -> OcrServiceError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        if let Some(limit) = config.size_limit() {
            return OcrServiceError::file_too_large(limit);
        }
    }
    OcrServiceError::Multipart(err.body_text())
}
