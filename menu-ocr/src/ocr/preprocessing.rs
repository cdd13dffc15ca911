use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{OcrServiceError, Result};

/// Color layout of a decoded image, as far as the OCR engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 8-bit single channel.
    Grayscale,
    /// 8-bit three channel.
    Rgb,
    /// Anything else: alpha, palette-expanded, 16-bit or float buffers.
    Other,
}

impl ColorMode {
    pub fn of(img: &DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(_) => ColorMode::Grayscale,
            DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
            _ => ColorMode::Other,
        }
    }

    pub fn is_normalized(self) -> bool {
        !matches!(self, ColorMode::Other)
    }
}

/// Decode raw upload bytes, sniffing the format from the content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrServiceError::Decode(format!("Failed to read image: {e}")))?;

    reader
        .decode()
        .map_err(|e| OcrServiceError::Decode(e.to_string()))
}

/// Bring a decoded image into a shape the OCR engine accepts.
///
/// The result is always grayscale or RGB, and when `max_dimension` is set its
/// larger side is at most that many pixels. Normalizing twice is a no-op.
pub fn normalize_image(img: DynamicImage, max_dimension: Option<u32>) -> DynamicImage {
    let img = match ColorMode::of(&img) {
        ColorMode::Other => DynamicImage::ImageRgb8(img.to_rgb8()),
        ColorMode::Grayscale | ColorMode::Rgb => img,
    };

    match max_dimension {
        Some(max_dim) => resize_if_needed(img, max_dim),
        None => img,
    }
}

/// Downscale so the larger side equals `max_dim`, keeping the aspect ratio.
///
/// Uses Lanczos3 for high-quality downscaling.
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if max_dim == 0 || (width <= max_dim && height <= max_dim) {
        return img;
    }

    let (new_width, new_height) = if width >= height {
        (max_dim, scale_side(height, max_dim, width))
    } else {
        (scale_side(width, max_dim, height), max_dim)
    };

    img.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

fn scale_side(side: u32, target: u32, longest: u32) -> u32 {
    let scaled = (side as f64 * target as f64 / longest as f64).round() as u32;
    scaled.max(1)
}

/// Encode a normalized image losslessly for handing to the engine.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| OcrServiceError::Decode(format!("Failed to encode image: {e}")))?;
    Ok(output)
}
