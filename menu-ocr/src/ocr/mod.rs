//! OCR (Optical Character Recognition) Module
//!
//! Turns uploaded image bytes into recognized text.
//!
//! # Architecture
//!
//! - `preprocessing` decodes the upload and normalizes the bitmap: color modes
//!   other than 8-bit grayscale/RGB are converted to RGB, and oversized images
//!   are downscaled (Lanczos3) so the larger side fits `max_image_dimension`.
//! - `TextRecognizer` is the engine seam; `TesseractEngine` implements it via
//!   leptess.
//! - `OcrProvider` owns the engine (or the reason it is unavailable) and runs
//!   the whole pipeline on the blocking thread pool.
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let text = ocr.extract_text(bytes, RecognitionOptions::default()).await?;
//! ```

mod engine;
mod preprocessing;
mod provider;

pub use engine::{RecognitionOptions, TesseractEngine, TextRecognizer};
pub use preprocessing::{decode_image, encode_png, normalize_image, ColorMode};
pub use provider::OcrProvider;
