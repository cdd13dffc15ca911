//! Menu OCR: a small web service that runs Tesseract over uploaded images and
//! returns either the recognized text or the seasonal "Menu Week" label found
//! in it.

pub mod api;
pub mod config;
pub mod error;
pub mod menu_week;
pub mod ocr;
pub mod upload;
