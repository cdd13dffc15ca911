use image::DynamicImage;
use leptess::{LepTess, Variable};

use crate::error::{OcrServiceError, Result};

use super::preprocessing::encode_png;

/// Tesseract's own default, fully automatic page segmentation.
const PSM_AUTO: u8 = 3;

/// Per-call hints for the recognizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Tesseract page-segmentation mode; `None` keeps the engine default.
    pub page_segmentation_mode: Option<u8>,
}

impl RecognitionOptions {
    pub fn single_block(psm: u8) -> Self {
        Self {
            page_segmentation_mode: Some(psm),
        }
    }
}

/// A blocking, CPU-bound text recognizer.
///
/// Callers hand over an image that is already grayscale or RGB. Implementations
/// return the engine output verbatim; trimming is the caller's business.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Tesseract via `leptess`.
///
/// Every call gets its own `LepTess` handle. Nothing is shared between
/// requests, including engine variables such as the page segmentation mode.
pub struct TesseractEngine {
    languages: String,
}

impl TesseractEngine {
    /// Checks once that Tesseract and the language data load.
    pub fn new(languages: &str) -> std::result::Result<Self, String> {
        LepTess::new(None, languages).map_err(|e| e.to_string())?;
        Ok(Self {
            languages: languages.to_string(),
        })
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String> {
        let png = encode_png(image)?;
        let psm = options
            .page_segmentation_mode
            .unwrap_or(PSM_AUTO)
            .to_string();

        let mut lt = LepTess::new(None, &self.languages)
            .map_err(|e| OcrServiceError::Recognition(format!("Failed to start Tesseract: {e}")))?;
        lt.set_variable(Variable::TesseditPagesegMode, &psm)
            .map_err(|e| OcrServiceError::Recognition(format!("Failed to set psm {psm}: {e}")))?;
        lt.set_image_from_mem(&png)
            .map_err(|e| OcrServiceError::Recognition(format!("Failed to set image: {e}")))?;
        lt.get_utf8_text()
            .map_err(|e| OcrServiceError::Recognition(format!("Failed to extract text: {e}")))
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}
