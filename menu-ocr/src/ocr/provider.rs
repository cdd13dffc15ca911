use std::sync::Arc;

use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{OcrServiceError, Result};

use super::engine::{RecognitionOptions, TesseractEngine, TextRecognizer};
use super::preprocessing::{decode_image, normalize_image, ColorMode};

#[derive(Clone)]
enum OcrBackend {
    Local { engine: Arc<dyn TextRecognizer> },
    Unavailable { reason: String },
}

/// Runs the decode → normalize → recognize pipeline for one upload.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    max_image_dimension: Option<u32>,
}

impl OcrProvider {
    /// Builds a Tesseract-backed provider. A missing Tesseract install leaves
    /// the provider unavailable rather than failing startup.
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match TesseractEngine::new(&config.languages) {
            Ok(engine) => {
                info!(languages = %config.languages, "Tesseract OCR initialized");
                OcrBackend::Local {
                    engine: Arc::new(engine),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            max_image_dimension: config.max_image_dimension,
        }
    }

    pub fn with_engine(engine: Arc<dyn TextRecognizer>, max_image_dimension: Option<u32>) -> Self {
        Self {
            backend: OcrBackend::Local { engine },
            max_image_dimension,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
            max_image_dimension: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn engine_name(&self) -> Option<&'static str> {
        match &self.backend {
            OcrBackend::Local { engine } => Some(engine.name()),
            OcrBackend::Unavailable { .. } => None,
        }
    }

    /// Decode `bytes`, normalize the bitmap and run recognition on it.
    ///
    /// Everything after the hand-off runs on the blocking pool. The returned
    /// text is the engine output, untrimmed.
    pub async fn extract_text(&self, bytes: Vec<u8>, options: RecognitionOptions) -> Result<String> {
        let engine = match &self.backend {
            OcrBackend::Local { engine } => Arc::clone(engine),
            OcrBackend::Unavailable { reason } => {
                return Err(OcrServiceError::OcrUnavailable(reason.clone()))
            }
        };
        let max_image_dimension = self.max_image_dimension;

        tokio::task::spawn_blocking(move || {
            let img = decode_image(&bytes)?;
            let (width, height) = img.dimensions();
            let mode = ColorMode::of(&img);

            let img = normalize_image(img, max_image_dimension);
            let (new_width, new_height) = img.dimensions();
            debug!(
                width,
                height,
                ?mode,
                new_width,
                new_height,
                psm = ?options.page_segmentation_mode,
                "Running OCR"
            );

            engine.recognize(&img, &options)
        })
        .await
        .map_err(|e| OcrServiceError::Recognition(format!("OCR task panicked: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records what the engine was handed.
    struct RecordingEngine {
        text: String,
        seen: Mutex<Vec<(u32, u32, ColorMode, RecognitionOptions)>>,
    }

    impl RecordingEngine {
        fn new(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextRecognizer for RecordingEngine {
        fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String> {
            let (w, h) = image.dimensions();
            self.seen
                .lock()
                .unwrap()
                .push((w, h, ColorMode::of(image), *options));
            Ok(self.text.clone())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingEngine;

    impl TextRecognizer for FailingEngine {
        fn recognize(&self, _: &DynamicImage, _: &RecognitionOptions) -> Result<String> {
            Err(OcrServiceError::Recognition("engine exploded".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// Holds each call open for a while and records the peak overlap.
    #[derive(Default)]
    struct SlowEngine {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TextRecognizer for SlowEngine {
        fn recognize(&self, _: &DynamicImage, _: &RecognitionOptions) -> Result<String> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok("done".to_string())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn png(img: DynamicImage) -> Vec<u8> {
        let mut output = Vec::new();
        img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
            .unwrap();
        output
    }

    #[test]
    fn test_provider_graceful_degradation() {
        let config = OcrConfig {
            languages: "zz_not_a_language".to_string(),
            max_image_dimension: Some(2400),
        };

        let provider = OcrProvider::new(&config);
        assert!(!provider.is_available());
        assert_eq!(provider.engine_name(), None);
    }

    #[tokio::test]
    async fn test_unavailable_returns_error() {
        let provider = OcrProvider::unavailable("Test unavailable");
        let result = provider
            .extract_text(png(DynamicImage::new_rgb8(4, 4)), RecognitionOptions::default())
            .await;
        assert!(matches!(result, Err(OcrServiceError::OcrUnavailable(_))));
    }

    #[tokio::test]
    async fn test_engine_receives_normalized_image_and_options() {
        let engine = RecordingEngine::new("  hello \n");
        let provider = OcrProvider::with_engine(engine.clone(), Some(50));

        let text = provider
            .extract_text(
                png(DynamicImage::new_rgba8(200, 100)),
                RecognitionOptions::single_block(6),
            )
            .await
            .unwrap();

        assert_eq!(text, "  hello \n", "text must not be trimmed");
        let seen = engine.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[(50, 25, ColorMode::Rgb, RecognitionOptions::single_block(6))]
        );
    }

    #[tokio::test]
    async fn test_decode_failure_skips_engine() {
        let engine = RecordingEngine::new("unused");
        let provider = OcrProvider::with_engine(engine.clone(), None);

        let result = provider
            .extract_text(b"GIF89a but not really".to_vec(), RecognitionOptions::default())
            .await;

        assert!(matches!(result, Err(OcrServiceError::Decode(_))));
        assert!(engine.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_is_recognition_error() {
        let provider = OcrProvider::with_engine(Arc::new(FailingEngine), None);

        let err = provider
            .extract_text(png(DynamicImage::new_luma8(8, 8)), RecognitionOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error processing image: engine exploded");
    }

    #[tokio::test]
    async fn test_concurrent_requests_run_in_parallel() {
        let engine = Arc::new(SlowEngine::default());
        let provider = OcrProvider::with_engine(engine.clone(), None);
        let other = provider.clone();

        let (first, second) = tokio::join!(
            provider.extract_text(png(DynamicImage::new_rgb8(8, 8)), RecognitionOptions::default()),
            other.extract_text(
                png(DynamicImage::new_luma8(8, 8)),
                RecognitionOptions::single_block(6)
            ),
        );

        assert_eq!(first.unwrap(), "done");
        assert_eq!(second.unwrap(), "done");
        assert_eq!(engine.peak.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clone_shares_engine() {
        let engine = RecordingEngine::new("x");
        let provider = OcrProvider::with_engine(engine, None);
        let cloned = provider.clone();
        assert_eq!(provider.is_available(), cloned.is_available());
        assert_eq!(cloned.engine_name(), Some("recording"));
    }
}
