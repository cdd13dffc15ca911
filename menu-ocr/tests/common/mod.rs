#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex, Once};

use axum::body::Body;
use axum::http::{header, Request};
use image::{DynamicImage, GenericImageView, ImageFormat};

use menu_ocr::api::AppState;
use menu_ocr::config::{
    Config, MenuWeekConfig, OcrConfig, ResponseVariant, ServerConfig, UploadConfig,
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MENU_WEEK_PATTERN,
};
use menu_ocr::error::Result;
use menu_ocr::ocr::{ColorMode, OcrProvider, RecognitionOptions, TextRecognizer};

static INIT: Once = Once::new();

pub const BOUNDARY: &str = "----menu-ocr-test-boundary";

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// What the recognizer was handed on one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeenImage {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub psm: Option<u8>,
}

/// Recognizer double that returns fixed text and records its inputs.
pub struct FakeEngine {
    text: String,
    pub seen: Mutex<Vec<SeenImage>>,
}

impl FakeEngine {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<SeenImage> {
        self.seen.lock().unwrap().clone()
    }
}

impl TextRecognizer for FakeEngine {
    fn recognize(&self, image: &DynamicImage, options: &RecognitionOptions) -> Result<String> {
        let (width, height) = image.dimensions();
        self.seen.lock().unwrap().push(SeenImage {
            width,
            height,
            mode: ColorMode::of(image),
            psm: options.page_segmentation_mode,
        });
        Ok(self.text.clone())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn test_config(variant: ResponseVariant) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            variant,
        },
        upload: UploadConfig {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            enforce_file_size: true,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        },
        ocr: OcrConfig {
            languages: "eng".to_string(),
            max_image_dimension: Some(2400),
        },
        menu_week: MenuWeekConfig {
            pattern: DEFAULT_MENU_WEEK_PATTERN.to_string(),
            page_segmentation_mode: 6,
        },
    }
}

pub fn state_with_engine(config: Config, engine: Arc<dyn TextRecognizer>) -> AppState {
    let ocr = OcrProvider::with_engine(engine, config.ocr.max_image_dimension);
    AppState::new(config, ocr).expect("default pattern compiles")
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), format)
        .unwrap_or_else(|e| panic!("Failed to encode {format:?}: {e}"));
    output
}

pub fn white_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([255, 255, 255]),
    ))
}

/// A `multipart/form-data` body with one file field.
pub fn file_form(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post_form(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
