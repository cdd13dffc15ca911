use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Default allow-list of upload extensions (lowercase, without the dot).
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

pub const MIB: usize = 1024 * 1024;

/// 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * MIB;

pub const DEFAULT_MAX_BODY_SIZE: usize = 32 * MIB;

pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 2400;

/// Tesseract `--psm 6`: assume a single uniform block of text.
pub const DEFAULT_MENU_WEEK_PSM: u8 = 6;

pub const DEFAULT_MENU_WEEK_PATTERN: &str = r"(Summer|Winter)\s+Menu\s+Week\s+\d+";

fn parse_env_or<T: FromStr>(var: &str, default: T) -> T
where
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// The size error names the limit in whole MiB, so the limit must be one.
fn whole_mebibytes(var: &str, bytes: usize) -> usize {
    let rounded = (bytes / MIB).max(1) * MIB;
    if rounded != bytes {
        tracing::warn!(
            "{} = {} is not a whole number of MiB. Using {} ({}MB).",
            var,
            bytes,
            rounded,
            rounded / MIB
        );
    }
    rounded
}

fn parse_extensions(var: &str) -> Vec<String> {
    match env::var(var) {
        Ok(val) if !val.trim().is_empty() => val
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect(),
        _ => DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
    }
}

/// Which response shape `POST /ocr` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVariant {
    /// `{"text": ...}`
    Text,
    /// `{"menu_week": ...}` or 404.
    MenuWeek,
}

impl FromStr for ResponseVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "text" | "generic" => Ok(Self::Text),
            "menu_week" | "menu" => Ok(Self::MenuWeek),
            other => Err(format!(
                "unknown variant '{other}' (expected 'text' or 'menu_week')"
            )),
        }
    }
}

impl fmt::Display for ResponseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::MenuWeek => write!(f, "menu_week"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
    pub menu_week: MenuWeekConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub variant: ResponseVariant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub allowed_extensions: Vec<String>,
    /// Always a whole number of MiB when read from the environment.
    pub max_file_size: usize,
    /// When false the upload size is not checked by the handler.
    pub enforce_file_size: bool,
    /// Transport-level cap on the whole request body.
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub languages: String,
    /// Larger side is downscaled to this many pixels. `None` disables capping.
    pub max_image_dimension: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuWeekConfig {
    pub pattern: String,
    pub page_segmentation_mode: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("OCR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("OCR_PORT", 5000),
                variant: parse_env_or("OCR_VARIANT", ResponseVariant::Text),
            },
            upload: UploadConfig {
                allowed_extensions: parse_extensions("OCR_ALLOWED_EXTENSIONS"),
                max_file_size: whole_mebibytes(
                    "OCR_MAX_FILE_SIZE",
                    parse_env_or("OCR_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
                ),
                enforce_file_size: parse_env_or("OCR_ENFORCE_FILE_SIZE", true),
                max_body_size: parse_env_or("OCR_MAX_BODY_SIZE", DEFAULT_MAX_BODY_SIZE),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                max_image_dimension: match parse_env_or(
                    "OCR_MAX_IMAGE_DIMENSION",
                    DEFAULT_MAX_IMAGE_DIMENSION,
                ) {
                    0 => None,
                    dim => Some(dim),
                },
            },
            menu_week: MenuWeekConfig {
                pattern: env::var("OCR_MENU_WEEK_PATTERN")
                    .unwrap_or_else(|_| DEFAULT_MENU_WEEK_PATTERN.to_string()),
                page_segmentation_mode: parse_env_or("OCR_MENU_WEEK_PSM", DEFAULT_MENU_WEEK_PSM),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

impl UploadConfig {
    /// Size limit to enforce, if the size check is enabled.
    pub fn size_limit(&self) -> Option<usize> {
        self.enforce_file_size.then_some(self.max_file_size)
    }
}
