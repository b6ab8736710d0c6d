//! Configuration management for the Zone OCR server

use std::env;
use std::path::PathBuf;

use crate::ocr::{OcrProvider, OcrServiceConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub render: RenderConfig,
    pub ocr: OcrServiceConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Resolution PDF pages are rasterized at
    pub dpi: u32,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayConfig {
    /// TrueType/OpenType font for zone labels; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            render: RenderConfig {
                dpi: 200,
                max_upload_bytes: 200 * 1024 * 1024,
            },
            ocr: OcrServiceConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            render: RenderConfig {
                dpi: parse_var("RENDER_DPI", defaults.render.dpi)?,
                max_upload_bytes: parse_var::<usize>("MAX_UPLOAD_MB", defaults.render.max_upload_bytes >> 20)?
                    << 20,
            },
            ocr: OcrServiceConfig {
                providers: match env::var("OCR_PROVIDERS") {
                    Ok(list) => parse_providers(&list)?,
                    Err(_) => defaults.ocr.providers,
                },
                tesseract_command: env::var("TESSERACT_CMD").unwrap_or(defaults.ocr.tesseract_command),
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or(defaults.ocr.ollama_model),
                default_language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.default_language),
            },
            overlay: OverlayConfig {
                font_path: env::var("OVERLAY_FONT").ok().map(PathBuf::from),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated provider list such as `tesseract,ollama`
fn parse_providers(list: &str) -> Result<Vec<OcrProvider>, ConfigError> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| {
            item.parse().map_err(|_| ConfigError::InvalidValue {
                name: "OCR_PROVIDERS",
                value: item.to_string(),
            })
        })
        .collect()
}
