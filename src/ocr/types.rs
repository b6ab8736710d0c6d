//! OCR Types
//!
//! Provider selection, per-zone results and run bookkeeping.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Tesseract OCR (local CLI)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::Tesseract
    }
}

impl FromStr for OcrProvider {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "ollama" => Ok(Self::Ollama),
            other => Err(OcrError::ProviderNotAvailable(format!(
                "unknown provider '{}'",
                other
            ))),
        }
    }
}

/// Text recognized by a provider for one image
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Recognized text, as returned by the engine
    pub text: String,
    /// Provider used
    pub provider: OcrProvider,
}

/// One extracted zone, a row of the result table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResult {
    /// 1-based page number
    pub page_number: usize,
    /// 1-based running counter across the whole run
    pub zone_number: usize,
    /// Recognized lines joined with `\n`; empty when nothing was read
    pub text: String,
    /// Clamped coordinates, `"(x1,y1) to (x2,y2)"`
    pub coordinates: String,
}

/// A zone that fell entirely outside its page after clamping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedZone {
    /// 1-based page number
    pub page_number: usize,
    /// 0-based position of the zone on its page
    pub position: usize,
}

/// A completed OCR run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRun {
    pub results: Vec<ZoneResult>,
    pub skipped: Vec<SkippedZone>,
    pub total_zones: usize,
    pub finished_at: DateTime<Utc>,
}

/// Outcome of asking the dispatcher to run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The store was empty; nothing ran
    NoZones,
    Completed(OcrRun),
}

/// Progress snapshot, `processed` of `total` zones attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProgress {
    pub processed: usize,
    pub total: usize,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Failed to extract image region: {0}")]
    ImageExtractionError(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Zones reference page {0}, which the document does not have")]
    PageMissing(usize),

    #[error("API error: {0}")]
    ApiError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::ProviderNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PageMissing(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("tesseract".parse::<OcrProvider>().unwrap(), OcrProvider::Tesseract);
        assert_eq!(" Ollama ".parse::<OcrProvider>().unwrap(), OcrProvider::Ollama);
        assert!("openai".parse::<OcrProvider>().is_err());
    }

    #[test]
    fn test_zone_result_serializes_camel_case() {
        let result = ZoneResult {
            page_number: 1,
            zone_number: 2,
            text: "Total".to_string(),
            coordinates: "(0,0) to (10,10)".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["zoneNumber"], 2);
        assert_eq!(json["coordinates"], "(0,0) to (10,10)");
    }
}
