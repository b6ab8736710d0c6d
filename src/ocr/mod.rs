//! OCR Module
//!
//! Runs an external OCR engine over every zone of the session.
//!
//! Supports multiple backends:
//! - Tesseract (local CLI, requires installation)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zone_ocr_server::ocr::{run_ocr, OcrService, OcrServiceConfig, RunOutcome};
//!
//! let service = OcrService::new(OcrServiceConfig::default());
//!
//! match run_ocr(&service, None, &document.pages, &zones, &|p| println!("{p:?}")).await? {
//!     RunOutcome::NoZones => println!("No zones defined!"),
//!     RunOutcome::Completed(run) => println!("{} results", run.results.len()),
//! }
//! ```

mod dispatch;
pub(crate) mod provider;
mod service;
mod types;

pub use dispatch::{normalize_text, run_ocr, run_with_provider, ProgressSink};
pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider, SINGLE_BLOCK_PSM};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{
    OcrError, OcrProvider, OcrResult, OcrRun, RunOutcome, RunProgress, SkippedZone, ZoneResult,
};
