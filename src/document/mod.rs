//! Document module
//!
//! Loads uploaded PDFs and images into in-memory raster pages.
//!
//! - PDFs are rendered page by page through MuPDF
//! - PNG, JPEG, BMP and TIFF images become a one-page document

mod error;
mod loader;
mod pdf;
mod types;

pub use error::LoadError;
pub use loader::load_document;
pub use types::{DocumentFormat, LoadedDocument, Page, PageInfo};
