//! Document loading errors

use thiserror::Error;

/// Errors raised while turning an upload into pages
#[derive(Debug, Error)]
pub enum LoadError {
    /// Upload contained no bytes
    #[error("Uploaded file is empty")]
    Empty,

    /// Neither a PDF nor a supported raster image
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// PDF rendered to zero pages
    #[error("Document has no pages")]
    NoPages,

    /// MuPDF failed to open or render the PDF
    #[error("PDF render error: {0}")]
    Render(String),

    /// Raster decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Blocking task failed to complete
    #[error("Load task failed: {0}")]
    Task(String),
}

impl From<mupdf::Error> for LoadError {
    fn from(err: mupdf::Error) -> Self {
        LoadError::Render(err.to_string())
    }
}
