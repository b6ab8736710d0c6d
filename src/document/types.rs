//! Core document types
//!
//! A loaded document is an ordered list of raster pages. PDFs contribute
//! one page per PDF page, images contribute exactly one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::Serialize;
use uuid::Uuid;

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl DocumentFormat {
    /// Detect format from magic bytes
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PDF magic: %PDF
        if bytes.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }

        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }

    /// The `image` crate decoder for raster formats
    pub fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            Self::Pdf => None,
            Self::Png => Some(image::ImageFormat::Png),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::Tiff => Some(image::ImageFormat::Tiff),
        }
    }
}

/// One raster page of a loaded document
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    image: Arc<RgbImage>,
}

impl Page {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self {
            index,
            image: Arc::new(image),
        }
    }

    /// Zero-based position in the document
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Page dimensions as reported to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

impl From<&Page> for PageInfo {
    fn from(page: &Page) -> Self {
        Self {
            index: page.index(),
            width: page.width(),
            height: page.height(),
        }
    }
}

/// A document decoded into pages
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub id: Uuid,
    pub filename: String,
    pub format: DocumentFormat,
    pub pages: Vec<Page>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedDocument {
    pub fn new(filename: impl Into<String>, format: DocumentFormat, pages: Vec<Page>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            format,
            pages,
            loaded_at: Utc::now(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}
