//! Upload loading
//!
//! Turns uploaded bytes into a [`LoadedDocument`]. PDF rendering and image
//! decoding are CPU-bound and run on the blocking pool.

use super::error::LoadError;
use super::pdf;
use super::types::{DocumentFormat, LoadedDocument, Page};

/// Decode an upload into pages
pub async fn load_document(
    data: Vec<u8>,
    filename: String,
    dpi: u32,
) -> Result<LoadedDocument, LoadError> {
    if data.is_empty() {
        return Err(LoadError::Empty);
    }

    let format = DocumentFormat::from_magic_bytes(&data).ok_or_else(|| {
        LoadError::UnsupportedFormat(
            "expected a PDF, PNG, JPEG, BMP or TIFF file".to_string(),
        )
    })?;

    let images = tokio::task::spawn_blocking(move || decode(&data, format, dpi))
        .await
        .map_err(|e| LoadError::Task(e.to_string()))??;

    let pages: Vec<Page> = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| Page::new(index, image))
        .collect();

    tracing::info!(
        filename = %filename,
        format = ?format,
        pages = pages.len(),
        "Loaded document"
    );

    Ok(LoadedDocument::new(filename, format, pages))
}

fn decode(data: &[u8], format: DocumentFormat, dpi: u32) -> Result<Vec<image::RgbImage>, LoadError> {
    match format.image_format() {
        None => pdf::render_pages(data, dpi),
        Some(image_format) => {
            let image = image::load_from_memory_with_format(data, image_format)?;
            Ok(vec![image.to_rgb8()])
        }
    }
}
