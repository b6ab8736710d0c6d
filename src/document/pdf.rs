//! PDF rasterization via MuPDF
//!
//! Every page is rendered to an RGB raster at the requested DPI.
//! MuPDF documents are not `Send`, so everything here is synchronous and
//! expected to run inside `spawn_blocking`.

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};

use super::error::LoadError;

/// PDF user space is 72 points per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Render every page of a PDF at `dpi`
pub fn render_pages(data: &[u8], dpi: u32) -> Result<Vec<RgbImage>, LoadError> {
    let doc = Document::from_bytes(data, "application/pdf")?;
    let page_count = doc.page_count()?;
    if page_count <= 0 {
        return Err(LoadError::NoPages);
    }

    let scale = dpi as f32 / POINTS_PER_INCH;
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut pages = Vec::with_capacity(page_count as usize);
    for index in 0..page_count {
        let page = doc.load_page(index)?;
        let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
        pages.push(pixmap_to_rgb(&pixmap)?);

        tracing::debug!(page = index, dpi, "Rendered PDF page");
    }

    Ok(pages)
}

fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> Result<RgbImage, LoadError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            // Grayscale pixmaps carry a single channel
            let (g, b) = if n >= 3 {
                (
                    samples.get(offset + 1).copied().unwrap_or(0),
                    samples.get(offset + 2).copied().unwrap_or(0),
                )
            } else {
                (r, r)
            };
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| LoadError::Render("Failed to create image buffer".to_string()))
}
