//! Zone overlay rendering
//!
//! Draws a page at the session zoom with every zone outlined in red and
//! labelled "Zone N". Labels need a font; without one only the outlines
//! are drawn.

use std::io::Cursor;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::config::OverlayConfig;
use crate::document::Page;
use crate::zones::ZoneRect;

const ZONE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Gap between a label's baseline area and the zone's top edge
const LABEL_OFFSET: i32 = 10;

const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct OverlayRenderer {
    font: Option<FontVec>,
    font_scale: f32,
    thickness: i32,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 16.0,
            thickness: 2,
        }
    }
}

impl OverlayRenderer {
    /// Build a renderer, loading the configured font or a system font
    pub fn new(config: &OverlayConfig) -> Self {
        if let Some(path) = &config.font_path {
            match load_font(path) {
                Some(font) => return Self::with_font(font),
                None => tracing::warn!("Could not load overlay font {}", path.display()),
            }
        }

        for path in SYSTEM_FONTS {
            if let Some(font) = load_font(Path::new(path)) {
                tracing::info!("Loaded system font: {}", path);
                return Self::with_font(font);
            }
        }

        tracing::debug!("No system font found, zone labels will be skipped");
        Self::default()
    }

    pub fn with_font(font: FontVec) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render `page` at `zoom`, outlining `zones` when given
    pub fn render(&self, page: &Page, zones: &[ZoneRect], zoom: f64) -> RgbImage {
        let mut canvas = scale_page(page.image(), zoom);

        let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);
        let margin = self.thickness as i64;
        // Keep coordinates just outside the canvas so off-canvas edges stay hidden
        let fit_x = |x: i64| x.clamp(-margin, canvas_w + margin) as i32;
        let fit_y = |y: i64| y.clamp(-margin, canvas_h + margin) as i32;

        for (i, zone) in zones.iter().enumerate() {
            let display = zone.to_display(zoom);
            let (x1, y1) = (fit_x(display.x1), fit_y(display.y1));
            let (x2, y2) = (fit_x(display.x2), fit_y(display.y2));

            for t in 0..self.thickness {
                let width = x2 - x1 - 2 * t;
                let height = y2 - y1 - 2 * t;
                if width <= 0 || height <= 0 {
                    break;
                }
                let rect = Rect::at(x1 + t, y1 + t).of_size(width as u32, height as u32);
                draw_hollow_rect_mut(&mut canvas, rect, ZONE_COLOR);
            }

            if let Some(font) = &self.font {
                let label_y = (y1 - LABEL_OFFSET - self.font_scale as i32).max(0);
                draw_text_mut(
                    &mut canvas,
                    ZONE_COLOR,
                    x1.max(0),
                    label_y,
                    PxScale::from(self.font_scale),
                    font,
                    &format!("Zone {}", i + 1),
                );
            }
        }

        canvas
    }
}

/// Resize a page for display; width and height truncate toward zero
fn scale_page(image: &RgbImage, zoom: f64) -> RgbImage {
    if zoom == 1.0 {
        return image.clone();
    }

    let width = ((image.width() as f64 * zoom) as u32).max(1);
    let height = ((image.height() as f64 * zoom) as u32).max(1);
    imageops::resize(image, width, height, imageops::FilterType::Lanczos3)
}

fn load_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec(data).ok()
}

/// Encode a rendered page as PNG
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(buffer)
}
