//! Zone rectangles and coordinate normalization
//!
//! Zones are stored in original page pixels. They are validated when added,
//! mapped to display space for overlays, and clamped to the page only when
//! OCR runs.

use serde::{Deserialize, Serialize};

use super::ZoneError;

/// A zone in original (unzoomed) page pixels
///
/// Coordinates are signed and may lie outside the page; clamping happens
/// lazily in [`ZoneRect::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl ZoneRect {
    /// Build a zone, rejecting empty or inverted rectangles
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Result<Self, ZoneError> {
        let rect = Self { x1, y1, x2, y2 };
        rect.validate()?;
        Ok(rect)
    }

    pub fn validate(&self) -> Result<(), ZoneError> {
        if self.x2 <= self.x1 || self.y2 <= self.y1 {
            return Err(ZoneError::InvalidCoordinates(*self));
        }
        Ok(())
    }

    /// Horizontal span, saturating at `i64::MAX` for extreme coordinates
    pub fn width(&self) -> i64 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> i64 {
        self.y2.saturating_sub(self.y1)
    }

    /// Map to display space at `zoom`
    ///
    /// Each coordinate is scaled and rounded on its own, so corners can
    /// drift by a pixel relative to each other at fractional zoom levels.
    pub fn to_display(&self, zoom: f64) -> DisplayRect {
        let scale = |c: i64| (c as f64 * zoom).round() as i64;
        DisplayRect {
            x1: scale(self.x1),
            y1: scale(self.y1),
            x2: scale(self.x2),
            y2: scale(self.y2),
        }
    }

    /// Clamp into a `width` x `height` page
    ///
    /// Returns `None` when the clamped rectangle has no area.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<PixelRegion> {
        let clamp_x = |x: i64| x.clamp(0, width as i64) as u32;
        let clamp_y = |y: i64| y.clamp(0, height as i64) as u32;

        let region = PixelRegion {
            x1: clamp_x(self.x1),
            y1: clamp_y(self.y1),
            x2: clamp_x(self.x2),
            y2: clamp_y(self.y2),
        };

        if region.x2 > region.x1 && region.y2 > region.y1 {
            Some(region)
        } else {
            None
        }
    }
}

/// A zone mapped into zoomed display pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// A non-empty region inside a page's pixel bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRegion {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PixelRegion {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Human-readable form used in result tables
    pub fn describe(&self) -> String {
        format!("({},{}) to ({},{})", self.x1, self.y1, self.x2, self.y2)
    }
}
