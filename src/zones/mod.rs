//! Zones
//!
//! Rectangular page regions selected for text extraction, and the store
//! that holds them for the session.

mod rect;
mod store;

pub use rect::{DisplayRect, PixelRegion, ZoneRect};
pub use store::ZoneStore;

/// Zone validation errors
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Invalid coordinates ({}, {}) to ({}, {}): X2 must exceed X1 and Y2 must exceed Y1", .0.x1, .0.y1, .0.x2, .0.y2)]
    InvalidCoordinates(ZoneRect),
}
