//! Session
//!
//! The single interactive session: loaded document, zones, current page,
//! zoom and the last OCR run. All changes go through [`Session::apply`]
//! or [`Session::load_document`], which return a [`Notice`] for the user.

mod commands;
mod state;

pub use commands::{Command, Notice};
pub use state::{Session, SessionSummary, MAX_ZOOM, MIN_ZOOM};

use crate::zones::ZoneError;

/// Errors returned by session commands
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No document loaded")]
    NoDocument,

    #[error("Page index {page} does not exist (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("Zoom {0} is outside {min}..={max}", min = MIN_ZOOM, max = MAX_ZOOM)]
    InvalidZoom(f64),

    #[error(transparent)]
    InvalidZone(#[from] ZoneError),
}
