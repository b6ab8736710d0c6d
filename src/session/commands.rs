//! Session commands
//!
//! Every user action on the session is a [`Command`]. Handlers validate,
//! mutate the session and describe what happened as a [`Notice`].

use serde::Serialize;

use crate::zones::ZoneRect;

use super::state::{Session, MAX_ZOOM, MIN_ZOOM};
use super::SessionError;

/// A user action on the session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectPage(usize),
    SetZoom(f64),
    /// Add a zone; `page` defaults to the current page
    AddZone { page: Option<usize>, rect: ZoneRect },
    RemoveZone { page: usize, position: usize },
    /// Clear one page; defaults to the current page
    ClearPage(Option<usize>),
    ClearAll,
}

/// User-facing message describing a command's effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Info(m) | Self::Warning(m) => m,
        }
    }
}

impl Session {
    /// Apply a command, leaving the session untouched on error
    pub fn apply(&mut self, command: Command) -> Result<Notice, SessionError> {
        tracing::debug!(?command, "Applying session command");

        match command {
            Command::SelectPage(page) => {
                self.require_page(page)?;
                self.current_page = page;
                Ok(Notice::Info(format!("Page {}", page + 1)))
            }
            Command::SetZoom(zoom) => {
                if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                    return Err(SessionError::InvalidZoom(zoom));
                }
                self.zoom = zoom;
                Ok(Notice::Info(format!("Zoom {:.1}x", zoom)))
            }
            Command::AddZone { page, rect } => {
                let page = page.unwrap_or(self.current_page);
                self.require_page(page)?;
                rect.validate()?;
                self.zones.add(page, rect);
                Ok(Notice::Success("Zone added!".to_string()))
            }
            Command::RemoveZone { page, position } => match self.zones.remove(page, position) {
                Some(_) => Ok(Notice::Success(format!(
                    "Zone {} removed from page {}",
                    position + 1,
                    page + 1
                ))),
                None => Ok(Notice::Info(format!(
                    "No zone {} on page {}",
                    position + 1,
                    page + 1
                ))),
            },
            Command::ClearPage(page) => {
                let page = page.unwrap_or(self.current_page);
                self.zones.clear(page);
                Ok(Notice::Success("Current page zones cleared!".to_string()))
            }
            Command::ClearAll => {
                self.zones.clear_all();
                Ok(Notice::Success("All zones cleared!".to_string()))
            }
        }
    }
}
