//! Session state

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::document::{DocumentFormat, LoadedDocument, Page, PageInfo};
use crate::ocr::{OcrRun, RunOutcome};
use crate::zones::ZoneStore;

use super::{Notice, SessionError};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Interactive session state
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) document: Option<LoadedDocument>,
    pub(super) zones: ZoneStore,
    pub(super) current_page: usize,
    pub(super) zoom: f64,
    pub(super) last_run: Option<OcrRun>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: None,
            zones: ZoneStore::new(),
            current_page: 0,
            zoom: DEFAULT_ZOOM,
            last_run: None,
        }
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn pages(&self) -> &[Page] {
        self.document
            .as_ref()
            .map(|doc| doc.pages.as_slice())
            .unwrap_or(&[])
    }

    pub fn zones(&self) -> &ZoneStore {
        &self.zones
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn last_run(&self) -> Option<&OcrRun> {
        self.last_run.as_ref()
    }

    /// Replace the document, resetting zones, page, zoom and results
    pub fn load_document(&mut self, document: LoadedDocument) -> Notice {
        let page_count = document.page_count();

        self.document = Some(document);
        self.zones.clear_all();
        self.current_page = 0;
        self.zoom = DEFAULT_ZOOM;
        self.last_run = None;

        Notice::Success(format!("Loaded {} page(s)", page_count))
    }

    /// Record the outcome of an OCR run
    ///
    /// Results never accumulate: each run replaces the previous one, and a
    /// run with no zones leaves nothing to export.
    pub fn record_run(&mut self, outcome: &RunOutcome) -> Notice {
        match outcome {
            RunOutcome::NoZones => {
                self.last_run = None;
                Notice::Warning("No zones defined!".to_string())
            }
            RunOutcome::Completed(run) => {
                self.last_run = Some(run.clone());
                if run.results.is_empty() {
                    Notice::Warning("No text extracted from any zones!".to_string())
                } else {
                    Notice::Success(format!("Extracted text from {} zone(s)", run.results.len()))
                }
            }
        }
    }

    /// Forget the last run, after a failed one
    pub fn discard_run(&mut self) {
        self.last_run = None;
    }

    pub(super) fn require_page(&self, page: usize) -> Result<(), SessionError> {
        let doc = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        if page >= doc.page_count() {
            return Err(SessionError::PageOutOfRange {
                page,
                page_count: doc.page_count(),
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            document: self.document.as_ref().map(|doc| DocumentSummary {
                id: doc.id,
                filename: doc.filename.clone(),
                format: doc.format,
                page_count: doc.page_count(),
                pages: doc.pages.iter().map(PageInfo::from).collect(),
                loaded_at: doc.loaded_at,
            }),
            current_page: self.current_page,
            zoom: self.zoom,
            total_zones: self.zones.count_all(),
            zones_per_page: self.zones.counts(),
            has_results: self.last_run.is_some(),
        }
    }
}

/// Session overview for clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub document: Option<DocumentSummary>,
    pub current_page: usize,
    pub zoom: f64,
    pub total_zones: usize,
    pub zones_per_page: BTreeMap<usize, usize>,
    pub has_results: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub format: DocumentFormat,
    pub page_count: usize,
    pub pages: Vec<PageInfo>,
    pub loaded_at: DateTime<Utc>,
}
