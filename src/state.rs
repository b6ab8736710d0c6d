//! Application state management

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::ocr::{self, OcrProvider, OcrService, RunOutcome, RunProgress};
use crate::overlay::OverlayRenderer;
use crate::session::{Notice, Session, SessionError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    session: Mutex<Session>,
    ocr: OcrService,
    overlay: OverlayRenderer,
    /// Progress of the running OCR pass, `None` when idle
    progress: RwLock<Option<RunProgress>>,
    /// Held for the duration of an OCR run
    run_lock: Mutex<()>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let ocr = OcrService::new(config.ocr.clone());
        Self::with_ocr_service(config, ocr)
    }

    /// Create a state around an existing OCR service
    pub fn with_ocr_service(config: Config, ocr: OcrService) -> Self {
        let overlay = OverlayRenderer::new(&config.overlay);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Mutex::new(Session::new()),
                ocr,
                overlay,
                progress: RwLock::new(None),
                run_lock: Mutex::new(()),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Lock the session
    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().await
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Get the overlay renderer
    pub fn overlay(&self) -> &OverlayRenderer {
        &self.inner.overlay
    }

    /// Progress of the current OCR run
    pub fn progress(&self) -> Option<RunProgress> {
        *self.inner.progress.read()
    }

    /// Run OCR over a snapshot of the session's zones
    ///
    /// Only one run may be active. The outcome is recorded on the session
    /// unless the document was replaced while the run was in flight; a
    /// failed run discards any previous results.
    pub async fn run_ocr(&self, preferred: Option<OcrProvider>) -> Result<(RunOutcome, Notice)> {
        let _run = self
            .inner
            .run_lock
            .try_lock()
            .map_err(|_| AppError::Conflict("An OCR run is already in progress".to_string()))?;

        let (document_id, pages, zones) = {
            let session = self.session().await;
            let document = session.document().ok_or(SessionError::NoDocument)?;
            (document.id, document.pages.clone(), session.zones().clone())
        };

        let progress = &self.inner.progress;
        let sink = |p: RunProgress| {
            tracing::debug!("Processing zone {} of {}...", p.processed, p.total);
            *progress.write() = Some(p);
        };

        let result = ocr::run_ocr(&self.inner.ocr, preferred, &pages, &zones, &sink).await;
        *progress.write() = None;

        let mut session = self.session().await;
        if session.document().map(|doc| doc.id) != Some(document_id) {
            return Err(AppError::Conflict(
                "Document was replaced during the OCR run".to_string(),
            ));
        }

        match result {
            Ok(outcome) => {
                let notice = session.record_run(&outcome);
                Ok((outcome, notice))
            }
            Err(e) => {
                session.discard_run();
                Err(e.into())
            }
        }
    }
}
