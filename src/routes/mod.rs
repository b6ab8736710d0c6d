//! Route modules for the Zone OCR server

pub mod document;
pub mod health;
pub mod ocr;
pub mod session;
pub mod zones;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::session::{Notice, SessionSummary};
use crate::state::AppState;

/// Response for commands that change the session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub notice: Notice,
    pub session: SessionSummary,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let max_upload = state.config().render.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/session", session::router())
        .nest("/api/v1/document", document::router(max_upload))
        .nest("/api/v1/zones", zones::router())
        .nest("/api/v1/ocr", ocr::router())
        .with_state(state)
}
