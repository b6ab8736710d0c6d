//! Session routes
//!
//! - GET  /api/v1/session - Session summary
//! - POST /api/v1/session/page - Select the current page
//! - POST /api/v1/session/zoom - Set the display zoom

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::session::{Command, SessionSummary};
use crate::state::AppState;

use super::CommandResponse;

/// Create the session router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/page", post(select_page))
        .route("/zoom", post(set_zoom))
}

#[derive(Debug, Deserialize)]
pub struct SelectPageRequest {
    /// Zero-based page index
    pub page: usize,
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub zoom: f64,
}

async fn get_session(State(state): State<AppState>) -> Json<SessionSummary> {
    Json(state.session().await.summary())
}

async fn select_page(
    State(state): State<AppState>,
    Json(request): Json<SelectPageRequest>,
) -> Result<Json<CommandResponse>> {
    let mut session = state.session().await;
    let notice = session.apply(Command::SelectPage(request.page))?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}

async fn set_zoom(
    State(state): State<AppState>,
    Json(request): Json<ZoomRequest>,
) -> Result<Json<CommandResponse>> {
    let mut session = state.session().await;
    let notice = session.apply(Command::SetZoom(request.zoom))?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}
