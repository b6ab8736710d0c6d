//! Zone routes
//!
//! - GET    /api/v1/zones?page= - List zones of a page (default: current page)
//! - POST   /api/v1/zones - Add a zone
//! - DELETE /api/v1/zones/:page/:position - Remove one zone
//! - DELETE /api/v1/zones/:page - Clear a page
//! - DELETE /api/v1/zones - Clear every page

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::Command;
use crate::state::AppState;
use crate::zones::{DisplayRect, ZoneRect};

use super::CommandResponse;

/// Create the zones router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zones).post(add_zone).delete(clear_all))
        .route("/:page", delete(clear_page))
        .route("/:page/:position", delete(remove_zone))
}

#[derive(Debug, Deserialize)]
pub struct ListZonesQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEntry {
    /// 1-based label shown next to the zone
    pub number: usize,
    pub coordinates: ZoneRect,
    pub width: i64,
    pub height: i64,
    /// The zone at the session zoom
    pub display: DisplayRect,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneListResponse {
    pub page: usize,
    pub zones: Vec<ZoneEntry>,
    pub total_zones: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddZoneRequest {
    /// Zero-based page index (default: current page)
    pub page: Option<usize>,
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

async fn list_zones(
    State(state): State<AppState>,
    Query(query): Query<ListZonesQuery>,
) -> Json<ZoneListResponse> {
    let session = state.session().await;
    let page = query.page.unwrap_or(session.current_page());
    let zoom = session.zoom();

    let zones = session
        .zones()
        .zones(page)
        .iter()
        .enumerate()
        .map(|(i, rect)| ZoneEntry {
            number: i + 1,
            coordinates: *rect,
            width: rect.width(),
            height: rect.height(),
            display: rect.to_display(zoom),
        })
        .collect();

    Json(ZoneListResponse {
        page,
        zones,
        total_zones: session.zones().count_all(),
    })
}

async fn add_zone(
    State(state): State<AppState>,
    Json(request): Json<AddZoneRequest>,
) -> Result<Json<CommandResponse>> {
    let rect = ZoneRect {
        x1: request.x1,
        y1: request.y1,
        x2: request.x2,
        y2: request.y2,
    };

    let mut session = state.session().await;
    let notice = session.apply(Command::AddZone {
        page: request.page,
        rect,
    })?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}

async fn remove_zone(
    State(state): State<AppState>,
    Path((page, position)): Path<(usize, usize)>,
) -> Result<Json<CommandResponse>> {
    let mut session = state.session().await;
    let notice = session.apply(Command::RemoveZone { page, position })?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}

async fn clear_page(
    State(state): State<AppState>,
    Path(page): Path<usize>,
) -> Result<Json<CommandResponse>> {
    let mut session = state.session().await;
    let notice = session.apply(Command::ClearPage(Some(page)))?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}

async fn clear_all(State(state): State<AppState>) -> Result<Json<CommandResponse>> {
    let mut session = state.session().await;
    let notice = session.apply(Command::ClearAll)?;

    Ok(Json(CommandResponse {
        notice,
        session: session.summary(),
    }))
}
