//! Document routes
//!
//! - POST /api/v1/document - Upload a PDF or image (multipart field `file`)
//! - GET  /api/v1/document/pages/:page/image - Render a page as PNG

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::document::load_document;
use crate::error::{AppError, Result};
use crate::overlay::encode_png;
use crate::session::SessionError;
use crate::state::AppState;

use super::CommandResponse;

/// Create the document router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(upload_document).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/pages/:page/image", get(page_image))
}

/// Upload a new document, replacing the current one
///
/// A failed load leaves the session as it was.
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CommandResponse>> {
    tracing::debug!("Starting document upload processing");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" && name != "document" {
            tracing::debug!("Ignoring multipart field '{}'", name);
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        tracing::debug!("Read {} bytes of file data", data.len());

        let document = load_document(data.to_vec(), filename, state.config().render.dpi).await?;

        let mut session = state.session().await;
        let notice = session.load_document(document);

        return Ok(Json(CommandResponse {
            notice,
            session: session.summary(),
        }));
    }

    Err(AppError::BadRequest(
        "Missing multipart field 'file'".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct PageImageQuery {
    /// Draw zone outlines (default: true)
    #[serde(default = "default_true")]
    pub overlay: bool,
}

fn default_true() -> bool {
    true
}

/// Render a page at the session zoom
async fn page_image(
    State(state): State<AppState>,
    Path(page_index): Path<usize>,
    Query(query): Query<PageImageQuery>,
) -> Result<impl IntoResponse> {
    let (page, zones, zoom) = {
        let session = state.session().await;
        let document = session.document().ok_or(SessionError::NoDocument)?;
        let page = document
            .page(page_index)
            .cloned()
            .ok_or(SessionError::PageOutOfRange {
                page: page_index,
                page_count: document.page_count(),
            })?;
        let zones = if query.overlay {
            session.zones().zones(page_index).to_vec()
        } else {
            Vec::new()
        };
        (page, zones, session.zoom())
    };

    let renderer_state = state.clone();
    let png = tokio::task::spawn_blocking(move || {
        let canvas = renderer_state.overlay().render(&page, &zones, zoom);
        encode_png(&canvas)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
