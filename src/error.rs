//! Error types for the Zone OCR server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::LoadError;
use crate::export::ExportError;
use crate::ocr::OcrError;
use crate::session::SessionError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Error loading file: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Error during OCR processing: {0}")]
    Ocr(#[from] OcrError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Load(e) => {
                tracing::warn!("Load error: {}", e);
                let status = match e {
                    LoadError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, "load_error", self.to_string())
            }
            AppError::Session(e) => {
                let status = match e {
                    SessionError::NoDocument => StatusCode::CONFLICT,
                    SessionError::PageOutOfRange { .. } => StatusCode::NOT_FOUND,
                    SessionError::InvalidZoom(_) | SessionError::InvalidZone(_) => {
                        StatusCode::BAD_REQUEST
                    }
                };
                (status, "session_error", e.to_string())
            }
            AppError::Ocr(e) => {
                tracing::error!("OCR error: {}", e);
                (e.status_code(), "ocr_error", self.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "export_error",
                    "Failed to export results".to_string(),
                )
            }
            AppError::Image(e) => {
                tracing::error!("Image error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "image_error",
                    "Failed to render image".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
