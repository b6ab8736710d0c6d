//! Zone OCR Server Library
//!
//! Load a PDF or image, mark rectangular zones on its pages, run OCR on
//! each zone and export the results as CSV or XLSX.
//!
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: Upload decoding and page rasterization (MuPDF, image)
//! - `zones`: Zone rectangles, coordinate normalization and the zone store
//! - `session`: The interactive session and its commands
//! - `ocr`: OCR providers and the zone dispatcher
//! - `export`: CSV and XLSX result tables
//! - `overlay`: Page previews with zone outlines
//! - `routes`: HTTP API

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod ocr;
pub mod overlay;
pub mod routes;
pub mod session;
pub mod state;
pub mod zones;
