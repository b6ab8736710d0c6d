//! OCR routes
//!
//! - POST /api/v1/ocr/run - Extract text from every zone
//! - GET  /api/v1/ocr/progress - Progress of the active run
//! - GET  /api/v1/ocr/providers - Reachable OCR providers
//! - GET  /api/v1/ocr/results - Results of the last run
//! - GET  /api/v1/ocr/results.csv - Results as CSV
//! - GET  /api/v1/ocr/results.xlsx - Results as an Excel workbook

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::export::{self, CSV_FILE_NAME, CSV_MIME, XLSX_FILE_NAME, XLSX_MIME};
use crate::ocr::{OcrProvider, OcrRun, RunOutcome, SkippedZone, ZoneResult};
use crate::session::Notice;
use crate::state::AppState;

/// Create the OCR router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/run", post(run))
        .route("/progress", get(progress))
        .route("/providers", get(providers))
        .route("/results", get(results))
        .route("/results.csv", get(results_csv))
        .route("/results.xlsx", get(results_xlsx))
}

/// Optional body of `POST /run`
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    pub provider: Option<OcrProvider>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub notice: Notice,
    pub results: Vec<ZoneResult>,
    pub skipped: Vec<SkippedZone>,
    pub total_zones: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub running: bool,
    pub processed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<OcrProvider>,
}

async fn run(State(state): State<AppState>, body: Bytes) -> Result<Json<RunResponse>> {
    let request: RunRequest = if body.is_empty() {
        RunRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid run request: {}", e)))?
    };

    let (outcome, notice) = state.run_ocr(request.provider).await?;

    let response = match outcome {
        RunOutcome::NoZones => RunResponse {
            notice,
            results: Vec::new(),
            skipped: Vec::new(),
            total_zones: 0,
        },
        RunOutcome::Completed(run) => RunResponse {
            notice,
            results: run.results,
            skipped: run.skipped,
            total_zones: run.total_zones,
        },
    };

    Ok(Json(response))
}

async fn progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    let response = match state.progress() {
        Some(p) => ProgressResponse {
            running: true,
            processed: p.processed,
            total: p.total,
        },
        None => ProgressResponse {
            running: false,
            processed: 0,
            total: 0,
        },
    };
    Json(response)
}

async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.ocr().available_providers().await,
    })
}

async fn last_run(state: &AppState) -> Result<OcrRun> {
    state
        .session()
        .await
        .last_run()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No OCR results yet".to_string()))
}

async fn results(State(state): State<AppState>) -> Result<Json<OcrRun>> {
    Ok(Json(last_run(&state).await?))
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

async fn results_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let run = last_run(&state).await?;
    let data = export::to_csv(&run.results)?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (header::CONTENT_DISPOSITION, attachment(CSV_FILE_NAME)),
        ],
        data,
    ))
}

async fn results_xlsx(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let run = last_run(&state).await?;
    let data = tokio::task::spawn_blocking(move || export::to_xlsx(&run.results))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, attachment(XLSX_FILE_NAME)),
        ],
        data,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{loaded_state, server, state_with};
    use crate::ocr::provider::mock::MockProvider;

    async fn add_zone(server: &axum_test::TestServer, page: usize, rect: [i64; 4]) {
        server
            .post("/api/v1/zones")
            .json(&json!({
                "page": page,
                "x1": rect[0],
                "y1": rect[1],
                "x2": rect[2],
                "y2": rect[3],
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_run_without_zones() {
        let server = server(loaded_state(MockProvider::text("hello"), 1).await);

        let response = server.post("/api/v1/ocr/run").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["notice"]["level"], "warning");
        assert_eq!(body["notice"]["message"], "No zones defined!");
        assert_eq!(body["results"], json!([]));

        server
            .get("/api/v1/ocr/results")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_without_document() {
        let server = server(state_with(MockProvider::text("hello")));

        server
            .post("/api/v1/ocr/run")
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_run_numbers_zones_across_pages() {
        let server = server(loaded_state(MockProvider::dimensions(), 2).await);

        add_zone(&server, 0, [10, 10, 50, 30]).await;
        add_zone(&server, 0, [150, 150, 300, 300]).await;
        add_zone(&server, 0, [250, 250, 300, 300]).await;
        add_zone(&server, 1, [0, 0, 20, 20]).await;

        let response = server.post("/api/v1/ocr/run").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();

        assert_eq!(body["notice"]["level"], "success");
        assert_eq!(body["totalZones"], 4);
        assert_eq!(
            body["results"],
            json!([
                { "pageNumber": 1, "zoneNumber": 1, "text": "40x20", "coordinates": "(10,10) to (50,30)" },
                { "pageNumber": 1, "zoneNumber": 2, "text": "50x50", "coordinates": "(150,150) to (200,200)" },
                { "pageNumber": 2, "zoneNumber": 3, "text": "20x20", "coordinates": "(0,0) to (20,20)" },
            ])
        );
        assert_eq!(body["skipped"], json!([{ "pageNumber": 1, "position": 2 }]));

        let progress: serde_json::Value = server.get("/api/v1/ocr/progress").await.json();
        assert_eq!(progress["running"], false);

        let session: serde_json::Value = server.get("/api/v1/session").await.json();
        assert_eq!(session["hasResults"], true);
    }

    #[tokio::test]
    async fn test_run_with_empty_text() {
        let server = server(loaded_state(MockProvider::text("   \n  "), 1).await);
        add_zone(&server, 0, [0, 0, 10, 10]).await;

        let body: serde_json::Value = server.post("/api/v1/ocr/run").await.json();
        assert_eq!(body["notice"]["level"], "success");
        assert_eq!(body["results"][0]["text"], "");
    }

    #[tokio::test]
    async fn test_run_with_every_zone_skipped() {
        let server = server(loaded_state(MockProvider::text("x"), 1).await);
        add_zone(&server, 0, [300, 300, 400, 400]).await;

        let body: serde_json::Value = server.post("/api/v1/ocr/run").await.json();
        assert_eq!(body["notice"]["level"], "warning");
        assert_eq!(body["notice"]["message"], "No text extracted from any zones!");
        assert_eq!(body["results"], json!([]));
        assert_eq!(body["skipped"].as_array().unwrap().len(), 1);

        // An empty run still exports a header-only table
        let response = server.get("/api/v1/ocr/results.csv").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "Page,Zone,Text,Coordinates\n");
    }

    #[tokio::test]
    async fn test_failed_run_discards_results() {
        let state = loaded_state(MockProvider::failing_on(2), 1).await;
        let server = server(state);

        add_zone(&server, 0, [0, 0, 10, 10]).await;
        server.post("/api/v1/ocr/run").await.assert_status_ok();
        server.get("/api/v1/ocr/results").await.assert_status_ok();

        add_zone(&server, 0, [20, 20, 40, 40]).await;
        let response = server.post("/api/v1/ocr/run").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "ocr_error");

        server
            .get("/api/v1/ocr/results")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/ocr/results.csv")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_with_unavailable_provider() {
        let server = server(loaded_state(MockProvider::unavailable(), 1).await);
        add_zone(&server, 0, [0, 0, 10, 10]).await;

        let response = server.post("/api/v1/ocr/run").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_run_with_unknown_provider() {
        let server = server(loaded_state(MockProvider::text("x"), 1).await);
        add_zone(&server, 0, [0, 0, 10, 10]).await;

        let response = server
            .post("/api/v1/ocr/run")
            .json(&json!({ "provider": "ollama" }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let response = server
            .post("/api/v1/ocr/run")
            .json(&json!({ "provider": "abbyy" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_downloads_match_results() {
        let server = server(loaded_state(MockProvider::text("Total\n42,00"), 2).await);
        add_zone(&server, 0, [0, 0, 10, 10]).await;
        add_zone(&server, 1, [5, 5, 15, 15]).await;
        server.post("/api/v1/ocr/run").await.assert_status_ok();

        let response = server.get("/api/v1/ocr/results.csv").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"ocr_results.csv\""
        );

        let mut reader = csv::Reader::from_reader(response.as_bytes().as_ref());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "2");
        assert_eq!(&rows[1][1], "2");
        assert_eq!(&rows[1][2], "Total\n42,00");
        assert_eq!(&rows[1][3], "(5,5) to (15,15)");

        let response = server.get("/api/v1/ocr/results.xlsx").await;
        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"ocr_results.xlsx\""
        );
        // XLSX is a zip container
        assert_eq!(&response.as_bytes()[..2], b"PK");
    }

    #[tokio::test]
    async fn test_providers() {
        let server = server(state_with(MockProvider::text("")));

        let body: serde_json::Value = server.get("/api/v1/ocr/providers").await.json();
        assert_eq!(body["providers"], json!(["tesseract"]));

        let server = super::super::test_support::server(state_with(MockProvider::unavailable()));
        let body: serde_json::Value = server.get("/api/v1/ocr/providers").await.json();
        assert_eq!(body["providers"], json!([]));
    }
}
