//! OCR dispatch
//!
//! Walks every zone of the store, page by page, crops the zone out of its
//! page raster and hands the crop to one OCR provider.
//!
//! A run is all-or-nothing: the first failure aborts it and no partial
//! results are returned. Zones that clamp to an empty region are skipped
//! without producing a result row.

use std::io::Cursor;

use crate::document::Page;
use crate::zones::{PixelRegion, ZoneStore};

use super::provider::OcrProviderTrait;
use super::service::OcrService;
use super::types::{OcrError, OcrProvider, OcrRun, RunOutcome, RunProgress, SkippedZone, ZoneResult};

/// Receives a progress snapshot after every zone attempt
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: RunProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(RunProgress) + Send + Sync,
{
    fn report(&self, progress: RunProgress) {
        self(progress)
    }
}

/// Run OCR over every zone, picking a provider from the service
pub async fn run_ocr(
    service: &OcrService,
    preferred: Option<OcrProvider>,
    pages: &[Page],
    zones: &ZoneStore,
    progress: &dyn ProgressSink,
) -> Result<RunOutcome, OcrError> {
    if zones.count_all() == 0 {
        return Ok(RunOutcome::NoZones);
    }

    let provider = service.select_provider(preferred).await?;
    tracing::info!(provider = ?provider.provider_type(), "Selected OCR provider");

    run_with_provider(
        provider.as_ref(),
        service.default_language(),
        pages,
        zones,
        progress,
    )
    .await
}

/// Run OCR over every zone with a specific provider
pub async fn run_with_provider(
    provider: &dyn OcrProviderTrait,
    language: &str,
    pages: &[Page],
    zones: &ZoneStore,
    progress: &dyn ProgressSink,
) -> Result<RunOutcome, OcrError> {
    let total = zones.count_all();
    if total == 0 {
        return Ok(RunOutcome::NoZones);
    }

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    let mut processed = 0;

    for (page_index, page_zones) in zones.iter() {
        let page = pages
            .get(page_index)
            .ok_or(OcrError::PageMissing(page_index + 1))?;

        for (position, zone) in page_zones.iter().enumerate() {
            match zone.clamp_to(page.width(), page.height()) {
                Some(region) => {
                    let png = crop_to_png(page, region).await?;
                    let recognized = provider.recognize(&png, Some(language)).await?;

                    results.push(ZoneResult {
                        page_number: page_index + 1,
                        zone_number: results.len() + 1,
                        text: normalize_text(&recognized.text),
                        coordinates: region.describe(),
                    });
                }
                None => {
                    tracing::debug!(
                        page = page_index + 1,
                        position,
                        "Zone lies outside the page after clamping, skipping"
                    );
                    skipped.push(SkippedZone {
                        page_number: page_index + 1,
                        position,
                    });
                }
            }

            processed += 1;
            progress.report(RunProgress { processed, total });
        }
    }

    tracing::info!(
        total,
        extracted = results.len(),
        skipped = skipped.len(),
        "OCR run complete"
    );

    Ok(RunOutcome::Completed(OcrRun {
        results,
        skipped,
        total_zones: total,
        finished_at: chrono::Utc::now(),
    }))
}

/// Trim every line, drop blank ones and rejoin with `\n`
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn crop_to_png(page: &Page, region: PixelRegion) -> Result<Vec<u8>, OcrError> {
    let page = page.clone();

    tokio::task::spawn_blocking(move || {
        let cropped = image::imageops::crop_imm(
            page.image(),
            region.x1,
            region.y1,
            region.width(),
            region.height(),
        )
        .to_image();

        let mut buffer = Vec::new();
        cropped
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageExtractionError(format!("Failed to encode region: {}", e)))?;
        Ok(buffer)
    })
    .await
    .map_err(|e| OcrError::ImageExtractionError(format!("Task join error: {}", e)))?
}
