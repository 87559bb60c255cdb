// src/services/export_service.rs
// DOCUMENTATION: Detail fetch and export orchestration
// PURPOSE: Fetch details for a selection, skip failures, write the export file

use crate::errors::PlacesError;
use crate::models::{ExportFormat, ExportRecord, PlaceDetail, SearchResult};
use crate::services::export_writer::{scrape_file_stem, ExportWriter, SELECTION_EXPORT_PREFIX};
use crate::services::google_places_client::GooglePlacesClient;
use crate::services::normalizer;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Upper bound for a one-shot scrape (three provider pages)
pub const SCRAPE_MAX_RESULTS: u32 = 60;

/// Export statistics
/// DOCUMENTATION: Tracks results of one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStats {
    /// File name inside the export directory
    pub filename: String,
    /// Full path written
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Detail requests issued
    pub requested: u32,
    /// Rows written
    pub exported: u32,
    /// Identifiers whose detail fetch failed and were left out
    pub skipped: Vec<String>,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl ExportStats {
    fn new(format: ExportFormat) -> Self {
        Self {
            filename: String::new(),
            path: PathBuf::new(),
            format,
            requested: 0,
            exported: 0,
            skipped: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    fn complete(&mut self, path: PathBuf, duration: u64) {
        self.filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.path = path;
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Outcome of a sequential detail fetch
#[derive(Debug, Default)]
pub struct DetailBatch {
    /// Successfully fetched details keyed by the requested id, in request order
    pub details: Vec<(String, PlaceDetail)>,
    /// Identifiers that failed and were skipped
    pub failed: Vec<String>,
}

pub struct ExportService;

impl ExportService {
    /// Fetch details one at a time
    /// DOCUMENTATION: Each id gets exactly one attempt. Failures are logged
    /// and recorded in `failed`; they never abort the batch.
    pub async fn fetch_details(
        client: &GooglePlacesClient,
        place_ids: &[String],
        delay: Duration,
    ) -> DetailBatch {
        let mut batch = DetailBatch::default();

        for (idx, place_id) in place_ids.iter().enumerate() {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match client.get_place_details(place_id).await {
                Ok(place) => {
                    let mut detail = normalizer::to_place_detail(place);
                    if detail.id.is_empty() {
                        detail.id = place_id.clone();
                    }
                    batch.details.push((place_id.clone(), detail));
                }
                Err(e) => {
                    log::warn!("Error fetching details for place {}: {}", place_id, e);
                    batch.failed.push(place_id.clone());
                }
            }
        }

        log::info!(
            "Fetched {} of {} place details ({} skipped)",
            batch.details.len(),
            place_ids.len(),
            batch.failed.len()
        );
        batch
    }

    /// Export the places a user selected
    /// DOCUMENTATION: Returns NoData when no detail fetch succeeded;
    /// otherwise writes `places_export_<timestamp>.<ext>`
    pub async fn export_selected(
        client: &GooglePlacesClient,
        writer: &ExportWriter,
        place_ids: &[String],
        format: ExportFormat,
        delay: Duration,
    ) -> Result<ExportStats, PlacesError> {
        let start_time = Instant::now();
        let mut stats = ExportStats::new(format);

        let place_ids = dedup_ids(place_ids);
        stats.requested = place_ids.len() as u32;

        let batch = Self::fetch_details(client, &place_ids, delay).await;
        stats.skipped = batch.failed;

        if batch.details.is_empty() {
            return Err(PlacesError::NoData);
        }

        let records: Vec<ExportRecord> = batch
            .details
            .iter()
            .map(|(_, detail)| normalizer::to_export_record(detail))
            .collect();

        stats.exported = records.len() as u32;
        let path = writer
            .run_blocking(move |w| w.write(&records, format, SELECTION_EXPORT_PREFIX))
            .await?;
        stats.complete(path, start_time.elapsed().as_secs());
        Ok(stats)
    }

    /// One-shot scrape: "<term> in <location>", details for every hit, CSV
    /// DOCUMENTATION: Rating and review count fall back to the search hit.
    /// An empty result set still produces a header-only file.
    pub async fn scrape(
        client: &GooglePlacesClient,
        writer: &ExportWriter,
        term: &str,
        location: &str,
        max_results: u32,
        delay: Duration,
    ) -> Result<ExportStats, PlacesError> {
        let (term, location) = (term.trim(), location.trim());
        if term.is_empty() || location.is_empty() {
            return Err(PlacesError::InvalidInput(
                "Please provide both search term and location".to_string(),
            ));
        }

        let start_time = Instant::now();
        let mut stats = ExportStats::new(ExportFormat::Csv);

        let query = format!("{} in {}", term, location);
        let hits: Vec<SearchResult> = client
            .text_search(&query, max_results.min(SCRAPE_MAX_RESULTS))
            .await?
            .iter()
            .map(normalizer::to_search_result)
            .filter(|hit| !hit.id.is_empty())
            .collect();

        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
        stats.requested = ids.len() as u32;

        let batch = Self::fetch_details(client, &ids, delay).await;
        stats.skipped = batch.failed;

        let records: Vec<ExportRecord> = batch
            .details
            .into_iter()
            .map(|(requested_id, detail)| {
                match hits.iter().find(|hit| hit.id == requested_id) {
                    Some(hit) => normalizer::merge_search_metrics(detail, hit),
                    None => detail,
                }
            })
            .map(|detail| normalizer::to_export_record(&detail))
            .collect();

        stats.exported = records.len() as u32;
        let stem = scrape_file_stem(term, location);
        let path = writer
            .run_blocking(move |w| w.write(&records, ExportFormat::Csv, &stem))
            .await?;
        stats.complete(path, start_time.elapsed().as_secs());

        log::info!(
            "Scrape '{}' completed: {} exported, {} skipped in {}s",
            query,
            stats.exported,
            stats.skipped.len(),
            stats.duration_seconds
        );
        Ok(stats)
    }
}

/// Drop blank and repeated identifiers, keeping first-seen order
fn dedup_ids(place_ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(place_ids.len());
    for id in place_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    out
}
