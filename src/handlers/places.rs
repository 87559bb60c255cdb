// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for search and export
// PURPOSE: Parse requests, call services, return responses

use crate::config::{ApiKeyStore, Config};
use crate::errors::PlacesError;
use crate::handlers::attachment_disposition;
use crate::models::{ExportRequest, NearbyQuery, SearchQuery, SearchResponse};
use crate::services::{ExportService, ExportWriter, GooglePlacesClient, PlaceService};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Build a client with the key currently in the store
async fn places_client(
    config: &Config,
    api_key: &ApiKeyStore,
) -> Result<GooglePlacesClient, PlacesError> {
    let key = api_key.require().await?;
    GooglePlacesClient::from_config(config, key)
}

/// GET /api/search
/// Text search with pagination and optional rating filter
pub async fn search_places(
    config: web::Data<Config>,
    api_key: web::Data<ApiKeyStore>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, PlacesError> {
    if let Err(e) = query.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    let client = places_client(&config, &api_key).await?;
    let results = PlaceService::search(
        &client,
        &query.query,
        query.max_results.unwrap_or(config.default_max_results),
        query.min_rating.unwrap_or(0.0),
    )
    .await?;

    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}

/// GET /api/search/nearby
/// Single-page nearby search around a point
pub async fn search_nearby(
    config: web::Data<Config>,
    api_key: web::Data<ApiKeyStore>,
    query: web::Query<NearbyQuery>,
) -> Result<impl Responder, PlacesError> {
    if let Err(e) = query.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }
    query
        .check_coordinates()
        .map_err(PlacesError::ValidationError)?;

    let client = places_client(&config, &api_key).await?;
    let results = PlaceService::search_nearby(&client, &query, config.default_max_results).await?;

    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}

/// POST /api/export
/// Fetch details for the selected ids and return the export file
pub async fn export_places(
    config: web::Data<Config>,
    api_key: web::Data<ApiKeyStore>,
    writer: web::Data<ExportWriter>,
    req: web::Json<ExportRequest>,
) -> Result<impl Responder, PlacesError> {
    if let Err(e) = req.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    let client = places_client(&config, &api_key).await?;
    let stats = ExportService::export_selected(
        &client,
        writer.get_ref(),
        &req.place_ids,
        req.format,
        config.detail_delay(),
    )
    .await?;

    if !stats.skipped.is_empty() {
        log::warn!(
            "Export {} left out {} places whose details could not be fetched",
            stats.filename,
            stats.skipped.len()
        );
    }

    let body = tokio::fs::read(&stats.path).await?;
    Ok(HttpResponse::Ok()
        .content_type(req.format.mime_type())
        .insert_header(("Content-Disposition", attachment_disposition(&stats.filename)))
        .insert_header(("X-Export-Skipped", stats.skipped.len().to_string()))
        .body(body))
}

/// Configuration for search/export routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/search", web::get().to(search_places))
        .route("/api/search/nearby", web::get().to(search_nearby))
        .route("/api/export", web::post().to(export_places));
}
