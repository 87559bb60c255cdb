// src/handlers/exports.rs
// DOCUMENTATION: Handlers for past export files
// PURPOSE: List, download and delete files in the export directory

use crate::errors::PlacesError;
use crate::handlers::attachment_disposition;
use crate::services::ExportWriter;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /api/exports
/// List past exports, newest first
pub async fn list_exports(writer: web::Data<ExportWriter>) -> Result<impl Responder, PlacesError> {
    let exports = writer.run_blocking(|w| w.list()).await?;
    Ok(HttpResponse::Ok().json(json!({ "exports": exports })))
}

/// GET /exports/download/{filename}
pub async fn download_export(
    writer: web::Data<ExportWriter>,
    path: web::Path<String>,
) -> Result<impl Responder, PlacesError> {
    let filename = path.into_inner();
    let file_path = {
        let filename = filename.clone();
        writer.run_blocking(move |w| w.resolve(&filename)).await?
    };
    let body = tokio::fs::read(&file_path).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(("Content-Disposition", attachment_disposition(&filename)))
        .body(body))
}

/// DELETE /exports/delete/{filename}
pub async fn delete_export(
    writer: web::Data<ExportWriter>,
    path: web::Path<String>,
) -> Result<impl Responder, PlacesError> {
    let filename = path.into_inner();
    writer.run_blocking(move |w| w.delete(&filename)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Export deleted successfully" })))
}

/// Configuration for export file routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/exports", web::get().to(list_exports))
        .service(
            web::scope("/exports")
                .route("/download/{filename}", web::get().to(download_export))
                .route("/delete/{filename}", web::delete().to(delete_export)),
        );
}
