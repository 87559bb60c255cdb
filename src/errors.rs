// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for search, export and settings

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: One enum for every failure the pipeline can surface.
/// Per-item upstream failures are logged and skipped by the services and
/// never reach this type; only whole-operation failures do.
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("API key not configured. Set GOOGLE_MAPS_API_KEY in the environment or .env file")]
    MissingApiKey,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("No data to export")]
    NoData,

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<csv::Error> for PlacesError {
    fn from(e: csv::Error) -> Self {
        PlacesError::ExportError(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PlacesError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PlacesError::ExportError(e.to_string())
    }
}

impl PlacesError {
    fn error_code(&self) -> &'static str {
        match self {
            PlacesError::NotFound(_) => "NOT_FOUND",
            PlacesError::InvalidInput(_) => "INVALID_INPUT",
            PlacesError::ValidationError(_) => "VALIDATION_ERROR",
            PlacesError::MissingApiKey => "MISSING_API_KEY",
            PlacesError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            PlacesError::NoData => "NO_DATA",
            PlacesError::ExportError(_) => "EXPORT_ERROR",
            PlacesError::IoError(_) => "IO_ERROR",
        }
    }
}

/// Convert PlacesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PlacesError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlacesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PlacesError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            PlacesError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            PlacesError::NoData => StatusCode::BAD_REQUEST,
            PlacesError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
