// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Search/detail records and the query DTOs used by the web shell

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Partial record returned by a text or nearby search
/// DOCUMENTATION: What the user picks from before exporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider place identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Formatted address
    pub formatted_address: String,

    /// Rating (0-5)
    pub rating: Option<f32>,

    /// Number of user ratings
    pub user_rating_count: Option<i32>,
}

/// Fuller record fetched per identifier from the details endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub id: String,
    pub name: String,
    /// Primary type display name (e.g. "Plumber")
    pub business_type: String,
    pub formatted_address: String,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    /// Raw weekday descriptions, one entry per day
    pub weekday_descriptions: Vec<String>,
    pub maps_url: Option<String>,
    pub rating: Option<f32>,
    pub user_rating_count: Option<i32>,
}

/// Query parameters for GET /api/search
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    /// Free-text query (e.g. "plumbers in Ljubljana")
    #[validate(length(min = 1, max = 500))]
    pub query: String,

    /// Requested result count (the API stops at 60 across pages)
    #[validate(range(min = 1, max = 60))]
    pub max_results: Option<u32>,

    /// Minimum rating filter; 0 disables filtering
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f32>,
}

/// Query parameters for GET /api/search/nearby
#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    pub latitude: f64,

    pub longitude: f64,

    /// Search radius in meters (max 50000)
    #[validate(range(min = 1.0, max = 50000.0))]
    pub radius_m: Option<f64>,

    /// Optional type filter (e.g. "restaurant", "plumber")
    pub place_type: Option<String>,

    /// Nearby search is a single page of at most 20
    #[validate(range(min = 1, max = 20))]
    pub max_results: Option<u32>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f32>,
}

impl NearbyQuery {
    /// Coordinate bounds check; `validate()` covers the remaining fields
    pub fn check_coordinates(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude out of range: {}", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude out of range: {}", self.longitude));
        }
        Ok(())
    }
}

/// Search response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
