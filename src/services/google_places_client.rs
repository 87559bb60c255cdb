// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API (v1) client
// PURPOSE: Text search, nearby search and place details with field masks

use crate::config::Config;
use crate::errors::PlacesError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider limit on results per search call
pub const MAX_PAGE_SIZE: u32 = 20;

/// Fixed delay between paginated search calls
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Field mask for text search (includes the continuation token)
pub const TEXT_SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.rating,places.userRatingCount,nextPageToken";

/// Field mask for nearby search (single page, no token)
pub const NEARBY_SEARCH_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress,places.rating,places.userRatingCount";

/// Field mask for place details
pub const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,nationalPhoneNumber,internationalPhoneNumber,websiteUri,regularOpeningHours,rating,userRatingCount,googleMapsUri,primaryTypeDisplayName";

/// Google Places API client
/// DOCUMENTATION: Handles authentication headers and API calls.
/// Every call is a single attempt; callers decide whether a failure
/// aborts or is skipped.
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API (no trailing slash)
    base_url: String,
    /// Sleep between paginated search calls
    page_delay: Duration,
}

/// Localized text as returned by v1 (`{"text": "...", "languageCode": "en"}`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLocalizedText {
    #[serde(default)]
    pub text: String,
    pub language_code: Option<String>,
}

/// Opening hours block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleOpeningHours {
    pub open_now: Option<bool>,
    /// Human-readable lines, e.g. "Monday: 8:00\u{2009}AM\u{2009}\u{2013}\u{2009}5:00\u{2009}PM"
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

/// Individual place from Google Places API
/// DOCUMENTATION: Only fields named in the field mask are populated;
/// everything else is absent and defaults to None.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePlace {
    /// Google's unique place identifier
    #[serde(default)]
    pub id: String,
    pub display_name: Option<GoogleLocalizedText>,
    pub formatted_address: Option<String>,
    /// Rating (0-5)
    pub rating: Option<f32>,
    /// Number of user ratings
    pub user_rating_count: Option<i32>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website_uri: Option<String>,
    pub regular_opening_hours: Option<GoogleOpeningHours>,
    pub google_maps_uri: Option<String>,
    pub primary_type_display_name: Option<GoogleLocalizedText>,
}

/// One page of search results
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchResponse {
    #[serde(default)]
    pub places: Vec<GooglePlace>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchBody<'a> {
    text_query: &'a str,
    max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbySearchBody<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    included_types: Vec<&'a str>,
    max_result_count: u32,
    location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

/// Error payload returned by v1 on non-2xx
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GooglePlacesClient {
    /// Create new Google Places API client against the public endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, crate::config::env::DEFAULT_API_BASE_URL)
    }

    /// Create client against a custom base URL (used by tests)
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Build a client from application configuration
    /// DOCUMENTATION: Applies base URL, timeout and page delay from Config
    pub fn from_config(config: &Config, api_key: String) -> Result<Self, PlacesError> {
        if api_key.trim().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlacesError::ExternalApiError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_delay: config.page_delay(),
        })
    }

    /// Override the delay between paginated calls
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Text search across pages
    /// DOCUMENTATION: Requests min(remaining, 20) per page, waits a fixed
    /// delay between pages, and stops when the token is absent, a page comes
    /// back empty, or `max_results` have been gathered.
    ///
    /// A failing first page is returned as an error. A failing later page is
    /// logged and the results gathered so far are returned.
    pub async fn text_search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<GooglePlace>, PlacesError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlacesError::InvalidInput("Search query is empty".to_string()));
        }

        let max_results = max_results as usize;
        let mut all_places: Vec<GooglePlace> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0u32;

        while all_places.len() < max_results {
            let remaining = max_results - all_places.len();
            let page_size = (remaining as u32).min(MAX_PAGE_SIZE);
            page += 1;

            let response = match self
                .text_search_page(query, page_size, page_token.as_deref())
                .await
            {
                Ok(response) => response,
                Err(e) if page > 1 => {
                    log::warn!(
                        "Text search page {} failed, keeping {} results: {}",
                        page,
                        all_places.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let received = response.places.len();
            log::info!("Text search page {} returned {} places", page, received);
            all_places.extend(response.places);

            page_token = response.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() || received == 0 {
                break;
            }

            if all_places.len() < max_results && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        all_places.truncate(max_results);
        Ok(all_places)
    }

    /// Request a single page of text search results
    pub async fn text_search_page(
        &self,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<GoogleSearchResponse, PlacesError> {
        let url = format!("{}/v1/places:searchText", self.base_url);
        let body = TextSearchBody {
            text_query: query,
            max_result_count: page_size.clamp(1, MAX_PAGE_SIZE),
            page_token,
        };

        log::debug!(
            "Google Places text search: query={}, page_size={}, has_token={}",
            query,
            body.max_result_count,
            page_token.is_some()
        );

        let request = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", TEXT_SEARCH_FIELD_MASK)
            .json(&body);

        self.send_json(request, "text search").await
    }

    /// Perform nearby search for places
    /// DOCUMENTATION: Single call, the endpoint has no continuation token
    ///
    /// # Arguments
    /// * `latitude` - Center point latitude
    /// * `longitude` - Center point longitude
    /// * `radius_m` - Search radius in meters (max 50000)
    /// * `place_type` - Optional type filter (e.g., "restaurant", "plumber")
    /// * `max_results` - Clamped to 1..=20
    pub async fn nearby_search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        place_type: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<GooglePlace>, PlacesError> {
        let url = format!("{}/v1/places:searchNearby", self.base_url);
        let body = NearbySearchBody {
            included_types: place_type
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .into_iter()
                .collect(),
            max_result_count: max_results.clamp(1, MAX_PAGE_SIZE),
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude,
                        longitude,
                    },
                    radius: radius_m,
                },
            },
        };

        log::debug!(
            "Google Places nearby search: lat={}, lng={}, radius={}",
            latitude,
            longitude,
            radius_m
        );

        let request = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", NEARBY_SEARCH_FIELD_MASK)
            .json(&body);

        let response: GoogleSearchResponse = self.send_json(request, "nearby search").await?;
        log::info!(
            "Google Places nearby search returned {} results",
            response.places.len()
        );
        Ok(response.places)
    }

    /// Get detailed information about a specific place
    ///
    /// # Arguments
    /// * `place_id` - Google Place ID
    pub async fn get_place_details(&self, place_id: &str) -> Result<GooglePlace, PlacesError> {
        let place_id = place_id.trim();
        if !is_valid_place_id(place_id) {
            return Err(PlacesError::InvalidInput(format!(
                "Invalid place id: {:?}",
                place_id
            )));
        }

        let url = format!("{}/v1/places/{}", self.base_url, place_id);
        log::debug!("Google Places details lookup: place_id={}", place_id);

        let request = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK);

        self.send_json(request, "details").await
    }

    /// Send a request and decode the JSON body
    /// DOCUMENTATION: Network errors, non-2xx statuses and malformed JSON all
    /// become ExternalApiError.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, PlacesError> {
        let response = request.send().await.map_err(|e| {
            log::error!("Google Places {} request failed: {}", context, e);
            PlacesError::ExternalApiError(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<GoogleErrorEnvelope>(&body) {
                Ok(envelope) => format!("{} {}", envelope.error.status, envelope.error.message)
                    .trim()
                    .to_string(),
                Err(_) => body,
            };
            log::error!("Google Places {} error {}: {}", context, status, message);
            return Err(PlacesError::ExternalApiError(format!(
                "API error {}: {}",
                status, message
            )));
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to parse Google Places {} response: {}", context, e);
            PlacesError::ExternalApiError(format!("Parse error: {}", e))
        })
    }
}

/// Place ids are URL-safe tokens: ASCII alphanumerics, `_` and `-`
fn is_valid_place_id(place_id: &str) -> bool {
    !place_id.is_empty()
        && place_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn place_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "displayName": { "text": format!("Place {}", id), "languageCode": "en" },
            "formattedAddress": "Slovenska cesta 1, Ljubljana",
            "rating": 4.5,
            "userRatingCount": 12
        })
    }

    fn page_json(ids: &[String], token: Option<&str>) -> String {
        let places: Vec<_> = ids.iter().map(|id| place_json(id)).collect();
        let mut body = json!({ "places": places });
        if let Some(token) = token {
            body["nextPageToken"] = json!(token);
        }
        body.to_string()
    }

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn client_for(server: &mockito::ServerGuard) -> GooglePlacesClient {
        GooglePlacesClient::with_base_url("test_key".to_string(), &server.url())
            .with_page_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_text_search_aggregates_pages() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("POST", "/v1/places:searchText")
            .match_header("x-goog-api-key", "test_key")
            .match_header("x-goog-fieldmask", TEXT_SEARCH_FIELD_MASK)
            .match_body(Matcher::Json(
                json!({ "textQuery": "plumbers", "maxResultCount": 20 }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("a", 20), Some("tok1")))
            .create_async()
            .await;

        let second = server
            .mock("POST", "/v1/places:searchText")
            .match_body(Matcher::PartialJson(
                json!({ "pageToken": "tok1", "maxResultCount": 15 }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("b", 5), None))
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.text_search("plumbers", 35).await.unwrap();

        assert_eq!(places.len(), 25);
        assert_eq!(places[0].id, "a0");
        assert_eq!(places[24].id, "b4");
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_text_search_stops_at_requested_cap() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("POST", "/v1/places:searchText")
            .match_body(Matcher::Json(
                json!({ "textQuery": "cafes", "maxResultCount": 5 }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("c", 5), Some("more")))
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.text_search("cafes", 5).await.unwrap();

        assert_eq!(places.len(), 5);
        first.assert_async().await;
    }

    #[tokio::test]
    async fn test_text_search_truncates_oversized_page() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/v1/places:searchText")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("d", 20), None))
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.text_search("bakeries", 7).await.unwrap();
        assert_eq!(places.len(), 7);
    }

    #[tokio::test]
    async fn test_text_search_stops_on_empty_page() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/v1/places:searchText")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "places": [], "nextPageToken": "dangling" }).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.text_search("nothing here", 60).await.unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_first_page_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/v1/places:searchText")
            .with_status(403)
            .with_body(
                json!({ "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" } })
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.text_search("plumbers", 20).await.unwrap_err();
        match err {
            PlacesError::ExternalApiError(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_partial_results() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/v1/places:searchText")
            .match_body(Matcher::Json(
                json!({ "textQuery": "plumbers", "maxResultCount": 20 }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("a", 20), Some("tok1")))
            .create_async()
            .await;

        server
            .mock("POST", "/v1/places:searchText")
            .match_body(Matcher::PartialJson(json!({ "pageToken": "tok1" })))
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client.text_search("plumbers", 40).await.unwrap();
        assert_eq!(places.len(), 20);
    }

    #[tokio::test]
    async fn test_malformed_json_is_external_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/v1/places/abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_place_details("abc").await.unwrap_err();
        assert!(matches!(err, PlacesError::ExternalApiError(_)));
    }

    #[tokio::test]
    async fn test_get_place_details_sends_field_mask() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/places/ChIJ123")
            .match_header("x-goog-api-key", "test_key")
            .match_header("x-goog-fieldmask", DETAILS_FIELD_MASK)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "ChIJ123",
                    "displayName": { "text": "Vodovod Kos" },
                    "nationalPhoneNumber": "01 234 56 78",
                    "regularOpeningHours": {
                        "weekdayDescriptions": ["Monday: 8:00\u{2009}AM\u{2009}\u{2013}\u{2009}4:00\u{2009}PM"]
                    },
                    "primaryTypeDisplayName": { "text": "Plumber" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let place = client.get_place_details("ChIJ123").await.unwrap();

        assert_eq!(place.id, "ChIJ123");
        assert_eq!(place.display_name.unwrap().text, "Vodovod Kos");
        assert_eq!(place.national_phone_number.as_deref(), Some("01 234 56 78"));
        assert!(place.website_uri.is_none());
        assert_eq!(
            place.regular_opening_hours.unwrap().weekday_descriptions.len(),
            1
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_place_details_rejects_bad_id() {
        let client = GooglePlacesClient::new("test_key".to_string());
        assert!(matches!(
            client.get_place_details("  ").await,
            Err(PlacesError::InvalidInput(_))
        ));
        assert!(matches!(
            client.get_place_details("../secrets").await,
            Err(PlacesError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_get_place_details_rejects_query_and_fragment() {
        let mut server = mockito::Server::new_async().await;
        let truncated = server
            .mock("GET", "/v1/places/realplace")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(place_json("realplace").to_string())
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        for id in ["realplace?bogus=1", "realplace#frag", "real place", "realplace%2F"] {
            assert!(
                matches!(
                    client.get_place_details(id).await,
                    Err(PlacesError::InvalidInput(_))
                ),
                "{} should be rejected",
                id
            );
        }
        truncated.assert_async().await;
    }

    #[tokio::test]
    async fn test_nearby_search_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/places:searchNearby")
            .match_header("x-goog-fieldmask", NEARBY_SEARCH_FIELD_MASK)
            .match_body(Matcher::Json(json!({
                "includedTypes": ["plumber"],
                "maxResultCount": 20,
                "locationRestriction": {
                    "circle": {
                        "center": { "latitude": 46.05, "longitude": 14.5 },
                        "radius": 1500.0
                    }
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_json(&ids("n", 3), None))
            .create_async()
            .await;

        let client = client_for(&server);
        let places = client
            .nearby_search(46.05, 14.5, 1500.0, Some("plumber"), 50)
            .await
            .unwrap();

        assert_eq!(places.len(), 3);
        mock.assert_async().await;
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config::default();
        assert!(matches!(
            GooglePlacesClient::from_config(&config, String::new()),
            Err(PlacesError::MissingApiKey)
        ));
        assert!(GooglePlacesClient::from_config(&config, "k".to_string()).is_ok());
    }
}
