// src/services/place_service.rs
// DOCUMENTATION: Search logic for places
// PURPOSE: Intermediary between handlers/CLI and the Places client

use crate::errors::PlacesError;
use crate::models::{NearbyQuery, SearchResult};
use crate::services::google_places_client::GooglePlacesClient;
use crate::services::normalizer;

/// Default nearby search radius in meters
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 1000.0;

pub struct PlaceService;

impl PlaceService {
    /// Text search with an optional minimum rating
    /// DOCUMENTATION: Pages through results up to `max_results`, then drops
    /// everything rated below `min_rating` (unrated counts as 0)
    pub async fn search(
        client: &GooglePlacesClient,
        query: &str,
        max_results: u32,
        min_rating: f32,
    ) -> Result<Vec<SearchResult>, PlacesError> {
        let places = client.text_search(query, max_results).await?;
        let results: Vec<SearchResult> = places.iter().map(normalizer::to_search_result).collect();

        let total = results.len();
        let results = Self::filter_by_rating(results, min_rating);
        log::info!(
            "Search '{}' returned {} results ({} after rating filter {})",
            query,
            total,
            results.len(),
            min_rating
        );
        Ok(results)
    }

    /// Single-page nearby search with the same rating filter
    pub async fn search_nearby(
        client: &GooglePlacesClient,
        query: &NearbyQuery,
        default_max_results: u32,
    ) -> Result<Vec<SearchResult>, PlacesError> {
        let places = client
            .nearby_search(
                query.latitude,
                query.longitude,
                query.radius_m.unwrap_or(DEFAULT_NEARBY_RADIUS_M),
                query.place_type.as_deref(),
                query.max_results.unwrap_or(default_max_results),
            )
            .await?;

        let results = places.iter().map(normalizer::to_search_result).collect();
        Ok(Self::filter_by_rating(results, query.min_rating.unwrap_or(0.0)))
    }

    /// Keep results rated at least `min_rating`; a threshold <= 0 keeps all
    pub fn filter_by_rating(results: Vec<SearchResult>, min_rating: f32) -> Vec<SearchResult> {
        if min_rating <= 0.0 {
            return results;
        }
        results
            .into_iter()
            .filter(|r| r.rating.unwrap_or(0.0) >= min_rating)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn result(id: &str, rating: Option<f32>) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            name: id.to_string(),
            formatted_address: String::new(),
            rating,
            user_rating_count: None,
        }
    }

    #[test]
    fn test_filter_by_rating() {
        let results = vec![
            result("a", Some(4.6)),
            result("b", Some(3.2)),
            result("c", None),
            result("d", Some(4.0)),
        ];

        let kept = PlaceService::filter_by_rating(results.clone(), 4.0);
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);

        assert_eq!(PlaceService::filter_by_rating(results, 0.0).len(), 4);
    }

    #[tokio::test]
    async fn test_search_normalizes_and_filters() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/places:searchText")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "places": [
                        { "id": "p1", "displayName": { "text": "Good" }, "rating": 4.7 },
                        { "id": "p2", "displayName": { "text": "Meh" }, "rating": 2.1 },
                        { "id": "p3", "displayName": { "text": "New" } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GooglePlacesClient::with_base_url("k".to_string(), &server.url())
            .with_page_delay(Duration::ZERO);

        let all = PlaceService::search(&client, "bakery", 20, 0.0).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Good");

        let good = PlaceService::search(&client, "bakery", 20, 4.5).await.unwrap();
        assert_eq!(good.len(), 1);
        assert_eq!(good[0].id, "p1");
    }

    #[tokio::test]
    async fn test_search_nearby_uses_default_radius() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/places:searchNearby")
            .match_body(mockito::Matcher::PartialJson(json!({
                "maxResultCount": 20,
                "locationRestriction": { "circle": { "radius": 1000.0 } }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "places": [
                        { "id": "n1", "displayName": { "text": "Close" }, "rating": 4.1 },
                        { "id": "n2", "displayName": { "text": "Unrated" } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GooglePlacesClient::with_base_url("k".to_string(), &server.url());
        let query = NearbyQuery {
            latitude: 46.05,
            longitude: 14.51,
            radius_m: None,
            place_type: None,
            max_results: None,
            min_rating: Some(4.0),
        };

        let results = PlaceService::search_nearby(&client, &query, 20).await.unwrap();
        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "n1");
    }
}
