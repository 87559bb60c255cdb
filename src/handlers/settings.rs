// src/handlers/settings.rs
// DOCUMENTATION: API key settings handlers
// PURPOSE: Show a masked key and replace it at runtime

use crate::config::ApiKeyStore;
use crate::errors::PlacesError;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

/// Request body for POST /api/settings/apikey
#[derive(Debug, Deserialize)]
pub struct ApiKeyUpdate {
    #[serde(default)]
    pub api_key: String,
}

/// GET /api/settings
pub async fn get_settings(api_key: web::Data<ApiKeyStore>) -> impl Responder {
    HttpResponse::Ok().json(json!({ "current_api_key": api_key.masked().await }))
}

/// POST /api/settings/apikey
pub async fn save_api_key(
    api_key: web::Data<ApiKeyStore>,
    body: web::Json<ApiKeyUpdate>,
) -> Result<impl Responder, PlacesError> {
    api_key.replace(&body.api_key).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "API key saved successfully" })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/settings", web::get().to(get_settings))
        .route("/api/settings/apikey", web::post().to(save_api_key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_settings_roundtrip() {
        let dir = tempdir().unwrap();
        let env_file = dir.path().join(".env");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ApiKeyStore::new(String::new(), &env_file)))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["current_api_key"].is_null());

        let req = test::TestRequest::post()
            .uri("/api/settings/apikey")
            .set_json(json!({ "api_key": "AIzaFAKEKEY0123456789" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["current_api_key"], "23456789");

        let saved = std::fs::read_to_string(&env_file).unwrap();
        assert!(saved.contains("GOOGLE_MAPS_API_KEY=AIzaFAKEKEY0123456789"));
    }

    #[actix_web::test]
    async fn test_empty_key_rejected() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ApiKeyStore::new(
                    String::new(),
                    dir.path().join(".env"),
                )))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/settings/apikey")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
