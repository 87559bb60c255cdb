// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the Places API (v1)
pub const DEFAULT_API_BASE_URL: &str = "https://places.googleapis.com";

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Google Maps / Places API key
    pub google_maps_api_key: String,

    /// Base URL of the Places API, overridable for testing
    pub api_base_url: String,

    /// Directory where export files are written
    pub export_dir: PathBuf,

    /// Path of the .env file the settings endpoint writes to
    pub env_file: PathBuf,

    /// Fixed delay between paginated search calls (milliseconds)
    pub page_delay_ms: u64,

    /// Fixed delay between place detail calls (milliseconds)
    pub detail_delay_ms: u64,

    /// HTTP client timeout in seconds
    pub request_timeout_secs: u64,

    /// Result count used when a caller doesn't ask for one
    pub default_max_results: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            google_maps_api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            export_dir: PathBuf::from("exports"),
            env_file: PathBuf::from(".env"),
            page_delay_ms: 500,
            detail_delay_ms: 100,
            request_timeout_secs: 30,
            default_max_results: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Config::default();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),

            server_port: parse_var("SERVER_PORT", defaults.server_port),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .or_else(|_| env::var("GOOGLE_PLACES_API_KEY"))
                .unwrap_or_default(),

            api_base_url: env::var("PLACES_API_BASE_URL").unwrap_or(defaults.api_base_url),

            export_dir: env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),

            env_file: env::var("ENV_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.env_file),

            page_delay_ms: parse_var("PAGE_DELAY_MS", defaults.page_delay_ms),

            detail_delay_ms: parse_var("DETAIL_DELAY_MS", defaults.detail_delay_ms),

            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),

            default_max_results: parse_var("DEFAULT_MAX_RESULTS", defaults.default_max_results),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.export_dir.as_os_str().is_empty() {
            return Err("EXPORT_DIR must not be empty".to_string());
        }

        if self.server_port == 0 {
            return Err("SERVER_PORT must be a non-zero port".to_string());
        }

        if self.default_max_results == 0 {
            return Err("DEFAULT_MAX_RESULTS must be at least 1".to_string());
        }

        if self.google_maps_api_key.is_empty() {
            log::warn!("GOOGLE_MAPS_API_KEY not configured - searches will fail until it is set");
        }

        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a numeric environment variable, falling back on absence or garbage
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
