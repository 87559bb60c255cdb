// src/lib.rs
// DOCUMENTATION: Library root shared by the web server and the CLI
// PURPOSE: Places search, selection and tabular export

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

pub use errors::PlacesError;

use crate::config::Config;

/// Install env_logger, honoring RUST_LOG and otherwise the configured level
pub fn init_logging(log_level: &str) {
    let default_filter = if log_level.is_empty() {
        "info,actix_web=info"
    } else {
        log_level
    };

    // A logger may already be installed (tests, embedding)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}

/// Startup sequence for both binaries
/// DOCUMENTATION: Logging goes first so warnings raised while validating
/// (e.g. a missing API key) reach the operator
pub fn init(config: &Config) -> Result<(), String> {
    init_logging(&config.log_level);
    config.validate()
}
