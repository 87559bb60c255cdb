// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config and export directory, start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use places_export::config::{ApiKeyStore, Config};
use places_export::handlers;
use places_export::services::ExportWriter;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration, initialize logging, validate
    let config = Config::from_env();
    if let Err(e) = places_export::init(&config) {
        log::error!("Configuration error: {}", e);
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting places-export service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 3. Prepare export directory
    let writer = match ExportWriter::new(&config.export_dir) {
        Ok(writer) => writer,
        Err(e) => {
            log::error!(
                "Failed to prepare export directory {}: {}",
                config.export_dir.display(),
                e
            );
            std::process::exit(1);
        }
    };
    log::info!("Writing exports to {}", writer.output_dir().display());

    // 4. Shared state
    let api_key = web::Data::new(ApiKeyStore::new(
        config.google_maps_api_key.clone(),
        config.env_file.clone(),
    ));
    let writer = web::Data::new(writer);
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config = web::Data::new(config);

    // 5. Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(api_key.clone())
            .app_data(writer.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::places_config)
            .configure(handlers::exports_config)
            .configure(handlers::settings_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
