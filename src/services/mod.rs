// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod export_service;
pub mod export_writer;
pub mod google_places_client;
pub mod normalizer;
pub mod place_service;
pub mod selection;

pub use export_service::*;
pub use export_writer::ExportWriter;
pub use google_places_client::*;
pub use place_service::*;
pub use selection::parse_selection;
