// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod export;
pub mod place;

pub use export::*;
pub use place::*;
