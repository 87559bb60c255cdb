// src/models/export.rs
// DOCUMENTATION: Export records, formats and file listings
// PURPOSE: The flat row schema written to CSV/XLSX files

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Flattened row written to export files
/// DOCUMENTATION: Every column is a string; missing values are ""
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Business Name")]
    pub business_name: String,
    #[serde(rename = "Type")]
    pub business_type: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Opening Hours")]
    pub opening_hours: String,
    #[serde(rename = "Maps URL")]
    pub maps_url: String,
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "Reviews Count")]
    pub reviews_count: String,
}

impl ExportRecord {
    /// Header row, in column order
    pub const HEADERS: [&'static str; 9] = [
        "Business Name",
        "Type",
        "Address",
        "Phone",
        "Website",
        "Opening Hours",
        "Maps URL",
        "Rating",
        "Reviews Count",
    ];

    /// Cell values in the same order as HEADERS
    pub fn as_row(&self) -> [&str; 9] {
        [
            &self.business_name,
            &self.business_type,
            &self.address,
            &self.phone,
            &self.website,
            &self.opening_hours,
            &self.maps_url,
            &self.rating,
            &self.reviews_count,
        ]
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// Request body for POST /api/export
#[derive(Debug, Deserialize, Validate)]
pub struct ExportRequest {
    /// Identifiers the user selected from search results
    #[validate(length(min = 1, max = 200))]
    pub place_ids: Vec<String>,

    #[serde(default)]
    pub format: ExportFormat,
}

/// One entry of the past-exports listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFileInfo {
    pub filename: String,
    /// Modification time, "YYYY-mm-dd HH:MM:SS"
    pub date: String,
    /// Upper-cased extension ("CSV", "XLSX")
    pub format: String,
    /// Human size, e.g. "3.2 KB"
    pub size: String,
}
