// src/services/normalizer.rs
// DOCUMENTATION: Result normalization
// PURPOSE: Map Places API payloads onto flat records and clean text for export

use crate::models::{ExportRecord, PlaceDetail, SearchResult};
use crate::services::google_places_client::{GoogleLocalizedText, GooglePlace};

/// Separator placed between weekday lines in the exported hours column
pub const HOURS_SEPARATOR: &str = " | ";

/// Map a search hit to a SearchResult
pub fn to_search_result(place: &GooglePlace) -> SearchResult {
    SearchResult {
        id: place.id.clone(),
        name: localized(&place.display_name),
        formatted_address: place.formatted_address.clone().unwrap_or_default(),
        rating: place.rating,
        user_rating_count: place.user_rating_count,
    }
}

/// Map a details payload to a PlaceDetail
pub fn to_place_detail(place: GooglePlace) -> PlaceDetail {
    let business_type = localized(&place.primary_type_display_name);
    let name = localized(&place.display_name);

    PlaceDetail {
        id: place.id,
        name,
        business_type,
        formatted_address: place.formatted_address.unwrap_or_default(),
        national_phone_number: non_empty(place.national_phone_number),
        international_phone_number: non_empty(place.international_phone_number),
        website: non_empty(place.website_uri),
        weekday_descriptions: place
            .regular_opening_hours
            .map(|hours| hours.weekday_descriptions)
            .unwrap_or_default(),
        maps_url: non_empty(place.google_maps_uri),
        rating: place.rating,
        user_rating_count: place.user_rating_count,
    }
}

/// Fill rating and review count from the search hit when details lack them
pub fn merge_search_metrics(mut detail: PlaceDetail, hit: &SearchResult) -> PlaceDetail {
    if detail.rating.is_none() {
        detail.rating = hit.rating;
    }
    if detail.user_rating_count.is_none() {
        detail.user_rating_count = hit.user_rating_count;
    }
    if detail.name.is_empty() {
        detail.name = hit.name.clone();
    }
    detail
}

/// Flatten a PlaceDetail into an export row
/// DOCUMENTATION: Phone prefers the national number, then the international
/// one, then "". Every missing value becomes "".
pub fn to_export_record(detail: &PlaceDetail) -> ExportRecord {
    let phone = detail
        .national_phone_number
        .as_deref()
        .or(detail.international_phone_number.as_deref())
        .unwrap_or_default();

    ExportRecord {
        business_name: clean_text(&detail.name),
        business_type: clean_text(&detail.business_type),
        address: clean_text(&detail.formatted_address),
        phone: clean_text(phone),
        website: detail.website.clone().unwrap_or_default(),
        opening_hours: normalize_opening_hours(&detail.weekday_descriptions),
        maps_url: detail.maps_url.clone().unwrap_or_default(),
        rating: detail.rating.map(|r| r.to_string()).unwrap_or_default(),
        reviews_count: detail
            .user_rating_count
            .map(|c| c.to_string())
            .unwrap_or_default(),
    }
}

/// Join weekday lines into a single cell, ASCII-normalized
pub fn normalize_opening_hours(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| clean_text(line))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(HOURS_SEPARATOR)
}

/// Replace provider typography with ASCII and collapse runs of spaces
/// DOCUMENTATION: Thin/narrow/no-break spaces become ' '; en/em dashes and
/// minus signs become '-'.
pub fn clean_text(input: &str) -> String {
    let mapped: String = input
        .chars()
        .map(|c| match c {
            '\u{2009}' | '\u{202F}' | '\u{00A0}' | '\u{2007}' | '\u{200A}' => ' ',
            '\u{2013}' | '\u{2014}' | '\u{2012}' | '\u{2212}' => '-',
            other => other,
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn localized(text: &Option<GoogleLocalizedText>) -> String {
    text.as_ref()
        .map(|t| t.text.trim().to_string())
        .unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
