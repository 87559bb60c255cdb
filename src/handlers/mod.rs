// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod exports;
pub mod health;
pub mod places;
pub mod settings;

pub use exports::config as exports_config;
pub use health::config as health_config;
pub use places::config as places_config;
pub use settings::config as settings_config;

/// `Content-Disposition` value for a download
/// DOCUMENTATION: The quoted filename keeps printable ASCII only; quotes,
/// backslashes, control and non-ASCII characters become '_'
pub(crate) fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_escapes_name() {
        assert_eq!(
            attachment_disposition("places_export_20240309_140507.csv"),
            "attachment; filename=\"places_export_20240309_140507.csv\""
        );
        assert_eq!(
            attachment_disposition("we\"ird\\na\u{e9}me\r.csv"),
            "attachment; filename=\"we_ird_na_me_.csv\""
        );
    }
}
