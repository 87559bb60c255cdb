// src/config/credentials.rs
// DOCUMENTATION: Runtime API key storage
// PURPOSE: Hold the Places API key for request handlers and persist changes to .env

use crate::errors::PlacesError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Environment variable name written to the .env file
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Number of trailing characters revealed by `masked()`
const VISIBLE_KEY_CHARS: usize = 8;

/// API key shared between request handlers
/// DOCUMENTATION: Passed to handlers through web::Data; the settings
/// endpoint swaps the key at runtime without a restart.
pub struct ApiKeyStore {
    key: RwLock<String>,
    env_file: PathBuf,
}

impl ApiKeyStore {
    pub fn new(initial: String, env_file: impl Into<PathBuf>) -> Self {
        Self {
            key: RwLock::new(initial),
            env_file: env_file.into(),
        }
    }

    /// Current key, or MissingApiKey when none is configured
    pub async fn require(&self) -> Result<String, PlacesError> {
        let key = self.key.read().await;
        if key.trim().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }
        Ok(key.clone())
    }

    /// Last 8 characters of the key, for display
    pub async fn masked(&self) -> Option<String> {
        let key = self.key.read().await;
        if key.is_empty() {
            return None;
        }
        let chars: Vec<char> = key.chars().collect();
        let start = chars.len().saturating_sub(VISIBLE_KEY_CHARS);
        Some(chars[start..].iter().collect())
    }

    /// Persist a new key to the .env file and start using it
    pub async fn replace(&self, new_key: &str) -> Result<(), PlacesError> {
        let new_key = new_key.trim();
        if new_key.is_empty() {
            return Err(PlacesError::InvalidInput("API key is required".to_string()));
        }

        let mut key = self.key.write().await;
        write_env_var(&self.env_file, API_KEY_VAR, new_key).await?;
        *key = new_key.to_string();
        log::info!("API key updated and saved to {}", self.env_file.display());
        Ok(())
    }
}

/// Set `name=value` in an env file, keeping every other line intact
async fn write_env_var(path: &Path, name: &str, value: &str) -> Result<(), PlacesError> {
    let existing = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let prefix = format!("{}=", name);
    let mut lines: Vec<String> = existing
        .lines()
        .filter(|line| !line.trim_start().starts_with(&prefix))
        .map(str::to_string)
        .collect();
    lines.push(format!("{}{}", prefix, value));

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).await?;
    Ok(())
}
