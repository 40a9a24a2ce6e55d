//! Configuration for the sync layer: where the backend lives and which
//! placeholder images to show.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_UPLOADS_PATH: &str = "/uploads/";
pub const NO_IMAGE_URL: &str = "https://via.placeholder.com/50?text=No+Image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Scheme, host and port of the backend, without a trailing slash.
    pub api_origin: String,

    /// Path prefix under which the backend serves uploaded images.
    pub uploads_path: String,

    /// Shown when a record has no image reference at all.
    pub no_image_url: String,

    /// Swapped in when a resolved image fails to load.
    pub broken_image_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            uploads_path: DEFAULT_UPLOADS_PATH.to_string(),
            no_image_url: NO_IMAGE_URL.to_string(),
            broken_image_url: NO_IMAGE_URL.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by `PET_API_ORIGIN` and `PET_UPLOADS_PATH`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(origin) = var("PET_API_ORIGIN").filter(|v| !v.trim().is_empty()) {
            self.api_origin = origin.trim().trim_end_matches('/').to_string();
        }
        if let Some(path) = var("PET_UPLOADS_PATH").filter(|v| !v.trim().is_empty()) {
            self.uploads_path = path.trim().to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SyncConfig::from_yaml_str("api_origin: http://pets.internal:9000\n").unwrap();
        assert_eq!(config.api_origin, "http://pets.internal:9000");
        assert_eq!(config.uploads_path, DEFAULT_UPLOADS_PATH);
        assert_eq!(config.no_image_url, NO_IMAGE_URL);
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(SyncConfig::from_yaml_str("api_origin: [unclosed").is_err());
    }

    #[test]
    fn env_overrides_origin() {
        let config = SyncConfig::default().with_env_overrides(|key| match key {
            "PET_API_ORIGIN" => Some("http://10.0.0.5:8080/".to_string()),
            "PET_UPLOADS_PATH" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_origin, "http://10.0.0.5:8080");
        assert_eq!(config.uploads_path, DEFAULT_UPLOADS_PATH);
    }
}
