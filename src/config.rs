/// Application configuration
///
/// Read once at startup from `<config dir>/glasses-try-on/config.json`.
/// Every field has a default, so a partial file is fine and a missing file
/// means "all defaults". The file is never written back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::ConfigError;

/// Catalog endpoint used by `remote-catalog` builds unless overridden
pub const DEFAULT_CATALOG_ENDPOINT: &str = "http://localhost:8080/glasses.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP endpoint returning the JSON style list
    pub catalog_endpoint: String,
    /// Increments applied by the on-screen controls
    pub controls: ControlSteps,
    /// Video surface settings
    pub preview: PreviewConfig,
}

/// Step sizes for the placement buttons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSteps {
    /// Percent of the frame per move button press
    pub position_step: f32,
    /// Scale factor change per zoom button press
    pub scale_step: f32,
    /// Radians per rotate button press
    pub rotation_step: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    /// Self-view mirroring of the video frame
    pub mirrored: bool,
    /// Still image shown in place of a camera feed
    pub backdrop: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            controls: ControlSteps::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self {
            position_step: 2.0,
            scale_step: 0.1,
            rotation_step: 0.1,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            mirrored: true,
            backdrop: None,
        }
    }
}

impl AppConfig {
    /// Load from the user's config directory
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Location of the config file
    /// - Linux: ~/.config/glasses-try-on/config.json
    /// - macOS: ~/Library/Application Support/glasses-try-on/config.json
    /// - Windows: %APPDATA%\glasses-try-on\config.json
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("glasses-try-on");
        path.push("config.json");
        Some(path)
    }

    /// Load a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_json(&content)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controls or the preview cannot work with.
    /// The endpoint is only checked in builds that fetch from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if cfg!(feature = "remote-catalog") {
            self.validate_endpoint()?;
        }

        let steps = [
            ("position_step", self.controls.position_step),
            ("scale_step", self.controls.scale_step),
            ("rotation_step", self.controls.rotation_step),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(ConfigError::Invalid(
                "preview width and height must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_endpoint(&self) -> Result<(), ConfigError> {
        let endpoint = self.catalog_endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "catalog_endpoint must be an http(s) URL, got {:?}",
                self.catalog_endpoint
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_control_steps() {
        let config = AppConfig::default();
        assert_eq!(config.controls.position_step, 2.0);
        assert_eq!(config.controls.scale_step, 0.1);
        assert_eq!(config.controls.rotation_step, 0.1);
        assert!(config.preview.mirrored);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_json(r#"{ "controls": { "position_step": 5.0 } }"#).unwrap();
        assert_eq!(config.controls.position_step, 5.0);
        assert_eq!(config.controls.scale_step, 0.1);
        assert_eq!(config.catalog_endpoint, DEFAULT_CATALOG_ENDPOINT);
        assert_eq!(config.preview.width, 1280);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_json(r#"{ "controls": { "scale_step": -0.1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_json(r#"{ "preview": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_endpoint_checked_only_when_fetched() {
        let config = AppConfig {
            catalog_endpoint: "ftp://x".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate_endpoint(),
            Err(ConfigError::Invalid(_))
        ));

        let loaded = AppConfig::from_json(
            r#"{ "catalog_endpoint": "ftp://x", "controls": { "position_step": 4.0 } }"#,
        );
        if cfg!(feature = "remote-catalog") {
            assert!(matches!(loaded, Err(ConfigError::Invalid(_))));
        } else {
            assert_eq!(loaded.unwrap().controls.position_step, 4.0);
        }
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("glasses-try-on-missing-config-test.json");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "glasses-try-on-config-test-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "preview": { "mirrored": false } }"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(!config.preview.mirrored);
        assert_eq!(config.preview.height, 720);
    }
}
