//! Application configuration.
//!
//! Provides `AppConfig`, read from a JSON file by the front ends. Every field
//! has a default so a missing or partial file is valid.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::map::FlyToOptions;
use crate::models::{normalize_kind, Coords};
use crate::store::DEFAULT_STORAGE_KEY;
use crate::util::normalize_text_option;
use crate::view::FocusSettings;

/// Highest zoom level the tile layer serves
pub const MAX_ZOOM: u8 = 19;

/// Runtime configuration shared by all front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Key the location snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Category labels offered by the selector
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Zoom used when the map first centers on the user
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
    /// Zoom used by "locate me"
    #[serde(default = "default_locate_zoom")]
    pub locate_zoom: u8,
    /// Zoom used when focusing a saved location
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
    #[serde(default)]
    pub fly_to: FlyToOptions,
    /// How long notifications stay visible
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u64,
    /// Fallback position for front ends without geolocation
    #[serde(default)]
    pub home: Option<Coords>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_categories() -> Vec<String> {
    vec!["Want to go".into(), "Favorite".into(), "Visited".into()]
}

const fn default_initial_zoom() -> u8 {
    15
}

const fn default_locate_zoom() -> u8 {
    13
}

const fn default_focus_zoom() -> u8 {
    15
}

const fn default_notification_timeout_ms() -> u64 {
    4000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            categories: default_categories(),
            initial_zoom: default_initial_zoom(),
            locate_zoom: default_locate_zoom(),
            focus_zoom: default_focus_zoom(),
            fly_to: FlyToOptions::default(),
            notification_timeout_ms: default_notification_timeout_ms(),
            home: None,
        }
    }
}

impl AppConfig {
    /// Load config from `path`, falling back to defaults when the file is missing
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = Self::parse(&raw).map_err(|error| {
            Error::Config(format!("Failed to load config at {}: {error}", path.display()))
        })?;
        Ok(config)
    }

    /// Parse and validate a JSON config payload
    pub fn parse(payload: &str) -> Result<Self> {
        let mut config = serde_json::from_str::<Self>(payload)
            .map_err(|error| Error::Config(format!("invalid config JSON: {error}")))?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Write config as pretty JSON, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.storage_key = self.storage_key.trim().to_string();
        self.categories = self
            .categories
            .drain(..)
            .filter_map(|label| normalize_text_option(Some(label)))
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(Error::Config("storage_key must not be empty".into()));
        }
        if self.categories.is_empty() {
            return Err(Error::Config("at least one category is required".into()));
        }

        let mut seen = HashSet::new();
        for label in &self.categories {
            let kind = normalize_kind(label);
            if kind == "all" {
                return Err(Error::Config(
                    "'all' is reserved for the unfiltered tab".into(),
                ));
            }
            if !seen.insert(kind) {
                return Err(Error::Config(format!("duplicate category '{label}'")));
            }
        }

        for (field, zoom) in [
            ("initial_zoom", self.initial_zoom),
            ("locate_zoom", self.locate_zoom),
            ("focus_zoom", self.focus_zoom),
        ] {
            if zoom > MAX_ZOOM {
                return Err(Error::Config(format!(
                    "{field} must be between 0 and {MAX_ZOOM}, got {zoom}"
                )));
            }
        }

        if !self.fly_to.duration_secs.is_finite() || self.fly_to.duration_secs < 0.0 {
            return Err(Error::Config(
                "fly_to.duration_secs must be a non-negative number".into(),
            ));
        }

        if let Some(home) = self.home {
            home.validate()
                .map_err(|error| Error::Config(format!("home: {error}")))?;
        }
        Ok(())
    }

    pub const fn focus_settings(&self) -> FocusSettings {
        FocusSettings {
            zoom: self.focus_zoom,
            fly_to: self.fly_to,
        }
    }

    pub const fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::parse("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_key, "locations");
        assert_eq!(config.notification_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let error = AppConfig::parse(r#"{"theme": "dark"}"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn parse_rejects_duplicate_categories() {
        let error = AppConfig::parse(r#"{"categories": ["Visited", " visited "]}"#).unwrap_err();
        assert!(error.to_string().contains("duplicate category"));
    }

    #[test]
    fn parse_rejects_reserved_all_category() {
        assert!(AppConfig::parse(r#"{"categories": ["All"]}"#).is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_zoom() {
        let error = AppConfig::parse(r#"{"focus_zoom": 22}"#).unwrap_err();
        assert!(error.to_string().contains("focus_zoom"));
    }

    #[test]
    fn parse_reads_home_and_fly_to() {
        let config = AppConfig::parse(
            r#"{"home": [48.85, 2.35], "fly_to": {"duration_secs": 0.5}, "categories": ["Cafe", "  "]}"#,
        )
        .unwrap();
        assert_eq!(config.home, Some(Coords::new(48.85, 2.35)));
        assert!((config.fly_to.duration_secs - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.categories, vec!["Cafe".to_string()]);
    }

    #[test]
    fn load_missing_file_returns_default_and_save_round_trips() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("pinpoint").join("config.json");
        assert_eq!(AppConfig::load_from_path(&path).unwrap(), AppConfig::default());

        let config = AppConfig {
            focus_zoom: 17,
            ..AppConfig::default()
        };
        config.save_to_path(&path).unwrap();
        assert_eq!(AppConfig::load_from_path(&path).unwrap(), config);
    }
}
