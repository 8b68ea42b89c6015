// SPDX-License-Identifier: MPL-2.0
//! Host-tunable viewer preferences, loaded and saved as a `viewer.toml`
//! file.
//!
//! All fields are optional in the file; missing or invalid values fall
//! back to the constants in [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use iced_lightbox::config::{self, ViewerConfig};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.max_zoom_scale = Some(4.0);
//! config::save(&config).expect("Failed to save config");
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod defaults;
pub use defaults::*;

const CONFIG_FILE: &str = "viewer.toml";
const APP_NAME: &str = "IcedLightbox";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    /// Cross-dissolve duration for image replacement, in milliseconds.
    #[serde(default)]
    pub fade_duration_ms: Option<u64>,
    /// Maximum zoom scale relative to the fitted size.
    #[serde(default)]
    pub max_zoom_scale: Option<f32>,
    /// Double-tap detection window, in milliseconds.
    #[serde(default)]
    pub double_tap_interval_ms: Option<u64>,
    /// Thumbnail cache budget, in bytes.
    #[serde(default)]
    pub thumbnail_cache_bytes: Option<usize>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: Some(DEFAULT_FADE_DURATION_MS),
            max_zoom_scale: Some(DEFAULT_MAX_ZOOM_SCALE),
            double_tap_interval_ms: Some(DEFAULT_DOUBLE_TAP_INTERVAL_MS),
            thumbnail_cache_bytes: Some(DEFAULT_THUMBNAIL_CACHE_BYTES),
        }
    }
}

impl ViewerConfig {
    /// Effective fade duration, clamped to the supported range.
    #[must_use]
    pub fn fade_duration(&self) -> Duration {
        let ms = self
            .fade_duration_ms
            .unwrap_or(DEFAULT_FADE_DURATION_MS)
            .clamp(MIN_FADE_DURATION_MS, MAX_FADE_DURATION_MS);
        Duration::from_millis(ms)
    }

    /// Effective maximum zoom scale, clamped to the supported range.
    #[must_use]
    pub fn max_zoom(&self) -> f32 {
        self.max_zoom_scale
            .unwrap_or(DEFAULT_MAX_ZOOM_SCALE)
            .clamp(MIN_ZOOM_SCALE, MAX_MAX_ZOOM_SCALE)
    }

    /// Effective double-tap window, clamped to the supported range.
    #[must_use]
    pub fn double_tap_interval(&self) -> Duration {
        let ms = self
            .double_tap_interval_ms
            .unwrap_or(DEFAULT_DOUBLE_TAP_INTERVAL_MS)
            .clamp(MIN_DOUBLE_TAP_INTERVAL_MS, MAX_DOUBLE_TAP_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    /// Effective thumbnail cache budget, clamped to the supported range.
    #[must_use]
    pub fn thumbnail_cache_budget(&self) -> usize {
        self.thumbnail_cache_bytes
            .unwrap_or(DEFAULT_THUMBNAIL_CACHE_BYTES)
            .clamp(MIN_THUMBNAIL_CACHE_BYTES, MAX_THUMBNAIL_CACHE_BYTES)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<ViewerConfig> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(ViewerConfig::default())
}

pub fn save(config: &ViewerConfig) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<ViewerConfig> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &ViewerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_fields() {
        let config = ViewerConfig {
            fade_duration_ms: Some(120),
            max_zoom_scale: Some(4.0),
            double_tap_interval_ms: Some(300),
            thumbnail_cache_bytes: Some(2 * 1024 * 1024),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("viewer.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("viewer.toml");
        fs::write(&config_path, "not [valid toml").expect("failed to write file");

        let loaded = load_from_path(&config_path).expect("load should not fail");
        assert_eq!(loaded, ViewerConfig::default());
    }

    #[test]
    fn effective_values_clamp_out_of_range_fields() {
        let config = ViewerConfig {
            fade_duration_ms: Some(60_000),
            max_zoom_scale: Some(1_000.0),
            double_tap_interval_ms: Some(1),
            thumbnail_cache_bytes: Some(0),
        };

        assert_eq!(config.fade_duration(), Duration::from_millis(MAX_FADE_DURATION_MS));
        assert_eq!(config.max_zoom(), MAX_MAX_ZOOM_SCALE);
        assert_eq!(
            config.double_tap_interval(),
            Duration::from_millis(MIN_DOUBLE_TAP_INTERVAL_MS)
        );
        assert_eq!(config.thumbnail_cache_budget(), MIN_THUMBNAIL_CACHE_BYTES);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: ViewerConfig = toml::from_str("").expect("empty toml");
        assert_eq!(config.fade_duration(), Duration::from_millis(DEFAULT_FADE_DURATION_MS));
        assert_eq!(config.max_zoom(), DEFAULT_MAX_ZOOM_SCALE);
    }
}
