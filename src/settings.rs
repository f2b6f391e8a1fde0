//! Process-wide settings.
//!
//! Settings are read from `<config_dir>/plotcore/settings.json` when
//! present. Every field has a default, so partial files are fine.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FONT, DEFAULT_HATCH_SCALE, DEV_FONT, SLOW_STAGE_MS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Development mode: swaps the default text font for the bundled one
    pub dev: bool,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub default_font: String,
    /// Pipeline stages slower than this are logged
    pub slow_stage_ms: f64,
    /// Default tile size of built-in hatch patterns
    pub hatch_scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dev: false,
            log_filter: "plotcore=info".to_string(),
            default_font: DEFAULT_FONT.to_string(),
            slow_stage_ms: SLOW_STAGE_MS,
            hatch_scale: DEFAULT_HATCH_SCALE,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    /// Load from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Using default settings: {e:#}");
                Self::default()
            }
        }
    }

    /// Font used for text visuals that do not set one
    pub fn text_font(&self) -> &str {
        if self.dev { DEV_FONT } else { &self.default_font }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("plotcore").join("settings.json"))
}

static SETTINGS: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::default()));

/// Snapshot of the current settings
pub fn settings() -> Settings {
    SETTINGS.read().clone()
}

pub fn set_settings(settings: Settings) {
    *SETTINGS.write() = settings;
}
