//! Configuration file loading
//!
//! Loads user configuration from `~/.config/pipmirror/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{MirrorConfig, MIN_WINDOW_HEIGHT};
use crate::error::{MirrorError, Result};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Capture settings
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Source catalog settings
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Capture session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Polling rate for the capture backend in frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Milliseconds to wait for the first frame (0 = no watchdog)
    #[serde(default = "default_start_timeout_ms")]
    pub start_timeout_ms: u64,
}

/// Source catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Windows at or below this height are hidden from the list
    #[serde(default = "default_min_window_height")]
    pub min_window_height: f64,

    /// Applications whose windows make up the desktop itself
    #[serde(default = "default_desktop_owner_apps")]
    pub desktop_owner_apps: Vec<String>,
}

fn default_frame_rate() -> u32 {
    30
}

fn default_start_timeout_ms() -> u64 {
    5000
}

fn default_min_window_height() -> f64 {
    MIN_WINDOW_HEIGHT
}

fn default_desktop_owner_apps() -> Vec<String> {
    vec![
        "Dock".to_string(),
        "Window Server".to_string(),
        "Wallpaper".to_string(),
    ]
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            start_timeout_ms: default_start_timeout_ms(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            min_window_height: default_min_window_height(),
            desktop_owner_apps: default_desktop_owner_apps(),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("pipmirror").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("pipmirror")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/pipmirror/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MirrorError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| MirrorError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MirrorError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MirrorError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MirrorError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Reject values the capture backend cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.capture.frame_rate == 0 || self.capture.frame_rate > 240 {
            return Err(MirrorError::config(format!(
                "frame_rate must be between 1 and 240, got {}",
                self.capture.frame_rate
            )));
        }
        if !self.catalog.min_window_height.is_finite() || self.catalog.min_window_height < 0.0 {
            return Err(MirrorError::config(format!(
                "min_window_height must be a non-negative number, got {}",
                self.catalog.min_window_height
            )));
        }
        Ok(())
    }

    /// Resolve into runtime settings
    pub fn resolve(&self) -> MirrorConfig {
        MirrorConfig {
            frame_rate: self.capture.frame_rate,
            start_timeout: match self.capture.start_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            min_window_height: self.catalog.min_window_height,
            desktop_owner_apps: self.catalog.desktop_owner_apps.clone(),
        }
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# pipmirror configuration

[capture]
# How often the capture backend grabs a frame, in frames per second (1-240)
frame_rate = 30

# Warn when a selected source produces no frame within this many
# milliseconds (0 disables the check)
start_timeout_ms = 5000

[catalog]
# Windows this tall or shorter are treated as menu-bar items and hidden
min_window_height = 48.0

# Applications whose windows belong to the desktop itself
desktop_owner_apps = ["Dock", "Window Server", "Wallpaper"]
"#
    .to_string()
}
