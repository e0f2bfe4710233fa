//! Configuration types for pipmirror
//!
//! The stream configuration is fixed; user-tunable settings live in the
//! config file.

mod file;

pub use file::{sample_config, CaptureSettings, CatalogSettings, ConfigFile};

use crate::types::PixelFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pending frames the capture backend may buffer before dropping
pub const QUEUE_DEPTH: usize = 5;

/// Windows at or below this height are treated as menu-bar chrome.
///
/// The notch-area sliver on some laptops reaches about 43 points.
pub const MIN_WINDOW_HEIGHT: f64 = 48.0;

/// Configuration applied to every stream session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Pending frame queue depth
    pub queue_depth: usize,
    /// Pixel format of delivered frames
    pub pixel_format: PixelFormat,
    /// Whether the cursor is drawn into frames
    pub shows_cursor: bool,
}

impl StreamConfig {
    /// The configuration every session uses: 5 pending frames, BGRA, no cursor
    pub const fn fixed() -> Self {
        Self {
            queue_depth: QUEUE_DEPTH,
            pixel_format: PixelFormat::Bgra32,
            shows_cursor: false,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Runtime settings resolved from the config file
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorConfig {
    /// Provider polling rate in frames per second
    pub frame_rate: u32,
    /// Start watchdog timeout, `None` when disabled
    pub start_timeout: Option<Duration>,
    /// Minimum window height for catalog entries
    pub min_window_height: f64,
    /// Application names treated as desktop owners
    pub desktop_owner_apps: Vec<String>,
}

impl MirrorConfig {
    /// Interval between provider polls
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate.max(1)))
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        ConfigFile::default().resolve()
    }
}

impl From<&ConfigFile> for MirrorConfig {
    fn from(file: &ConfigFile) -> Self {
        file.resolve()
    }
}
