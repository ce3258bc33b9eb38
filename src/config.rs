//! Painter configuration.

use embassy_time::Duration;
use serde::Deserialize;

use crate::frame_scheduler::{DEFAULT_FPS, frame_duration_for};

/// Default crossfade used by the user facing topics.
pub const DEFAULT_CROSSFADE_MS: u32 = 500;

/// Default number of patterns kept in the recents list.
pub const DEFAULT_RECENTS_MAX: usize = 25;

/// Configuration for the painter and the command processor
///
/// Every field is optional when decoded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PainterConfig {
    /// Target frame rate
    pub fps: u32,
    /// Crossfade applied by topics that ask for the default one
    pub default_crossfade_ms: u32,
    /// Capacity of the recents list, up to [`DEFAULT_RECENTS_MAX`]
    pub recents_max: usize,
    /// Encoded pattern shown when the painter starts
    pub startup: Option<String>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            default_crossfade_ms: DEFAULT_CROSSFADE_MS,
            recents_max: DEFAULT_RECENTS_MAX,
            startup: None,
        }
    }
}

impl PainterConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    #[must_use]
    pub const fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    #[must_use]
    pub const fn with_default_crossfade_ms(mut self, ms: u32) -> Self {
        self.default_crossfade_ms = ms;
        self
    }

    #[must_use]
    pub fn with_startup(mut self, encoded: impl Into<String>) -> Self {
        self.startup = Some(encoded.into());
        self
    }

    /// Nominal duration of one frame
    pub const fn frame_duration(&self) -> Duration {
        frame_duration_for(self.fps)
    }

    pub const fn default_crossfade(&self) -> Duration {
        Duration::from_millis(self.default_crossfade_ms as u64)
    }
}
