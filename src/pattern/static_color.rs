//! Patterns that do not change over time
//!
//! Plain colors and frames render directly from [`Pattern`](super::Pattern);
//! this module holds the tiled variant.

use serde::{Deserialize, Serialize};

use super::Render;
use crate::color::{Frame, Rgb};

/// Repeats a frame to fill the pixels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repeated {
    #[serde(rename = "Frame")]
    pub frame: Frame,
}

impl Repeated {
    pub const fn new(frame: Frame) -> Self {
        Self { frame }
    }
}

impl Render for Repeated {
    fn render(&mut self, pixels: &mut [Rgb], _time_ms: u32) {
        if pixels.is_empty() || self.frame.is_empty() {
            return;
        }
        for chunk in pixels.chunks_mut(self.frame.len()) {
            chunk.copy_from_slice(&self.frame[..chunk.len()]);
        }
    }
}
