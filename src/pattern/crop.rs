//! Sub-ranges of the strip
//!
//! [`Crop`] narrows the target: the child only draws into a window of the
//! strip. [`Trim`] narrows the source: the child draws a longer strip whose
//! ends are cut off.

use serde::{Deserialize, Serialize};

use super::{MAX_SCRATCH_PIXELS, Render, SPattern, Scratch};
use crate::color::Rgb;
use crate::value::{PERCENT_FULL, Value};

/// Renders the child into `[start, start + length)` of the target
///
/// Pixels outside the window are left untouched. The window is clipped to
/// the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crop {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(rename = "Start")]
    pub start: Value,
    #[serde(rename = "Length")]
    pub length: Value,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            child: SPattern::empty(),
            start: Value::Const(0),
            length: Value::Percent(PERCENT_FULL),
        }
    }
}

impl Crop {
    pub fn new(child: impl Into<SPattern>, start: Value, length: Value) -> Self {
        Self {
            child: child.into(),
            start,
            length,
        }
    }
}

impl Render for Crop {
    #[allow(clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len();
        if len == 0 || self.child.is_empty() {
            return;
        }
        let start = (self.start.eval(time_ms, len).max(0) as usize).min(len);
        let length = (self.length.eval(time_ms, len).max(0) as usize).min(len - start);
        if length == 0 {
            return;
        }
        self.child.render(&mut pixels[start..start + length], time_ms);
    }
}

/// Skips the beginning and the end of the child
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trim {
    #[serde(rename = "Child")]
    pub child: SPattern,
    /// Leading pixels to skip
    #[serde(rename = "Before")]
    pub before: Value,
    /// Trailing pixels to skip
    #[serde(rename = "After")]
    pub after: Value,
    #[serde(skip)]
    buf: Scratch,
}

impl Trim {
    pub fn new(child: impl Into<SPattern>, before: Value, after: Value) -> Self {
        Self {
            child: child.into(),
            before,
            after,
            buf: Scratch::default(),
        }
    }
}

impl Render for Trim {
    #[allow(clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len();
        if len == 0 || self.child.is_empty() {
            return;
        }
        let before = (self.before.eval(time_ms, len).max(0) as usize).min(MAX_SCRATCH_PIXELS);
        let after = (self.after.eval(time_ms, len).max(0) as usize).min(MAX_SCRATCH_PIXELS);
        self.buf.reset(len + before + after);
        self.child.render(&mut self.buf, time_ms);
        pixels.copy_from_slice(&self.buf[before..before + len]);
    }
}
