use serde::{Deserialize, Serialize};

use super::{MAX_SCRATCH_PIXELS, Render, SPattern, Scratch};
use crate::color::Rgb;
use crate::curve::Interpolation;
use crate::value::Value;

/// Adapts a larger or smaller pattern to the strip size
///
/// The child renders into an intermediate strip that is resampled into the
/// target. Its length is `length` when that evaluates above zero, otherwise
/// `len * ratio_milli / 1000` when `ratio_milli` is set, otherwise the
/// target length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scale {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(rename = "Interpolation")]
    pub interpolation: Interpolation,
    #[serde(rename = "Length")]
    pub length: Value,
    /// 500 gives the child half the pixels, 2000 twice as many
    #[serde(rename = "RatioMilli")]
    pub ratio_milli: i32,
    #[serde(skip)]
    buf: Scratch,
}

impl Scale {
    pub fn new(child: impl Into<SPattern>, interpolation: Interpolation) -> Self {
        Self {
            child: child.into(),
            interpolation,
            length: Value::default(),
            ratio_milli: 0,
            buf: Scratch::default(),
        }
    }

    #[must_use]
    pub const fn with_length(mut self, length: Value) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub const fn with_ratio_milli(mut self, ratio_milli: i32) -> Self {
        self.ratio_milli = ratio_milli;
        self
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn scaled_len(&self, time_ms: u32, len: usize) -> usize {
        let length = self.length.eval(time_ms, len);
        let scaled = if length > 0 {
            length as usize
        } else if self.ratio_milli > 0 {
            ((i64::from(self.ratio_milli) * len as i64 + 500) / 1000) as usize
        } else {
            len
        };
        scaled.min(MAX_SCRATCH_PIXELS)
    }
}

impl Render for Scale {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if pixels.is_empty() || self.child.is_empty() {
            return;
        }
        let scaled = self.scaled_len(time_ms, pixels.len());
        self.buf.reset(scaled);
        self.child.render(&mut self.buf, time_ms);
        self.interpolation.scale(&self.buf, pixels);
    }
}
