//! Pattern blending
//!
//! [`Mixer`] does a weighted sum of its children, [`Add`] a saturating sum,
//! [`Dim`] scales a single child.

use serde::{Deserialize, Serialize, Serializer};

use super::{Render, SPattern, Scratch};
use crate::color::{Frame, Rgb, add_into, dim};
use crate::math8::float_to_u8;
use crate::value::Value;

/// Weighted mix of several patterns
///
/// Weights don't need to sum to 1. With a different number of weights and
/// patterns nothing is rendered. A NaN or infinite weight counts as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mixer {
    #[serde(rename = "Patterns")]
    pub patterns: Vec<SPattern>,
    #[serde(rename = "Weights", serialize_with = "serialize_weights")]
    pub weights: Vec<f32>,
    #[serde(skip)]
    bufs: Scratch<Vec<Frame>>,
}

impl Mixer {
    pub fn new(patterns: Vec<SPattern>, weights: Vec<f32>) -> Self {
        Self {
            patterns,
            weights,
            bufs: Scratch::default(),
        }
    }
}

impl Render for Mixer {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if pixels.is_empty() || self.patterns.is_empty() || self.patterns.len() != self.weights.len()
        {
            return;
        }
        self.bufs.resize_with(self.patterns.len(), Frame::default);
        for (pattern, buf) in self.patterns.iter_mut().zip(self.bufs.iter_mut()) {
            buf.reset(pixels.len());
            pattern.render(buf, time_ms);
        }

        for (i, p) in pixels.iter_mut().enumerate() {
            let (mut r, mut g, mut b) = (0.0_f32, 0.0_f32, 0.0_f32);
            for (buf, &w) in self.bufs.iter().zip(&self.weights) {
                let w = finite_or_zero(w);
                let c = buf[i];
                r += f32::from(c.r) * w;
                g += f32::from(c.g) * w;
                b += f32::from(c.b) * w;
            }
            *p = Rgb {
                r: float_to_u8(r),
                g: float_to_u8(g),
                b: float_to_u8(b),
            };
        }
    }
}

fn finite_or_zero(w: f32) -> f32 {
    if w.is_finite() { w } else { 0.0 }
}

// JSON has no NaN or infinity.
fn serialize_weights<S: Serializer>(weights: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(weights.iter().map(|&w| finite_or_zero(w)))
}

/// Saturating sum of several patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Add {
    #[serde(rename = "Patterns")]
    pub patterns: Vec<SPattern>,
    #[serde(skip)]
    buf: Scratch,
}

impl Add {
    pub fn new(patterns: Vec<SPattern>) -> Self {
        Self {
            patterns,
            buf: Scratch::default(),
        }
    }
}

impl Render for Add {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if pixels.is_empty() {
            return;
        }
        for pattern in &mut self.patterns {
            self.buf.reset(pixels.len());
            pattern.render(&mut self.buf, time_ms);
            add_into(pixels, &self.buf);
        }
    }
}

/// Reduces the intensity of a child pattern
///
/// The intensity is clamped to 0..=255: 0 is black, 255 leaves the child
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dim {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(rename = "Intensity")]
    pub intensity: Value,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            child: SPattern::empty(),
            intensity: Value::Const(255),
        }
    }
}

impl Dim {
    pub fn new(child: impl Into<SPattern>, intensity: Value) -> Self {
        Self {
            child: child.into(),
            intensity,
        }
    }
}

impl Render for Dim {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if pixels.is_empty() || self.child.is_empty() {
            return;
        }
        self.child.render(pixels, time_ms);
        let intensity = self.intensity.eval(time_ms, pixels.len()).clamp(0, 255) as u8;
        for p in pixels.iter_mut() {
            *p = dim(*p, intensity);
        }
    }
}
