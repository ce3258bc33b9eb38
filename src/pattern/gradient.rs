use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::{Rgb, mix, mix_into};
use crate::curve::Curve;

/// Gradient between two patterns
///
/// Usually two colors but either side can be an animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gradient {
    #[serde(rename = "Left")]
    pub left: SPattern,
    #[serde(rename = "Right")]
    pub right: SPattern,
    #[serde(rename = "Curve")]
    pub curve: Curve,
    #[serde(skip)]
    buf: Scratch,
}

impl Gradient {
    pub fn new(left: impl Into<SPattern>, right: impl Into<SPattern>, curve: Curve) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            curve,
            buf: Scratch::default(),
        }
    }
}

impl Render for Gradient {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if pixels.is_empty() || self.left.is_empty() || self.right.is_empty() {
            return;
        }
        self.buf.reset(pixels.len());
        self.left.render(pixels, time_ms);
        self.right.render(&mut self.buf, time_ms);

        let max = pixels.len() - 1;
        if max == 0 {
            mix_into(pixels, &self.buf, self.curve.scale8(0.5));
            return;
        }
        for (i, (c, d)) in pixels.iter_mut().zip(self.buf.iter()).enumerate() {
            *c = mix(*c, *d, self.curve.scale8(i as f32 / max as f32));
        }
    }
}
