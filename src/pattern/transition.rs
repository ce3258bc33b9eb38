use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::{Rgb, mix_into};
use crate::curve::Curve;

/// One-shot crossfade from `before` to `after`
///
/// `after` sees time shifted by `offset_ms`. Once the crossfade completed
/// only `after` is rendered and the scratch buffer is released.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    /// Pattern that is disappearing
    #[serde(rename = "Before")]
    pub before: SPattern,
    /// Pattern to show
    #[serde(rename = "After")]
    pub after: SPattern,
    /// Time at which the crossfade starts
    #[serde(rename = "OffsetMS")]
    pub offset_ms: u32,
    /// Duration of the crossfade while both are rendered
    #[serde(rename = "TransitionMS", alias = "DurationMS")]
    pub transition_ms: u32,
    #[serde(rename = "Curve")]
    pub curve: Curve,
    #[serde(skip)]
    buf: Scratch,
}

impl Transition {
    pub fn new(
        before: impl Into<SPattern>,
        after: impl Into<SPattern>,
        offset_ms: u32,
        transition_ms: u32,
        curve: Curve,
    ) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
            offset_ms,
            transition_ms,
            curve,
            buf: Scratch::default(),
        }
    }

    /// Whether the crossfade is over at `time_ms`
    pub const fn is_done(&self, time_ms: u32) -> bool {
        time_ms >= self.offset_ms.saturating_add(self.transition_ms)
    }
}

impl Render for Transition {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if time_ms <= self.offset_ms {
            self.before.render(pixels, time_ms);
            return;
        }
        self.after.render(pixels, time_ms - self.offset_ms);
        if self.is_done(time_ms) {
            self.buf.release();
            return;
        }

        self.buf.reset(pixels.len());
        self.before.render(&mut self.buf, time_ms);
        let progress = (time_ms - self.offset_ms) as f32 / self.transition_ms as f32;
        mix_into(pixels, &self.buf, 255 - self.curve.scale8(progress));
    }
}
