//! Sequences of patterns
//!
//! [`Cycle`] steps through its frames, [`Loop`] shows each pattern for a
//! while then crossfades into the next one. Children are rendered with the
//! unmodified time so they keep animating while hidden.

use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::{Frame, Rgb, mix_into};
use crate::curve::Curve;
use crate::error::DecodeError;

/// Discrete cycle through frames, usable as an animated frame list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cycle {
    #[serde(rename = "Frames")]
    pub frames: Vec<SPattern>,
    #[serde(rename = "FrameDurationMS")]
    pub frame_duration_ms: u32,
}

impl Cycle {
    pub const fn new(frames: Vec<SPattern>, frame_duration_ms: u32) -> Self {
        Self {
            frames,
            frame_duration_ms,
        }
    }

    /// Build an animation out of a PNG image, one frame per row
    ///
    /// With `vertical` set every column is a frame instead. Alpha is ignored.
    pub fn from_png(
        content: &[u8],
        frame_duration_ms: u32,
        vertical: bool,
    ) -> Result<Self, DecodeError> {
        let img =
            image::load_from_memory_with_format(content, image::ImageFormat::Png)?.to_rgb8();
        let (width, height) = img.dimensions();
        let pixel = |x: u32, y: u32| {
            let [r, g, b] = img.get_pixel(x, y).0;
            Rgb::new(r, g, b)
        };
        let frames = if vertical {
            (0..width)
                .map(|x| Frame::from_colors((0..height).map(|y| pixel(x, y)).collect()))
                .map(SPattern::new)
                .collect()
        } else {
            (0..height)
                .map(|y| Frame::from_colors((0..width).map(|x| pixel(x, y)).collect()))
                .map(SPattern::new)
                .collect()
        };
        Ok(Self::new(frames, frame_duration_ms))
    }
}

impl Render for Cycle {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let n = self.frames.len();
        if n == 0 {
            return;
        }
        let index = match time_ms.checked_div(self.frame_duration_ms) {
            Some(tick) => tick as usize % n,
            None => 0,
        };
        self.frames[index].render(pixels, time_ms);
    }
}

/// Continuous loop through patterns with crossfades
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loop {
    #[serde(rename = "Patterns")]
    pub patterns: Vec<SPattern>,
    /// Duration for each pattern to be shown alone
    #[serde(rename = "ShowMS")]
    pub show_ms: u32,
    /// Duration of the crossfade between two patterns
    #[serde(rename = "TransitionMS")]
    pub transition_ms: u32,
    #[serde(rename = "Curve")]
    pub curve: Curve,
    #[serde(skip)]
    buf: Scratch,
}

impl Loop {
    pub fn new(patterns: Vec<SPattern>, show_ms: u32, transition_ms: u32, curve: Curve) -> Self {
        Self {
            patterns,
            show_ms,
            transition_ms,
            curve,
            buf: Scratch::default(),
        }
    }
}

impl Render for Loop {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let n = self.patterns.len() as u64;
        if n == 0 {
            return;
        }
        let cycle_duration = u64::from(self.show_ms) + u64::from(self.transition_ms);
        if cycle_duration == 0 {
            self.patterns[0].render(pixels, time_ms);
            return;
        }
        let t = u64::from(time_ms);
        let cycle = t / cycle_duration;
        let offset = t % cycle_duration;
        let current = (cycle % n) as usize;
        if offset < u64::from(self.show_ms) {
            self.patterns[current].render(pixels, time_ms);
            return;
        }

        let next = ((cycle + 1) % n) as usize;
        self.buf.reset(pixels.len());
        self.patterns[current].render(&mut self.buf, time_ms);
        self.patterns[next].render(pixels, time_ms);
        let progress = (offset - u64::from(self.show_ms)) as f32 / self.transition_ms as f32;
        mix_into(pixels, &self.buf, 255 - self.curve.scale8(progress));
    }
}
