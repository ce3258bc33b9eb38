//! Rainbow over the visible spectrum
//!
//! The strip spans wavelengths from 380nm to 781nm on a logarithmic scale so
//! the blue end gets more pixels than the red end.

use serde::{Deserialize, Serialize};

use super::{Render, Scratch};
use crate::color::{BLACK, Rgb};

const WAVELENGTH_START: i32 = 380;
const WAVELENGTH_END: i32 = 781;

/// Static rainbow, computed once per strip length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rainbow {
    #[serde(skip)]
    buf: Scratch,
}

impl Rainbow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Render for Rainbow {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn render(&mut self, pixels: &mut [Rgb], _time_ms: u32) {
        let len = pixels.len();
        if self.buf.len() != len {
            self.buf.reset(len);
            let delta = (WAVELENGTH_END - WAVELENGTH_START) as f32;
            let scale = libm::logf(2.0);
            let step = 1.0 / len as f32;
            for (i, c) in self.buf.iter_mut().enumerate() {
                let j = libm::log1pf((len - i - 1) as f32 * step) / scale;
                *c = wavelength_to_rgb((WAVELENGTH_START as f32 + delta * (1.0 - j)) as i32);
            }
        }
        pixels.copy_from_slice(&self.buf);
    }
}

/// Approximate the color of a wavelength in nanometers
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wavelength_to_rgb(w: i32) -> Rgb {
    let channel = |v: i32| v.clamp(0, 255) as u8;
    let mut c = BLACK;
    match w {
        ..380 => {}
        380..420 => {
            // Red peaks at a third at 420.
            c.r = channel(196 - (170 * (440 - w)) / (440 - 380));
            c.b = channel(26 + (229 * (w - 380)) / (420 - 380));
        }
        420..440 => {
            c.r = channel((0x89 * (440 - w)) / (440 - 420));
            c.b = 255;
        }
        440..490 => {
            c.g = channel((255 * (w - 440)) / (490 - 440));
            c.b = 255;
        }
        490..510 => {
            c.g = 255;
            c.b = channel((255 * (510 - w)) / (510 - 490));
        }
        510..580 => {
            c.r = channel((255 * (w - 510)) / (580 - 510));
            c.g = 255;
        }
        580..645 => {
            c.r = 255;
            c.g = channel((255 * (645 - w)) / (645 - 580));
        }
        645..700 => c.r = 255,
        700..781 => c.r = channel(26 + (229 * (780 - w)) / (780 - 700)),
        _ => {}
    }
    c
}
