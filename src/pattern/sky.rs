//! Night sky effects
//!
//! Both are deterministic: the same time and strip length always give the
//! same frame.

use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::{BLACK, Rgb, dim};
use crate::math8::hash;
use crate::value::Value;

/// Slowly pulsing green glow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aurore {}

impl Aurore {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Render for Aurore {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let y = time_ms as f32 * 0.01;
        let pulse = 0.5 + 0.5 * libm::sinf(y * 0.1);
        for (i, p) in pixels.iter_mut().enumerate() {
            let x = i as f32;
            let glow = 32.0 + 31.0 * libm::sinf(libm::hypotf(200.0 - y, 320.0 - x) / 16.0);
            *p = Rgb::new(0, (glow * pulse) as u8, 0);
        }
    }
}

/// Twinkling stars at fixed positions
///
/// About a quarter of the pixels hold a star. Each star has a base intensity
/// and flickers above it every [`Value::Rand`] tick. Stars are white unless
/// `color` is set, in which case its rendered pixels are dimmed by the star
/// intensity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightStars {
    #[serde(rename = "C")]
    pub color: SPattern,
    #[serde(skip)]
    stars: Scratch<Vec<u8>>,
    #[serde(skip)]
    tint: Scratch,
}

impl NightStars {
    pub fn new(color: impl Into<SPattern>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn place_stars(&mut self, len: usize) {
        self.stars.clear();
        self.stars.extend((0..len as u64).map(|i| {
            let j = hash(i);
            if j & 0x30000 != 0x30000 {
                return 0;
            }
            // Gamma 2, capped at half intensity.
            let d = (j & 0xff) + 1;
            let e = ((j >> 8) & 0xff) + 1;
            (((d * e - 1) >> 8) / 2) as u8
        }));
    }
}

impl Render for NightStars {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len();
        if len == 0 {
            return;
        }
        if self.stars.len() != len {
            self.place_stars(len);
        }
        let tinted = !self.color.is_empty();
        if tinted {
            self.tint.reset(len);
            self.color.render(&mut self.tint, time_ms);
        }

        let seed = u64::from(Value::Rand { tick_ms: 0 }.eval(time_ms, len) as u32) << 32;
        for (i, p) in pixels.iter_mut().enumerate() {
            let base = self.stars[i];
            if base == 0 {
                *p = BLACK;
                continue;
            }
            let j = hash(seed | i as u64);
            let flicker = ((j & 0xf) + 1) * (((j >> 4) & 0xf) + 1);
            let f = (((flicker - 1) >> 4) + u32::from(base)).min(255) as u8;
            *p = if tinted {
                dim(self.tint[i], f)
            } else {
                Rgb::new(f, f, f)
            };
        }
    }
}
