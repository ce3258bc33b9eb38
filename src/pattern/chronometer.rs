use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::Rgb;

/// Number of colors read from the child: background, second, minute, hour.
const PALETTE_LEN: usize = 4;

/// Three markers moving right, for seconds, minutes and hours since start
///
/// The child is rendered into four pixels used as
/// `[background, second, minute, hour]`. When markers overlap the seconds
/// win over minutes, which win over hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chronometer {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(skip)]
    buf: Scratch,
}

impl Chronometer {
    pub fn new(child: impl Into<SPattern>) -> Self {
        Self {
            child: child.into(),
            buf: Scratch::default(),
        }
    }
}

impl Render for Chronometer {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len() as u64;
        if len == 0 || self.child.is_empty() {
            return;
        }
        self.buf.reset(PALETTE_LEN);
        self.child.render(&mut self.buf, time_ms);

        let seconds = u64::from(time_ms / 1000);
        let minutes = seconds / 60;
        let hours = minutes / 60;

        let sec_pos = (len * (seconds % 60) + 30) / 60;
        let min_pos = (len * (minutes % 60) + 30) / 60;
        let hour_pos = hours % len;

        for (i, p) in pixels.iter_mut().enumerate() {
            let i = i as u64;
            *p = if i == sec_pos {
                self.buf[1]
            } else if i == min_pos {
                self.buf[2]
            } else if i == hour_pos {
                self.buf[3]
            } else {
                self.buf[0]
            };
        }
    }
}
