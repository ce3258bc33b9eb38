//! Moving patterns
//!
//! Both nodes take their speed as a [`Value`] in moves per second: one move
//! shifts the child by one pixel. Negative rates go left.

use serde::{Deserialize, Serialize};

use super::{Render, SPattern, Scratch};
use crate::color::Rgb;
use crate::value::Value;

/// Rotates a child pattern around the strip, either way
///
/// Similar to [`PingPong`] except that it doesn't bounce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rotate {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(rename = "MovesPerSec")]
    pub moves_per_sec: Value,
    #[serde(skip)]
    buf: Scratch,
}

impl Rotate {
    pub fn new(child: impl Into<SPattern>, moves_per_sec: Value) -> Self {
        Self {
            child: child.into(),
            moves_per_sec,
            buf: Scratch::default(),
        }
    }
}

impl Render for Rotate {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len();
        if len == 0 || self.child.is_empty() {
            return;
        }
        self.buf.reset(len);
        self.child.render(&mut self.buf, time_ms);
        let offset = self.moves_per_sec.moves(time_ms, len).rem_euclid(len as i64) as usize;
        pixels[offset..].copy_from_slice(&self.buf[..len - offset]);
        pixels[..offset].copy_from_slice(&self.buf[len - offset..]);
    }
}

/// A ball with a trail bouncing from one end to the other
///
/// The first pixel of the child is the head, the trail follows behind it.
/// The end pixels are lit on one move per bounce and every other position on
/// two, so a full cycle takes `2 * (len - 1)` moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingPong {
    #[serde(rename = "Child")]
    pub child: SPattern,
    #[serde(rename = "MovesPerSec")]
    pub moves_per_sec: Value,
    #[serde(skip)]
    buf: Scratch,
}

impl PingPong {
    pub fn new(child: impl Into<SPattern>, moves_per_sec: Value) -> Self {
        Self {
            child: child.into(),
            moves_per_sec,
            buf: Scratch::default(),
        }
    }
}

impl Render for PingPong {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        let len = pixels.len();
        if len == 0 || self.child.is_empty() {
            return;
        }
        self.buf.reset(2 * len - 1);
        self.child.render(&mut self.buf, time_ms);

        // For a child "01234567":
        //   move 0  -> "01234567"
        //   move 2  -> "21056789"
        //   move 7  -> "76543210"
        //   move 9  -> "98765012"
        //   move 13 -> "d0123456"
        let cycle = 2 * (len - 1);
        let pos = if cycle == 0 {
            0
        } else {
            self.moves_per_sec.moves(time_ms, cycle).rem_euclid(cycle as i64) as usize
        };

        if pos >= len - 1 {
            // Head runs left, pos2 counts from the right end.
            let pos2 = pos + 1 - len;
            let limit = len - pos2 - 1;
            for (i, p) in pixels.iter_mut().enumerate() {
                *p = if i < limit {
                    self.buf[len - i + pos2 - 1]
                } else {
                    self.buf[i - limit]
                };
            }
        } else {
            for (i, p) in pixels.iter_mut().enumerate() {
                *p = if i <= pos {
                    self.buf[pos - i]
                } else {
                    self.buf[pos + i]
                };
            }
        }
    }
}
