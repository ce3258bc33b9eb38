use core::fmt;
use core::ops::{Deref, DerefMut};
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BLACK, Rgb, add, dim, mix, parse_rgb_hex, push_rgb_hex};
use crate::error::DecodeError;

/// A strip of colors
///
/// Encodes as `L` followed by `RRGGBB` per pixel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame(Vec<Rgb>);

impl Frame {
    /// Create a black frame of `len` pixels
    pub fn new(len: usize) -> Self {
        Self(vec![BLACK; len])
    }

    pub const fn from_colors(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }

    pub fn into_inner(self) -> Vec<Rgb> {
        self.0
    }

    /// Reset the frame to black with `len` pixels
    ///
    /// Keeps the allocation when the length does not change.
    pub fn reset(&mut self, len: usize) {
        if self.0.len() == len {
            self.0.fill(BLACK);
        } else {
            self.0.clear();
            self.0.resize(len, BLACK);
        }
    }

    /// Drop the pixels and the allocation
    pub fn release(&mut self) {
        self.0 = Vec::new();
    }

    pub fn dim(&mut self, intensity: u8) {
        for c in &mut self.0 {
            *c = dim(*c, intensity);
        }
    }

    pub fn add(&mut self, other: &[Rgb]) {
        add_into(&mut self.0, other);
    }

    pub fn mix(&mut self, other: &[Rgb], gradient: u8) {
        mix_into(&mut self.0, other, gradient);
    }

    /// Write packed RGB triplets in pixel order
    ///
    /// Stops at whichever of the frame or `out` is shorter.
    pub fn to_rgb_bytes(&self, out: &mut [u8]) {
        for (c, chunk) in self.0.iter().zip(out.chunks_exact_mut(3)) {
            chunk[0] = c.r;
            chunk[1] = c.g;
            chunk[2] = c.b;
        }
    }
}

/// Saturating per-pixel addition over the common length
pub(crate) fn add_into(pixels: &mut [Rgb], other: &[Rgb]) {
    for (c, d) in pixels.iter_mut().zip(other) {
        *c = add(*c, *d);
    }
}

/// Per-pixel blend over the common length
pub(crate) fn mix_into(pixels: &mut [Rgb], other: &[Rgb], gradient: u8) {
    for (c, d) in pixels.iter_mut().zip(other) {
        *c = mix(*c, *d, gradient);
    }
}

impl Deref for Frame {
    type Target = [Rgb];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Frame {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Rgb>> for Frame {
    fn from(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }
}

impl From<&[Rgb]> for Frame {
    fn from(colors: &[Rgb]) -> Self {
        Self(colors.to_vec())
    }
}

impl FromIterator<Rgb> for Frame {
    fn from_iter<I: IntoIterator<Item = Rgb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(1 + 6 * self.0.len());
        out.push('L');
        for c in &self.0 {
            push_rgb_hex(&mut out, *c);
        }
        f.write_str(&out)
    }
}

impl FromStr for Frame {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidFrame(s.to_owned());
        let body = s.strip_prefix('L').ok_or_else(invalid)?;
        if !body.len().is_multiple_of(6) || !body.is_ascii() {
            return Err(invalid());
        }
        body.as_bytes()
            .chunks_exact(6)
            .map(|chunk| {
                core::str::from_utf8(chunk)
                    .ok()
                    .and_then(parse_rgb_hex)
                    .ok_or_else(invalid)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Frame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
