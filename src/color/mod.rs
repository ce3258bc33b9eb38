mod frame;

use core::fmt::Write;

pub use frame::Frame;
pub(crate) use frame::{add_into, mix_into};
use smart_leds::RGB8;

use crate::error::DecodeError;
use crate::math8::{add8, dim8, mix8};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Reduce the intensity of a color
///
/// 0 means completely dark, 255 leaves the color unaffected.
#[inline]
pub const fn dim(c: Rgb, intensity: u8) -> Rgb {
    Rgb {
        r: dim8(c.r, intensity),
        g: dim8(c.g, intensity),
        b: dim8(c.b, intensity),
    }
}

/// Add two colors together with saturation
#[inline]
pub const fn add(c: Rgb, d: Rgb) -> Rgb {
    Rgb {
        r: add8(c.r, d.r),
        g: add8(c.g, d.g),
        b: add8(c.b, d.b),
    }
}

/// Blend the second color into the first
///
/// # Arguments
/// * `c` - First color
/// * `d` - Second color
/// * `gradient` - Blend factor (0 = all c, 255 = all d)
#[inline]
pub const fn mix(c: Rgb, d: Rgb, gradient: u8) -> Rgb {
    Rgb {
        r: mix8(c.r, d.r, gradient),
        g: mix8(c.g, d.g, gradient),
        b: mix8(c.b, d.b, gradient),
    }
}

/// Encode a color as `#rrggbb`
pub fn to_hex(c: Rgb) -> String {
    let mut out = String::with_capacity(7);
    out.push('#');
    push_rgb_hex(&mut out, c);
    out
}

/// Decode a `#RRGGBB` string
pub fn parse_hex(s: &str) -> Result<Rgb, DecodeError> {
    match s.strip_prefix('#') {
        Some(rgb) => parse_rgb_hex(rgb).ok_or_else(|| DecodeError::InvalidColor(s.to_owned())),
        None => Err(DecodeError::InvalidColor(s.to_owned())),
    }
}

pub(crate) fn push_rgb_hex(out: &mut String, c: Rgb) {
    // Writing into a String never fails.
    let _ = write!(out, "{:02x}{:02x}{:02x}", c.r, c.g, c.b);
}

/// Decode exactly six hex digits into a color
pub(crate) fn parse_rgb_hex(s: &str) -> Option<Rgb> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}
