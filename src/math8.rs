//! Integer helpers for 8-bit channel math.

/// Scale an 8-bit value by an intensity (0 = black, 255 = unchanged)
///
/// Rounds to nearest using half of the intensity as bias.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn dim8(value: u8, intensity: u8) -> u8 {
    let i = intensity as u16;
    ((value as u16 * i + (i >> 1)) >> 8) as u8
}

/// Add two 8-bit values with saturation
#[inline]
pub const fn add8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Blend two 8-bit values (gradient 0 = all a, 255 = all b)
///
/// `(a+1)*(255-g) + (b+1)*g` peaks at `256*255`, so the shifted result
/// always fits in a channel.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn mix8(a: u8, b: u8, gradient: u8) -> u8 {
    let g = gradient as u16;
    let g1 = 255 - g;
    (((a as u16 + 1) * g1 + (b as u16 + 1) * g) >> 8) as u8
}

/// Convert a float channel value to 8 bits, rounding half away from zero
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn float_to_u8(x: f32) -> u8 {
    if x >= 255.0 {
        return 255;
    }
    if x <= 0.0 || x.is_nan() {
        return 0;
    }
    libm::roundf(x) as u8
}

/// Simple deterministic hash for seeded pseudo-random values
#[inline]
pub const fn hash(x: u64) -> u32 {
    // SplitMix64-style mixing, then fold down to u32.
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    #[allow(clippy::cast_possible_truncation)]
    {
        (z ^ (z >> 31)) as u32
    }
}
