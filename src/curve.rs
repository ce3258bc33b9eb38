//! Easing curves and strip interpolation.
//!
//! Curves are modeled against CSS transitions
//! (<https://www.w3.org/TR/web-animations/#scaling-using-a-cubic-bezier-curve>).
//! The cubic-bezier ones are evaluated through lookup tables that are built
//! once by [`init`] and only read afterwards.

use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::{Rgb, mix};

const CURVE_NAME_EASE: &str = "ease";
const CURVE_NAME_EASE_IN: &str = "ease-in";
const CURVE_NAME_EASE_IN_OUT: &str = "ease-in-out";
const CURVE_NAME_EASE_OUT: &str = "ease-out";
const CURVE_NAME_DIRECT: &str = "direct";
const CURVE_NAME_STEP_START: &str = "steps(1,start)";
const CURVE_NAME_STEP_MIDDLE: &str = "steps(1,middle)";
const CURVE_NAME_STEP_END: &str = "steps(1,end)";

const INTERPOLATION_NAME_NEAREST_SKIP: &str = "nearestskip";
const INTERPOLATION_NAME_NEAREST: &str = "nearest";
const INTERPOLATION_NAME_LINEAR: &str = "linear";

/// Number of segments in each lookup table; sample `i` is at `i / LUT_STEPS`.
const LUT_STEPS: usize = 256;

const EPSILON: f32 = 1e-7;

/// Interpolation weight used by [`Interpolation::Linear`].
const LINEAR_GRADIENT: u8 = 127;

/// Visually pleasing curves mapping [0, 1] to [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Curve {
    Ease,
    EaseIn,
    EaseInOut,
    /// Recommended and default value
    #[default]
    EaseOut,
    /// Linear mapping
    Direct,
    StepStart,
    StepMiddle,
    StepEnd,
}

struct CurveTables {
    ease: [f32; LUT_STEPS + 1],
    ease_in: [f32; LUT_STEPS + 1],
    ease_in_out: [f32; LUT_STEPS + 1],
    ease_out: [f32; LUT_STEPS + 1],
}

static TABLES: OnceLock<CurveTables> = OnceLock::new();

/// Build the curve lookup tables
///
/// Call before starting threads that evaluate curves; later calls are free.
pub fn init() {
    tables();
}

fn tables() -> &'static CurveTables {
    TABLES.get_or_init(|| CurveTables {
        ease: make_lut(0.25, 0.1, 0.25, 1.0),
        ease_in: make_lut(0.42, 0.0, 1.0, 1.0),
        ease_in_out: make_lut(0.42, 0.0, 0.58, 1.0),
        ease_out: make_lut(0.0, 0.0, 0.58, 1.0),
    })
}

#[allow(clippy::cast_precision_loss)]
fn make_lut(x0: f32, y0: f32, x1: f32, y1: f32) -> [f32; LUT_STEPS + 1] {
    let mut lut = [0.0; LUT_STEPS + 1];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = cubic_bezier(x0, y0, x1, y1, i as f32 / LUT_STEPS as f32);
    }
    lut
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn eval_lut(lut: &[f32; LUT_STEPS + 1], x: f32) -> f32 {
    let pos = x * LUT_STEPS as f32;
    let i = libm::floorf(pos) as usize;
    if i >= LUT_STEPS {
        return lut[LUT_STEPS];
    }
    let frac = pos - i as f32;
    if frac == 0.0 {
        return lut[i];
    }
    lut[i] + (lut[i + 1] - lut[i]) * frac
}

/// Solve the cubic bezier (0,0), (x0,y0), (x1,y1), (1,1) for `x`
///
/// Newton's method, five iterations.
fn cubic_bezier(x0: f32, y0: f32, x1: f32, y1: f32, x: f32) -> f32 {
    let mut t = x;
    for _ in 0..5 {
        let t2 = t * t;
        let t3 = t2 * t;
        let d = 1.0 - t;
        let d2 = d * d;

        let nx = 3.0 * d2 * t * x0 + 3.0 * d * t2 * x1 + t3;
        let dxdt = 3.0 * d2 * x0 + 6.0 * d * t * (x1 - x0) + 3.0 * t2 * (1.0 - x1);
        if dxdt == 0.0 {
            break;
        }

        t -= (nx - x) / dxdt;
        if t <= 0.0 || t >= 1.0 {
            break;
        }
    }
    let t = t.clamp(0.0, 1.0);

    let t2 = t * t;
    let t3 = t2 * t;
    let d = 1.0 - t;
    let d2 = d * d;
    3.0 * d2 * t * y0 + 3.0 * d * t2 * y1 + t3
}

impl Curve {
    pub const ALL: [Self; 8] = [
        Self::Ease,
        Self::EaseIn,
        Self::EaseInOut,
        Self::EaseOut,
        Self::Direct,
        Self::StepStart,
        Self::StepMiddle,
        Self::StepEnd,
    ];

    /// Scale input [0, 1] to output [0, 1]
    pub fn scale(self, intensity: f32) -> f32 {
        let x = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        match self {
            Self::Ease => eval_lut(&tables().ease, x),
            Self::EaseIn => eval_lut(&tables().ease_in, x),
            Self::EaseInOut => eval_lut(&tables().ease_in_out, x),
            Self::EaseOut => eval_lut(&tables().ease_out, x),
            Self::Direct => x,
            Self::StepStart => {
                if x < EPSILON {
                    0.0
                } else {
                    1.0
                }
            }
            Self::StepMiddle => {
                if x < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
            Self::StepEnd => {
                if x > 1.0 - EPSILON {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Scale input [0, 1] to a mix gradient [0, 255]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scale8(self, intensity: f32) -> u8 {
        (255.0 * self.scale(intensity)) as u8
    }

    /// Scale input [0, 65535] to output [0, 65535]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scale16(self, intensity: u16) -> u16 {
        let x = f32::from(intensity) / f32::from(u16::MAX);
        libm::roundf(self.scale(x) * f32::from(u16::MAX)) as u16
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ease => CURVE_NAME_EASE,
            Self::EaseIn => CURVE_NAME_EASE_IN,
            Self::EaseInOut => CURVE_NAME_EASE_IN_OUT,
            Self::EaseOut => CURVE_NAME_EASE_OUT,
            Self::Direct => CURVE_NAME_DIRECT,
            Self::StepStart => CURVE_NAME_STEP_START,
            Self::StepMiddle => CURVE_NAME_STEP_MIDDLE,
            Self::StepEnd => CURVE_NAME_STEP_END,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            CURVE_NAME_EASE => Some(Self::Ease),
            CURVE_NAME_EASE_IN => Some(Self::EaseIn),
            CURVE_NAME_EASE_IN_OUT => Some(Self::EaseInOut),
            CURVE_NAME_EASE_OUT => Some(Self::EaseOut),
            CURVE_NAME_DIRECT => Some(Self::Direct),
            CURVE_NAME_STEP_START => Some(Self::StepStart),
            CURVE_NAME_STEP_MIDDLE => Some(Self::StepMiddle),
            CURVE_NAME_STEP_END => Some(Self::StepEnd),
            _ => None,
        }
    }

    /// Like [`Curve::parse_from_str`] but falls back to the default curve
    pub fn from_name(s: &str) -> Self {
        Self::parse_from_str(s).unwrap_or_default()
    }
}

/// The way a pixel strip is resampled to another length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Nearest pixel, but when upscaling the missing pixels are left alone
    NearestSkip,
    /// Nearest pixel, gives a blocky view
    #[default]
    Nearest,
    /// Blend the nearest pixel with its right neighbor
    Linear,
}

impl Interpolation {
    /// Resample `input` into `output`
    pub fn scale(self, input: &[Rgb], output: &mut [Rgb]) {
        let li = input.len();
        let lo = output.len();
        if li == 0 || lo == 0 {
            return;
        }
        match self {
            Self::NearestSkip if li < lo => {
                for (i, p) in input.iter().enumerate() {
                    output[(i * lo + lo / 2) / li] = *p;
                }
            }
            Self::NearestSkip | Self::Nearest => {
                for (i, out) in output.iter_mut().enumerate() {
                    *out = input[(i * li + li / 2) / lo];
                }
            }
            Self::Linear => {
                for (i, out) in output.iter_mut().enumerate() {
                    let x = (i * li + li / 2) / lo;
                    *out = if x + 1 < li {
                        mix(input[x], input[x + 1], LINEAR_GRADIENT)
                    } else {
                        input[x]
                    };
                }
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NearestSkip => INTERPOLATION_NAME_NEAREST_SKIP,
            Self::Nearest => INTERPOLATION_NAME_NEAREST,
            Self::Linear => INTERPOLATION_NAME_LINEAR,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            INTERPOLATION_NAME_NEAREST_SKIP => Some(Self::NearestSkip),
            INTERPOLATION_NAME_NEAREST => Some(Self::Nearest),
            INTERPOLATION_NAME_LINEAR => Some(Self::Linear),
            _ => None,
        }
    }

    pub fn from_name(s: &str) -> Self {
        Self::parse_from_str(s).unwrap_or_default()
    }
}

macro_rules! impl_named_serde {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }

            // Unknown names fall back to the default instead of failing.
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let name = Option::<String>::deserialize(deserializer)?;
                    Ok(name.as_deref().map(Self::from_name).unwrap_or_default())
                }
            }
        )*
    };
}

impl_named_serde!(Curve, Interpolation);
