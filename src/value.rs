//! Values that may be constant or evolve with time and strip length.

use core::fmt::Write;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;
use crate::math8::hash;

const VALUE_NAME_CONST: &str = "Const";
const VALUE_NAME_PERCENT: &str = "Percent";
const VALUE_NAME_OP_ADD: &str = "OpAdd";
const VALUE_NAME_OP_MOD: &str = "OpMod";
const VALUE_NAME_OP_STEP: &str = "OpStep";
const VALUE_NAME_RAND: &str = "Rand";

const RAND_KEY: &str = "rand";

/// Tick used by [`Value::Rand`] when none is set, about one change per frame at 60fps.
pub const DEFAULT_RAND_TICK_MS: u32 = 16;

/// Fastest supported movement, in moves per second either way.
pub const MAX_MOVES_PER_SEC: i32 = 1000;

/// One hundred percent in 16.16 fixed point.
pub const PERCENT_FULL: i32 = 1 << 16;

/// Fixed point units per percent.
const PERCENT_UNIT: f64 = 655.36;

/// A value evaluated as `f(time_ms, len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Const(i32),
    /// Fraction of the strip length, 16.16 fixed point
    Percent(i32),
    /// Time plus a constant
    OpAdd { add_ms: i32 },
    /// Time cycling downward every tick
    OpMod { tick_ms: i32 },
    /// Time rounded down to a whole tick
    OpStep { tick_ms: i32 },
    /// Pseudo-random value changing every tick, 0 means the default tick
    Rand { tick_ms: i32 },
}

impl Default for Value {
    fn default() -> Self {
        Self::Const(0)
    }
}

impl Value {
    /// Percent from a floating point percentage, e.g. `50.0` for half the strip
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(p: f64) -> Self {
        Self::Percent(libm::round(p * PERCENT_UNIT) as i32)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn eval(&self, time_ms: u32, len: usize) -> i32 {
        match *self {
            Self::Const(n) => n,
            Self::Percent(p) => ((len as i64 * i64::from(p)) / i64::from(PERCENT_FULL)) as i32,
            Self::OpAdd { add_ms } => (time_ms as i32).wrapping_add(add_ms),
            Self::OpMod { tick_ms } => {
                if tick_ms <= 0 {
                    return 0;
                }
                (time_ms % tick_ms as u32) as i32
            }
            Self::OpStep { tick_ms } => {
                if tick_ms <= 0 {
                    return 0;
                }
                let tick = tick_ms as u32;
                (time_ms / tick * tick) as i32
            }
            Self::Rand { tick_ms } => {
                let tick = if tick_ms <= 0 {
                    DEFAULT_RAND_TICK_MS
                } else {
                    tick_ms as u32
                };
                (hash(u64::from(time_ms / tick)) >> 1) as i32
            }
        }
    }

    /// Number of moves done at `time_ms` when the value is a rate per second
    ///
    /// The rate is clamped to [`MAX_MOVES_PER_SEC`]. Negative rates give
    /// negative moves, rounded toward negative infinity.
    pub fn moves(&self, time_ms: u32, len: usize) -> i64 {
        let rate = self.eval(time_ms, len).clamp(-MAX_MOVES_PER_SEC, MAX_MOVES_PER_SEC);
        (i64::from(time_ms) * i64::from(rate)).div_euclid(1000)
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Const(_) => VALUE_NAME_CONST,
            Self::Percent(_) => VALUE_NAME_PERCENT,
            Self::OpAdd { .. } => VALUE_NAME_OP_ADD,
            Self::OpMod { .. } => VALUE_NAME_OP_MOD,
            Self::OpStep { .. } => VALUE_NAME_OP_STEP,
            Self::Rand { .. } => VALUE_NAME_RAND,
        }
    }

    /// Decode a value from its JSON form
    pub fn from_json(raw: serde_json::Value) -> Result<Self, DecodeError> {
        match raw {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Self::Const)
                .ok_or_else(|| DecodeError::InvalidValue(n.to_string())),
            serde_json::Value::String(s) => Self::parse_str(&s),
            serde_json::Value::Object(map) => {
                if map.is_empty() {
                    return Ok(Self::default());
                }
                let name = match map.get("_type") {
                    None => return Err(DecodeError::MissingType),
                    Some(serde_json::Value::String(name)) => name.clone(),
                    Some(_) => return Err(DecodeError::InvalidType),
                };
                crate::serializer::registry().decode_value(&name, serde_json::Value::Object(map))
            }
            serde_json::Value::Bool(_) => Err(DecodeError::UnexpectedJson("a boolean")),
            serde_json::Value::Array(_) => Err(DecodeError::UnexpectedJson("an array")),
        }
    }

    /// Decode the compact string forms
    pub fn parse_str(s: &str) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidValue(s.to_owned());
        if s == RAND_KEY {
            return Ok(Self::Rand { tick_ms: 0 });
        }
        if let Some(n) = s.strip_suffix('%') {
            let p = n.parse::<f64>().map_err(|_| invalid())?;
            if !p.is_finite() || (p * PERCENT_UNIT).abs() > f64::from(i32::MAX) {
                return Err(invalid());
            }
            return Ok(Self::percent(p));
        }
        if let Some(n) = s.strip_prefix('+') {
            let add_ms = n.parse::<i32>().map_err(|_| invalid())?;
            if add_ms < 0 {
                return Err(invalid());
            }
            return Ok(Self::OpAdd { add_ms });
        }
        if s.starts_with('-') {
            let add_ms = s.parse::<i32>().map_err(|_| invalid())?;
            return Ok(Self::OpAdd { add_ms });
        }
        if let Some(n) = s.strip_prefix('%') {
            let tick_ms = n.parse::<i32>().map_err(|_| invalid())?;
            if tick_ms < 0 {
                return Err(invalid());
            }
            return Ok(Self::OpMod { tick_ms });
        }
        Err(invalid())
    }
}

/// Format a 16.16 percent with four significant digits
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_percent(p: i32) -> String {
    let v = f64::from(p) / PERCENT_UNIT;
    let mut out = String::new();
    if v == 0.0 {
        out.push('0');
    } else {
        let magnitude = libm::floor(libm::log10(v.abs())) as i32;
        let decimals = (3 - magnitude).max(0) as usize;
        let _ = write!(out, "{v:.decimals$}");
        if out.contains('.') {
            let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
            out.truncate(trimmed);
        }
    }
    out.push('%');
    out
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Const(n) => serializer.serialize_i32(n),
            Self::Percent(p) => {
                let compact = format_percent(p);
                // Four digits don't always give back the same fixed point value.
                if Self::parse_str(&compact).ok() == Some(*self) {
                    serializer.serialize_str(&compact)
                } else {
                    serialize_fields(serializer, "Percent", p, self.type_name())
                }
            }
            Self::OpAdd { add_ms } if add_ms >= 0 => {
                serializer.serialize_str(&format!("+{add_ms}"))
            }
            Self::OpAdd { add_ms } => serializer.serialize_str(&add_ms.to_string()),
            Self::OpMod { tick_ms } if tick_ms >= 0 => {
                serializer.serialize_str(&format!("%{tick_ms}"))
            }
            Self::Rand { tick_ms: 0 } => serializer.serialize_str(RAND_KEY),
            Self::OpMod { tick_ms } | Self::OpStep { tick_ms } | Self::Rand { tick_ms } => {
                serialize_fields(serializer, "TickMS", tick_ms, self.type_name())
            }
        }
    }
}

/// Registry map form, `{"<key>": n, "_type": name}`
fn serialize_fields<S: Serializer>(
    serializer: S,
    key: &'static str,
    n: i32,
    type_name: &'static str,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry(key, &n)?;
    map.serialize_entry("_type", type_name)?;
    map.end()
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(raw).map_err(D::Error::custom)
    }
}

/// Map form shared by every value decoded through the registry
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ValueFields {
    #[serde(rename = "TickMS")]
    pub(crate) tick_ms: i32,
    #[serde(rename = "AddMS")]
    pub(crate) add_ms: i32,
    #[serde(rename = "Const")]
    pub(crate) constant: i32,
    #[serde(rename = "Percent")]
    pub(crate) percent: i32,
}
