//! Pattern and value encoding
//!
//! Patterns encode to JSON. Colors, frames and the rainbow use their compact
//! string forms (`"#rrggbb"`, `"Lrrggbb..."`, `"Rainbow"`), every other node
//! is a map of its fields plus a `_type` key naming the node. `{}` and `null`
//! stand for the empty pattern.
//!
//! The name to decoder tables are built once by [`registry`] and never
//! change afterwards.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::color::{Frame, parse_hex, to_hex};
use crate::error::DecodeError;
use crate::pattern::{
    Add, Aurore, Chronometer, Crop, Cycle, Dim, Gradient, Loop, Mixer, NightStars,
    PATTERN_NAME_ADD, PATTERN_NAME_AURORE, PATTERN_NAME_NIGHT_STARS,
    PATTERN_NAME_CHRONOMETER, PATTERN_NAME_CROP, PATTERN_NAME_CYCLE, PATTERN_NAME_DIM,
    PATTERN_NAME_GRADIENT, PATTERN_NAME_LOOP, PATTERN_NAME_MIXER, PATTERN_NAME_PING_PONG,
    PATTERN_NAME_RAINBOW, PATTERN_NAME_REPEATED, PATTERN_NAME_ROTATE, PATTERN_NAME_SCALE,
    PATTERN_NAME_TRANSITION, PATTERN_NAME_TRIM, Pattern, PingPong, Rainbow, Repeated, Rotate,
    SPattern, Scale, Transition, Trim,
};
use crate::value::{Value, ValueFields};

/// Key holding the node name in map encodings.
pub const TYPE_KEY: &str = "_type";

const RAINBOW_KEY: &str = "Rainbow";

type PatternDecoder = fn(Json) -> Result<Pattern, DecodeError>;
type ValueDecoder = fn(ValueFields) -> Value;

/// Name to decoder tables for map-encoded patterns and values
pub struct Registry {
    patterns: BTreeMap<&'static str, PatternDecoder>,
    values: BTreeMap<&'static str, ValueDecoder>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the process-wide registry, building it on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::build)
}

fn decode_node<T>(raw: Json) -> Result<Pattern, DecodeError>
where
    T: DeserializeOwned + Into<Pattern>,
{
    Ok(serde_json::from_value::<T>(raw)?.into())
}

macro_rules! pattern_table {
    ($($name:ident => $ty:ty),* $(,)?) => {{
        let mut table: BTreeMap<&'static str, PatternDecoder> = BTreeMap::new();
        $(
            table.insert($name, decode_node::<$ty> as PatternDecoder);
        )*
        table
    }};
}

impl Registry {
    fn build() -> Self {
        let patterns = pattern_table!(
            PATTERN_NAME_RAINBOW => Rainbow,
            PATTERN_NAME_REPEATED => Repeated,
            PATTERN_NAME_GRADIENT => Gradient,
            PATTERN_NAME_TRANSITION => Transition,
            PATTERN_NAME_CYCLE => Cycle,
            PATTERN_NAME_LOOP => Loop,
            PATTERN_NAME_ROTATE => Rotate,
            PATTERN_NAME_CHRONOMETER => Chronometer,
            PATTERN_NAME_PING_PONG => PingPong,
            PATTERN_NAME_CROP => Crop,
            PATTERN_NAME_TRIM => Trim,
            PATTERN_NAME_MIXER => Mixer,
            PATTERN_NAME_ADD => Add,
            PATTERN_NAME_DIM => Dim,
            PATTERN_NAME_SCALE => Scale,
            PATTERN_NAME_AURORE => Aurore,
            PATTERN_NAME_NIGHT_STARS => NightStars,
        );

        let mut values: BTreeMap<&'static str, ValueDecoder> = BTreeMap::new();
        values.insert(Value::Const(0).type_name(), |f| Value::Const(f.constant));
        values.insert(Value::Percent(0).type_name(), |f| Value::Percent(f.percent));
        values.insert(Value::OpAdd { add_ms: 0 }.type_name(), |f| Value::OpAdd {
            add_ms: f.add_ms,
        });
        values.insert(Value::OpMod { tick_ms: 0 }.type_name(), |f| Value::OpMod {
            tick_ms: f.tick_ms,
        });
        values.insert(Value::OpStep { tick_ms: 0 }.type_name(), |f| Value::OpStep {
            tick_ms: f.tick_ms,
        });
        values.insert(Value::Rand { tick_ms: 0 }.type_name(), |f| Value::Rand {
            tick_ms: f.tick_ms,
        });

        Self { patterns, values }
    }

    /// Names accepted in the `_type` key of a pattern map
    pub fn pattern_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.keys().copied()
    }

    pub fn decode_pattern(&self, name: &str, raw: Json) -> Result<Pattern, DecodeError> {
        let decode = self
            .patterns
            .get(name)
            .ok_or_else(|| DecodeError::UnknownType(name.to_owned()))?;
        decode(raw)
    }

    pub fn decode_value(&self, name: &str, raw: Json) -> Result<Value, DecodeError> {
        let decode = self
            .values
            .get(name)
            .ok_or_else(|| DecodeError::UnknownType(name.to_owned()))?;
        let fields: ValueFields = serde_json::from_value(raw)?;
        Ok(decode(fields))
    }
}

/// Decode a pattern from its compact string form
pub fn parse_pattern_str(s: &str) -> Result<Pattern, DecodeError> {
    match s.as_bytes().first() {
        Some(b'#') => parse_hex(s).map(Pattern::Color),
        Some(b'L') => s.parse::<Frame>().map(Pattern::Frame),
        Some(b'R') if s == RAINBOW_KEY => Ok(Pattern::Rainbow(Rainbow::new())),
        _ => Err(DecodeError::UnrecognizedString(s.to_owned())),
    }
}

impl SPattern {
    /// Decode a pattern handle from parsed JSON
    pub fn from_json(raw: Json) -> Result<Self, DecodeError> {
        match raw {
            Json::Null => Ok(Self::empty()),
            Json::String(s) => parse_pattern_str(&s).map(Self::new),
            Json::Object(map) => {
                if map.is_empty() {
                    return Ok(Self::empty());
                }
                let name = match map.get(TYPE_KEY) {
                    None => return Err(DecodeError::MissingType),
                    Some(Json::String(name)) => name.clone(),
                    Some(_) => return Err(DecodeError::InvalidType),
                };
                registry()
                    .decode_pattern(&name, Json::Object(map))
                    .map(Self::new)
            }
            Json::Bool(_) => Err(DecodeError::UnexpectedJson("a boolean")),
            Json::Number(_) => Err(DecodeError::UnexpectedJson("a number")),
            Json::Array(_) => Err(DecodeError::UnexpectedJson("an array")),
        }
    }

    /// Encode the pattern handle as JSON
    pub fn to_json(&self) -> Result<Json, DecodeError> {
        match self.pattern() {
            None => Ok(Json::Object(Map::new())),
            Some(p) => pattern_to_json(p),
        }
    }
}

fn pattern_to_json(p: &Pattern) -> Result<Json, DecodeError> {
    let node = match p {
        Pattern::Color(c) => return Ok(Json::String(to_hex(*c))),
        Pattern::Frame(f) => return Ok(Json::String(f.to_string())),
        Pattern::Rainbow(_) => return Ok(Json::String(RAINBOW_KEY.to_owned())),
        Pattern::Repeated(n) => serde_json::to_value(n)?,
        Pattern::Gradient(n) => serde_json::to_value(n)?,
        Pattern::Transition(n) => serde_json::to_value(n)?,
        Pattern::Cycle(n) => serde_json::to_value(n)?,
        Pattern::Loop(n) => serde_json::to_value(n)?,
        Pattern::Rotate(n) => serde_json::to_value(n)?,
        Pattern::Chronometer(n) => serde_json::to_value(n)?,
        Pattern::PingPong(n) => serde_json::to_value(n)?,
        Pattern::Crop(n) => serde_json::to_value(n)?,
        Pattern::Trim(n) => serde_json::to_value(n)?,
        Pattern::Mixer(n) => serde_json::to_value(n)?,
        Pattern::Add(n) => serde_json::to_value(n)?,
        Pattern::Dim(n) => serde_json::to_value(n)?,
        Pattern::Scale(n) => serde_json::to_value(n)?,
        Pattern::Aurore(n) => serde_json::to_value(n)?,
        Pattern::NightStars(n) => serde_json::to_value(n)?,
    };
    let mut map = match node {
        Json::Object(map) => map,
        _ => Map::new(),
    };
    map.insert(TYPE_KEY.to_owned(), Json::String(p.type_name().to_owned()));
    Ok(Json::Object(map))
}

/// Decode a pattern from its encoded text
pub fn unmarshal(s: &str) -> Result<SPattern, DecodeError> {
    let raw: Json = serde_json::from_str(s)?;
    SPattern::from_json(raw)
}

/// Encode a pattern as text; map keys come out sorted
pub fn marshal(p: &SPattern) -> Result<String, DecodeError> {
    Ok(serde_json::to_string(&p.to_json()?)?)
}

impl Serialize for SPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Json::deserialize(deserializer)?;
        Self::from_json(raw).map_err(D::Error::custom)
    }
}
