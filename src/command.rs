//! Command processing
//!
//! Turns `(topic, payload)` messages from a command source into pattern swaps
//! and keeps the list of recently used patterns.

use std::sync::{Arc, mpsc};

use embassy_time::Duration;
use heapless::Deque;
use tracing::{debug, warn};

use crate::color::BLACK;
use crate::config::{DEFAULT_RECENTS_MAX, PainterConfig};
use crate::error::{CommandError, DecodeError, PainterError};
use crate::painter::Painter;
use crate::pattern::{Pattern, SPattern};
use crate::serializer::{marshal, unmarshal};

const TOPIC_SET_NOW: &str = "painter/setnow";
const TOPIC_SET_LAST: &str = "painter/setlast";
const TOPIC_SET_USER: &str = "painter/setuser";
const TOPIC_SET_AUTOMATED: &str = "painter/setautomated";

/// Topics the processor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Apply immediately, skip the recents
    SetNow,
    /// Apply immediately, record as recent
    SetLast,
    /// Apply with the default crossfade, record as recent
    SetUser,
    /// Apply with the default crossfade, skip the recents
    SetAutomated,
}

impl Topic {
    pub const ALL: [Self; 4] = [Self::SetNow, Self::SetLast, Self::SetUser, Self::SetAutomated];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetNow => TOPIC_SET_NOW,
            Self::SetLast => TOPIC_SET_LAST,
            Self::SetUser => TOPIC_SET_USER,
            Self::SetAutomated => TOPIC_SET_AUTOMATED,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TOPIC_SET_NOW => Some(Self::SetNow),
            TOPIC_SET_LAST => Some(Self::SetLast),
            TOPIC_SET_USER => Some(Self::SetUser),
            TOPIC_SET_AUTOMATED => Some(Self::SetAutomated),
            _ => None,
        }
    }

    pub const fn uses_crossfade(self) -> bool {
        matches!(self, Self::SetUser | Self::SetAutomated)
    }

    pub const fn records_recent(self) -> bool {
        matches!(self, Self::SetLast | Self::SetUser)
    }
}

/// A message delivered by a command source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Anything delivering command messages
pub trait CommandSource {
    /// Next message, `None` once the source is exhausted
    fn next_message(&mut self) -> Option<Message>;
}

impl CommandSource for mpsc::Receiver<Message> {
    fn next_message(&mut self) -> Option<Message> {
        self.recv().ok()
    }
}

impl CommandSource for std::vec::IntoIter<Message> {
    fn next_message(&mut self) -> Option<Message> {
        self.next()
    }
}

/// Something that can show a pattern
pub trait PatternTarget {
    fn set_pattern_value(
        &self,
        pattern: SPattern,
        crossfade: Duration,
    ) -> Result<(), PainterError>;
}

impl<T: PatternTarget + ?Sized> PatternTarget for &T {
    fn set_pattern_value(
        &self,
        pattern: SPattern,
        crossfade: Duration,
    ) -> Result<(), PainterError> {
        (**self).set_pattern_value(pattern, crossfade)
    }
}

impl<T: PatternTarget + ?Sized> PatternTarget for Arc<T> {
    fn set_pattern_value(
        &self,
        pattern: SPattern,
        crossfade: Duration,
    ) -> Result<(), PainterError> {
        (**self).set_pattern_value(pattern, crossfade)
    }
}

impl PatternTarget for Painter {
    fn set_pattern_value(
        &self,
        pattern: SPattern,
        crossfade: Duration,
    ) -> Result<(), PainterError> {
        Painter::set_pattern_value(self, pattern, crossfade)
    }
}

/// Most recently used patterns, newest first
///
/// Entries are canonical encodings, each appears once.
#[derive(Debug, Clone)]
pub struct Recents {
    items: Deque<String, DEFAULT_RECENTS_MAX>,
    max: usize,
}

impl Default for Recents {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTS_MAX)
    }
}

impl Recents {
    /// Create an empty list keeping up to `max` entries
    pub fn new(max: usize) -> Self {
        Self {
            items: Deque::new(),
            max: max.min(DEFAULT_RECENTS_MAX),
        }
    }

    /// Move `pattern` to the front
    ///
    /// Returns false when the pattern is not recorded: empty patterns and
    /// plain black are skipped.
    pub fn inject(&mut self, pattern: &SPattern) -> Result<bool, DecodeError> {
        match pattern.pattern() {
            None => return Ok(false),
            Some(Pattern::Color(c)) if *c == BLACK => return Ok(false),
            Some(_) => {}
        }
        if self.max == 0 {
            return Ok(false);
        }
        let encoded = marshal(pattern)?;

        let mut next = Deque::new();
        while let Some(item) = self.items.pop_front() {
            if item != encoded && next.len() + 1 < self.max {
                let _ = next.push_back(item);
            }
        }
        // Room for the newest entry was kept above.
        let _ = next.push_front(encoded);
        self.items = next;
        Ok(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Applies command messages to a pattern target
pub struct CommandProcessor<T: PatternTarget> {
    target: T,
    recents: Recents,
    default_crossfade: Duration,
    last: Option<String>,
}

impl<T: PatternTarget> CommandProcessor<T> {
    pub fn new(target: T, config: &PainterConfig) -> Self {
        Self {
            target,
            recents: Recents::new(config.recents_max),
            default_crossfade: config.default_crossfade(),
            last: None,
        }
    }

    pub const fn target(&self) -> &T {
        &self.target
    }

    pub const fn recents(&self) -> &Recents {
        &self.recents
    }

    /// Last payload applied through a recording topic
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Apply one message
    ///
    /// Invalid payloads are rejected before the target sees them.
    pub fn handle(&mut self, msg: &Message) -> Result<Topic, CommandError> {
        let topic = Topic::parse_from_str(&msg.topic)
            .ok_or_else(|| CommandError::UnknownTopic(msg.topic.clone()))?;
        let payload = core::str::from_utf8(&msg.payload)?;
        let pattern = unmarshal(payload)?;

        let crossfade = if topic.uses_crossfade() {
            self.default_crossfade
        } else {
            Duration::from_ticks(0)
        };
        if !topic.records_recent() {
            self.target.set_pattern_value(pattern, crossfade)?;
            return Ok(topic);
        }

        let recorded = pattern.clone();
        self.target.set_pattern_value(pattern, crossfade)?;
        self.recents.inject(&recorded)?;
        self.last = Some(payload.to_owned());
        Ok(topic)
    }

    /// Handle messages until the source is exhausted
    ///
    /// Failures are logged and do not stop the loop.
    pub fn run<S: CommandSource + ?Sized>(&mut self, source: &mut S) {
        while let Some(msg) = source.next_message() {
            match self.handle(&msg) {
                Ok(topic) => debug!(topic = topic.as_str(), "command applied"),
                Err(CommandError::UnknownTopic(topic)) => debug!(%topic, "ignoring unknown topic"),
                Err(err) => warn!(topic = %msg.topic, %err, "command rejected"),
            }
        }
    }
}
