//! 1D LED strip animation engine.
//!
//! Patterns form a tree of composable nodes rendered into a frame for a given
//! elapsed time. The [`Painter`] renders the root pattern on a background
//! worker and pushes frames to an [`OutputDriver`] on another.

pub mod channel;
pub mod color;
pub mod command;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame_scheduler;
pub mod math8;
pub mod painter;
pub mod pattern;
pub mod serializer;
pub mod value;

pub use color::{Frame, Rgb};
pub use command::{CommandProcessor, CommandSource, Message, PatternTarget, Recents, Topic};
pub use config::PainterConfig;
pub use curve::{Curve, Interpolation};
pub use embassy_time::{Duration, Instant};
pub use error::{CommandError, DecodeError, DriverError, PainterError};
pub use painter::{Generator, Painter};
pub use pattern::{Pattern, Render, SPattern};
pub use serializer::{marshal, unmarshal};
pub use value::Value;

/// Abstract display sink
///
/// Implement this trait to support different hardware platforms.
/// The painter owns the driver on its writer thread.
pub trait OutputDriver: Send {
    /// Write packed RGB triplets, one per pixel in order
    fn write(&mut self, rgb: &[u8]) -> Result<(), DriverError>;

    /// Number of pixels on the strip
    fn pixel_count(&self) -> usize;
}

/// Build the process-wide curve tables and the serializer registry
///
/// [`Painter::new`] calls it; call it directly before rendering patterns from
/// several threads without a painter.
pub fn init() {
    curve::init();
    serializer::registry();
}
