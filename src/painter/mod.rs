//! Triple-buffered painter
//!
//! Two workers share a pool of [`FRAME_POOL_SIZE`] frames. The generator
//! takes a free frame, renders the root pattern into it and hands it to the
//! writer; the writer converts it to RGB bytes, pushes it to the
//! [`OutputDriver`] and gives the frame back. Pattern swaps go through a
//! control channel the generator polls between frames.

mod generator;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use embassy_time::{Duration, Instant};
pub use generator::{CROSSFADE_CURVE, Generator};
use tracing::{debug, info, warn};

use crate::OutputDriver;
use crate::channel::{Channel, HandOff};
use crate::color::Frame;
use crate::config::PainterConfig;
use crate::error::PainterError;
use crate::frame_scheduler::FramePacer;
use crate::pattern::SPattern;
use crate::serializer::unmarshal;

/// Number of frames cycling between the generator and the writer.
pub const FRAME_POOL_SIZE: usize = 3;

const CONTROL_CHANNEL_SIZE: usize = 4;

const GENERATOR_THREAD_NAME: &str = "anim1d-generator";
const WRITER_THREAD_NAME: &str = "anim1d-writer";

enum Control {
    Swap {
        pattern: SPattern,
        crossfade: Duration,
    },
    Shutdown,
}

struct Shared {
    control: Channel<Control, CONTROL_CHANNEL_SIZE>,
    /// One token per applied swap
    ack: HandOff<(), 1>,
    free: HandOff<Frame, FRAME_POOL_SIZE>,
    filled: HandOff<Frame, FRAME_POOL_SIZE>,
}

impl Shared {
    fn close_all(&self) {
        self.filled.close();
        self.free.close();
        self.ack.close();
    }
}

/// Closes every queue when a worker exits, panics included
struct CloseOnExit<'a>(&'a Shared);

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        self.0.close_all();
    }
}

/// Renders patterns to a display on background threads
///
/// Dropping the painter stops both workers.
pub struct Painter {
    shared: Arc<Shared>,
    swap_lock: Mutex<()>,
    generator: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
    config: PainterConfig,
    pixel_count: usize,
}

impl Painter {
    /// Start painting to `driver`
    ///
    /// Shows black until a pattern is set, or the startup pattern of the
    /// config when there is one.
    pub fn new<D>(driver: D, config: PainterConfig) -> Result<Self, PainterError>
    where
        D: OutputDriver + 'static,
    {
        crate::init();

        let pixel_count = driver.pixel_count();
        let shared = Arc::new(Shared {
            control: Channel::new(),
            ack: HandOff::new(),
            free: HandOff::new(),
            filled: HandOff::new(),
        });
        for _ in 0..FRAME_POOL_SIZE {
            // The pool exactly fills the queue.
            let _ = shared.free.try_send(Frame::new(pixel_count));
        }

        let mut painter = Self {
            shared,
            swap_lock: Mutex::new(()),
            generator: None,
            writer: None,
            config,
            pixel_count,
        };

        let frame_duration = painter.config.frame_duration();
        let shared = Arc::clone(&painter.shared);
        painter.generator = Some(
            thread::Builder::new()
                .name(GENERATOR_THREAD_NAME.to_owned())
                .spawn(move || run_generator(&shared, frame_duration))
                .map_err(PainterError::Spawn)?,
        );
        let shared = Arc::clone(&painter.shared);
        painter.writer = Some(
            thread::Builder::new()
                .name(WRITER_THREAD_NAME.to_owned())
                .spawn(move || run_writer(&shared, driver, frame_duration))
                .map_err(PainterError::Spawn)?,
        );
        info!(
            pixels = pixel_count,
            fps = painter.config.fps,
            "painter started"
        );

        if let Some(startup) = painter.config.startup.clone() {
            painter.set_pattern(&startup, painter.config.default_crossfade())?;
        }
        Ok(painter)
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub const fn config(&self) -> &PainterConfig {
        &self.config
    }

    /// Decode `encoded` and swap to it
    ///
    /// A payload that does not decode is rejected before anything changes.
    pub fn set_pattern(&self, encoded: &str, crossfade: Duration) -> Result<(), PainterError> {
        let pattern = unmarshal(encoded)?;
        self.set_pattern_value(pattern, crossfade)
    }

    /// Swap to `pattern`, blocking until the generator applied it
    pub fn set_pattern_value(
        &self,
        pattern: SPattern,
        crossfade: Duration,
    ) -> Result<(), PainterError> {
        let _guard = self
            .swap_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.shared.ack.is_closed() {
            return Err(PainterError::Closed);
        }
        self.shared
            .control
            .try_send(Control::Swap { pattern, crossfade })
            .map_err(|_| PainterError::Busy)?;
        self.shared.ack.receive().map_err(|_| PainterError::Closed)
    }

    /// Stop both workers and wait for them
    ///
    /// Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.generator.is_none() && self.writer.is_none() {
            return;
        }
        // Without a writer no frame comes back to a generator waiting for one.
        if self.writer.is_none() || self.shared.control.try_send(Control::Shutdown).is_err() {
            self.shared.close_all();
        }
        if let Some(handle) = self.generator.take() {
            if handle.join().is_err() {
                warn!("painter generator panicked");
            }
        }
        // The writer exits once the queues are closed.
        self.shared.close_all();
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                warn!("painter writer panicked");
            }
        }
        info!("painter stopped");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.ack.is_closed()
    }
}

impl Drop for Painter {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_generator(shared: &Shared, frame_duration: Duration) {
    let _close = CloseOnExit(shared);
    let mut generator = Generator::new(frame_duration);
    while let Ok(mut frame) = shared.free.receive() {
        if !apply_control(shared, &mut generator) {
            break;
        }
        generator.render_next(&mut frame);
        if shared.filled.send(frame).is_err() {
            break;
        }
    }
}

/// Apply pending control messages, returns false on shutdown
fn apply_control(shared: &Shared, generator: &mut Generator) -> bool {
    while let Ok(msg) = shared.control.try_receive() {
        match msg {
            Control::Swap { pattern, crossfade } => {
                debug!(
                    pattern = pattern.pattern().map_or("none", |p| p.type_name()),
                    crossfade_ms = crossfade.as_millis(),
                    "swapping root pattern"
                );
                generator.swap(pattern, crossfade);
                let _ = shared.ack.try_send(());
            }
            Control::Shutdown => return false,
        }
    }
    true
}

fn run_writer<D: OutputDriver>(shared: &Shared, mut driver: D, frame_duration: Duration) {
    let _close = CloseOnExit(shared);
    let mut pacer = FramePacer::new(frame_duration);
    let mut bytes = Vec::new();
    let mut failing = false;
    while let Ok(frame) = shared.filled.receive() {
        bytes.resize(3 * frame.len(), 0);
        frame.to_rgb_bytes(&mut bytes);
        match driver.write(&bytes) {
            Ok(()) if failing => {
                info!("display write recovered");
                failing = false;
            }
            Ok(()) => {}
            Err(err) if failing => debug!(%err, "display write still failing"),
            Err(err) => {
                warn!(%err, "display write failed");
                failing = true;
            }
        }
        if shared.free.send(frame).is_err() {
            break;
        }
        let wait = pacer.wait_duration(Instant::now());
        thread::sleep(std::time::Duration::from_micros(wait.as_micros()));
    }
}
