//! Frame pacing for the writer worker.
//!
//! The pacer only computes how long to wait; the caller is responsible for
//! sleeping between frames.

use embassy_time::{Duration, Instant};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Frame duration for a frame rate, at least one millisecond
pub const fn frame_duration_for(fps: u32) -> Duration {
    let fps = if fps == 0 { 1 } else { fps as u64 };
    let micros = 1_000_000 / fps;
    Duration::from_micros(if micros < 1000 { 1000 } else { micros })
}

/// Fixed-period deadline tracker
///
/// Deadlines advance by one period per frame. A frame that misses its
/// deadline restarts the schedule from the current time, so late frames are
/// not followed by a burst of catch-up frames.
///
/// # Usage
///
/// ```ignore
/// let mut pacer = FramePacer::new(frame_duration_for(60));
///
/// loop {
///     write_frame();
///     let wait = pacer.wait_duration(Instant::now());
///     std::thread::sleep(std::time::Duration::from_micros(wait.as_micros()));
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_duration: Duration,
    next_frame: Option<Instant>,
}

impl FramePacer {
    pub const fn new(frame_duration: Duration) -> Self {
        Self {
            frame_duration,
            next_frame: None,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Deadline of the next frame, once the first frame went out
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    /// Record a frame finished at `now` and return how long to wait
    ///
    /// Returns zero when already past the new deadline.
    pub fn wait_duration(&mut self, now: Instant) -> Duration {
        let base = match self.next_frame {
            Some(next) if next > now => next,
            _ => now,
        };
        let next = base + self.frame_duration;
        self.next_frame = Some(next);
        next.checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0))
    }
}
