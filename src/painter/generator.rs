//! Root pattern state machine driven once per frame tick.

use core::mem;

use embassy_time::Duration;

use crate::color::{BLACK, Frame, Rgb, mix_into};
use crate::curve::Curve;
use crate::pattern::{Render, SPattern, Transition};

/// Curve used when crossfading between two root patterns.
pub const CROSSFADE_CURVE: Curve = Curve::EaseOut;

enum RootState {
    Steady(SPattern),
    Crossfading {
        before: SPattern,
        after: SPattern,
        /// Elapsed time at which the crossfade started
        started_at: u32,
        duration: u32,
        scratch: Frame,
    },
}

impl Default for RootState {
    fn default() -> Self {
        Self::Steady(SPattern::empty())
    }
}

/// Renders the root pattern frame after frame
///
/// Time advances by one nominal frame period per rendered frame, whatever
/// the wall clock says, so the output only depends on the swap sequence.
pub struct Generator {
    root: RootState,
    since: Duration,
    frame_duration: Duration,
}

impl Generator {
    /// Create a generator showing black
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            root: RootState::Steady(SPattern::new(BLACK)),
            since: Duration::from_ticks(0),
            frame_duration,
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Milliseconds elapsed since the current root started
    #[allow(clippy::cast_possible_truncation)]
    pub fn time_ms(&self) -> u32 {
        self.since.as_millis() as u32
    }

    pub const fn is_crossfading(&self) -> bool {
        matches!(self.root, RootState::Crossfading { .. })
    }

    /// Replace the root pattern
    ///
    /// A zero crossfade switches right away and restarts time at zero.
    /// Otherwise the current root fades out over `crossfade` while `pattern`
    /// starts from zero. A swap during a crossfade keeps the running
    /// crossfade as the pattern fading out.
    #[allow(clippy::cast_possible_truncation)]
    pub fn swap(&mut self, pattern: SPattern, crossfade: Duration) {
        let duration = crossfade.as_millis().min(u64::from(u32::MAX)) as u32;
        if duration == 0 {
            self.root = RootState::Steady(pattern);
            self.since = Duration::from_ticks(0);
            return;
        }
        let before = match mem::take(&mut self.root) {
            RootState::Steady(p) => p,
            RootState::Crossfading {
                before,
                after,
                started_at,
                duration,
                ..
            } => SPattern::new(Transition::new(
                before,
                after,
                started_at,
                duration,
                CROSSFADE_CURVE,
            )),
        };
        self.root = RootState::Crossfading {
            before,
            after: pattern,
            started_at: self.time_ms(),
            duration,
            scratch: Frame::default(),
        };
    }

    /// Render the next frame into `pixels` and advance time by one period
    #[allow(clippy::cast_precision_loss)]
    pub fn render_next(&mut self, pixels: &mut [Rgb]) {
        pixels.fill(BLACK);
        let t = self.time_ms();
        match &mut self.root {
            RootState::Steady(p) => p.render(pixels, t),
            RootState::Crossfading {
                before,
                after,
                started_at,
                duration,
                scratch,
            } => {
                let elapsed = t.saturating_sub(*started_at);
                after.render(pixels, elapsed);
                if elapsed < *duration {
                    scratch.reset(pixels.len());
                    before.render(scratch, t);
                    let progress = elapsed as f32 / *duration as f32;
                    mix_into(pixels, scratch, 255 - CROSSFADE_CURVE.scale8(progress));
                }
            }
        }

        self.since += self.frame_duration;
        self.settle();
    }

    /// Drop the faded out pattern once the crossfade is over
    fn settle(&mut self) {
        let done = match &self.root {
            RootState::Crossfading {
                started_at,
                duration,
                ..
            } => u64::from(*started_at) + u64::from(*duration) < self.since.as_millis(),
            RootState::Steady(_) => false,
        };
        if !done {
            return;
        }
        if let RootState::Crossfading {
            after, started_at, ..
        } = mem::take(&mut self.root)
        {
            self.since -= Duration::from_millis(u64::from(started_at));
            self.root = RootState::Steady(after);
        }
    }
}
