//! Pattern tree with compile-time known node variants
//!
//! Every node is a variant of [`Pattern`] and renders through the [`Render`]
//! trait. Composite nodes own their children through [`SPattern`] handles and
//! keep private [`Scratch`] buffers for intermediate renders.

mod chronometer;
mod crop;
mod cycle;
mod gradient;
mod mixer;
mod motion;
mod rainbow;
mod scale;
mod sky;
mod static_color;
mod transition;

use core::ops::{Deref, DerefMut};

pub use chronometer::Chronometer;
pub use crop::{Crop, Trim};
pub use cycle::{Cycle, Loop};
pub use gradient::Gradient;
pub use mixer::{Add, Dim, Mixer};
pub use motion::{PingPong, Rotate};
pub use rainbow::{Rainbow, wavelength_to_rgb};
pub use scale::Scale;
pub use sky::{Aurore, NightStars};
pub use static_color::Repeated;
pub use transition::Transition;

use crate::color::{Frame, Rgb};

pub(crate) const PATTERN_NAME_COLOR: &str = "Color";
pub(crate) const PATTERN_NAME_FRAME: &str = "Frame";
pub(crate) const PATTERN_NAME_RAINBOW: &str = "Rainbow";
pub(crate) const PATTERN_NAME_REPEATED: &str = "Repeated";
pub(crate) const PATTERN_NAME_GRADIENT: &str = "Gradient";
pub(crate) const PATTERN_NAME_TRANSITION: &str = "Transition";
pub(crate) const PATTERN_NAME_CYCLE: &str = "Cycle";
pub(crate) const PATTERN_NAME_LOOP: &str = "Loop";
pub(crate) const PATTERN_NAME_ROTATE: &str = "Rotate";
pub(crate) const PATTERN_NAME_CHRONOMETER: &str = "Chronometer";
pub(crate) const PATTERN_NAME_PING_PONG: &str = "PingPong";
pub(crate) const PATTERN_NAME_CROP: &str = "Crop";
pub(crate) const PATTERN_NAME_TRIM: &str = "Trim";
pub(crate) const PATTERN_NAME_MIXER: &str = "Mixer";
pub(crate) const PATTERN_NAME_ADD: &str = "Add";
pub(crate) const PATTERN_NAME_DIM: &str = "Dim";
pub(crate) const PATTERN_NAME_SCALE: &str = "Scale";
pub(crate) const PATTERN_NAME_AURORE: &str = "Aurore";
pub(crate) const PATTERN_NAME_NIGHT_STARS: &str = "NightStars";

/// Upper bound for scratch buffers sized from evaluated values.
pub(crate) const MAX_SCRATCH_PIXELS: usize = 1 << 16;

pub trait Render {
    /// Render into `pixels` for `time_ms` elapsed since the pattern started
    ///
    /// `pixels` may be of any length, including zero.
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32);
}

/// Pattern node - enum containing all possible nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Single color on all lights
    Color(Rgb),
    /// Static strip copied onto the leading pixels
    Frame(Frame),
    Rainbow(Rainbow),
    Repeated(Repeated),
    Gradient(Gradient),
    Transition(Transition),
    Cycle(Cycle),
    Loop(Loop),
    Rotate(Rotate),
    Chronometer(Chronometer),
    PingPong(PingPong),
    Crop(Crop),
    Trim(Trim),
    Mixer(Mixer),
    Add(Add),
    Dim(Dim),
    Scale(Scale),
    Aurore(Aurore),
    NightStars(NightStars),
}

impl Pattern {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Color(_) => PATTERN_NAME_COLOR,
            Self::Frame(_) => PATTERN_NAME_FRAME,
            Self::Rainbow(_) => PATTERN_NAME_RAINBOW,
            Self::Repeated(_) => PATTERN_NAME_REPEATED,
            Self::Gradient(_) => PATTERN_NAME_GRADIENT,
            Self::Transition(_) => PATTERN_NAME_TRANSITION,
            Self::Cycle(_) => PATTERN_NAME_CYCLE,
            Self::Loop(_) => PATTERN_NAME_LOOP,
            Self::Rotate(_) => PATTERN_NAME_ROTATE,
            Self::Chronometer(_) => PATTERN_NAME_CHRONOMETER,
            Self::PingPong(_) => PATTERN_NAME_PING_PONG,
            Self::Crop(_) => PATTERN_NAME_CROP,
            Self::Trim(_) => PATTERN_NAME_TRIM,
            Self::Mixer(_) => PATTERN_NAME_MIXER,
            Self::Add(_) => PATTERN_NAME_ADD,
            Self::Dim(_) => PATTERN_NAME_DIM,
            Self::Scale(_) => PATTERN_NAME_SCALE,
            Self::Aurore(_) => PATTERN_NAME_AURORE,
            Self::NightStars(_) => PATTERN_NAME_NIGHT_STARS,
        }
    }
}

impl Render for Pattern {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        match self {
            Self::Color(c) => pixels.fill(*c),
            Self::Frame(f) => {
                let n = f.len().min(pixels.len());
                pixels[..n].copy_from_slice(&f[..n]);
            }
            Self::Rainbow(p) => p.render(pixels, time_ms),
            Self::Repeated(p) => p.render(pixels, time_ms),
            Self::Gradient(p) => p.render(pixels, time_ms),
            Self::Transition(p) => p.render(pixels, time_ms),
            Self::Cycle(p) => p.render(pixels, time_ms),
            Self::Loop(p) => p.render(pixels, time_ms),
            Self::Rotate(p) => p.render(pixels, time_ms),
            Self::Chronometer(p) => p.render(pixels, time_ms),
            Self::PingPong(p) => p.render(pixels, time_ms),
            Self::Crop(p) => p.render(pixels, time_ms),
            Self::Trim(p) => p.render(pixels, time_ms),
            Self::Mixer(p) => p.render(pixels, time_ms),
            Self::Add(p) => p.render(pixels, time_ms),
            Self::Dim(p) => p.render(pixels, time_ms),
            Self::Scale(p) => p.render(pixels, time_ms),
            Self::Aurore(p) => p.render(pixels, time_ms),
            Self::NightStars(p) => p.render(pixels, time_ms),
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Pattern {
                fn from(node: $ty) -> Self {
                    Self::$variant(node)
                }
            }

            impl From<$ty> for SPattern {
                fn from(node: $ty) -> Self {
                    Self::new(Pattern::$variant(node))
                }
            }
        )*
    };
}

impl_from_node!(
    Color(Rgb),
    Frame(Frame),
    Rainbow(Rainbow),
    Repeated(Repeated),
    Gradient(Gradient),
    Transition(Transition),
    Cycle(Cycle),
    Loop(Loop),
    Rotate(Rotate),
    Chronometer(Chronometer),
    PingPong(PingPong),
    Crop(Crop),
    Trim(Trim),
    Mixer(Mixer),
    Add(Add),
    Dim(Dim),
    Scale(Scale),
    Aurore(Aurore),
    NightStars(NightStars),
);

/// Serializable pattern handle, possibly empty
///
/// An empty handle renders nothing and encodes as `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SPattern(Option<Box<Pattern>>);

impl SPattern {
    pub const fn empty() -> Self {
        Self(None)
    }

    pub fn new(pattern: impl Into<Pattern>) -> Self {
        Self(Some(Box::new(pattern.into())))
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.0.as_deref()
    }

    pub fn pattern_mut(&mut self) -> Option<&mut Pattern> {
        self.0.as_deref_mut()
    }

    pub fn into_pattern(self) -> Option<Pattern> {
        self.0.map(|p| *p)
    }
}

impl Render for SPattern {
    fn render(&mut self, pixels: &mut [Rgb], time_ms: u32) {
        if let Some(p) = &mut self.0 {
            p.render(pixels, time_ms);
        }
    }
}

impl From<Pattern> for SPattern {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

impl From<Option<Pattern>> for SPattern {
    fn from(pattern: Option<Pattern>) -> Self {
        Self(pattern.map(Box::new))
    }
}

/// Private scratch space owned by a node
///
/// Never serialized, ignored by equality and left empty by `Clone`, so two
/// nodes with the same parameters compare equal whatever they rendered.
#[derive(Debug, Default)]
pub struct Scratch<T = Frame>(T);

impl<T: Default> Clone for Scratch<T> {
    fn clone(&self) -> Self {
        Self(T::default())
    }
}

impl<T> PartialEq for Scratch<T> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T> Deref for Scratch<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Scratch<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
