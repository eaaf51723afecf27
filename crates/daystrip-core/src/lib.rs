//! daystrip-core - color, gradient and solar computation for the day strip.
//!
//! Everything below `strip` is pure: the same inputs always produce
//! byte-identical output strings, and nothing here performs I/O except
//! config loading.

pub mod color;
pub mod config;
pub mod day_geometry;
pub mod easing;
pub mod error;
pub mod gradient;
pub mod layers;
pub mod logging;
pub mod solar;
pub mod strip;
pub mod sun_overlay;
pub mod time_phase;
pub mod tint;

pub use config::{Config, ConfigLoadResult};
pub use error::{Error, Result};
pub use strip::{DayStripFrame, FrameInputs};
pub use time_phase::TimeOfDayPhase;
