//! Time-of-day phase resolution.
//!
//! Maps sunrise, sunset and the current clock minute to a base color by
//! cosine-blending between phase colors inside configurable transition
//! windows around sunrise and sunset.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ensure_hex, lerp_color_gamma};
use crate::day_geometry::MINUTES_PER_DAY;

/// Discrete time-of-day bucket. Cyclic: morning -> day -> evening -> night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDayPhase {
    Morning,
    Day,
    Evening,
    Night,
}

impl TimeOfDayPhase {
    pub fn next(self) -> Self {
        match self {
            TimeOfDayPhase::Morning => TimeOfDayPhase::Day,
            TimeOfDayPhase::Day => TimeOfDayPhase::Evening,
            TimeOfDayPhase::Evening => TimeOfDayPhase::Night,
            TimeOfDayPhase::Night => TimeOfDayPhase::Morning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDayPhase::Morning => "morning",
            TimeOfDayPhase::Day => "day",
            TimeOfDayPhase::Evening => "evening",
            TimeOfDayPhase::Night => "night",
        }
    }

    /// Fixed clock-hour table used when there is no usable solar path.
    pub fn from_clock_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDayPhase::Morning,
            12..=17 => TimeOfDayPhase::Day,
            18..=21 => TimeOfDayPhase::Evening,
            _ => TimeOfDayPhase::Night,
        }
    }
}

impl fmt::Display for TimeOfDayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minutes on each side of a solar event over which phases blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionWindow {
    pub before: f64,
    pub after: f64,
}

impl TransitionWindow {
    pub const fn new(before: f64, after: f64) -> Self {
        Self { before, after }
    }

    /// Window with negative or non-finite spans replaced by 0.
    pub fn sanitized(self) -> Self {
        fn span(v: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }
        Self {
            before: span(self.before),
            after: span(self.after),
        }
    }
}

impl Default for TransitionWindow {
    fn default() -> Self {
        Self::new(45.0, 45.0)
    }
}

/// Transition windows around sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Transitions {
    pub sunrise: TransitionWindow,
    pub sunset: TransitionWindow,
}

impl Transitions {
    /// Zero-width windows on every side: phases switch instantly.
    pub const INSTANT: Transitions = Transitions {
        sunrise: TransitionWindow::new(0.0, 0.0),
        sunset: TransitionWindow::new(0.0, 0.0),
    };
}

/// Base colors for each phase, as hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseColors {
    pub morning: String,
    pub day: String,
    pub evening: String,
    pub night: String,
}

impl Default for PhaseColors {
    fn default() -> Self {
        Self {
            morning: "#f6c28b".to_string(),
            day: "#8ecae6".to_string(),
            evening: "#e76f51".to_string(),
            night: "#1d2340".to_string(),
        }
    }
}

impl PhaseColors {
    pub fn get(&self, phase: TimeOfDayPhase) -> &str {
        match phase {
            TimeOfDayPhase::Morning => &self.morning,
            TimeOfDayPhase::Day => &self.day,
            TimeOfDayPhase::Evening => &self.evening,
            TimeOfDayPhase::Night => &self.night,
        }
    }

    /// Replace any invalid hex color with the matching `fallback` entry.
    pub fn sanitized(&self, fallback: &PhaseColors) -> PhaseColors {
        PhaseColors {
            morning: ensure_hex(&self.morning, &fallback.morning),
            day: ensure_hex(&self.day, &fallback.day),
            evening: ensure_hex(&self.evening, &fallback.evening),
            night: ensure_hex(&self.night, &fallback.night),
        }
    }
}

/// Result of [`resolve_time_phase_color`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePhaseColor {
    /// Continuous, gamma-correct blend of the active phase colors.
    pub color: String,
    /// Phase the blend is closest to.
    pub phase: TimeOfDayPhase,
    /// The other side of the active blend, or the following phase when solid.
    pub next_phase: TimeOfDayPhase,
    /// Eased blend progress from the earlier to the later phase; 0 when solid.
    pub blend: f64,
}

/// Cosine ease-in-out: `0.5 - 0.5 cos(pi t)`.
pub fn cosine_ease(t: f64) -> f64 {
    0.5 - 0.5 * (PI * t.clamp(0.0, 1.0)).cos()
}

/// Fractional progress through a window. The divisor is at least one minute;
/// window membership is decided by the caller.
pub fn window_progress(minutes_into: f64, window: f64) -> f64 {
    (minutes_into / window.max(1.0)).clamp(0.0, 1.0)
}

/// Minutes remaining until `event`, wrapped onto the clock day.
pub fn minutes_until(event: f64, now: f64) -> f64 {
    (event - now + MINUTES_PER_DAY).rem_euclid(MINUTES_PER_DAY)
}

/// Sunrise and sunset when they describe a usable solar path.
pub fn solar_path(sunrise_minutes: Option<f64>, sunset_minutes: Option<f64>) -> Option<(f64, f64)> {
    match (sunrise_minutes, sunset_minutes) {
        (Some(sunrise), Some(sunset))
            if sunrise.is_finite() && sunset.is_finite() && sunset > sunrise =>
        {
            Some((sunrise, sunset))
        }
        _ => None,
    }
}

/// Clock hour of `now_minutes`, wrapped into `0..24`.
pub fn clock_hour(now_minutes: f64) -> u32 {
    let now = if now_minutes.is_finite() { now_minutes } else { 0.0 };
    (now.rem_euclid(MINUTES_PER_DAY) / 60.0).floor() as u32 % 24
}

fn solid(colors: &PhaseColors, phase: TimeOfDayPhase) -> TimePhaseColor {
    TimePhaseColor {
        color: lerp_color_gamma(colors.get(phase), colors.get(phase), 0.0),
        phase,
        next_phase: phase.next(),
        blend: 0.0,
    }
}

fn blended(
    colors: &PhaseColors,
    from: TimeOfDayPhase,
    to: TimeOfDayPhase,
    t: f64,
) -> TimePhaseColor {
    let eased = cosine_ease(t);
    let (phase, next_phase) = if eased < 0.5 { (from, to) } else { (to, from) };
    TimePhaseColor {
        color: lerp_color_gamma(colors.get(from), colors.get(to), eased),
        phase,
        next_phase,
        blend: eased,
    }
}

/// Resolve the base color for `now_minutes`.
///
/// Windows are tested in priority order: after sunset, past the sunset
/// window, before sunset, before sunrise, pre-dawn night, after sunrise,
/// then plain day. A window of 0 minutes never matches its blend branch,
/// so the phase flips instantly at the event.
pub fn resolve_time_phase_color(
    colors: &PhaseColors,
    transitions: &Transitions,
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
    now_minutes: f64,
) -> TimePhaseColor {
    let Some((sunrise, sunset)) = solar_path(sunrise_minutes, sunset_minutes) else {
        let phase = TimeOfDayPhase::from_clock_hour(clock_hour(now_minutes));
        return solid(colors, phase);
    };

    let now = if now_minutes.is_finite() { now_minutes } else { 0.0 };
    let sunrise_window = transitions.sunrise.sanitized();
    let sunset_window = transitions.sunset.sanitized();

    let after_sunset = now - sunset;
    if sunset_window.after > 0.0 && after_sunset >= 0.0 && after_sunset < sunset_window.after {
        let t = window_progress(after_sunset, sunset_window.after);
        return blended(colors, TimeOfDayPhase::Evening, TimeOfDayPhase::Night, t);
    }

    if after_sunset >= 0.0 && after_sunset >= sunset_window.after {
        return solid(colors, TimeOfDayPhase::Night);
    }

    let before_sunset = sunset - now;
    if sunset_window.before > 0.0 && before_sunset > 0.0 && before_sunset <= sunset_window.before {
        let t = 1.0 - window_progress(before_sunset, sunset_window.before);
        return blended(colors, TimeOfDayPhase::Day, TimeOfDayPhase::Evening, t);
    }

    let before_sunrise = minutes_until(sunrise, now);
    if sunrise_window.before > 0.0
        && before_sunrise > 0.0
        && before_sunrise <= sunrise_window.before
    {
        let t = 1.0 - window_progress(before_sunrise, sunrise_window.before);
        return blended(colors, TimeOfDayPhase::Night, TimeOfDayPhase::Morning, t);
    }

    if now < sunrise {
        return solid(colors, TimeOfDayPhase::Night);
    }

    let after_sunrise = now - sunrise;
    if sunrise_window.after > 0.0 && after_sunrise < sunrise_window.after {
        let t = window_progress(after_sunrise, sunrise_window.after);
        return blended(colors, TimeOfDayPhase::Morning, TimeOfDayPhase::Day, t);
    }

    solid(colors, TimeOfDayPhase::Day)
}
