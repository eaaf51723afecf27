//! Moving sun glow, vertical vignette and sun icon placement.
//!
//! The glow color and its peak/mid/low opacities follow their own windowed
//! blend around sunrise and sunset. It shares the windowing arithmetic with
//! [`crate::time_phase`] but not the state machine: the opacity triple is
//! split across the two windows of each event while the color is not.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, ensure_hex, hex_to_rgb, lerp_color_gamma};
use crate::easing::{AlphaGradientOptions, EasingProfile, create_alpha_gradient_curve};
use crate::gradient::{
    GradientDirection, GradientLayerOptions, GradientStop, build_alpha_gradient_layer,
    format_linear_gradient,
};
use crate::time_phase::{
    Transitions, clock_hour, cosine_ease, minutes_until, solar_path, window_progress,
};

/// Icon top (percent of strip height) when the sun is at the zenith.
pub const ZENITH_TOP_PERCENT: f64 = 14.0;
/// Icon top (percent of strip height) when the sun is on the horizon.
pub const HORIZON_TOP_PERCENT: f64 = 86.0;
/// Height of the fade-in band at the top and bottom of the vignette.
const VIGNETTE_EDGE_FRACTION: f64 = 0.06;
/// Glow stops this close to either end of the glow domain are clear.
const GLOW_EDGE_EPSILON: f64 = 1e-9;

// Used for the sun's progress when there is no usable solar path.
const FALLBACK_SUNRISE_MINUTES: f64 = 6.0 * 60.0;
const FALLBACK_SUNSET_MINUTES: f64 = 18.0 * 60.0;

pub const BLEND_MODE_NIGHT: &str = "multiply, multiply";
pub const BLEND_MODE_DAY: &str = "screen, normal";

/// Sun glow colors around the solar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunColors {
    pub night: String,
    pub sunrise: String,
    pub day: String,
    pub sunset: String,
}

impl Default for SunColors {
    fn default() -> Self {
        Self {
            night: "#3a4a8c".to_string(),
            sunrise: "#ff9e6d".to_string(),
            day: "#fff3c4".to_string(),
            sunset: "#ff6b4a".to_string(),
        }
    }
}

impl SunColors {
    /// Replace any invalid hex color with the matching `fallback` entry.
    pub fn sanitized(&self, fallback: &SunColors) -> SunColors {
        SunColors {
            night: ensure_hex(&self.night, &fallback.night),
            sunrise: ensure_hex(&self.sunrise, &fallback.sunrise),
            day: ensure_hex(&self.day, &fallback.day),
            sunset: ensure_hex(&self.sunset, &fallback.sunset),
        }
    }
}

/// Glow opacity at its center (peak), shoulder (mid) and edge (low).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpacityTriple {
    pub peak: f64,
    pub mid: f64,
    pub low: f64,
}

impl Default for OpacityTriple {
    fn default() -> Self {
        Self {
            peak: 0.55,
            mid: 0.3,
            low: 0.08,
        }
    }
}

impl OpacityTriple {
    pub const fn new(peak: f64, mid: f64, low: f64) -> Self {
        Self { peak, mid, low }
    }

    pub fn lerp(self, other: OpacityTriple, t: f64) -> OpacityTriple {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        OpacityTriple {
            peak: mix(self.peak, other.peak),
            mid: mix(self.mid, other.mid),
            low: mix(self.low, other.low),
        }
    }

    /// Multiply every component by `factor`, clamping into `[0, 1]`.
    pub fn scaled(self, factor: f64) -> OpacityTriple {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 0.0 };
        let scale = |v: f64| {
            if v.is_finite() {
                (v * factor).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        OpacityTriple {
            peak: scale(self.peak),
            mid: scale(self.mid),
            low: scale(self.low),
        }
    }

    /// Quadratic Bezier through (low, mid, peak); `u = 0` is the edge and
    /// `u = 1` the center.
    pub fn bezier(self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - u;
        v * v * self.low + 2.0 * v * u * self.mid + u * u * self.peak
    }
}

/// Opacity of the vertical vignette at the top/bottom bands and the middle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerticalFade {
    pub top: f64,
    pub middle: f64,
}

impl Default for VerticalFade {
    fn default() -> Self {
        Self {
            top: 0.25,
            middle: 0.05,
        }
    }
}

/// Sun icon appearance. Passed through to the output unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunIconConfig {
    pub symbol: String,
    pub scale: f64,
    /// Icon color; unset follows the glow color.
    pub color: Option<String>,
}

impl Default for SunIconConfig {
    fn default() -> Self {
        Self {
            symbol: "\u{2600}".to_string(),
            scale: 1.0,
            color: None,
        }
    }
}

/// Sun overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SunOverlayConfig {
    pub colors: SunColors,
    pub day_opacity: OpacityTriple,
    pub night_opacity: OpacityTriple,
    pub transitions: Transitions,
    /// Global multiplier applied to every glow opacity.
    pub gradient_opacity: f64,
    /// Half-width of the visible glow, in percent of the strip.
    pub glow_half_width: f64,
    /// Extra canvas on each side of the strip, in percent of the strip.
    pub overflow: f64,
    /// Base curve of the glow layer. The glow's opacity follows the
    /// peak/mid/low triple whatever the curve shape.
    pub inner_ratio: f64,
    pub profile: EasingProfile,
    pub vertical_fade: VerticalFade,
    pub icon: SunIconConfig,
}

impl Default for SunOverlayConfig {
    fn default() -> Self {
        Self {
            colors: SunColors::default(),
            day_opacity: OpacityTriple::default(),
            night_opacity: OpacityTriple::new(0.35, 0.18, 0.05),
            transitions: Transitions::default(),
            gradient_opacity: 1.0,
            glow_half_width: 18.0,
            overflow: 25.0,
            inner_ratio: 0.2,
            profile: EasingProfile::SineInOut,
            vertical_fade: VerticalFade::default(),
            icon: SunIconConfig::default(),
        }
    }
}

/// Per-tick inputs for [`build_sun_overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SunOverlayInput {
    pub sunrise_minutes: Option<f64>,
    pub sunset_minutes: Option<f64>,
    pub now_minutes: f64,
    /// Measured solar altitude in degrees, if known.
    pub solar_altitude: Option<f64>,
}

/// Glow color and opacities at a moment in the solar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunAppearance {
    pub color: String,
    pub opacity: OpacityTriple,
    pub is_night: bool,
}

/// Where and how to draw the sun icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunIcon {
    pub symbol: String,
    pub left_percent: f64,
    pub top_percent: f64,
    pub scale: f64,
    pub color: String,
    pub opacity: f64,
    /// 0 on the horizon, 1 at the zenith.
    pub vertical_progress: f64,
}

/// Placement of the oversized glow canvas relative to the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverflowCanvas {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Everything the renderer needs to draw the sun layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunOverlayState {
    /// `glow, vignette` background-image value.
    pub background: String,
    pub blend_mode: &'static str,
    pub glow_gradient: String,
    pub vignette_gradient: String,
    pub canvas: OverflowCanvas,
    pub appearance: SunAppearance,
    pub icon: SunIcon,
}

fn lerp_appearance(
    from_color: &str,
    to_color: &str,
    from_opacity: OpacityTriple,
    to_opacity: OpacityTriple,
    color_t: f64,
    opacity_t: f64,
    is_night: bool,
) -> SunAppearance {
    SunAppearance {
        color: lerp_color_gamma(from_color, to_color, color_t),
        opacity: from_opacity.lerp(to_opacity, opacity_t),
        is_night,
    }
}

/// Resolve the glow color and opacity triple (before `gradient_opacity`).
///
/// Within each sunrise/sunset event the color crosses its full range in
/// each window, while the opacity triple crosses half of the day/night
/// range per window and sits halfway at the event itself.
pub fn resolve_sun_appearance(
    config: &SunOverlayConfig,
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
    now_minutes: f64,
) -> SunAppearance {
    let colors = config.colors.sanitized(&SunColors::default());
    let day = config.day_opacity;
    let night = config.night_opacity;

    let Some((sunrise, sunset)) = solar_path(sunrise_minutes, sunset_minutes) else {
        let hour = clock_hour(now_minutes);
        let is_night = !(6..18).contains(&hour);
        let (color, opacity) = if is_night {
            (&colors.night, night)
        } else {
            (&colors.day, day)
        };
        return lerp_appearance(color, color, opacity, opacity, 0.0, 0.0, is_night);
    };

    let now = if now_minutes.is_finite() { now_minutes } else { 0.0 };
    let sunrise_window = config.transitions.sunrise.sanitized();
    let sunset_window = config.transitions.sunset.sanitized();

    let after_sunset = now - sunset;
    if sunset_window.after > 0.0 && after_sunset >= 0.0 && after_sunset < sunset_window.after {
        let eased = cosine_ease(window_progress(after_sunset, sunset_window.after));
        return lerp_appearance(
            &colors.sunset,
            &colors.night,
            day,
            night,
            eased,
            0.5 + 0.5 * eased,
            true,
        );
    }

    if after_sunset >= 0.0 {
        return lerp_appearance(&colors.night, &colors.night, night, night, 0.0, 0.0, true);
    }

    let before_sunset = sunset - now;
    if sunset_window.before > 0.0 && before_sunset > 0.0 && before_sunset <= sunset_window.before {
        let eased = cosine_ease(1.0 - window_progress(before_sunset, sunset_window.before));
        return lerp_appearance(
            &colors.day,
            &colors.sunset,
            day,
            night,
            eased,
            0.5 * eased,
            false,
        );
    }

    let before_sunrise = minutes_until(sunrise, now);
    if sunrise_window.before > 0.0
        && before_sunrise > 0.0
        && before_sunrise <= sunrise_window.before
    {
        let eased = cosine_ease(1.0 - window_progress(before_sunrise, sunrise_window.before));
        return lerp_appearance(
            &colors.night,
            &colors.sunrise,
            night,
            day,
            eased,
            0.5 * eased,
            true,
        );
    }

    if now < sunrise {
        return lerp_appearance(&colors.night, &colors.night, night, night, 0.0, 0.0, true);
    }

    let after_sunrise = now - sunrise;
    if sunrise_window.after > 0.0 && after_sunrise < sunrise_window.after {
        let eased = cosine_ease(window_progress(after_sunrise, sunrise_window.after));
        return lerp_appearance(
            &colors.sunrise,
            &colors.day,
            night,
            day,
            eased,
            0.5 + 0.5 * eased,
            false,
        );
    }

    lerp_appearance(&colors.day, &colors.day, day, day, 0.0, 0.0, false)
}

/// Sun progress across the solar day: 0 at sunrise, 1 at sunset.
///
/// Unclamped: negative before sunrise and above 1 after sunset.
pub fn sun_progress(
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
    now_minutes: f64,
) -> f64 {
    let (sunrise, sunset) = solar_path(sunrise_minutes, sunset_minutes)
        .unwrap_or((FALLBACK_SUNRISE_MINUTES, FALLBACK_SUNSET_MINUTES));
    let now = if now_minutes.is_finite() { now_minutes } else { 0.0 };
    (now - sunrise) / (sunset - sunrise)
}

/// Icon height from the measured solar altitude.
fn vertical_progress_from_altitude(altitude_deg: f64) -> f64 {
    (altitude_deg / 90.0).clamp(0.0, 1.0)
}

/// Icon height when no altitude is available: a sine arc over the day.
fn vertical_progress_from_arc(progress: f64) -> f64 {
    (PI * progress.clamp(0.0, 1.0)).sin().max(0.0)
}

/// Map vertical progress onto the icon band; higher sun, smaller top.
pub fn icon_top_percent(vertical_progress: f64) -> f64 {
    let band = HORIZON_TOP_PERCENT - ZENITH_TOP_PERCENT;
    HORIZON_TOP_PERCENT - band * vertical_progress.clamp(0.0, 1.0)
}

/// Fixed vertical vignette in `color`, fading in over the outer 6% bands.
pub fn build_vertical_vignette(color: Rgb, fade: &VerticalFade) -> String {
    let stops = [
        GradientStop::new(0.0, color, 0.0),
        GradientStop::new(VIGNETTE_EDGE_FRACTION, color, fade.top),
        GradientStop::new(0.5, color, fade.middle),
        GradientStop::new(1.0 - VIGNETTE_EDGE_FRACTION, color, fade.top),
        GradientStop::new(1.0, color, 0.0),
    ];
    format_linear_gradient(GradientDirection::ToBottom, &stops)
}

/// Glow opacity at `curve_position` within the glow's own domain.
///
/// A quadratic Bézier through low, mid and peak keyed by distance from the
/// center, independent of the easing profile. Zero on and outside the
/// domain edges.
pub fn glow_alpha(opacity: OpacityTriple, curve_position: f64) -> f64 {
    if !curve_position.is_finite()
        || curve_position <= GLOW_EDGE_EPSILON
        || curve_position >= 1.0 - GLOW_EDGE_EPSILON
    {
        return 0.0;
    }
    let from_center = ((curve_position - 0.5).abs() * 2.0).min(1.0);
    opacity.bezier(1.0 - from_center)
}

/// Build the sun overlay for one render tick.
pub fn build_sun_overlay(config: &SunOverlayConfig, input: &SunOverlayInput) -> SunOverlayState {
    let raw = resolve_sun_appearance(
        config,
        input.sunrise_minutes,
        input.sunset_minutes,
        input.now_minutes,
    );
    let appearance = SunAppearance {
        opacity: raw.opacity.scaled(config.gradient_opacity),
        ..raw
    };
    let opacity = appearance.opacity;

    let progress = sun_progress(input.sunrise_minutes, input.sunset_minutes, input.now_minutes);
    let center = progress.clamp(0.0, 1.0);

    let half_width = if config.glow_half_width.is_finite() {
        (config.glow_half_width / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let overflow = if config.overflow.is_finite() {
        (config.overflow / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scale_factor = 1.0 + 2.0 * overflow;
    let start = (center - half_width + overflow) / scale_factor;
    let end = (center + half_width + overflow) / scale_factor;

    let curve = create_alpha_gradient_curve(&AlphaGradientOptions {
        profile: config.profile,
        enable_left: true,
        enable_right: true,
        inner_opacity_ratio: Some(config.inner_ratio),
        opacity_scale: 1.0,
    });
    let glow_shape = |_alpha: f64, position: f64| glow_alpha(opacity, position);
    let glow_gradient = build_alpha_gradient_layer(
        &appearance.color,
        &curve,
        start,
        end,
        1.0,
        Some(&glow_shape),
        &GradientLayerOptions::default(),
    );

    let vignette_gradient =
        build_vertical_vignette(hex_to_rgb(&appearance.color), &config.vertical_fade);

    // Measured altitude and the sine arc are deliberately separate branches.
    let vertical_progress = match input.solar_altitude.filter(|a| a.is_finite()) {
        Some(altitude) => vertical_progress_from_altitude(altitude),
        None => vertical_progress_from_arc(progress),
    };

    let icon_color = match &config.icon.color {
        Some(color) => ensure_hex(color, &appearance.color),
        None => appearance.color.clone(),
    };

    let icon = SunIcon {
        symbol: config.icon.symbol.clone(),
        left_percent: progress * 100.0,
        top_percent: icon_top_percent(vertical_progress),
        scale: config.icon.scale,
        color: icon_color,
        opacity: opacity.peak,
        vertical_progress,
    };

    let blend_mode = if appearance.is_night {
        BLEND_MODE_NIGHT
    } else {
        BLEND_MODE_DAY
    };

    tracing::trace!(
        "Sun overlay: progress={:.3} center={:.3} glow=[{:.3}, {:.3}] night={}",
        progress,
        center,
        start,
        end,
        appearance.is_night
    );

    SunOverlayState {
        background: format!("{}, {}", glow_gradient, vignette_gradient),
        blend_mode,
        glow_gradient,
        vignette_gradient,
        canvas: OverflowCanvas {
            left_percent: -overflow * 100.0,
            width_percent: scale_factor * 100.0,
        },
        appearance,
        icon,
    }
}
