//! Whole-frame assembly: the single entry point a host calls per render tick.

use serde::Serialize;

use crate::config::Config;
use crate::day_geometry::compute_day_length_fraction;
use crate::gradient::{GradientDirection, transparent_gradient};
use crate::layers::{GradientLayers, compute_gradient_layers};
use crate::sun_overlay::{SunOverlayInput, SunOverlayState, build_sun_overlay};
use crate::time_phase::{PhaseColors, TimePhaseColor, resolve_time_phase_color};
use crate::tint::{WeatherCondition, temperature_tint, weather_tint};

/// Per-tick inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInputs {
    pub sunrise_minutes: Option<f64>,
    pub sunset_minutes: Option<f64>,
    pub now_minutes: f64,
    pub solar_altitude: Option<f64>,
    /// WMO weather interpretation code, if known.
    pub weather_code: Option<u32>,
    pub temperature_celsius: Option<f64>,
}

/// Everything needed to paint the strip for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStripFrame {
    pub now_minutes: f64,
    pub day_length_fraction: f64,
    pub phase: TimePhaseColor,
    /// None when no weather code was supplied; the weather layer is then clear.
    pub weather: Option<WeatherCondition>,
    pub weather_color: String,
    pub temperature_color: String,
    pub layers: GradientLayers,
    pub sun: SunOverlayState,
}

impl DayStripFrame {
    /// Compute a frame. Never fails; invalid settings fall back to defaults.
    pub fn compute(config: &Config, inputs: &FrameInputs) -> Self {
        let colors = config.phases.sanitized(&PhaseColors::default());
        let phase = resolve_time_phase_color(
            &colors,
            &config.transitions,
            inputs.sunrise_minutes,
            inputs.sunset_minutes,
            inputs.now_minutes,
        );

        let weather = inputs.weather_code.map(WeatherCondition::from_wmo_code);
        let weather_color = weather_tint(
            weather.unwrap_or(WeatherCondition::Cloudy),
            &config.weather,
        );
        let temperature_color = temperature_tint(inputs.temperature_celsius, &config.temperature);

        let mut layers = compute_gradient_layers(
            &config.layers,
            &phase.color,
            &weather_color,
            &temperature_color,
            inputs.sunrise_minutes,
            inputs.sunset_minutes,
        );
        if weather.is_none() {
            layers.weather_gradient = transparent_gradient(GradientDirection::ToRight);
        }

        let sun = build_sun_overlay(
            &config.sun,
            &SunOverlayInput {
                sunrise_minutes: inputs.sunrise_minutes,
                sunset_minutes: inputs.sunset_minutes,
                now_minutes: inputs.now_minutes,
                solar_altitude: inputs.solar_altitude,
            },
        );

        tracing::debug!(
            "Frame at {:.1} min: phase={} next={} blend={:.3} weather={:?}",
            inputs.now_minutes,
            phase.phase,
            phase.next_phase,
            phase.blend,
            weather
        );

        Self {
            now_minutes: inputs.now_minutes,
            day_length_fraction: compute_day_length_fraction(
                inputs.sunrise_minutes,
                inputs.sunset_minutes,
            ),
            phase,
            weather,
            weather_color,
            temperature_color,
            layers,
            sun,
        }
    }

    /// Generate the :root CSS variable block.
    pub fn css_vars_block(&self) -> String {
        let icon = &self.sun.icon;
        format!(
            r#":root {{
    /* ===== Time of Day ===== */
    --daystrip-phase: {phase};
    --daystrip-next-phase: {next_phase};
    --daystrip-phase-blend: {blend:.3};
    --daystrip-background-color: {background};

    /* ===== Edge Tints ===== */
    --daystrip-weather-color: {weather_color};
    --daystrip-weather-gradient: {weather_gradient};
    --daystrip-temperature-color: {temperature_color};
    --daystrip-temperature-gradient: {temperature_gradient};
    --daystrip-edge-portion: {edge_portion:.4};

    /* ===== Sun ===== */
    --daystrip-sun-color: {sun_color};
    --daystrip-sun-background: {sun_background};
    --daystrip-sun-blend-mode: {blend_mode};
    --daystrip-sun-canvas-left: {canvas_left:.2}%;
    --daystrip-sun-canvas-width: {canvas_width:.2}%;

    /* ===== Sun Icon ===== */
    --daystrip-sun-icon: {symbol};
    --daystrip-sun-icon-left: {icon_left:.2}%;
    --daystrip-sun-icon-top: {icon_top:.2}%;
    --daystrip-sun-icon-scale: {icon_scale};
    --daystrip-sun-icon-color: {icon_color};
    --daystrip-sun-icon-opacity: {icon_opacity:.3};
}}
"#,
            phase = self.phase.phase,
            next_phase = self.phase.next_phase,
            blend = self.phase.blend,
            background = self.layers.background_color,
            weather_color = self.weather_color,
            weather_gradient = self.layers.weather_gradient,
            temperature_color = self.temperature_color,
            temperature_gradient = self.layers.temperature_gradient,
            edge_portion = self.layers.edge_portion,
            sun_color = self.sun.appearance.color,
            sun_background = self.sun.background,
            blend_mode = self.sun.blend_mode,
            canvas_left = self.sun.canvas.left_percent,
            canvas_width = self.sun.canvas.width_percent,
            symbol = css_string(&icon.symbol),
            icon_left = icon.left_percent,
            icon_top = icon.top_percent,
            icon_scale = icon.scale,
            icon_color = icon.color,
            icon_opacity = icon.opacity,
        )
    }
}

/// Quote `value` as a CSS string literal.
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_phase::TimeOfDayPhase;

    fn noon() -> FrameInputs {
        FrameInputs {
            sunrise_minutes: Some(360.0),
            sunset_minutes: Some(1080.0),
            now_minutes: 720.0,
            solar_altitude: None,
            weather_code: Some(0),
            temperature_celsius: Some(20.0),
        }
    }

    #[test]
    fn test_noon_frame() {
        let frame = DayStripFrame::compute(&Config::default(), &noon());
        assert_eq!(frame.phase.phase, TimeOfDayPhase::Day);
        assert_eq!(frame.weather, Some(WeatherCondition::Clear));
        assert_eq!(frame.day_length_fraction, 0.5);
        assert_eq!(frame.layers.background_color, frame.phase.color);
        assert_eq!(frame.sun.blend_mode, "screen, normal");
    }

    #[test]
    fn test_missing_weather_clears_weather_layer() {
        let inputs = FrameInputs {
            weather_code: None,
            ..noon()
        };
        let frame = DayStripFrame::compute(&Config::default(), &inputs);
        assert_eq!(frame.weather, None);
        assert_eq!(
            frame.layers.weather_gradient,
            transparent_gradient(GradientDirection::ToRight)
        );
    }

    #[test]
    fn test_invalid_phase_color_falls_back() {
        let mut config = Config::default();
        config.phases.day = "sky blue".to_string();
        let frame = DayStripFrame::compute(&config, &noon());
        assert_eq!(frame.phase.color, PhaseColors::default().day);
    }

    #[test]
    fn test_css_vars_contains_expected_vars() {
        let css = DayStripFrame::compute(&Config::default(), &noon()).css_vars_block();

        assert!(css.starts_with(":root {"));
        assert!(css.contains("--daystrip-phase: day;"));
        assert!(css.contains("--daystrip-background-color: #"));
        assert!(css.contains("--daystrip-weather-gradient: linear-gradient("));
        assert!(css.contains("--daystrip-temperature-gradient: linear-gradient("));
        assert!(css.contains("--daystrip-sun-background: linear-gradient("));
        assert!(css.contains("--daystrip-sun-blend-mode: screen, normal;"));
        assert!(css.contains("--daystrip-sun-icon-left: 50.00%;"));
    }

    #[test]
    fn test_css_string_escapes() {
        assert_eq!(css_string("\u{2600}"), "\"\u{2600}\"");
        assert_eq!(css_string("a\"b\\"), "\"a\\\"b\\\\\"");
    }

    #[test]
    fn test_frame_is_idempotent() {
        let config = Config::default();
        let inputs = FrameInputs {
            now_minutes: 1071.25,
            ..noon()
        };
        let a = DayStripFrame::compute(&config, &inputs);
        let b = DayStripFrame::compute(&config, &inputs);
        assert_eq!(a, b);
        assert_eq!(a.css_vars_block(), b.css_vars_block());
    }
}
