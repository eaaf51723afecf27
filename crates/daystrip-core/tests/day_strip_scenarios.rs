//! End-to-end day strip scenarios through the public API.

use chrono::NaiveDate;

use daystrip_core::color::{hex_to_rgb, lerp_color_gamma, rgb_to_hex};
use daystrip_core::day_geometry::{compute_day_length_fraction, gradient_width_scale};
use daystrip_core::easing::{AlphaGradientOptions, create_alpha_gradient_curve, sample_curve};
use daystrip_core::gradient::{
    GradientDirection, GradientLayerOptions, build_alpha_gradient_layer, transparent_gradient,
};
use daystrip_core::solar::compute_solar_altitude;
use daystrip_core::time_phase::{
    PhaseColors, TransitionWindow, Transitions, resolve_time_phase_color,
};
use daystrip_core::{Config, DayStripFrame, FrameInputs, TimeOfDayPhase};

const SUNRISE: f64 = 360.0;
const SUNSET: f64 = 1080.0;

fn inputs_at(now: f64) -> FrameInputs {
    FrameInputs {
        sunrise_minutes: Some(SUNRISE),
        sunset_minutes: Some(SUNSET),
        now_minutes: now,
        solar_altitude: None,
        weather_code: Some(61),
        temperature_celsius: Some(8.0),
    }
}

#[test]
fn test_hex_round_trip() {
    for hex in ["#000000", "#ffffff", "#1d2340", "#e76f51", "#8ecae6"] {
        assert_eq!(rgb_to_hex(hex_to_rgb(hex)), hex);
    }
}

#[test]
fn test_gamma_lerp_endpoints() {
    let pairs = [("#1d2340", "#f6c28b"), ("#000000", "#ffffff"), ("#e76f51", "#8ecae6")];
    for (a, b) in pairs {
        assert_eq!(lerp_color_gamma(a, b, 0.0), a);
        assert_eq!(lerp_color_gamma(a, b, 1.0), b);
    }
}

#[test]
fn test_curve_ends() {
    let both = create_alpha_gradient_curve(&AlphaGradientOptions::default());
    assert_eq!(sample_curve(&both, 0.0), 0.0);
    assert!(sample_curve(&both, 1.0).abs() < 1e-12);

    let left_only = create_alpha_gradient_curve(&AlphaGradientOptions {
        enable_right: false,
        opacity_scale: 0.7,
        ..Default::default()
    });
    assert_eq!(sample_curve(&left_only, 0.0), 0.0);
    assert_eq!(sample_curve(&left_only, 1.0), 0.7);

    let flat = create_alpha_gradient_curve(&AlphaGradientOptions {
        enable_left: false,
        enable_right: false,
        opacity_scale: 0.4,
        ..Default::default()
    });
    for i in 0..=20 {
        assert_eq!(sample_curve(&flat, i as f64 / 20.0), 0.4);
    }
}

#[test]
fn test_day_geometry_pivot() {
    assert_eq!(compute_day_length_fraction(Some(SUNRISE), Some(SUNSET)), 0.5);
    assert_eq!(gradient_width_scale(0.5), 1.0);
}

#[test]
fn test_zero_width_windows_flip_instantly_at_sunset() {
    let colors = PhaseColors::default();

    let instant = Transitions::INSTANT;
    let before =
        resolve_time_phase_color(&colors, &instant, Some(SUNRISE), Some(SUNSET), 1079.0);
    assert_eq!(before.phase, TimeOfDayPhase::Day);
    assert_eq!(before.blend, 0.0);

    let after = resolve_time_phase_color(&colors, &instant, Some(SUNRISE), Some(SUNSET), 1080.0);
    assert_eq!(after.phase, TimeOfDayPhase::Night);
    assert_eq!(after.blend, 0.0);
}

#[test]
fn test_sunset_window_blends_between_day_and_evening() {
    let colors = PhaseColors::default();
    let transitions = Transitions {
        sunrise: TransitionWindow::default(),
        sunset: TransitionWindow::new(30.0, 30.0),
    };

    let result =
        resolve_time_phase_color(&colors, &transitions, Some(SUNRISE), Some(SUNSET), 1065.0);
    assert!(result.blend > 0.0 && result.blend < 1.0, "blend {}", result.blend);
    assert_ne!(result.color, colors.day);
    assert_ne!(result.color, colors.evening);

    // Each channel sits between the two endpoints
    let day = hex_to_rgb(&colors.day);
    let evening = hex_to_rgb(&colors.evening);
    let mixed = hex_to_rgb(&result.color);
    let channels = [
        (day.r, evening.r, mixed.r),
        (day.g, evening.g, mixed.g),
        (day.b, evening.b, mixed.b),
    ];
    for (a, b, m) in channels {
        assert!(m >= a.min(b) && m <= a.max(b));
    }
}

#[test]
fn test_equinox_noon_altitude_near_zenith() {
    let noon = NaiveDate::from_ymd_opt(2024, 3, 20)
        .unwrap()
        .and_hms_opt(12, 7, 0)
        .unwrap();
    let altitude = compute_solar_altitude(noon, 0.0, 0.0, 0.0).unwrap();
    assert!(altitude > 85.0, "altitude {}", altitude);
}

#[test]
fn test_degenerate_gradient_ranges() {
    let curve = create_alpha_gradient_curve(&AlphaGradientOptions::default());
    let options = GradientLayerOptions::default();
    let transparent = transparent_gradient(GradientDirection::ToRight);

    assert_eq!(
        build_alpha_gradient_layer("#ffffff", &curve, 0.7, 0.3, 1.0, None, &options),
        transparent
    );
    assert_eq!(
        build_alpha_gradient_layer("#ffffff", &curve, 0.3, 0.3, 1.0, None, &options),
        transparent
    );
}

#[test]
fn test_frame_through_the_day() {
    let config = Config::default();

    // Early in the pre-dawn window night still dominates
    let dawn = DayStripFrame::compute(&config, &inputs_at(SUNRISE - 40.0));
    assert_eq!(dawn.phase.phase, TimeOfDayPhase::Night);
    assert_eq!(dawn.phase.next_phase, TimeOfDayPhase::Morning);
    assert!(dawn.phase.blend > 0.0);
    assert!(dawn.sun.appearance.is_night);

    let noon = DayStripFrame::compute(&config, &inputs_at(720.0));
    assert_eq!(noon.phase.phase, TimeOfDayPhase::Day);
    assert!(!noon.sun.appearance.is_night);

    let midnight = DayStripFrame::compute(&config, &inputs_at(0.0));
    assert_eq!(midnight.phase.phase, TimeOfDayPhase::Night);
    assert_eq!(midnight.sun.blend_mode, "multiply, multiply");
}

#[test]
fn test_frame_without_solar_path_uses_clock_table() {
    let config = Config::default();
    let inputs = FrameInputs {
        sunrise_minutes: None,
        sunset_minutes: None,
        now_minutes: 7.0 * 60.0,
        ..Default::default()
    };
    let frame = DayStripFrame::compute(&config, &inputs);
    assert_eq!(frame.phase.phase, TimeOfDayPhase::Morning);
    assert_eq!(frame.phase.blend, 0.0);
    assert_eq!(frame.day_length_fraction, 0.5);
}

#[test]
fn test_frames_are_byte_identical() {
    let config = Config::default();
    for now in [0.0, 355.5, 720.0, 1071.25, 1100.0] {
        let a = DayStripFrame::compute(&config, &inputs_at(now));
        let b = DayStripFrame::compute(&config, &inputs_at(now));
        assert_eq!(a.css_vars_block(), b.css_vars_block());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

#[test]
fn test_frame_serializes_to_json() {
    let frame = DayStripFrame::compute(&Config::default(), &inputs_at(720.0));
    let value = serde_json::to_value(&frame).unwrap();

    assert_eq!(value["phase"]["phase"], "day");
    assert_eq!(value["weather"], "rain");
    assert!(value["layers"]["weather_gradient"]
        .as_str()
        .unwrap()
        .starts_with("linear-gradient("));
    assert_eq!(value["sun"]["icon"]["left_percent"], 50.0);
}
