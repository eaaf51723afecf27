//! Easing functions and alpha curves.
//!
//! An [`AlphaCurve`] describes opacity over `[0, 1]` as three segments: a
//! left fade-in, an opaque plateau and a right fade-out. The widths are
//! resolved once from [`AlphaGradientOptions`] and the curve is then sampled
//! with [`sample_curve`].

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Signature shared by every easing function.
pub type EasingFn = fn(f64) -> f64;

const DEFAULT_INNER_RATIO: f64 = 0.5;

fn clamp01(t: f64) -> f64 {
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

pub fn ease_in_sine(t: f64) -> f64 {
    let t = clamp01(t);
    1.0 - (t * PI / 2.0).cos()
}

pub fn ease_out_sine(t: f64) -> f64 {
    let t = clamp01(t);
    (t * PI / 2.0).sin()
}

pub fn ease_in_out_sine(t: f64) -> f64 {
    let t = clamp01(t);
    -((PI * t).cos() - 1.0) / 2.0
}

pub fn ease_in_quad(t: f64) -> f64 {
    let t = clamp01(t);
    t * t
}

pub fn ease_out_quad(t: f64) -> f64 {
    let t = clamp01(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn ease_in_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    t * t * t
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn ease_in_circ(t: f64) -> f64 {
    let t = clamp01(t);
    1.0 - (1.0 - t * t).sqrt()
}

pub fn ease_out_circ(t: f64) -> f64 {
    let t = clamp01(t);
    (1.0 - (t - 1.0).powi(2)).sqrt()
}

pub fn ease_in_out_circ(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
    } else {
        ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
    }
}

/// Named easing curve shapes.
///
/// Serialized in kebab-case, e.g. `"sine-in-out"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingProfile {
    SineIn,
    SineOut,
    #[default]
    SineInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    CircIn,
    CircOut,
    CircInOut,
}

impl EasingProfile {
    pub const ALL: [EasingProfile; 12] = [
        EasingProfile::SineIn,
        EasingProfile::SineOut,
        EasingProfile::SineInOut,
        EasingProfile::QuadIn,
        EasingProfile::QuadOut,
        EasingProfile::QuadInOut,
        EasingProfile::CubicIn,
        EasingProfile::CubicOut,
        EasingProfile::CubicInOut,
        EasingProfile::CircIn,
        EasingProfile::CircOut,
        EasingProfile::CircInOut,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EasingProfile::SineIn => "sine-in",
            EasingProfile::SineOut => "sine-out",
            EasingProfile::SineInOut => "sine-in-out",
            EasingProfile::QuadIn => "quad-in",
            EasingProfile::QuadOut => "quad-out",
            EasingProfile::QuadInOut => "quad-in-out",
            EasingProfile::CubicIn => "cubic-in",
            EasingProfile::CubicOut => "cubic-out",
            EasingProfile::CubicInOut => "cubic-in-out",
            EasingProfile::CircIn => "circ-in",
            EasingProfile::CircOut => "circ-out",
            EasingProfile::CircInOut => "circ-in-out",
        }
    }

    /// Resolve the profile to its easing function.
    pub fn function(self) -> EasingFn {
        match self {
            EasingProfile::SineIn => ease_in_sine,
            EasingProfile::SineOut => ease_out_sine,
            EasingProfile::SineInOut => ease_in_out_sine,
            EasingProfile::QuadIn => ease_in_quad,
            EasingProfile::QuadOut => ease_out_quad,
            EasingProfile::QuadInOut => ease_in_out_quad,
            EasingProfile::CubicIn => ease_in_cubic,
            EasingProfile::CubicOut => ease_out_cubic,
            EasingProfile::CubicInOut => ease_in_out_cubic,
            EasingProfile::CircIn => ease_in_circ,
            EasingProfile::CircOut => ease_out_circ,
            EasingProfile::CircInOut => ease_in_out_circ,
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        (self.function())(t)
    }
}

impl fmt::Display for EasingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EasingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingProfile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown easing profile '{}', expected one of: {}",
                    s,
                    EasingProfile::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Configuration for an alpha curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlphaGradientOptions {
    /// Easing used by both fades.
    pub profile: EasingProfile,
    /// Fade in from the left edge.
    pub enable_left: bool,
    /// Fade out toward the right edge.
    pub enable_right: bool,
    /// Share of the domain held at full opacity. Unset means 0.5.
    pub inner_opacity_ratio: Option<f64>,
    /// Opacity of the plateau.
    pub opacity_scale: f64,
}

impl Default for AlphaGradientOptions {
    fn default() -> Self {
        Self {
            profile: EasingProfile::default(),
            enable_left: true,
            enable_right: true,
            inner_opacity_ratio: None,
            opacity_scale: 1.0,
        }
    }
}

/// A resolved alpha curve. Segment widths always sum to 1.
///
/// An inner ratio of 1 leaves both fades with zero width even when enabled,
/// so the ends sample at `opacity_scale` rather than 0.
#[derive(Debug, Clone, Copy)]
pub struct AlphaCurve {
    pub profile: EasingProfile,
    pub easing: EasingFn,
    pub left_width: f64,
    pub inner_width: f64,
    pub right_width: f64,
    pub opacity_scale: f64,
}

/// Resolve options into an [`AlphaCurve`].
///
/// A disabled side gives its width to the enabled side, so a single-sided
/// fade is twice as wide as each fade of a symmetric curve. With both sides
/// disabled the curve is a constant plateau.
pub fn create_alpha_gradient_curve(options: &AlphaGradientOptions) -> AlphaCurve {
    let inner_ratio = clamp01(options.inner_opacity_ratio.unwrap_or(DEFAULT_INNER_RATIO));
    let opacity_scale = clamp01(options.opacity_scale);
    let base_edge_width = (1.0 - inner_ratio) / 2.0;

    let (mut left, mut inner, mut right) = match (options.enable_left, options.enable_right) {
        (true, true) => (base_edge_width, inner_ratio, base_edge_width),
        (true, false) => (base_edge_width * 2.0, inner_ratio, 0.0),
        (false, true) => (0.0, inner_ratio, base_edge_width * 2.0),
        (false, false) => (0.0, 1.0, 0.0),
    };

    let total = left + inner + right;
    if total > 0.0 {
        left /= total;
        inner /= total;
        right /= total;
    } else {
        (left, inner, right) = (0.0, 1.0, 0.0);
    }

    AlphaCurve {
        profile: options.profile,
        easing: options.profile.function(),
        left_width: left,
        inner_width: inner,
        right_width: right,
        opacity_scale,
    }
}

/// Sample the curve's opacity at `position`. Outside `[0, 1]` returns 0.
pub fn sample_curve(curve: &AlphaCurve, position: f64) -> f64 {
    if !position.is_finite() || !(0.0..=1.0).contains(&position) {
        return 0.0;
    }

    if curve.left_width > 0.0 && position < curve.left_width {
        let t = position / curve.left_width;
        return curve.opacity_scale * (curve.easing)(t);
    }

    let right_start = 1.0 - curve.right_width;
    if curve.right_width > 0.0 && position > right_start {
        let t = (position - right_start) / curve.right_width;
        return curve.opacity_scale * (curve.easing)(1.0 - t);
    }

    curve.opacity_scale
}

/// Sample the curve at `resolution` evenly spaced positions from 0 to 1
/// inclusive. Fewer than two samples are widened to two.
pub fn sample_curve_stops(curve: &AlphaCurve, resolution: usize) -> Vec<f64> {
    let count = resolution.max(2);
    let last = (count - 1) as f64;
    (0..count)
        .map(|i| sample_curve(curve, i as f64 / last))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn options(enable_left: bool, enable_right: bool) -> AlphaGradientOptions {
        AlphaGradientOptions {
            enable_left,
            enable_right,
            opacity_scale: 0.8,
            ..Default::default()
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for profile in EasingProfile::ALL {
            assert!(profile.apply(0.0).abs() < EPS, "{} at 0", profile);
            assert!((profile.apply(1.0) - 1.0).abs() < EPS, "{} at 1", profile);
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        for profile in EasingProfile::ALL {
            assert!(profile.apply(-3.0).abs() < EPS);
            assert!((profile.apply(7.0) - 1.0).abs() < EPS);
            assert!(profile.apply(f64::NAN).abs() < EPS);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for profile in EasingProfile::ALL {
            let mut previous = profile.apply(0.0);
            for i in 1..=200 {
                let value = profile.apply(i as f64 / 200.0);
                assert!(value + EPS >= previous, "{} not monotonic at {}", profile, i);
                previous = value;
            }
        }
    }

    #[test]
    fn test_in_out_symmetric() {
        for profile in [
            EasingProfile::SineInOut,
            EasingProfile::QuadInOut,
            EasingProfile::CubicInOut,
            EasingProfile::CircInOut,
        ] {
            for i in 0..=50 {
                let t = i as f64 / 100.0;
                let sum = profile.apply(t) + profile.apply(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-9, "{} asymmetric at {}", profile, t);
            }
        }
    }

    #[test]
    fn test_profile_parse_round_trip() {
        for profile in EasingProfile::ALL {
            assert_eq!(profile.as_str().parse::<EasingProfile>(), Ok(profile));
        }
        assert!("bounce".parse::<EasingProfile>().is_err());
    }

    #[test]
    fn test_curve_widths_sum_to_one() {
        for (l, r) in [(true, true), (true, false), (false, true), (false, false)] {
            let curve = create_alpha_gradient_curve(&options(l, r));
            let total = curve.left_width + curve.inner_width + curve.right_width;
            assert!((total - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_single_sided_fade_is_twice_as_wide() {
        let both = create_alpha_gradient_curve(&options(true, true));
        let left_only = create_alpha_gradient_curve(&options(true, false));
        assert!((left_only.left_width - 2.0 * both.left_width).abs() < EPS);
        assert_eq!(left_only.right_width, 0.0);
    }

    #[test]
    fn test_curve_endpoints() {
        let both = create_alpha_gradient_curve(&options(true, true));
        assert!(sample_curve(&both, 0.0).abs() < EPS);
        assert!(sample_curve(&both, 1.0).abs() < EPS);
        assert!((sample_curve(&both, 0.5) - 0.8).abs() < EPS);

        let right_only = create_alpha_gradient_curve(&options(false, true));
        assert!((sample_curve(&right_only, 0.0) - 0.8).abs() < EPS);
        assert!(sample_curve(&right_only, 1.0).abs() < EPS);

        let left_only = create_alpha_gradient_curve(&options(true, false));
        assert!(sample_curve(&left_only, 0.0).abs() < EPS);
        assert!((sample_curve(&left_only, 1.0) - 0.8).abs() < EPS);
    }

    #[test]
    fn test_both_disabled_is_constant_plateau() {
        let curve = create_alpha_gradient_curve(&options(false, false));
        assert_eq!(curve.inner_width, 1.0);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!((sample_curve(&curve, t) - 0.8).abs() < EPS);
        }
    }

    #[test]
    fn test_sample_outside_domain_is_zero() {
        let curve = create_alpha_gradient_curve(&options(false, false));
        assert_eq!(sample_curve(&curve, -0.01), 0.0);
        assert_eq!(sample_curve(&curve, 1.01), 0.0);
        assert_eq!(sample_curve(&curve, f64::NAN), 0.0);
    }

    #[test]
    fn test_inner_ratio_defaults_and_clamps() {
        let default_ratio = create_alpha_gradient_curve(&AlphaGradientOptions::default());
        assert!((default_ratio.inner_width - 0.5).abs() < EPS);

        let clamped = create_alpha_gradient_curve(&AlphaGradientOptions {
            inner_opacity_ratio: Some(4.0),
            ..Default::default()
        });
        assert!((clamped.inner_width - 1.0).abs() < EPS);
    }

    #[test]
    fn test_full_inner_ratio_has_no_fades() {
        let curve = create_alpha_gradient_curve(&AlphaGradientOptions {
            inner_opacity_ratio: Some(1.0),
            opacity_scale: 0.8,
            ..Default::default()
        });
        assert_eq!(curve.left_width, 0.0);
        assert_eq!(curve.right_width, 0.0);
        // Enabled sides with no width cannot fade to zero at the ends
        assert_eq!(sample_curve(&curve, 0.0), 0.8);
        assert_eq!(sample_curve(&curve, 1.0), 0.8);
    }

    #[test]
    fn test_sample_curve_stops() {
        let curve = create_alpha_gradient_curve(&options(true, true));
        let stops = sample_curve_stops(&curve, 5);
        assert_eq!(stops.len(), 5);
        assert!(stops[0].abs() < EPS);
        assert!((stops[2] - 0.8).abs() < EPS);
        assert!(stops[4].abs() < EPS);

        assert_eq!(sample_curve_stops(&curve, 0).len(), 2);
    }
}
