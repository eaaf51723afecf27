//! Alpha-gradient layer builder.
//!
//! Turns a color and an [`AlphaCurve`] laid over a sub-range of the strip
//! into a CSS `linear-gradient(...)` string. The sub-range may overshoot
//! `[0, 1]`; only the visible slice is emitted but it is sampled against the
//! full curve, so a clipped glow keeps its shape.

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, hex_to_rgb, rgba_str};
use crate::easing::{AlphaCurve, sample_curve};

/// Minimum number of interior samples per layer.
const MIN_SAMPLES: usize = 32;
/// Sample density: one stop per 1/256th of the strip.
const SAMPLES_PER_UNIT: f64 = 256.0;
/// Visible widths at or below this are treated as empty.
const MIN_VISIBLE_WIDTH: f64 = 1e-6;

/// Direction of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToBottom,
}

impl GradientDirection {
    pub fn as_css(self) -> &'static str {
        match self {
            GradientDirection::ToRight => "to right",
            GradientDirection::ToBottom => "to bottom",
        }
    }
}

/// Rendering options for [`build_alpha_gradient_layer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientLayerOptions {
    pub direction: GradientDirection,
    /// Lower bound on interior samples.
    pub min_samples: usize,
}

impl Default for GradientLayerOptions {
    fn default() -> Self {
        Self {
            direction: GradientDirection::ToRight,
            min_samples: MIN_SAMPLES,
        }
    }
}

/// One color stop of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient, `[0, 1]`.
    pub position: f64,
    pub color: Rgb,
    pub alpha: f64,
}

impl GradientStop {
    pub fn new(position: f64, color: Rgb, alpha: f64) -> Self {
        Self {
            position: position.clamp(0.0, 1.0),
            color,
            alpha: if alpha > 0.0 { alpha.min(1.0) } else { 0.0 },
        }
    }

    fn to_css(self) -> String {
        format!(
            "{} {:.2}%",
            rgba_str(self.color, self.alpha),
            self.position * 100.0
        )
    }
}

/// Per-stop alpha post-processing hook: `(alpha, curve_position) -> alpha`.
///
/// `curve_position` is the stop's position within the full (unclamped) curve
/// domain, so 0.5 is always the curve's center.
pub type AlphaTransform<'a> = &'a dyn Fn(f64, f64) -> f64;

/// The gradient emitted when nothing is visible.
pub fn transparent_gradient(direction: GradientDirection) -> String {
    format!(
        "linear-gradient({}, transparent 0%, transparent 100%)",
        direction.as_css()
    )
}

/// Render stops as a CSS linear gradient.
pub fn format_linear_gradient(direction: GradientDirection, stops: &[GradientStop]) -> String {
    if stops.len() < 2 {
        return transparent_gradient(direction);
    }

    let body = stops
        .iter()
        .map(|stop| stop.to_css())
        .collect::<Vec<_>>()
        .join(", ");
    format!("linear-gradient({}, {})", direction.as_css(), body)
}

/// Compute the ordered stops for a curve spanning `[start_frac, end_frac]`.
///
/// Returns an empty list when the visible range is empty. `scale` multiplies
/// the curve's alpha before `transform` runs.
pub fn build_alpha_gradient_stops(
    color: Rgb,
    curve: &AlphaCurve,
    start_frac: f64,
    end_frac: f64,
    scale: f64,
    transform: Option<AlphaTransform<'_>>,
    options: &GradientLayerOptions,
) -> Vec<GradientStop> {
    if !start_frac.is_finite() || !end_frac.is_finite() || start_frac >= end_frac {
        return Vec::new();
    }

    let visible_start = start_frac.max(0.0);
    let visible_end = end_frac.min(1.0);
    let visible_width = visible_end - visible_start;
    if visible_width <= MIN_VISIBLE_WIDTH {
        return Vec::new();
    }

    let span = end_frac - start_frac;
    let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    let samples = options
        .min_samples
        .max(MIN_SAMPLES)
        .max((visible_width * SAMPLES_PER_UNIT).ceil() as usize);

    let mut stops = Vec::with_capacity(samples + 5);

    // Transparent lead-in so the area before the layer stays clear.
    if visible_start > 0.0 {
        stops.push(GradientStop::new(0.0, color, 0.0));
        stops.push(GradientStop::new(visible_start, color, 0.0));
    }

    for i in 0..=samples {
        let position = visible_start + visible_width * (i as f64 / samples as f64);
        let curve_position = (position - start_frac) / span;
        let mut alpha = sample_curve(curve, curve_position) * scale;
        if let Some(transform) = transform {
            alpha = transform(alpha, curve_position);
        }
        stops.push(GradientStop::new(position, color, alpha));
    }

    if visible_end < 1.0 {
        stops.push(GradientStop::new(visible_end, color, 0.0));
        stops.push(GradientStop::new(1.0, color, 0.0));
    }

    stops
}

/// Build a CSS gradient for `color` shaped by `curve` over
/// `[start_frac, end_frac]`.
///
/// An empty or inverted range yields [`transparent_gradient`]; this never
/// fails.
pub fn build_alpha_gradient_layer(
    color: &str,
    curve: &AlphaCurve,
    start_frac: f64,
    end_frac: f64,
    scale: f64,
    transform: Option<AlphaTransform<'_>>,
    options: &GradientLayerOptions,
) -> String {
    let stops = build_alpha_gradient_stops(
        hex_to_rgb(color),
        curve,
        start_frac,
        end_frac,
        scale,
        transform,
        options,
    );

    if stops.is_empty() {
        tracing::trace!(
            "Empty gradient range [{}, {}], emitting transparent layer",
            start_frac,
            end_frac
        );
        return transparent_gradient(options.direction);
    }

    format_linear_gradient(options.direction, &stops)
}
