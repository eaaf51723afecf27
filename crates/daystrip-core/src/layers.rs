//! Weather and temperature edge gradients over the time-of-day background.

use serde::{Deserialize, Serialize};

use crate::day_geometry::{compute_day_length_fraction, gradient_width_scale};
use crate::easing::{AlphaGradientOptions, EasingProfile, create_alpha_gradient_curve};
use crate::gradient::{GradientLayerOptions, build_alpha_gradient_layer};

/// Largest share of the strip either edge gradient may cover.
const MAX_EDGE_PORTION: f64 = 0.5;

/// Edge gradient configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    /// Share of the strip each edge gradient covers on a 12 hour day.
    pub edge_portion: f64,
    /// Weather tint on the left edge.
    pub weather: AlphaGradientOptions,
    /// Temperature tint on the right edge.
    pub temperature: AlphaGradientOptions,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            edge_portion: 0.25,
            // Opaque at the strip edge, fading toward the middle
            weather: AlphaGradientOptions {
                profile: EasingProfile::SineInOut,
                enable_left: false,
                enable_right: true,
                inner_opacity_ratio: Some(0.2),
                opacity_scale: 0.6,
            },
            temperature: AlphaGradientOptions {
                profile: EasingProfile::SineInOut,
                enable_left: true,
                enable_right: false,
                inner_opacity_ratio: Some(0.2),
                opacity_scale: 0.6,
            },
        }
    }
}

/// The three layers handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientLayers {
    pub background_color: String,
    pub weather_gradient: String,
    pub temperature_gradient: String,
    /// Edge portion after day-length scaling.
    pub edge_portion: f64,
}

/// Edge portion scaled by day length, clamped to `[0, 0.5]`.
pub fn scaled_edge_portion(
    base_portion: f64,
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
) -> f64 {
    let base = if base_portion.is_finite() { base_portion } else { 0.0 };
    let scale = gradient_width_scale(compute_day_length_fraction(sunrise_minutes, sunset_minutes));
    (base * scale).clamp(0.0, MAX_EDGE_PORTION)
}

/// Build the background color and both edge gradients.
///
/// `base_color` is the resolved time-phase color and passes through as is.
pub fn compute_gradient_layers(
    config: &LayerConfig,
    base_color: &str,
    weather_color: &str,
    temperature_color: &str,
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
) -> GradientLayers {
    let edge_portion = scaled_edge_portion(config.edge_portion, sunrise_minutes, sunset_minutes);
    let options = GradientLayerOptions::default();

    let weather_curve = create_alpha_gradient_curve(&config.weather);
    let weather_gradient = build_alpha_gradient_layer(
        weather_color,
        &weather_curve,
        0.0,
        edge_portion,
        1.0,
        None,
        &options,
    );

    let temperature_curve = create_alpha_gradient_curve(&config.temperature);
    let temperature_gradient = build_alpha_gradient_layer(
        temperature_color,
        &temperature_curve,
        1.0 - edge_portion,
        1.0,
        1.0,
        None,
        &options,
    );

    tracing::trace!("Gradient layers: edge portion {:.4}", edge_portion);

    GradientLayers {
        background_color: base_color.to_string(),
        weather_gradient,
        temperature_gradient,
        edge_portion,
    }
}
