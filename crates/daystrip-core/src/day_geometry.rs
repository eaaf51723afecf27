//! Day length and the gradient width scale derived from it.

pub const MINUTES_PER_DAY: f64 = 1440.0;

// Width scale anchors: short days shrink edge gradients, long days widen them.
const SHORTEST_DAY_SCALE: f64 = 0.8;
const EQUINOX_SCALE: f64 = 1.0;
const LONGEST_DAY_SCALE: f64 = 4.0 / 3.0;

/// Fraction of the 24h clock covered by daylight, in `[0, 1]`.
///
/// A sunset that reads earlier than sunrise wraps past midnight. Missing
/// inputs resolve as: both unknown -> 0.5, only sunrise -> 1, only sunset -> 0.
pub fn compute_day_length_fraction(
    sunrise_minutes: Option<f64>,
    sunset_minutes: Option<f64>,
) -> f64 {
    let sunrise = sunrise_minutes.filter(|m| m.is_finite());
    let sunset = sunset_minutes.filter(|m| m.is_finite());

    match (sunrise, sunset) {
        (None, None) => 0.5,
        (Some(_), None) => 1.0,
        (None, Some(_)) => 0.0,
        (Some(sunrise), Some(sunset)) => {
            let mut minutes = sunset - sunrise;
            if minutes < 0.0 {
                minutes += MINUTES_PER_DAY;
            }
            (minutes / MINUTES_PER_DAY).clamp(0.0, 1.0)
        }
    }
}

/// Scale factor for edge gradients: `[0, 0.5] -> [0.8, 1.0]` and
/// `[0.5, 1] -> [1.0, 4/3]`, piecewise linear.
pub fn gradient_width_scale(day_fraction: f64) -> f64 {
    let f = if day_fraction.is_finite() {
        day_fraction.clamp(0.0, 1.0)
    } else {
        0.5
    };

    if f < 0.5 {
        EQUINOX_SCALE - (0.5 - f) / 0.5 * (EQUINOX_SCALE - SHORTEST_DAY_SCALE)
    } else {
        EQUINOX_SCALE + (f - 0.5) / 0.5 * (LONGEST_DAY_SCALE - EQUINOX_SCALE)
    }
}
