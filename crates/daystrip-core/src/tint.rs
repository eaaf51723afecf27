//! Weather and temperature tint colors for the edge gradients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ensure_hex, lerp_color_gamma};

/// Coarse weather condition, classified from WMO weather interpretation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Storm,
}

impl WeatherCondition {
    /// Classify a WMO code. Unknown codes read as cloudy.
    pub fn from_wmo_code(code: u32) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1 | 2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Cloudy,
            45 | 48 => WeatherCondition::Fog,
            51..=57 => WeatherCondition::Drizzle,
            61..=67 | 80..=82 => WeatherCondition::Rain,
            71..=77 | 85 | 86 => WeatherCondition::Snow,
            95..=99 => WeatherCondition::Storm,
            _ => WeatherCondition::Cloudy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::PartlyCloudy => "partly-cloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Drizzle => "drizzle",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Storm => "storm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tint color per weather condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherPalette {
    pub clear: String,
    pub partly_cloudy: String,
    pub cloudy: String,
    pub fog: String,
    pub drizzle: String,
    pub rain: String,
    pub snow: String,
    pub storm: String,
}

impl Default for WeatherPalette {
    fn default() -> Self {
        Self {
            clear: "#ffd166".to_string(),
            partly_cloudy: "#cfd8dc".to_string(),
            cloudy: "#9aa5b1".to_string(),
            fog: "#b8c1c8".to_string(),
            drizzle: "#7fa7c9".to_string(),
            rain: "#4f7cac".to_string(),
            snow: "#e8f1f8".to_string(),
            storm: "#5b4b8a".to_string(),
        }
    }
}

impl WeatherPalette {
    pub fn get(&self, condition: WeatherCondition) -> &str {
        match condition {
            WeatherCondition::Clear => &self.clear,
            WeatherCondition::PartlyCloudy => &self.partly_cloudy,
            WeatherCondition::Cloudy => &self.cloudy,
            WeatherCondition::Fog => &self.fog,
            WeatherCondition::Drizzle => &self.drizzle,
            WeatherCondition::Rain => &self.rain,
            WeatherCondition::Snow => &self.snow,
            WeatherCondition::Storm => &self.storm,
        }
    }

    /// All entries as `(name, color)` pairs, for validation and summaries.
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("clear", self.clear.as_str()),
            ("partly_cloudy", self.partly_cloudy.as_str()),
            ("cloudy", self.cloudy.as_str()),
            ("fog", self.fog.as_str()),
            ("drizzle", self.drizzle.as_str()),
            ("rain", self.rain.as_str()),
            ("snow", self.snow.as_str()),
            ("storm", self.storm.as_str()),
        ]
    }
}

/// Tint for `condition`, falling back to the default palette's entry when
/// the configured color is not valid hex.
pub fn weather_tint(condition: WeatherCondition, palette: &WeatherPalette) -> String {
    let fallback = WeatherPalette::default();
    ensure_hex(palette.get(condition), fallback.get(condition))
}

/// Temperature anchors (degrees Celsius) and their colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemperatureScale {
    pub cold: f64,
    pub mild: f64,
    pub hot: f64,
    pub cold_color: String,
    pub mild_color: String,
    pub hot_color: String,
}

impl Default for TemperatureScale {
    fn default() -> Self {
        Self {
            cold: -5.0,
            mild: 15.0,
            hot: 32.0,
            cold_color: "#5fa8d3".to_string(),
            mild_color: "#e9c46a".to_string(),
            hot_color: "#e63946".to_string(),
        }
    }
}

/// Tint for `celsius` on `scale`. Unknown temperatures read as mild.
///
/// Below `cold` or above `hot` the end color holds. Anchors that are out of
/// order collapse the affected segment to a hard switch at `mild`.
pub fn temperature_tint(celsius: Option<f64>, scale: &TemperatureScale) -> String {
    let fallback = TemperatureScale::default();
    let cold_color = ensure_hex(&scale.cold_color, &fallback.cold_color);
    let mild_color = ensure_hex(&scale.mild_color, &fallback.mild_color);
    let hot_color = ensure_hex(&scale.hot_color, &fallback.hot_color);

    let Some(celsius) = celsius.filter(|c| c.is_finite()) else {
        return lerp_color_gamma(&mild_color, &mild_color, 0.0);
    };

    if celsius <= scale.mild {
        let span = scale.mild - scale.cold;
        let t = if span > 0.0 {
            (celsius - scale.cold) / span
        } else if celsius < scale.mild {
            0.0
        } else {
            1.0
        };
        lerp_color_gamma(&cold_color, &mild_color, t)
    } else {
        let span = scale.hot - scale.mild;
        let t = if span > 0.0 {
            (celsius - scale.mild) / span
        } else {
            1.0
        };
        lerp_color_gamma(&mild_color, &hot_color, t)
    }
}
