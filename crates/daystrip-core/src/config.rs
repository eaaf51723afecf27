//! Configuration types and parsing.
//!
//! `Config` is the explicit settings value passed into every render entry
//! point. Each section reuses the option types of the module it configures,
//! so the TOML schema and the computation inputs never drift apart.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::color::is_hex_color;
use crate::easing::AlphaGradientOptions;
use crate::error::{Error, Result};
use crate::layers::LayerConfig;
use crate::sun_overlay::{OpacityTriple, SunOverlayConfig};
use crate::time_phase::{PhaseColors, TransitionWindow, Transitions};
use crate::tint::{TemperatureScale, WeatherPalette};

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Longest allowed transition window on either side of an event.
const MAX_WINDOW_MINUTES: f64 = 720.0;

/// Largest UTC offset in use anywhere (UTC+14).
const MAX_UTC_OFFSET_MINUTES: f64 = 840.0;

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base colors per time-of-day phase.
    pub phases: PhaseColors,

    /// Blend windows around sunrise and sunset for the base color.
    pub transitions: Transitions,

    /// Weather and temperature edge gradients.
    pub layers: LayerConfig,

    /// Weather tint palette.
    pub weather: WeatherPalette,

    /// Temperature tint anchors.
    pub temperature: TemperatureScale,

    /// Sun glow, vignette and icon.
    pub sun: SunOverlayConfig,

    /// Observer location for computed sun times and altitude.
    pub location: LocationConfig,
}

/// Observer location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Offset of the local clock from UTC. Unset uses the system offset.
    pub utc_offset_minutes: Option<f64>,
    /// Place the sun icon by measured solar altitude instead of a sine arc.
    pub use_solar_altitude: bool,
}

impl LocationConfig {
    /// Latitude and longitude, when both are configured.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// User-provided values override defaults; missing sections or fields
    /// fall back to the embedded default config.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Parse both the default and user TOML as tables, deep-merge them (user
    /// values win), then deserialize the result.
    fn load_with_defaults(user_toml: &str) -> Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// If `explicit_path` is `Some`, that path is used directly and an error
    /// is returned if it doesn't exist or can't be parsed (no fallback).
    ///
    /// If `explicit_path` is `None`, searches in order:
    /// 1. `$XDG_CONFIG_HOME/daystrip/config.toml`
    /// 2. `~/.config/daystrip/config.toml`
    /// 3. `./config.toml` (current working directory)
    ///
    /// If no config file is found in the search chain, the embedded default
    /// config is used.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        // A config file that exists but fails to load is an error, not a
        // reason to fall back to defaults.
        let search_paths = Self::config_search_paths();
        let mut first_error: Option<(PathBuf, Error)> = None;

        for path in &search_paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {:?}", path);
                        return Ok(ConfigLoadResult {
                            config,
                            source: Some(path.clone()),
                            used_defaults: false,
                        });
                    }
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some((path.clone(), e));
                        }
                    }
                }
            }
        }

        if let Some((path, error)) = first_error {
            tracing::error!(
                "Config file {:?} exists but failed to load: {}",
                path,
                error
            );
            return Err(error);
        }

        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ConfigLoadResult {
            config: Self::from_default_toml()?,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("daystrip/config.toml"));
        }

        if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/daystrip/config.toml"));
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, returning every invalid value at once.
    ///
    /// Rendering itself tolerates bad values by falling back to defaults;
    /// this is the strict check run when a config is loaded.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        // Colors
        for (name, color) in [
            ("morning", &self.phases.morning),
            ("day", &self.phases.day),
            ("evening", &self.phases.evening),
            ("night", &self.phases.night),
        ] {
            check_hex(&mut errors, &format!("phases.{}", name), color);
        }
        for (name, color) in self.weather.entries() {
            check_hex(&mut errors, &format!("weather.{}", name), color);
        }
        check_hex(&mut errors, "temperature.cold_color", &self.temperature.cold_color);
        check_hex(&mut errors, "temperature.mild_color", &self.temperature.mild_color);
        check_hex(&mut errors, "temperature.hot_color", &self.temperature.hot_color);
        for (name, color) in [
            ("night", &self.sun.colors.night),
            ("sunrise", &self.sun.colors.sunrise),
            ("day", &self.sun.colors.day),
            ("sunset", &self.sun.colors.sunset),
        ] {
            check_hex(&mut errors, &format!("sun.colors.{}", name), color);
        }
        if let Some(ref color) = self.sun.icon.color {
            check_hex(&mut errors, "sun.icon.color", color);
        }

        // Transition windows
        check_transitions(&mut errors, "transitions", &self.transitions);
        check_transitions(&mut errors, "sun.transitions", &self.sun.transitions);

        // Edge layers
        if !(0.0..=0.5).contains(&self.layers.edge_portion) {
            errors.push(format!(
                "layers.edge_portion: invalid value '{}', must be between 0.0 and 0.5",
                self.layers.edge_portion
            ));
        }
        check_curve(&mut errors, "layers.weather", &self.layers.weather);
        check_curve(&mut errors, "layers.temperature", &self.layers.temperature);

        // Temperature anchors
        let t = &self.temperature;
        if !(t.cold.is_finite() && t.mild.is_finite() && t.hot.is_finite())
            || t.cold > t.mild
            || t.mild > t.hot
        {
            errors.push(format!(
                "temperature: anchors must satisfy cold <= mild <= hot (got {}, {}, {})",
                t.cold, t.mild, t.hot
            ));
        }

        // Sun overlay
        check_triple(&mut errors, "sun.day_opacity", &self.sun.day_opacity);
        check_triple(&mut errors, "sun.night_opacity", &self.sun.night_opacity);
        check_unit(&mut errors, "sun.gradient_opacity", self.sun.gradient_opacity);
        check_unit(&mut errors, "sun.inner_ratio", self.sun.inner_ratio);
        check_unit(&mut errors, "sun.vertical_fade.top", self.sun.vertical_fade.top);
        check_unit(
            &mut errors,
            "sun.vertical_fade.middle",
            self.sun.vertical_fade.middle,
        );
        if !(self.sun.glow_half_width > 0.0 && self.sun.glow_half_width <= 100.0) {
            errors.push(format!(
                "sun.glow_half_width: invalid value '{}', must be greater than 0 and at most 100",
                self.sun.glow_half_width
            ));
        }
        if !(0.0..=100.0).contains(&self.sun.overflow) {
            errors.push(format!(
                "sun.overflow: invalid value '{}', must be between 0 and 100",
                self.sun.overflow
            ));
        }
        if !(self.sun.icon.scale.is_finite() && self.sun.icon.scale > 0.0) {
            errors.push(format!(
                "sun.icon.scale: invalid value '{}', must be greater than 0",
                self.sun.icon.scale
            ));
        }

        // Location
        if let Some(latitude) = self.location.latitude
            && !(-90.0..=90.0).contains(&latitude)
        {
            errors.push(format!(
                "location.latitude: invalid value '{}', must be between -90 and 90",
                latitude
            ));
        }
        if let Some(longitude) = self.location.longitude
            && !(-180.0..=180.0).contains(&longitude)
        {
            errors.push(format!(
                "location.longitude: invalid value '{}', must be between -180 and 180",
                longitude
            ));
        }
        if let Some(offset) = self.location.utc_offset_minutes
            && !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset)
        {
            errors.push(format!(
                "location.utc_offset_minutes: invalid value '{}', must be between -840 and 840",
                offset
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Check for potential configuration issues and return warnings.
    ///
    /// Unlike `validate()`, these are non-fatal issues that might indicate
    /// a mistake.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.sun.gradient_opacity == 0.0
            || (self.sun.day_opacity.peak == 0.0 && self.sun.night_opacity.peak == 0.0)
        {
            warnings.push("sun: glow opacity is zero, the sun glow will be invisible".to_string());
        }

        for (name, window) in [
            ("transitions.sunrise", self.transitions.sunrise),
            ("transitions.sunset", self.transitions.sunset),
            ("sun.transitions.sunrise", self.sun.transitions.sunrise),
            ("sun.transitions.sunset", self.sun.transitions.sunset),
        ] {
            if window.before + window.after > MAX_WINDOW_MINUTES {
                warnings.push(format!(
                    "{}: window spans more than half a day ({} minutes), blends will overlap",
                    name,
                    window.before + window.after
                ));
            }
        }

        let location = &self.location;
        if location.latitude.is_some() != location.longitude.is_some() {
            warnings.push(
                "location: only one of latitude/longitude is set; sun times cannot be computed"
                    .to_string(),
            );
        }
        if location.use_solar_altitude && location.coordinates().is_none() {
            warnings.push(
                "location.use_solar_altitude: enabled but latitude/longitude are missing; \
                 the sun icon will follow a sine arc"
                    .to_string(),
            );
        }

        if self.layers.edge_portion == 0.0 {
            warnings.push("layers.edge_portion: 0 hides both edge tints".to_string());
        }

        warnings
    }

    /// Print a human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Phases:".to_string());
        lines.push(format!(
            "  morning: {}, day: {}, evening: {}, night: {}",
            self.phases.morning, self.phases.day, self.phases.evening, self.phases.night
        ));
        lines.push(format!(
            "  sunrise window: {} before / {} after",
            self.transitions.sunrise.before, self.transitions.sunrise.after
        ));
        lines.push(format!(
            "  sunset window: {} before / {} after",
            self.transitions.sunset.before, self.transitions.sunset.after
        ));

        lines.push("\nLayers:".to_string());
        lines.push(format!("  edge_portion: {}", self.layers.edge_portion));
        lines.push(format!("  weather: {}", describe_curve(&self.layers.weather)));
        lines.push(format!(
            "  temperature: {}",
            describe_curve(&self.layers.temperature)
        ));

        lines.push("\nTemperature:".to_string());
        lines.push(format!(
            "  cold: {}C {}, mild: {}C {}, hot: {}C {}",
            self.temperature.cold,
            self.temperature.cold_color,
            self.temperature.mild,
            self.temperature.mild_color,
            self.temperature.hot,
            self.temperature.hot_color
        ));

        lines.push("\nSun:".to_string());
        lines.push(format!(
            "  colors: night {}, sunrise {}, day {}, sunset {}",
            self.sun.colors.night,
            self.sun.colors.sunrise,
            self.sun.colors.day,
            self.sun.colors.sunset
        ));
        lines.push(format!(
            "  opacity: day {}, night {} (x{})",
            describe_triple(&self.sun.day_opacity),
            describe_triple(&self.sun.night_opacity),
            self.sun.gradient_opacity
        ));
        lines.push(format!(
            "  glow: half-width {}%, overflow {}%, profile {}",
            self.sun.glow_half_width, self.sun.overflow, self.sun.profile
        ));
        lines.push(format!(
            "  icon: {} (scale {})",
            self.sun.icon.symbol, self.sun.icon.scale
        ));

        lines.push("\nLocation:".to_string());
        match self.location.coordinates() {
            Some((latitude, longitude)) => {
                lines.push(format!("  coordinates: {}, {}", latitude, longitude));
            }
            None => lines.push("  coordinates: not set".to_string()),
        }
        match self.location.utc_offset_minutes {
            Some(offset) => lines.push(format!("  utc_offset_minutes: {}", offset)),
            None => lines.push("  utc_offset_minutes: system".to_string()),
        }
        lines.push(format!(
            "  use_solar_altitude: {}",
            self.location.use_solar_altitude
        ));

        lines.join("\n")
    }
}

fn check_hex(errors: &mut Vec<String>, name: &str, color: &str) {
    if !is_hex_color(color) {
        errors.push(format!(
            "{}: invalid value '{}', expected a hex color like '#8ecae6'",
            name, color
        ));
    }
}

fn check_unit(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!(
            "{}: invalid value '{}', must be between 0.0 and 1.0",
            name, value
        ));
    }
}

fn check_triple(errors: &mut Vec<String>, name: &str, triple: &OpacityTriple) {
    check_unit(errors, &format!("{}.peak", name), triple.peak);
    check_unit(errors, &format!("{}.mid", name), triple.mid);
    check_unit(errors, &format!("{}.low", name), triple.low);
}

fn check_window(errors: &mut Vec<String>, name: &str, window: &TransitionWindow) {
    for (side, minutes) in [("before", window.before), ("after", window.after)] {
        if !(0.0..=MAX_WINDOW_MINUTES).contains(&minutes) {
            errors.push(format!(
                "{}.{}: invalid value '{}', must be between 0 and 720 minutes",
                name, side, minutes
            ));
        }
    }
}

fn check_transitions(errors: &mut Vec<String>, name: &str, transitions: &Transitions) {
    check_window(errors, &format!("{}.sunrise", name), &transitions.sunrise);
    check_window(errors, &format!("{}.sunset", name), &transitions.sunset);
}

fn check_curve(errors: &mut Vec<String>, name: &str, options: &AlphaGradientOptions) {
    check_unit(errors, &format!("{}.opacity_scale", name), options.opacity_scale);
    if let Some(ratio) = options.inner_opacity_ratio {
        check_unit(errors, &format!("{}.inner_opacity_ratio", name), ratio);
    }
}

fn describe_curve(options: &AlphaGradientOptions) -> String {
    let sides = match (options.enable_left, options.enable_right) {
        (true, true) => "both sides",
        (true, false) => "left fade",
        (false, true) => "right fade",
        (false, false) => "flat",
    };
    format!(
        "{} {}, opacity {}",
        options.profile, sides, options.opacity_scale
    )
}

fn describe_triple(triple: &OpacityTriple) -> String {
    format!("{}/{}/{}", triple.peak, triple.mid, triple.low)
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingProfile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.phases.day, "#8ecae6");
        assert_eq!(config.transitions.sunset.before, 45.0);
        assert_eq!(config.layers.edge_portion, 0.25);
        assert_eq!(config.sun.overflow, 25.0);
        assert!(config.location.coordinates().is_none());
        assert!(!config.location.use_solar_altitude);
    }

    #[test]
    fn test_embedded_default_matches_struct_defaults() {
        let from_toml = Config::from_default_toml().expect("embedded default config should parse");
        assert_eq!(from_toml, Config::default());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::default().warnings().is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [sun]
            overflow = 10.0
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sun.overflow, 10.0);
        assert_eq!(config.sun.glow_half_width, 18.0);
        assert_eq!(config.phases, PhaseColors::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let toml = r##"
            [phases]
            dawn = "#ffffff"
        "##;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_with_defaults_nested_override() {
        let user_toml = r#"
            [sun.day_opacity]
            peak = 0.9

            [transitions.sunset]
            after = 10.0
        "#;

        let config = Config::load_with_defaults(user_toml).unwrap();

        assert_eq!(config.sun.day_opacity.peak, 0.9);
        // Siblings come from the embedded defaults
        assert_eq!(config.sun.day_opacity.mid, 0.3);
        assert_eq!(config.transitions.sunset.after, 10.0);
        assert_eq!(config.transitions.sunset.before, 45.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_defaults_empty_config() {
        let config = Config::load_with_defaults("").unwrap();
        assert_eq!(config, Config::from_default_toml().unwrap());
    }

    #[test]
    fn test_load_with_defaults_profile_names() {
        let user_toml = r#"
            [layers.weather]
            profile = "cubic-out"
        "#;
        let config = Config::load_with_defaults(user_toml).unwrap();
        assert_eq!(config.layers.weather.profile, EasingProfile::CubicOut);
        assert!(!config.layers.weather.enable_left);
    }

    #[test]
    fn test_deep_merge_toml_tables() {
        let mut base: Table = toml::from_str(
            r#"
            [section]
            a = 1
            b = 2
        "#,
        )
        .unwrap();

        let overlay: Table = toml::from_str(
            r#"
            [section]
            b = 99
            c = 3
        "#,
        )
        .unwrap();

        deep_merge_toml(&mut base, overlay);

        let section = base["section"].as_table().unwrap();
        assert_eq!(section["a"].as_integer(), Some(1));
        assert_eq!(section["b"].as_integer(), Some(99));
        assert_eq!(section["c"].as_integer(), Some(3));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = Config::default();
        config.phases.night = "navy".to_string();
        config.sun.overflow = 150.0;
        config.layers.edge_portion = 0.75;

        let err = config.validate().unwrap_err();
        match err {
            Error::ConfigValidation(errors) => {
                assert_eq!(errors.len(), 3, "{:?}", errors);
                assert!(errors[0].contains("phases.night"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validation_rejects_bad_windows() {
        let mut config = Config::default();
        config.transitions.sunrise.before = -5.0;
        config.sun.transitions.sunset.after = 800.0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("transitions.sunrise.before"));
        assert!(message.contains("sun.transitions.sunset.after"));
    }

    #[test]
    fn test_validation_rejects_bad_opacity() {
        let mut config = Config::default();
        config.sun.night_opacity.mid = 1.5;
        config.layers.temperature.inner_opacity_ratio = Some(-0.1);
        config.sun.gradient_opacity = f64::NAN;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("sun.night_opacity.mid"));
        assert!(message.contains("layers.temperature.inner_opacity_ratio"));
        assert!(message.contains("sun.gradient_opacity"));
    }

    #[test]
    fn test_validation_glow_half_width_excludes_zero() {
        let mut config = Config::default();
        config.sun.glow_half_width = 0.0;
        assert!(config.validate().is_err());
        config.sun.glow_half_width = 100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_location_ranges() {
        let mut config = Config::default();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(-181.0);
        config.location.utc_offset_minutes = Some(900.0);

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("location.latitude"));
        assert!(message.contains("location.longitude"));
        assert!(message.contains("location.utc_offset_minutes"));
    }

    #[test]
    fn test_validation_temperature_anchor_order() {
        let mut config = Config::default();
        config.temperature.mild = 40.0;
        assert!(config.validate().unwrap_err().to_string().contains("temperature"));
    }

    #[test]
    fn test_warnings() {
        let mut config = Config::default();
        config.sun.gradient_opacity = 0.0;
        config.transitions.sunset = TransitionWindow::new(400.0, 400.0);
        config.location.use_solar_altitude = true;
        config.location.latitude = Some(52.0);

        let warnings = config.warnings();
        assert!(warnings.iter().any(|w| w.starts_with("sun:")));
        assert!(warnings.iter().any(|w| w.starts_with("transitions.sunset")));
        assert!(warnings.iter().any(|w| w.starts_with("location:")));
        assert!(warnings.iter().any(|w| w.starts_with("location.use_solar_altitude")));
    }

    #[test]
    fn test_summary_sections() {
        let summary = Config::default().summary();
        assert!(summary.contains("Phases:"));
        assert!(summary.contains("Layers:"));
        assert!(summary.contains("Sun:"));
        assert!(summary.contains("coordinates: not set"));
    }
}
