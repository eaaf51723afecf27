//! Hex/RGB color helpers and gamma-correct blending.
//!
//! Every function here is total: malformed input resolves to a documented
//! fallback instead of an error, so callers on the render path never have
//! to handle failure.

use serde::Serialize;

// sRGB transfer function breakpoints.
const SRGB_DECODE_THRESHOLD: f64 = 0.04045;
const SRGB_ENCODE_THRESHOLD: f64 = 0.0031308;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from floating-point channels, rounding and clamping each
    /// into `[0, 255]`. Non-finite channels become 0.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        fn channel(v: f64) -> u8 {
            if v.is_finite() {
                v.round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        }

        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }
}

/// Strip the optional leading `#` and expand shorthand (e.g. "fff" -> "ffffff").
///
/// 8-digit input keeps only its color digits; the alpha pair is ignored.
fn normalize_hex_digits(hex: &str) -> Option<String> {
    let digits = hex.trim().trim_start_matches('#');

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        3 => Some(digits.chars().flat_map(|c| [c, c]).collect()),
        6 => Some(digits.to_string()),
        8 => Some(digits[..6].to_string()),
        _ => None,
    }
}

/// Parse a hex color string. Returns None if invalid.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = normalize_hex_digits(hex)?;

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;

    Some(Rgb { r, g, b })
}

/// Parse a hex color string, case-insensitively.
///
/// Accepts 3, 6 or 8 digits with or without a leading `#`. Malformed input
/// yields black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

/// Convert a color to a lowercase `#rrggbb` string.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Return true if `color` is `#` followed by exactly 3, 6 or 8 hex digits.
pub fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Return `color` (trimmed) if it is a valid hex color, otherwise `fallback`.
pub fn ensure_hex(color: &str, fallback: &str) -> String {
    let trimmed = color.trim();
    if is_hex_color(trimmed) {
        trimmed.to_string()
    } else {
        fallback.to_string()
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= SRGB_DECODE_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(value: f64) -> f64 {
    let v = value.clamp(0.0, 1.0);
    let encoded = if v <= SRGB_ENCODE_THRESHOLD {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    encoded * 255.0
}

/// Interpolate two parsed colors in linear light.
pub fn lerp_rgb_gamma(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

    let mix = |x: u8, y: u8| {
        let lx = srgb_to_linear(x);
        let ly = srgb_to_linear(y);
        linear_to_srgb(lx + (ly - lx) * t)
    };

    Rgb::from_channels(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Blend two hex colors in linear light and return `#rrggbb`.
///
/// `t` is clamped to `[0, 1]`; `t = 0` yields `a`, `t = 1` yields `b`.
pub fn lerp_color_gamma(a: &str, b: &str, t: f64) -> String {
    lerp_rgb_gamma(hex_to_rgb(a), hex_to_rgb(b), t).to_hex()
}

/// Format an `rgba(r, g, b, a)` string for an already-parsed color.
pub fn rgba_str(rgb: Rgb, alpha: f64) -> String {
    // Written so that -0.0 and NaN both print as 0.000
    let alpha = if alpha > 0.0 { alpha.min(1.0) } else { 0.0 };
    format!("rgba({}, {}, {}, {:.3})", rgb.r, rgb.g, rgb.b, alpha)
}

/// Format an `rgba(r, g, b, a)` string for a hex color, alpha clamped to `[0, 1]`.
pub fn rgba(hex: &str, alpha: f64) -> String {
    rgba_str(hex_to_rgb(hex), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#ff0000"), Rgb::new(255, 0, 0));
        assert_eq!(hex_to_rgb("00FF00"), Rgb::new(0, 255, 0));
        assert_eq!(hex_to_rgb("#fff"), Rgb::new(255, 255, 255));
        assert_eq!(hex_to_rgb("#0000ff80"), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_hex_to_rgb_malformed_is_black() {
        assert_eq!(hex_to_rgb("not a color"), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#gggggg"), Rgb::BLACK);
        assert_eq!(hex_to_rgb("#ff"), Rgb::BLACK);
        assert_eq!(hex_to_rgb(""), Rgb::BLACK);
        // Multi-byte input must not panic on slicing
        assert_eq!(hex_to_rgb("#ééé"), Rgb::BLACK);
    }

    #[test]
    fn test_rgb_to_hex_round_trip() {
        for hex in ["#000000", "#ffffff", "#1a2b3c", "#f4a261", "#0b1026"] {
            assert_eq!(rgb_to_hex(hex_to_rgb(hex)), hex);
        }
    }

    #[test]
    fn test_from_channels_rounds_and_clamps() {
        assert_eq!(Rgb::from_channels(-4.0, 127.6, 300.0), Rgb::new(0, 128, 255));
        assert_eq!(Rgb::from_channels(f64::NAN, 1.0, 1.0), Rgb::new(0, 1, 1));
    }

    #[test]
    fn test_lerp_color_gamma_endpoints() {
        let pairs = [("#0b1026", "#f4a261"), ("#ffffff", "#000000"), ("#87ceeb", "#ff7e5f")];
        for (a, b) in pairs {
            assert_eq!(lerp_color_gamma(a, b, 0.0), a);
            assert_eq!(lerp_color_gamma(a, b, 1.0), b);
        }
    }

    #[test]
    fn test_lerp_color_gamma_midpoint_is_brighter_than_naive() {
        // Linear-light midpoint of black and white encodes to ~188, not 128
        let mid = hex_to_rgb(&lerp_color_gamma("#000000", "#ffffff", 0.5));
        assert!(mid.r > 180 && mid.r < 195, "got {}", mid.r);
        assert_eq!(mid.r, mid.g);
        assert_eq!(mid.g, mid.b);
    }

    #[test]
    fn test_lerp_color_gamma_clamps_t() {
        assert_eq!(lerp_color_gamma("#102030", "#405060", -1.0), "#102030");
        assert_eq!(lerp_color_gamma("#102030", "#405060", 2.0), "#405060");
    }

    #[test]
    fn test_rgba_formatting() {
        assert_eq!(rgba("#ff0000", 0.5), "rgba(255, 0, 0, 0.500)");
        assert_eq!(rgba("#00ff00", 1.7), "rgba(0, 255, 0, 1.000)");
        assert_eq!(rgba("#0000ff", -0.2), "rgba(0, 0, 255, 0.000)");
    }

    #[test]
    fn test_ensure_hex() {
        assert_eq!(ensure_hex("#ABC", "#000000"), "#ABC");
        assert_eq!(ensure_hex("  #a1b2c3 ", "#000000"), "#a1b2c3");
        assert_eq!(ensure_hex("#a1b2c3d4", "#000000"), "#a1b2c3d4");
        assert_eq!(ensure_hex("a1b2c3", "#000000"), "#000000");
        assert_eq!(ensure_hex("#a1b2c", "#000000"), "#000000");
        assert_eq!(ensure_hex("", "#123456"), "#123456");
    }

    #[test]
    fn test_ensure_hex_is_consistent() {
        let first = ensure_hex("bogus", "#112233");
        let second = ensure_hex("bogus", "#112233");
        assert_eq!(first, second);
    }
}
