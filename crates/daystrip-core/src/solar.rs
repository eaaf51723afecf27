//! Low-precision solar position (NOAA general solar position approximation).
//!
//! Good to roughly one degree away from the poles, which is plenty for
//! placing an icon on a strip.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::day_geometry::MINUTES_PER_DAY;

/// Zenith of the apparent sunrise/sunset: refraction plus the solar radius.
const SUNRISE_ZENITH_DEG: f64 = 90.833;

/// Sunrise and sunset as minutes past local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarGeometry {
    pub sunrise_minutes: f64,
    pub sunset_minutes: f64,
}

/// Equation of time (minutes) and declination (radians) for a fractional year.
#[derive(Debug, Clone, Copy)]
struct SolarTerms {
    equation_of_time: f64,
    declination: f64,
}

fn days_in_year(year: i32) -> f64 {
    if NaiveDate::from_ymd_opt(year, 12, 31).is_some_and(|d| d.ordinal() == 366) {
        366.0
    } else {
        365.0
    }
}

/// Fractional year angle in radians.
fn fractional_year(date: NaiveDate, hour: f64) -> f64 {
    let day_of_year = date.ordinal() as f64;
    2.0 * std::f64::consts::PI / days_in_year(date.year())
        * (day_of_year - 1.0 + (hour - 12.0) / 24.0)
}

fn solar_terms(gamma: f64) -> SolarTerms {
    let equation_of_time = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    SolarTerms {
        equation_of_time,
        declination,
    }
}

/// Solar altitude in degrees at local clock time `local`.
///
/// `utc_offset_minutes` is the local clock's offset from UTC (east positive).
/// Latitude is clamped to `[-90, 90]`. Returns None for non-finite input or
/// a non-finite result.
pub fn compute_solar_altitude(
    local: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    utc_offset_minutes: f64,
) -> Option<f64> {
    if !latitude.is_finite() || !longitude.is_finite() || !utc_offset_minutes.is_finite() {
        return None;
    }

    let minutes = local.hour() as f64 * 60.0
        + local.minute() as f64
        + local.second() as f64 / 60.0;
    let gamma = fractional_year(local.date(), minutes / 60.0);
    let terms = solar_terms(gamma);

    let time_offset = terms.equation_of_time + 4.0 * longitude - utc_offset_minutes;
    let true_solar_time = minutes + time_offset;
    let hour_angle = (true_solar_time / 4.0 - 180.0).to_radians();

    let lat = latitude.clamp(-90.0, 90.0).to_radians();
    let sin_altitude = lat.sin() * terms.declination.sin()
        + lat.cos() * terms.declination.cos() * hour_angle.cos();

    let altitude = sin_altitude.clamp(-1.0, 1.0).asin().to_degrees();
    altitude.is_finite().then_some(altitude)
}

/// Sunrise and sunset for `date` at the given location, in local clock minutes.
///
/// Returns None during polar day or night, or for non-finite input.
pub fn compute_sun_times(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    utc_offset_minutes: f64,
) -> Option<SolarGeometry> {
    if !latitude.is_finite() || !longitude.is_finite() || !utc_offset_minutes.is_finite() {
        return None;
    }

    let terms = solar_terms(fractional_year(date, 12.0));
    let lat = latitude.clamp(-90.0, 90.0).to_radians();

    let cos_hour_angle = SUNRISE_ZENITH_DEG.to_radians().cos()
        / (lat.cos() * terms.declination.cos())
        - lat.tan() * terms.declination.tan();
    if !cos_hour_angle.is_finite() || !(-1.0..=1.0).contains(&cos_hour_angle) {
        tracing::debug!(
            "No sunrise/sunset on {} at latitude {} (cos ha = {})",
            date,
            latitude,
            cos_hour_angle
        );
        return None;
    }

    let hour_angle_deg = cos_hour_angle.acos().to_degrees();
    let solar_noon_utc = 720.0 - 4.0 * longitude - terms.equation_of_time;

    let to_local =
        |utc_minutes: f64| (utc_minutes + utc_offset_minutes).rem_euclid(MINUTES_PER_DAY);

    Some(SolarGeometry {
        sunrise_minutes: to_local(solar_noon_utc - 4.0 * hour_angle_deg),
        sunset_minutes: to_local(solar_noon_utc + 4.0 * hour_angle_deg),
    })
}
