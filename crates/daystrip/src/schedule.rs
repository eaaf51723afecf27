//! Clock parsing and solar schedule resolution for the CLI.
//!
//! Times on the command line are local clock times. ISO-like strings are
//! accepted but only their date and clock parts are used; any trailing UTC
//! offset is ignored.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use daystrip_core::Config;
use daystrip_core::solar::{compute_solar_altitude, compute_sun_times};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Minutes past midnight for a clock time, including seconds.
pub fn minutes_of(time: NaiveTime) -> f64 {
    time.hour() as f64 * 60.0 + time.minute() as f64 + time.second() as f64 / 60.0
}

/// Format minutes past midnight as `HH:MM`.
pub fn format_clock(minutes: f64) -> String {
    let total = minutes.round().rem_euclid(1440.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Parse `HH:MM[:SS]` or an ISO-like datetime into minutes past midnight.
pub fn parse_clock_minutes(value: &str) -> Result<f64> {
    let value = value.trim();
    if let Some(time) = parse_clock(value) {
        return Ok(minutes_of(time));
    }
    if let Some(datetime) = parse_datetime(value) {
        return Ok(minutes_of(datetime.time()));
    }
    bail!(
        "invalid time '{}', expected HH:MM or YYYY-MM-DDTHH:MM[:SS]",
        value
    )
}

/// Parse a moment. A bare clock time is taken on `today`.
pub fn parse_moment(value: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Some(time) = parse_clock(value) {
        return Ok(today.and_time(time));
    }
    parse_datetime(value).with_context(|| {
        format!(
            "invalid time '{}', expected HH:MM or YYYY-MM-DDTHH:MM[:SS]",
            value
        )
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Offset of the local clock from UTC: the configured value, or the system's.
pub fn utc_offset_minutes(config: &Config) -> f64 {
    config
        .location
        .utc_offset_minutes
        .unwrap_or_else(|| Local::now().offset().local_minus_utc() as f64 / 60.0)
}

/// Resolved per-tick schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub now: NaiveDateTime,
    pub sunrise_minutes: Option<f64>,
    pub sunset_minutes: Option<f64>,
    pub solar_altitude: Option<f64>,
}

impl Schedule {
    pub fn now_minutes(&self) -> f64 {
        minutes_of(self.now.time())
    }
}

/// Resolve "now", sunrise, sunset and altitude from arguments and config.
///
/// Sunrise/sunset given on the command line win; anything missing is
/// computed from the configured location when there is one.
pub fn resolve_schedule(
    config: &Config,
    at: Option<&str>,
    sunrise: Option<&str>,
    sunset: Option<&str>,
) -> Result<Schedule> {
    let now = match at {
        Some(value) => parse_moment(value, Local::now().date_naive())?,
        None => Local::now().naive_local(),
    };

    let mut sunrise_minutes = sunrise
        .map(parse_clock_minutes)
        .transpose()
        .context("bad --sunrise")?;
    let mut sunset_minutes = sunset
        .map(parse_clock_minutes)
        .transpose()
        .context("bad --sunset")?;

    let coordinates = config.location.coordinates();
    let offset = utc_offset_minutes(config);

    if (sunrise_minutes.is_none() || sunset_minutes.is_none())
        && let Some((latitude, longitude)) = coordinates
    {
        match compute_sun_times(now.date(), latitude, longitude, offset) {
            Some(times) => {
                debug!(
                    "Computed sun times for {}: {} / {}",
                    now.date(),
                    format_clock(times.sunrise_minutes),
                    format_clock(times.sunset_minutes)
                );
                sunrise_minutes.get_or_insert(times.sunrise_minutes);
                sunset_minutes.get_or_insert(times.sunset_minutes);
            }
            None => debug!("No sunrise/sunset on {} at this location", now.date()),
        }
    }

    let solar_altitude = match coordinates {
        Some((latitude, longitude)) if config.location.use_solar_altitude => {
            compute_solar_altitude(now, latitude, longitude, offset)
        }
        _ => None,
    };

    Ok(Schedule {
        now,
        sunrise_minutes,
        sunset_minutes,
        solar_altitude,
    })
}
