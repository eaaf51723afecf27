//! daystrip - render the sky gradient for the current time of day
//!
//! Loads configuration, resolves the solar schedule and prints the frame as
//! CSS custom properties or JSON.

mod schedule;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use daystrip_core::solar::{compute_solar_altitude, compute_sun_times};
use daystrip_core::time_phase::{PhaseColors, resolve_time_phase_color};
use daystrip_core::{Config, DayStripFrame, FrameInputs, logging};

use crate::schedule::{format_clock, parse_date, parse_moment, resolve_schedule, utc_offset_minutes};

/// daystrip - render the sky gradient for the current time of day
#[derive(Parser, Debug)]
#[command(name = "daystrip", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Debug, Default, Clone)]
struct ScheduleArgs {
    /// Moment to render: HH:MM or YYYY-MM-DDTHH:MM[:SS] (default: now)
    #[arg(long)]
    at: Option<String>,

    /// Sunrise as local HH:MM or an ISO-like timestamp
    #[arg(long)]
    sunrise: Option<String>,

    /// Sunset as local HH:MM or an ISO-like timestamp
    #[arg(long)]
    sunset: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// :root block of --daystrip-* custom properties
    Css,
    /// The full frame as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame (default)
    Render {
        #[command(flatten)]
        schedule: ScheduleArgs,

        /// WMO weather code (0 clear, 61 rain, 95 storm, ...)
        #[arg(long)]
        weather_code: Option<u32>,

        /// Temperature in degrees Celsius
        #[arg(long, allow_hyphen_values = true)]
        temperature: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Css)]
        format: OutputFormat,
    },
    /// Print the time-of-day phase and blended base color
    Phase {
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Print the solar altitude in degrees
    Altitude {
        /// Moment: HH:MM or YYYY-MM-DDTHH:MM[:SS] (default: now)
        #[arg(long)]
        at: Option<String>,

        /// Latitude in degrees (overrides [location])
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,

        /// Longitude in degrees, east positive (overrides [location])
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,

        /// Local clock offset from UTC in minutes (overrides [location])
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<f64>,
    },
    /// Print sunrise and sunset for the configured location
    SunTimes {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    logging::init(args.verbose);

    if args.print_example_config {
        print!("{}", daystrip_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        info!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    for warning in config.warnings() {
        warn!("{}", warning);
    }

    debug!("Configuration validated successfully");

    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        if args.verbose > 0 {
            println!("\n{}", config.summary());
        }
        return ExitCode::SUCCESS;
    }

    let command = args.command.unwrap_or(Command::Render {
        schedule: ScheduleArgs::default(),
        weather_code: None,
        temperature: None,
        format: OutputFormat::Css,
    });

    match handle_command(&config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn handle_command(config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Render {
            schedule,
            weather_code,
            temperature,
            format,
        } => render(config, &schedule, weather_code, temperature, format),
        Command::Phase { schedule } => phase(config, &schedule),
        Command::Altitude {
            at,
            latitude,
            longitude,
            utc_offset,
        } => altitude(config, at.as_deref(), latitude, longitude, utc_offset),
        Command::SunTimes { date } => sun_times(config, date.as_deref()),
    }
}

fn render(
    config: &Config,
    args: &ScheduleArgs,
    weather_code: Option<u32>,
    temperature: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let schedule = resolve_schedule(
        config,
        args.at.as_deref(),
        args.sunrise.as_deref(),
        args.sunset.as_deref(),
    )?;

    let frame = DayStripFrame::compute(
        config,
        &FrameInputs {
            sunrise_minutes: schedule.sunrise_minutes,
            sunset_minutes: schedule.sunset_minutes,
            now_minutes: schedule.now_minutes(),
            solar_altitude: schedule.solar_altitude,
            weather_code,
            temperature_celsius: temperature,
        },
    );

    match format {
        OutputFormat::Css => print!("{}", frame.css_vars_block()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&frame).context("failed to serialize frame")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn phase(config: &Config, args: &ScheduleArgs) -> Result<()> {
    let schedule = resolve_schedule(
        config,
        args.at.as_deref(),
        args.sunrise.as_deref(),
        args.sunset.as_deref(),
    )?;

    let colors = config.phases.sanitized(&PhaseColors::default());
    let result = resolve_time_phase_color(
        &colors,
        &config.transitions,
        schedule.sunrise_minutes,
        schedule.sunset_minutes,
        schedule.now_minutes(),
    );

    println!("phase: {}", result.phase);
    println!("next: {}", result.next_phase);
    println!("blend: {:.3}", result.blend);
    println!("color: {}", result.color);
    Ok(())
}

fn altitude(
    config: &Config,
    at: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    utc_offset: Option<f64>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let moment = match at {
        Some(value) => parse_moment(value, today)?,
        None => Local::now().naive_local(),
    };

    let (Some(latitude), Some(longitude)) = (
        latitude.or(config.location.latitude),
        longitude.or(config.location.longitude),
    ) else {
        bail!("no location: pass --latitude and --longitude or set them in [location]");
    };
    let offset = utc_offset.unwrap_or_else(|| utc_offset_minutes(config));

    match compute_solar_altitude(moment, latitude, longitude, offset) {
        Some(degrees) => println!("{:.2}", degrees),
        None => println!("unavailable"),
    }
    Ok(())
}

fn sun_times(config: &Config, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };

    let Some((latitude, longitude)) = config.location.coordinates() else {
        bail!("no location: set latitude and longitude in [location]");
    };
    let offset = utc_offset_minutes(config);

    match compute_sun_times(date, latitude, longitude, offset) {
        Some(times) => {
            println!("sunrise: {}", format_clock(times.sunrise_minutes));
            println!("sunset: {}", format_clock(times.sunset_minutes));
        }
        None => println!("no sunrise or sunset on {} (polar day or night)", date),
    }
    Ok(())
}
