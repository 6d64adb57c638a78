//! `avail` CLI — turn Google Calendar free/busy data into availability text.
//!
//! ## Usage
//!
//! ```sh
//! # Print the freebusy.query body for your calendars
//! avail request -c alice@example.com -c team@example.com > query.json
//!
//! # Render availability from the API response (stdin → stdout)
//! curl ... -d @query.json | avail show -c alice@example.com -c team@example.com
//!
//! # Use a config file and tweak single options
//! avail show --freebusy response.json -t hours.json -o show_24hr=true -o days_forward=7
//!
//! # List calendars from a calendarList.list response
//! avail calendars -i calendars.json
//!
//! # Show every configuration option and its default
//! avail options
//! ```
//!
//! Set `RUST_LOG=debug` to trace the computation on stderr.

use anyhow::{Context, Result};
use avail_engine::config::option_defaults;
use avail_engine::gcal::{CalendarList, FreeBusyRequest, FreeBusyResponse, CALENDAR_READONLY_SCOPE};
use avail_engine::{compute_availability, render_availability, work_windows, AvailabilityConfig};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avail",
    version,
    about = "Availability text from Google Calendar free/busy data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Configuration JSON file (defaults apply to missing keys)
    #[arg(short = 't', long = "time-config", value_name = "FILE")]
    time_config: Option<String>,
    /// Override a configuration option (repeatable); see `avail options`
    #[arg(short = 'o', long = "opt", value_name = "OPTNAME=VALUE")]
    overrides: Vec<String>,
    /// Reference time as RFC 3339 (defaults to the current time)
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render availability from a freebusy.query response
    Show {
        /// freebusy.query response JSON (reads from stdin if omitted)
        #[arg(short = 'f', long)]
        freebusy: Option<String>,
        /// Calendar whose busy time counts (repeatable; all calendars if omitted)
        #[arg(short = 'c', long = "calendar", value_name = "ID")]
        calendars: Vec<String>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the freebusy.query request body for the configured period
    Request {
        /// Calendar to query (repeatable)
        #[arg(short = 'c', long = "calendar", value_name = "ID", required = true)]
        calendars: Vec<String>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List calendars from a calendarList.list response
    Calendars {
        /// calendarList.list response JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Check that these calendar ids exist (repeatable)
        #[arg(short = 'c', long = "calendar", value_name = "ID")]
        calendars: Vec<String>,
    },
    /// List configuration options and their defaults
    Options,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            freebusy,
            calendars,
            config,
        } => {
            let now = parse_now(config.now.as_deref())?;
            let settings = load_config(&config)?;

            let json = read_input(freebusy.as_deref())?;
            let response = FreeBusyResponse::from_json_str(&json)
                .context("Failed to parse freebusy response")?;
            let streams = response
                .busy_streams(&calendars)
                .context("Failed to collect busy periods")?;

            let windows =
                work_windows(&settings, now).context("Failed to build working-hours windows")?;
            let free = compute_availability(&streams, &windows, &settings.availability_options())
                .context("Failed to compute availability")?;
            debug!(free = free.len(), "rendering availability");

            let options = settings.format_options();
            let renderings: Vec<String> = settings
                .display_zones()?
                .iter()
                .map(|zone| render_availability(&free, zone, &options))
                .collect();
            print!("{}", renderings.join("\n"));
        }
        Commands::Request { calendars, config } => {
            let now = parse_now(config.now.as_deref())?;
            let settings = load_config(&config)?;
            let request = FreeBusyRequest::for_config(&settings, now, &calendars)?;
            info!(scope = CALENDAR_READONLY_SCOPE, "POST /calendar/v3/freeBusy");
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Commands::Calendars { input, calendars } => {
            let json = read_input(input.as_deref())?;
            let list =
                CalendarList::from_json_str(&json).context("Failed to parse calendar list")?;

            let missing = list.missing(&calendars);
            if !missing.is_empty() {
                println!("Calendars {:?} not found! Possible calendars are:", missing);
            }
            let rows: Vec<(&str, &str)> = list
                .sorted_for_display()
                .into_iter()
                .map(|c| (c.id.as_str(), c.summary.as_str()))
                .collect();
            print_table(("Id", "Name"), &rows);

            if !missing.is_empty() {
                anyhow::bail!("{} calendar(s) not found", missing.len());
            }
        }
        Commands::Options => {
            let defaults = option_defaults();
            let rows: Vec<(&str, &str)> = defaults
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            print_table(("Option name", "Default value"), &rows);
        }
    }

    Ok(())
}

/// Load the config file (if any), apply overrides in order, then validate.
fn load_config(args: &ConfigArgs) -> Result<AvailabilityConfig> {
    let mut config = match args.time_config.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            AvailabilityConfig::from_json_str(&json)
                .with_context(|| format!("Failed to parse config: {}", path))?
        }
        None => AvailabilityConfig::default(),
    };

    for entry in &args.overrides {
        config
            .apply_override(entry)
            .with_context(|| format!("Failed to apply option: {}", entry))?;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now timestamp: {}", raw))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Two left-aligned columns with a dashed rule under the header.
fn print_table(header: (&str, &str), rows: &[(&str, &str)]) {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .chain(std::iter::once(header.0.chars().count()))
        .max()
        .unwrap_or(0);
    let right_width = rows
        .iter()
        .map(|(_, right)| right.chars().count())
        .chain(std::iter::once(header.1.chars().count()))
        .max()
        .unwrap_or(0);

    println!("{:<width$}  {}", header.0, header.1);
    println!("{}  {}", "-".repeat(width), "-".repeat(right_width));
    for (left, right) in rows {
        println!("{:<width$}  {}", left, right);
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
