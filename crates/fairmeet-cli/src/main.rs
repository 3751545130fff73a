//! `fairmeet` CLI — drive the slot engine from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Normalize a local day window to UTC instants
//! fairmeet window --date 2026-06-05 --start 09:00 --end 17:00 --zone Europe/Berlin
//!
//! # Print the candidate slot grid for a day
//! fairmeet grid --date 2026-06-05 --start 09:00 --end 17:00 --duration 30 --zone Europe/Berlin
//!
//! # Full read path against a JSON fixture (event window + reservation log)
//! fairmeet slots --fixture event.json --provider exh-1 --requester vis-1 \
//!     --date 2026-06-02 --zone Europe/Berlin
//! ```
//!
//! All output is JSON on stdout; logs go to stderr (`RUST_LOG` controls the
//! filter).

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use fairmeet_engine::{
    generate, normalize_window, EventWindow, InMemoryReservationStore, InMemoryWindowStore,
    NullDispatcher, Reservation, ReservationStore, Scheduler,
};

#[derive(Parser)]
#[command(name = "fairmeet", version, about = "Meeting slot engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a local day window to UTC instants
    Window {
        /// Local calendar day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Local start time, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// Local end time, HH:MM (not after start means overnight)
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// IANA zone name
        #[arg(long)]
        zone: String,
    },
    /// Print the candidate slot grid for one day
    Grid {
        /// Local calendar day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Local start time, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// Local end time, HH:MM
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Slot duration in minutes
        #[arg(long)]
        duration: u32,
        /// IANA zone name
        #[arg(long)]
        zone: String,
    },
    /// List annotated slots for a provider/day from a fixture file
    Slots {
        /// JSON fixture with the event window and the reservation log
        #[arg(long)]
        fixture: String,
        /// Provider (exhibitor) identifier
        #[arg(long)]
        provider: String,
        /// Requester (visitor) identifier the view is computed for
        #[arg(long)]
        requester: String,
        /// Requested calendar day, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// IANA zone the requester views the grid in
        #[arg(long)]
        zone: String,
    },
}

/// Fixture shape for the `slots` subcommand.
#[derive(Deserialize)]
struct Fixture {
    window: EventWindow,
    #[serde(default)]
    reservations: Vec<Reservation>,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date {s:?}: {e}"))
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("invalid time {s:?}: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Window {
            date,
            start,
            end,
            zone,
        } => {
            let (start_utc, end_utc) = normalize_window(date, start, end, &zone)?;
            println!(
                "{}",
                serde_json::json!({
                    "start_utc": start_utc,
                    "end_utc": end_utc,
                    "minutes": (end_utc - start_utc).num_minutes(),
                })
            );
        }
        Commands::Grid {
            date,
            start,
            end,
            duration,
            zone,
        } => {
            let slots = generate(date, start, end, duration, &zone)?;
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        Commands::Slots {
            fixture,
            provider,
            requester,
            date,
            zone,
        } => {
            let raw = fs::read_to_string(&fixture)
                .with_context(|| format!("reading fixture {fixture}"))?;
            let fixture: Fixture =
                serde_json::from_str(&raw).context("parsing fixture JSON")?;
            fixture.window.validate()?;

            let reservations = Arc::new(InMemoryReservationStore::new());
            for r in fixture.reservations {
                reservations.insert(r)?;
            }
            let windows = Arc::new(InMemoryWindowStore::with_window(fixture.window));
            let scheduler = Scheduler::new(reservations, windows, Arc::new(NullDispatcher));

            let views = scheduler.list_slots(&provider, date, &zone, &requester)?;
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }

    Ok(())
}
