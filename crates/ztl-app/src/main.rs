//! ZTL - query Limited Traffic Zone restrictions of Italian cities.
//!
//! This is the main binary:
//! - Imports the built-in cities into the data directory
//! - Reports which zones are restricted at a given instant
//! - Exports zones as GeoJSON

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ztl_app::commands;
use ztl_core::CoordinateFormat;
use ztl_storage::CityStore;

/// ZTL - Limited Traffic Zone restrictions for Italian cities
#[derive(Parser, Debug)]
#[command(name = "ztl", version, about)]
struct Args {
    /// Directory holding the city JSON files
    #[arg(long, env = "ZTL_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Also write logs to daily rotated files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build built-in cities and save them (all when none are named)
    Import {
        cities: Vec<String>,
    },
    /// List stored cities
    Cities,
    /// Show every zone of a city with its active flag
    Status {
        city: String,
        /// Instant to evaluate, "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show only the zones active at an instant
    Active {
        city: String,
        /// Instant to evaluate, "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export a city as a GeoJSON FeatureCollection
    Geojson {
        city: String,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace a zone's outline with coordinates from a file
    Boundaries {
        city: String,
        zone: String,
        file: PathBuf,
        /// Coordinate layout: semicolon, brackets, space or geojson
        #[arg(long, default_value = "semicolon")]
        format: CoordinateFormat,
    },
}

fn parse_instant(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

/// Initialize logging, with optional file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ztl={level},ztl_core={level},ztl_storage={level},ztl_app={level},warn",
            level = log_level
        ))
    });

    if let Some(log_dir) = &args.log_dir {
        if std::fs::create_dir_all(log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("ztl")
                .filename_suffix("log")
                .build(log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                tracing::info!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        tracing::warn!("File logging unavailable, using console only");
        return None;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    None
}

fn open_store(args: &Args) -> anyhow::Result<CityStore> {
    match &args.data_dir {
        Some(dir) => Ok(CityStore::new(dir)),
        None => CityStore::open_default().context("Failed to locate data directory"),
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _log_guard = init_logging(&args);
    tracing::debug!("Args: {:?}", args);

    let store = open_store(&args)?;
    let mut stdout = std::io::stdout().lock();

    match &args.command {
        Command::Import { cities } => {
            for path in commands::import(&store, cities)? {
                println!("Saved {}", path.display());
            }
        }
        Command::Cities => commands::list_cities(&store, &mut stdout)?,
        Command::Status { city, at, json } => {
            let instant = at.unwrap_or_else(now);
            commands::status(&store, city, &instant, *json, &mut stdout)?;
        }
        Command::Active { city, at, json } => {
            let instant = at.unwrap_or_else(now);
            commands::active(&store, city, &instant, *json, &mut stdout)?;
        }
        Command::Geojson { city, output } => {
            commands::geojson(&store, city, output.as_deref(), &mut stdout)?;
        }
        Command::Boundaries {
            city,
            zone,
            file,
            format,
        } => {
            let count = commands::set_boundaries(&store, city, zone, file, *format)?;
            println!("Set {count} boundary points on {zone}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_status_with_instant() {
        let args = Args::try_parse_from(["ztl", "status", "milano", "--at", "2023-05-10 12:30"])
            .unwrap();

        match args.command {
            Command::Status { city, at, json } => {
                assert_eq!(city, "milano");
                let at = at.unwrap();
                assert_eq!((at.day(), at.hour(), at.minute()), (10, 12, 30));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_instant() {
        assert!(Args::try_parse_from(["ztl", "active", "milano", "--at", "12:30"]).is_err());
        assert!(Args::try_parse_from(["ztl", "active", "milano", "--at", "2023-13-01 12:30"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "ztl",
            "import",
            "milano",
            "torino",
            "--data-dir",
            "/tmp/ztl",
            "--debug",
        ])
        .unwrap();

        assert!(args.debug);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/ztl")));
        match args.command {
            Command::Import { cities } => assert_eq!(cities, vec!["milano", "torino"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn boundaries_format_option() {
        let args = Args::try_parse_from([
            "ztl",
            "boundaries",
            "bologna",
            "bologna-zona-t",
            "zona-t.json",
            "--format",
            "geojson",
        ])
        .unwrap();

        match args.command {
            Command::Boundaries { format, .. } => assert_eq!(format, CoordinateFormat::GeoJson),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Args::try_parse_from(["ztl", "boundaries", "a", "b", "c", "--format", "wkt"]).is_err());
    }

    #[test]
    fn requires_a_command() {
        assert!(Args::try_parse_from(["ztl"]).is_err());
        let args = Args::try_parse_from(["ztl", "cities"]).unwrap();
        assert_eq!(args.log_level, "warn");
        assert!(matches!(args.command, Command::Cities));
    }
}
