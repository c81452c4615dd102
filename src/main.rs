/// Main entry point for the Trackify habit server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use trackify_habits::{parse_calendar_date, TrackifyServer};

/// Get the default database path, trying the preferred locations in order
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|p| p.join(".trackify")),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|p| p.join("trackify")),
        // 3. User's config directory
        dirs::config_dir().map(|p| p.join("trackify")),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|p| p.join(".trackify")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_err() {
            continue;
        }
        // Only accept directories we can actually write to
        let test_file = potential_path.join(".test_write");
        if std::fs::write(&test_file, "test").is_ok() {
            let _ = std::fs::remove_file(&test_file);
            return Ok(potential_path.join("habits.db"));
        }
    }

    let temp_path = std::env::temp_dir().join("trackify");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("habits.db"))
}

fn parse_today(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(raw).map_err(|e| e.to_string())
}

/// Command line arguments for the Trackify habit server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Evaluate streaks and calendars as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(format!("trackify_habits={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Trackify habit server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let mut server = TrackifyServer::new(db_path)?;
    if let Some(today) = args.today {
        info!("Reference date pinned to {}", today);
        server = server.with_reference_date(today);
    }

    server.run().await?;

    info!("Trackify habit server shutdown complete");
    Ok(())
}
