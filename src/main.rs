//! Corekit CLI - inspect durations, times, short UUIDs and capped strings

use chrono::{FixedOffset, SecondsFormat};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use corekit::codec::{decode_uuid, encode_uuid, parse_duration, parse_time, parse_time_in};
use corekit::strings::capped_string_with;
use corekit::{CoreError, Duration, FixSuggestion};

#[derive(Parser)]
#[command(name = "corekit")]
#[command(about = "Corekit - codecs and helpers from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a duration (ISO 8601 like P1DT2H, or units like 1h30m)
    Duration {
        value: String,
    },

    /// Parse a time (RFC 3339, 2024-01-02, T15:04:05, now, today, ...)
    Time {
        value: String,

        /// Offset for values without one, e.g. +02:00 (default: local)
        #[arg(short, long, allow_hyphen_values = true)]
        offset: Option<FixedOffset>,
    },

    /// Convert UUIDs to and from the 22 character short form
    Uuid {
        #[command(subcommand)]
        action: UuidAction,
    },

    /// Cap a string to a number of characters
    Cap {
        text: String,

        length: usize,

        /// Appended when the text is cut
        #[arg(short, long, default_value = "...")]
        suffix: String,
    },
}

#[derive(Subcommand)]
enum UuidAction {
    /// Hyphenated UUID to short form
    Encode { uuid: String },

    /// Short form to hyphenated UUID
    Decode { short: String },

    /// Generate a random UUID
    New,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Duration { value } => show_duration(&value),
        Commands::Time { value, offset } => show_time(&value, offset),
        Commands::Uuid { action } => run_uuid(action),
        Commands::Cap {
            text,
            length,
            suffix,
        } => {
            println!("{}", capped_string_with(&text, length, &suffix));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn show_duration(value: &str) -> Result<(), CoreError> {
    let duration = Duration::from(parse_duration(value)?);

    println!("{} {}", "ISO 8601:".cyan(), duration.to_iso8601());
    println!("{} {}", "Millis:  ".cyan(), duration.as_millis());
    println!("{} {}", "Compact: ".cyan(), duration);
    Ok(())
}

fn show_time(value: &str, offset: Option<FixedOffset>) -> Result<(), CoreError> {
    let time = match offset {
        Some(offset) => parse_time_in(value, offset)?,
        None => parse_time(value)?,
    };

    println!(
        "{} {}",
        "RFC 3339:".cyan(),
        time.as_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, false)
    );
    println!(
        "{} {}",
        "UTC:     ".cyan(),
        time.to_utc().as_datetime().to_rfc3339_opts(SecondsFormat::AutoSi, true)
    );
    Ok(())
}

fn run_uuid(action: UuidAction) -> Result<(), CoreError> {
    match action {
        UuidAction::Encode { uuid } => {
            let id = uuid::Uuid::parse_str(uuid.trim())?;
            println!("{}", encode_uuid(&id));
        }
        UuidAction::Decode { short } => {
            let id = decode_uuid(short.trim())?;
            println!("{}", id.hyphenated());
        }
        UuidAction::New => {
            let id = uuid::Uuid::new_v4();
            println!("{} {}", "UUID: ".cyan(), id.hyphenated());
            println!("{} {}", "Short:".cyan(), encode_uuid(&id));
        }
    }
    Ok(())
}
