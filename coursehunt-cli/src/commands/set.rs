//! Set commands - mutate one configuration field and save.

use anyhow::{bail, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::Subcommand;
use coursehunt_core::SessionCredential;
use coursehunt_store::Config;

use crate::output;

/// Configuration fields that can be set from the command line.
#[derive(Subcommand)]
pub enum SetCommands {
    /// Set the campus account username.
    Username {
        /// The username.
        value: String,
    },
    /// Set the campus account password.
    Password {
        /// The password.
        value: String,
    },
    /// Set the scheduled hunting start time, e.g. "2026-08-20 08:00:00".
    TargetTime {
        /// Local date and time.
        value: String,
    },
    /// Set the delay between claim attempts, in seconds.
    WaitTime {
        /// Non-negative number of seconds.
        value: u64,
    },
    /// Set the session credential directly (copied from a browser).
    Session {
        /// The raw cookie string.
        value: String,
    },
    /// Set the ceiling on recoverable failures per session.
    MaxRetries {
        /// Non-negative count.
        value: u32,
    },
}

/// Runs a set subcommand.
pub async fn run(cmd: &SetCommands) -> Result<()> {
    let mut config = Config::load().await?;

    match cmd {
        SetCommands::Username { value } => config.username = Some(value.clone()),
        SetCommands::Password { value } => config.password = Some(value.clone()),
        SetCommands::TargetTime { value } => {
            config.target_time = Some(parse_local_datetime(value)?);
        }
        SetCommands::WaitTime { value } => config.wait_time = *value,
        SetCommands::Session { value } => {
            config.session = Some(SessionCredential::new(value.clone()));
        }
        SetCommands::MaxRetries { value } => config.max_retries = *value,
    }

    config.save().await?;
    output::success("configuration saved");
    Ok(())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_local_datetime(raw: &str) -> Result<DateTime<Local>> {
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                return Ok(local);
            }
        }
    }
    bail!("unrecognized date-time '{raw}'; try \"2026-08-20 08:00:00\"")
}

// ============================================================================
// Tests
// ============================================================================
