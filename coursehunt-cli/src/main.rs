// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! coursehunt CLI - seat hunting for a university registration portal.
//!
//! # Examples
//!
//! ```bash
//! # Curate the target list interactively
//! coursehunt select
//!
//! # Hunt the selected courses, starting now
//! coursehunt hunt --now
//!
//! # Hunt with a 5-second delay between attempts
//! coursehunt hunt --wait-time 5
//!
//! # Review stored state
//! coursehunt list selected
//! coursehunt list config
//!
//! # Schedule the next run
//! coursehunt set target-time "2026-08-20 08:00:00"
//! ```

mod commands;
mod output;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{change, hunt, list, select, set};

// ============================================================================
// CLI Definition
// ============================================================================

/// Seat hunter for the campus course-registration portal.
#[derive(Parser)]
#[command(name = "coursehunt")]
#[command(about = "Course seat hunter for the campus registration portal")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Hunt the selected courses until claimed, exhausted, or cancelled.
    Hunt(hunt::HuntArgs),

    /// Browse the catalog and curate the target list.
    Select,

    /// Re-review the target list, dropping courses no longer wanted.
    Change,

    /// Read-only displays of stored and remote state.
    #[command(subcommand)]
    List(list::ListCommands),

    /// Set one configuration field.
    #[command(subcommand)]
    Set(set::SetCommands),
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success, including operator-cancelled runs.
    Success = 0,
    /// Unrecoverable setup error, authentication failure, or pre-flight
    /// budget exhaustion.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("coursehunt=debug,info")
    } else {
        EnvFilter::new("coursehunt=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result: Result<()> = match &cli.command {
        Commands::Hunt(args) => hunt::run(args).await,
        Commands::Select => select::run().await,
        Commands::Change => change::run().await,
        Commands::List(cmd) => list::run(cmd).await,
        Commands::Set(cmd) => set::run(cmd).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error as i32);
    }

    // A prompt interrupted by Ctrl-C leaves a blocked stdin read behind;
    // exiting explicitly skips the runtime waiting on it.
    std::process::exit(ExitCode::Success as i32);
}

// ============================================================================
// Tests
// ============================================================================
