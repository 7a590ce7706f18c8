//! Hunt command - run the engine over the target queue.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use coursehunt_core::Course;
use coursehunt_engine::{HuntEngine, HuntObserver, RetryBudget};
use coursehunt_portal::{PortalClient, SsoLogin};
use coursehunt_store::{self as store, Config, StoreError};
use indicatif::ProgressBar;
use tracing::info;

use super::{ensure_credentials, hook_interrupt, portal_timeout};
use crate::output;
use crate::ExitCode;

/// Arguments for the hunt command.
#[derive(Args, Default)]
pub struct HuntArgs {
    /// Start immediately, ignoring the configured start time.
    #[arg(long, short = 'n')]
    pub now: bool,

    /// Seconds between claim attempts; overrides the configured value.
    #[arg(long)]
    pub wait_time: Option<u64>,
}

/// Spinner-backed display for the engine's progress events.
struct HuntProgress {
    bar: ProgressBar,
}

impl HuntObserver for HuntProgress {
    fn on_countdown(&self, remaining: Duration) {
        self.bar
            .set_message(format!("starting in {}s", remaining.as_secs()));
    }

    fn on_attempt(&self, course: &Course) {
        self.bar.set_message(format!("hunting {}", course.name));
    }

    fn on_claimed(&self, course: &Course) {
        self.bar
            .println(format!("\x1b[32mclaimed: {}\x1b[0m", course.name));
    }

    fn on_session_expired(&self) {
        self.bar
            .println("\x1b[33msession expired, re-authenticating\x1b[0m".to_string());
    }

    fn on_set_aside(&self, course: &Course, reason: &str) {
        self.bar.println(format!(
            "\x1b[31mfailed: {}\x1b[0m ({reason})",
            course.name
        ));
    }

    fn on_wait(&self, delay: Duration) {
        self.bar
            .set_message(format!("waiting {}s", delay.as_secs()));
    }
}

/// Runs the hunt command.
pub async fn run(args: &HuntArgs) -> Result<()> {
    let courses = match store::load_courses().await {
        Ok(courses) => courses,
        Err(e @ StoreError::NoCourses) => {
            output::error(&e.to_string());
            std::process::exit(ExitCode::Error as i32);
        }
        Err(e) => return Err(e.into()),
    };
    let mut config = Config::load().await?;

    let cancel = hook_interrupt();

    let Some(credentials) = ensure_credentials(&mut config, &cancel).await else {
        output::note("exiting");
        return Ok(());
    };

    let timeout = portal_timeout(&config);
    let provider = SsoLogin::new(timeout);
    let session = match super::ensure_session(&mut config, &provider, &credentials).await {
        Ok(session) => session,
        Err(e) => {
            config.save().await?;
            output::error(&format!("login failed: {e}"));
            std::process::exit(ExitCode::Error as i32);
        }
    };

    let claimer = PortalClient::new(timeout)?;
    let wait = Duration::from_secs(args.wait_time.unwrap_or(config.wait_time));
    let start_at = if args.now { None } else { config.target_time };
    info!(
        courses = courses.len(),
        wait = wait.as_secs(),
        max_retries = config.max_retries,
        "starting hunting session"
    );
    if let Some(at) = start_at {
        output::note(&format!("scheduled start: {}", at.format("%Y-%m-%d %H:%M:%S")));
    }

    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(100));

    let mut engine = HuntEngine::new(
        provider,
        claimer,
        credentials,
        session,
        courses,
        RetryBudget::new(config.max_retries),
        wait,
    )
    .with_start_time(start_at)
    .with_observer(Box::new(HuntProgress { bar: bar.clone() }));

    let result = engine.run(&cancel).await;
    bar.finish_and_clear();

    // Unconditional persistence on every terminal transition: the
    // reconciled queue and the possibly-refreshed credential.
    let remaining = engine.remaining();
    config.session = Some(engine.session().clone());
    store::save_courses(&remaining).await?;
    config.save().await?;

    match result {
        Ok(report) => {
            output::print_report(&report, &remaining);
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
