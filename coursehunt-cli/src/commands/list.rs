//! List commands - read-only displays of stored and remote state.

use anyhow::Result;
use clap::Subcommand;
use coursehunt_core::CatalogClient;
use coursehunt_engine::{with_refresh, EngineError, RetryBudget};
use coursehunt_portal::{PortalClient, SsoLogin};
use coursehunt_store::{self as store, Config, StoreError};

use super::{ensure_credentials, ensure_session, hook_interrupt, portal_timeout};
use crate::output;
use crate::ExitCode;

/// Read-only displays.
#[derive(Subcommand)]
pub enum ListCommands {
    /// The stored target list.
    Selected,
    /// Courses already claimed on the portal.
    Hunted,
    /// The grade report.
    Grades,
    /// The configuration record.
    Config,
}

/// Runs a list subcommand.
pub async fn run(cmd: &ListCommands) -> Result<()> {
    match cmd {
        ListCommands::Selected => selected().await,
        ListCommands::Hunted => hunted().await,
        ListCommands::Grades => grades().await,
        ListCommands::Config => config().await,
    }
}

async fn selected() -> Result<()> {
    match store::load_courses().await {
        Ok(courses) => {
            output::print_selected(&courses);
            Ok(())
        }
        Err(e @ StoreError::NoCourses) => {
            output::error(&e.to_string());
            std::process::exit(ExitCode::Error as i32);
        }
        Err(e) => Err(e.into()),
    }
}

async fn config() -> Result<()> {
    let config = Config::load().await?;
    output::print_config(&config);
    Ok(())
}

async fn hunted() -> Result<()> {
    let mut config = Config::load().await?;
    let cancel = hook_interrupt();

    let Some(credentials) = ensure_credentials(&mut config, &cancel).await else {
        return Ok(());
    };

    let timeout = portal_timeout(&config);
    let provider = SsoLogin::new(timeout);
    let mut session = match ensure_session(&mut config, &provider, &credentials).await {
        Ok(session) => session,
        Err(e) => {
            config.save().await?;
            output::error(&format!("login failed: {e}"));
            std::process::exit(ExitCode::Error as i32);
        }
    };
    let catalog = PortalClient::new(timeout)?;
    let mut budget = RetryBudget::new(config.max_retries);

    let outcome = async {
        let window = with_refresh(&provider, &credentials, &mut session, &mut budget, |s| {
            let catalog = &catalog;
            async move { catalog.term_window(&s).await }
        })
        .await?;

        with_refresh(&provider, &credentials, &mut session, &mut budget, |s| {
            let catalog = &catalog;
            let window = &window;
            async move { catalog.claimed_courses(&s, window).await }
        })
        .await
    }
    .await;

    config.session = Some(session);
    config.save().await?;

    match outcome {
        Ok(courses) => {
            output::print_claimed(&courses);
            Ok(())
        }
        Err(e) => fail_preflight(&e),
    }
}

async fn grades() -> Result<()> {
    let mut config = Config::load().await?;
    let cancel = hook_interrupt();

    let Some(credentials) = ensure_credentials(&mut config, &cancel).await else {
        return Ok(());
    };

    let timeout = portal_timeout(&config);
    let provider = SsoLogin::new(timeout);
    let mut session = match ensure_session(&mut config, &provider, &credentials).await {
        Ok(session) => session,
        Err(e) => {
            config.save().await?;
            output::error(&format!("login failed: {e}"));
            std::process::exit(ExitCode::Error as i32);
        }
    };
    let catalog = PortalClient::new(timeout)?;
    let mut budget = RetryBudget::new(config.max_retries);

    let outcome = with_refresh(&provider, &credentials, &mut session, &mut budget, |s| {
        let catalog = &catalog;
        async move { catalog.grades(&s).await }
    })
    .await;

    config.session = Some(session);
    config.save().await?;

    match outcome {
        Ok(grades) => {
            output::print_grades(&grades);
            Ok(())
        }
        Err(e) => fail_preflight(&e),
    }
}

/// Pre-flight failures (budget exhaustion, auth, remote refusal) are
/// reported and exit non-zero.
fn fail_preflight(e: &EngineError) -> Result<()> {
    output::error(&e.to_string());
    std::process::exit(ExitCode::Error as i32);
}
