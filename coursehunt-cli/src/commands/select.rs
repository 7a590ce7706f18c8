//! Select command - browse the catalog and curate the target list.

use anyhow::Result;
use coursehunt_core::{CatalogClient, Course, Credentials, SessionCredential};
use coursehunt_engine::{with_refresh, CancelToken, EngineError, RetryBudget};
use coursehunt_portal::{PortalClient, SsoLogin};
use coursehunt_store::{self as store, Config, StoreError};
use tracing::debug;

use super::{ensure_credentials, ensure_session, hook_interrupt, portal_timeout, review_courses};
use crate::output;
use crate::prompt;
use crate::ExitCode;

/// Runs the select command.
pub async fn run() -> Result<()> {
    let mut selected = match store::load_courses().await {
        Ok(courses) => courses,
        Err(StoreError::NoCourses) => Vec::new(),
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
    debug!(already_selected = selected.len(), "starting curation");

    let outcome = curate(
        &catalog,
        &provider,
        &credentials,
        &mut session,
        &mut budget,
        &mut selected,
        &cancel,
    )
    .await;

    // Queue and config are saved on every exit path, including Ctrl-C.
    config.session = Some(session);
    store::save_courses(&selected).await?;
    config.save().await?;

    match outcome {
        Ok(()) => Ok(()),
        // Budget exhaustion during pre-flight, auth failure, or a remote
        // refusal: all setup errors here.
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

/// The interactive curation loop: category, keyword, per-course review.
async fn curate(
    catalog: &PortalClient,
    provider: &SsoLogin,
    credentials: &Credentials,
    session: &mut SessionCredential,
    budget: &mut RetryBudget,
    selected: &mut Vec<Course>,
    cancel: &CancelToken,
) -> Result<(), EngineError> {
    let window = with_refresh(provider, credentials, session, budget, |s| async move {
        catalog.term_window(&s).await
    })
    .await?;

    let categories = with_refresh(provider, credentials, session, budget, |s| {
        let window = &window;
        async move { catalog.categories(&s, window).await }
    })
    .await?;

    if categories.is_empty() {
        output::warn("the portal lists no categories right now");
        return Ok(());
    }

    loop {
        output::print_categories(&categories);
        let Some(answer) = prompt::ask("category number (0 to finish):", cancel).await else {
            return Ok(());
        };
        let Ok(index) = answer.parse::<usize>() else {
            output::warn("enter a number from the list");
            continue;
        };
        if index == 0 {
            return Ok(());
        }
        let Some(category) = categories.get(index - 1) else {
            output::warn("no such category");
            continue;
        };

        loop {
            let Some(keyword) =
                prompt::ask("keyword (q to go back, empty for all):", cancel).await
            else {
                return Ok(());
            };
            if keyword == "q" {
                break;
            }

            let found = with_refresh(provider, credentials, session, budget, |s| {
                let window = &window;
                let keyword = keyword.as_str();
                async move { catalog.search(&s, category, window, keyword).await }
            })
            .await?;

            if !review_courses(&found, selected, cancel).await {
                return Ok(());
            }
        }
    }
}
