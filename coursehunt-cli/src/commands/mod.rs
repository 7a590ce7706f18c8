//! Command implementations and helpers shared between them.

pub mod change;
pub mod hunt;
pub mod list;
pub mod select;
pub mod set;

use std::time::Duration;

use coursehunt_core::{AuthError, Course, Credentials, SessionCredential, SessionProvider};
use coursehunt_engine::{cancel_pair, CancelToken};
use coursehunt_portal::SsoLogin;
use coursehunt_store::Config;

use crate::output;
use crate::prompt::{self, Choice};

/// Wires Ctrl-C to a cancellation token for the rest of the command.
pub(crate) fn hook_interrupt() -> CancelToken {
    let (handle, token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    token
}

/// The per-call network timeout from configuration.
pub(crate) fn portal_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.request_timeout_secs)
}

/// Returns the account credentials, prompting for the missing pieces at
/// most once per process and caching them in the in-memory config.
/// `None` means the operator cancelled at a prompt.
pub(crate) async fn ensure_credentials(
    config: &mut Config,
    cancel: &CancelToken,
) -> Option<Credentials> {
    let username = match &config.username {
        Some(u) => u.clone(),
        None => {
            let u = prompt::ask_nonempty("campus account username:", cancel).await?;
            config.username = Some(u.clone());
            u
        }
    };
    let password = match &config.password {
        Some(p) => p.clone(),
        None => {
            let p = prompt::ask_nonempty("campus account password:", cancel).await?;
            config.password = Some(p.clone());
            p
        }
    };
    Some(Credentials { username, password })
}

/// Returns the cached session credential, logging in when there is none.
pub(crate) async fn ensure_session(
    config: &mut Config,
    provider: &SsoLogin,
    credentials: &Credentials,
) -> Result<SessionCredential, AuthError> {
    if let Some(session) = config.session.clone() {
        return Ok(session);
    }
    let session = provider.obtain(credentials).await?;
    output::success("session credential obtained");
    config.session = Some(session.clone());
    Ok(session)
}

/// Walks the operator through `found`, appending accepted courses to
/// `selected`. Returns false when the operator quit or cancelled.
pub(crate) async fn review_courses(
    found: &[Course],
    selected: &mut Vec<Course>,
    cancel: &CancelToken,
) -> bool {
    if found.is_empty() {
        output::warn("no courses found");
        return true;
    }

    output::success(&format!("{} course(s) found", found.len()));
    for course in found {
        output::print_course_detail(course);
        match prompt::confirm("add this course? [y/n/q]", cancel).await {
            Some(Choice::Yes) => {
                selected.push(course.clone());
                output::success("added to the target list");
            }
            Some(Choice::No) => {}
            Some(Choice::Quit) | None => return false,
        }
    }
    true
}
