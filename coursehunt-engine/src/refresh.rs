//! Pre-flight retry helper.
//!
//! Catalog operations that run before (or outside) a hunting session are
//! subject to the same expiry handling as claim attempts: on session
//! expiry, refresh the credential, spend budget, and retry the same
//! operation. Used by the `select`, `list hunted`, and `list grades`
//! command paths.

use coursehunt_core::{Credentials, PortalError, SessionCredential, SessionProvider};
use tracing::{debug, warn};

use crate::budget::RetryBudget;
use crate::error::EngineError;

/// Runs `op` until it succeeds, refreshing the session on expiry.
///
/// Each expiry spends one unit of `budget`; exhaustion fails with
/// [`EngineError::BudgetExhausted`]. Any non-expiry portal error
/// propagates unchanged, and a failed refresh is an authentication error.
/// On success the possibly-refreshed `session` is left in place for the
/// caller to persist at its save point.
pub async fn with_refresh<S, T, F, Fut>(
    provider: &S,
    credentials: &Credentials,
    session: &mut SessionCredential,
    budget: &mut RetryBudget,
    mut op: F,
) -> Result<T, EngineError>
where
    S: SessionProvider,
    F: FnMut(SessionCredential) -> Fut,
    Fut: std::future::Future<Output = Result<T, PortalError>>,
{
    loop {
        match op(session.clone()).await {
            Ok(value) => return Ok(value),
            Err(PortalError::SessionExpired) => {
                budget.record();
                warn!(spent = budget.spent(), "session expired during pre-flight");
                if budget.is_exhausted() {
                    return Err(EngineError::BudgetExhausted(budget.spent()));
                }
                *session = provider.obtain(credentials).await?;
                debug!("session refreshed");
            }
            Err(other) => return Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehunt_core::AuthError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FakeProvider {
        calls: AtomicU32,
        fail: bool,
    }

    impl FakeProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }
    }

    impl SessionProvider for FakeProvider {
        async fn obtain(
            &self,
            _credentials: &Credentials,
        ) -> Result<SessionCredential, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                Err(AuthError::CredentialsRejected)
            } else {
                Ok(SessionCredential::new(format!("refreshed-{n}")))
            }
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "student".to_string(),
            password: "secret".to_string(),
        }
    }

    fn scripted(outcomes: Vec<Result<u32, PortalError>>) -> Mutex<Vec<Result<u32, PortalError>>> {
        Mutex::new(outcomes)
    }

    #[tokio::test]
    async fn test_success_after_one_expiry() {
        let provider = FakeProvider::new(false);
        let mut session = SessionCredential::new("stale");
        let mut budget = RetryBudget::new(3);
        let script = scripted(vec![Err(PortalError::SessionExpired), Ok(7)]);

        let value = with_refresh(&provider, &credentials(), &mut session, &mut budget, |_| {
            let next = script.lock().unwrap().remove(0);
            async move { next }
        })
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert_eq!(budget.spent(), 1);
        assert_eq!(session.as_str(), "refreshed-1");
    }

    #[tokio::test]
    async fn test_exhaustion_reports_spend() {
        let provider = FakeProvider::new(false);
        let mut session = SessionCredential::new("stale");
        let mut budget = RetryBudget::new(1);

        let err = with_refresh(&provider, &credentials(), &mut session, &mut budget, |_| async {
            Err::<u32, _>(PortalError::SessionExpired)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, EngineError::BudgetExhausted(1)));
        // Exhaustion is checked before refreshing: no login round-trip.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_expiry_error_passes_through() {
        let provider = FakeProvider::new(false);
        let mut session = SessionCredential::new("fresh");
        let mut budget = RetryBudget::new(3);

        let err = with_refresh(&provider, &credentials(), &mut session, &mut budget, |_| async {
            Err::<u32, _>(PortalError::Remote("not open yet".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, EngineError::Portal(PortalError::Remote(_))));
        assert_eq!(budget.spent(), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_authentication_error() {
        let provider = FakeProvider::new(true);
        let mut session = SessionCredential::new("stale");
        let mut budget = RetryBudget::new(3);

        let err = with_refresh(&provider, &credentials(), &mut session, &mut budget, |_| async {
            Err::<u32, _>(PortalError::SessionExpired)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, EngineError::Authentication(_)));
    }
}
