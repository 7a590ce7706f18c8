//! Engine error types.

use coursehunt_core::{AuthError, PortalError};
use thiserror::Error;

/// Errors surfaced by the engine and the pre-flight refresh helper.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Re-authentication failed; the session cannot continue.
    #[error("re-authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// The retry budget was spent during a blocking pre-flight operation.
    #[error("retry budget exhausted after {0} recoverable failures")]
    BudgetExhausted(u32),

    /// A portal error that is not recoverable by refreshing the session.
    #[error(transparent)]
    Portal(#[from] PortalError),
}
