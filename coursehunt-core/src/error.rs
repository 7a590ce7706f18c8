//! Error classification for portal responses and authentication.

use thiserror::Error;

/// Three-way classification of a failed portal call.
///
/// Every catalog or claim request ends in a structured payload or one of
/// these variants. The hunting engine never inspects transport details
/// beyond this classification.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    /// The remote answered with a login page instead of data; the session
    /// credential must be refreshed before retrying.
    #[error("session expired")]
    SessionExpired,

    /// The remote refused the request. The message is the remote's own,
    /// surfaced verbatim for operator visibility.
    #[error("{0}")]
    Remote(String),

    /// Transport-level failure or a response that could not be understood.
    #[error("transport error: {0}")]
    Transport(String),
}

impl PortalError {
    /// Creates a transport error from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Returns true when re-authenticating may make the call succeed.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Errors from the single-sign-on login flow.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The login page markup did not contain an expected element.
    #[error("no element matches selector '{0}' on the login page")]
    MarkupMissing(String),

    /// An expected login form element carried no usable value.
    #[error("login form element '{0}' has no value")]
    ValueMissing(String),

    /// The identity server did not grant a session for these credentials.
    #[error("credentials rejected by the identity server")]
    CredentialsRejected,

    /// Password encryption for the login form failed.
    #[error("password encryption failed: {0}")]
    Encryption(String),

    /// Transport-level failure while talking to the identity server.
    #[error("transport error: {0}")]
    Transport(String),
}

impl AuthError {
    /// Creates a transport error from anything displayable.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}
