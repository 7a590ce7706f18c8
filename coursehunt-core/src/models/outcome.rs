//! Per-attempt outcome classification.

use crate::error::PortalError;

/// The outcome of one claim attempt. Drives every state transition in the
/// hunting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The seat was claimed.
    Claimed,
    /// The session credential was stale; the course stays queued.
    SessionExpired,
    /// The remote refused the claim; the reason is the remote's message.
    Rejected(String),
    /// Transport failure; budgeted like a rejection.
    Transport(String),
}

impl AttemptOutcome {
    /// Classifies a claim-client result.
    pub fn from_claim(result: Result<(), PortalError>) -> Self {
        match result {
            Ok(()) => Self::Claimed,
            Err(PortalError::SessionExpired) => Self::SessionExpired,
            Err(PortalError::Remote(reason)) => Self::Rejected(reason),
            Err(PortalError::Transport(reason)) => Self::Transport(reason),
        }
    }

    /// True for outcomes that consume retry budget.
    pub fn consumes_budget(&self) -> bool {
        !matches!(self, Self::Claimed)
    }

    /// True for outcomes that set the course aside for the session.
    pub fn sets_course_aside(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Transport(_))
    }

    /// Short label for logs and attempt records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::SessionExpired => "session-expired",
            Self::Rejected(_) => "rejected",
            Self::Transport(_) => "transport-error",
        }
    }
}
