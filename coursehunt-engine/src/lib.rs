// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # coursehunt Engine
//!
//! The hunting engine: a retry/backoff state machine that drives repeated
//! claim attempts against a flaky, session-expiring remote service.
//!
//! ## Pieces
//!
//! - [`HuntEngine`] - owns the target queue for a session and walks the
//!   state machine (`Scheduled → Running ⇄ Waiting → terminal`)
//! - [`RetryBudget`] - the session-wide ceiling on recoverable failures
//! - [`CancelToken`] / [`CancelHandle`] - cooperative cancellation,
//!   observable at every suspend point
//! - [`HuntObserver`] - display hooks (countdown, attempts, waits)
//! - [`with_refresh`] - the pre-flight helper that retries a catalog
//!   operation across session refreshes under the same budget rules
//!
//! ## Guarantees
//!
//! No course is silently lost: every terminal path (completion, budget
//! exhaustion, cancellation, even an authentication failure mid-session)
//! runs the same queue reconciliation, merging set-aside and untried
//! courses back for persistence. One claim attempt is in flight at a
//! time; the session credential is only replaced between attempts.

pub mod budget;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod observer;
pub mod refresh;

pub use budget::RetryBudget;
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use engine::{ClaimAttempt, HuntEngine, HuntReport, HuntState};
pub use error::EngineError;
pub use observer::{HuntObserver, NullObserver};
pub use refresh::with_refresh;
