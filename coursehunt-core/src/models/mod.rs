//! Domain models for coursehunt.
//!
//! ## Submodules
//!
//! - [`course`] - Catalog entities (`Course`, `Category`, `TermWindow`, `Grade`)
//! - [`session`] - Authentication state (`SessionCredential`, `Credentials`)
//! - [`outcome`] - Per-attempt outcome classification (`AttemptOutcome`)

mod course;
mod outcome;
mod session;

// Re-export everything at the models level
pub use course::{Category, Course, Grade, TermWindow};
pub use outcome::AttemptOutcome;
pub use session::{Credentials, SessionCredential};
