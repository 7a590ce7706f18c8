// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # coursehunt Core
//!
//! Core types, outcome classification, and collaborator traits for the
//! coursehunt workspace.
//!
//! This crate provides the foundational abstractions shared by all other
//! coursehunt crates:
//!
//! - Domain models ([`Course`], [`Category`], [`TermWindow`], [`Grade`])
//! - The session credential and login credentials ([`SessionCredential`],
//!   [`Credentials`])
//! - The per-attempt outcome classification ([`AttemptOutcome`])
//! - Error taxonomies for portal responses and authentication
//!   ([`PortalError`], [`AuthError`])
//! - Trait contracts the hunting engine consumes ([`SessionProvider`],
//!   [`CatalogClient`], [`ClaimClient`])
//!
//! The crate performs no I/O of its own; concrete network and storage
//! behavior lives in `coursehunt-portal` and `coursehunt-store`.

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{AuthError, PortalError};

// Re-export all model types
pub use models::{
    AttemptOutcome, Category, Course, Credentials, Grade, SessionCredential, TermWindow,
};

// Re-export traits
pub use traits::{CatalogClient, ClaimClient, SessionProvider};
