// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # coursehunt Portal
//!
//! The campus-portal implementations of the collaborator traits defined in
//! `coursehunt-core`:
//!
//! - [`SsoLogin`] - the CAS single-sign-on flow: scrape the login form,
//!   AES-encrypt the password with the form's salt, post, capture the
//!   registration-host cookies
//! - [`PortalClient`] - catalog discovery (term window, categories, course
//!   search, claimed listing, grades) and claim submission
//!
//! Every portal response is classified three ways before anything else
//! looks at it: a JSON payload, a login page standing in for data
//! (`PortalError::SessionExpired`), or a remote/transport failure. The
//! hunting engine never sees wire-format details.

pub mod catalog;
pub mod claim;
pub mod client;
pub mod crypto;
pub mod login;

pub use client::PortalClient;
pub use login::SsoLogin;
