// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # coursehunt Store
//!
//! Durable state for the coursehunt application:
//!
//! - **Config**: the persisted configuration record (credentials, start
//!   time, delays, session credential, retry ceiling)
//! - **Queue**: the target-queue file of courses pending a claim
//! - **Persistence**: JSON file I/O helpers with atomic writes and
//!   restrictive permissions
//!
//! Both files live under the user config dir and are written with
//! temp-file-then-rename discipline, so a crash mid-write never corrupts
//! the previous valid snapshot. The config file holds a password, so
//! files get 0o600 and directories 0o700 on Unix.

pub mod config;
pub mod error;
pub mod persistence;
pub mod queue;

pub use config::Config;
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, default_queue_path};
pub use queue::{load_courses, load_courses_from, save_courses, save_courses_to};
