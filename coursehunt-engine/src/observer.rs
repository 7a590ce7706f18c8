//! Display hooks for a hunting session.
//!
//! The engine performs no terminal output itself; callers that want a
//! countdown or per-attempt feedback implement this trait. Every method
//! has an empty default so observers implement only what they show.

use coursehunt_core::Course;
use std::time::Duration;

/// Progress events emitted by the engine.
#[allow(unused_variables)]
pub trait HuntObserver: Send {
    /// Fires about once per second while waiting for a scheduled start.
    fn on_countdown(&self, remaining: Duration) {}

    /// A claim attempt is about to be made for `course`.
    fn on_attempt(&self, course: &Course) {}

    /// The seat was claimed.
    fn on_claimed(&self, course: &Course) {}

    /// The session expired; a refresh is about to run.
    fn on_session_expired(&self) {}

    /// The course was set aside for this session with the given reason.
    fn on_set_aside(&self, course: &Course, reason: &str) {}

    /// The inter-attempt delay is starting.
    fn on_wait(&self, delay: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NullObserver;

impl HuntObserver for NullObserver {}
