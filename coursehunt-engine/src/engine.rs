//! The hunting state machine.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use coursehunt_core::{
    AttemptOutcome, ClaimClient, Course, Credentials, SessionCredential, SessionProvider,
};
use tracing::{debug, info, warn};

use crate::budget::RetryBudget;
use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::observer::{HuntObserver, NullObserver};

// ============================================================================
// States
// ============================================================================

/// Engine state. `Exhausted`, `Completed`, and `Cancelled` are terminal
/// for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntState {
    /// Waiting for the configured start time.
    Scheduled,
    /// A claim attempt is in flight (or about to be).
    Running,
    /// Between attempts, sitting out the configured delay.
    Waiting,
    /// The retry budget is spent.
    Exhausted,
    /// The pending queue is empty.
    Completed,
    /// The operator interrupted the session.
    Cancelled,
}

impl HuntState {
    /// True for states that end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Completed | Self::Cancelled)
    }
}

// ============================================================================
// Attempt records & report
// ============================================================================

/// Record of a single claim attempt.
#[derive(Debug, Clone)]
pub struct ClaimAttempt {
    /// Identifier of the attempted course.
    pub course_id: String,
    /// Display name of the attempted course.
    pub course_name: String,
    /// How the attempt was classified.
    pub outcome: AttemptOutcome,
    /// How long the attempt took.
    pub duration: Duration,
}

/// Summary of one hunting session.
#[derive(Debug)]
pub struct HuntReport {
    /// The terminal state the session ended in.
    pub state: HuntState,
    /// Courses claimed this session, `claimed_at` stamped.
    pub claimed: Vec<Course>,
    /// Every attempt made, in order.
    pub attempts: Vec<ClaimAttempt>,
    /// The budget as it stood at the end.
    pub budget: RetryBudget,
    /// Wall-clock duration of the session.
    pub duration: Duration,
}

impl HuntReport {
    /// True when every target course was claimed.
    pub fn is_fully_claimed(&self) -> bool {
        self.state == HuntState::Completed
            && self
                .attempts
                .iter()
                .all(|a| !a.outcome.sets_course_aside())
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Orchestrates repeated claim attempts over the target queue.
///
/// The engine owns the queue for the duration of a session. One attempt is
/// in flight at a time; the session credential is replaced only between
/// attempts. Whatever way the session ends, [`HuntEngine::run`] leaves the
/// queue reconciled (set-aside courses first, untried remainder after, in
/// their original relative orders) so the caller can persist it
/// unconditionally.
pub struct HuntEngine<S, C> {
    provider: S,
    claimer: C,
    credentials: Credentials,
    session: SessionCredential,
    queue: VecDeque<Course>,
    set_aside: Vec<Course>,
    claimed: Vec<Course>,
    attempts: Vec<ClaimAttempt>,
    budget: RetryBudget,
    wait: Duration,
    start_at: Option<DateTime<Local>>,
    state: HuntState,
    observer: Box<dyn HuntObserver>,
}

impl<S, C> HuntEngine<S, C>
where
    S: SessionProvider,
    C: ClaimClient,
{
    /// Creates an engine for one hunting session.
    pub fn new(
        provider: S,
        claimer: C,
        credentials: Credentials,
        session: SessionCredential,
        courses: Vec<Course>,
        budget: RetryBudget,
        wait: Duration,
    ) -> Self {
        Self {
            provider,
            claimer,
            credentials,
            session,
            queue: courses.into(),
            set_aside: Vec::new(),
            claimed: Vec::new(),
            attempts: Vec::new(),
            budget,
            wait,
            start_at: None,
            state: HuntState::Running,
            observer: Box::new(NullObserver),
        }
    }

    /// Schedules the session start; a past time starts immediately.
    pub fn with_start_time(mut self, start_at: Option<DateTime<Local>>) -> Self {
        self.start_at = start_at;
        self
    }

    /// Installs display hooks.
    pub fn with_observer(mut self, observer: Box<dyn HuntObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The courses still pending after reconciliation, in persistence order.
    pub fn remaining(&self) -> Vec<Course> {
        self.queue.iter().cloned().collect()
    }

    /// The current (possibly refreshed) session credential.
    pub fn session(&self) -> &SessionCredential {
        &self.session
    }

    /// The current state; terminal once [`HuntEngine::run`] has returned
    /// a report.
    pub fn state(&self) -> HuntState {
        self.state
    }

    /// Runs the session to a terminal state.
    ///
    /// The queue is reconciled on every exit path, including the error
    /// path; read it back with [`HuntEngine::remaining`]. An `Err` means
    /// re-authentication failed mid-session.
    pub async fn run(&mut self, cancel: &CancelToken) -> Result<HuntReport, EngineError> {
        let started = Instant::now();
        let result = self.drive(cancel).await;
        self.reconcile();

        match result {
            Ok(state) => {
                self.state = state;
                info!(
                    state = ?state,
                    claimed = self.claimed.len(),
                    pending = self.queue.len(),
                    spent = self.budget.spent(),
                    "hunting session finished"
                );
                Ok(HuntReport {
                    state,
                    claimed: std::mem::take(&mut self.claimed),
                    attempts: std::mem::take(&mut self.attempts),
                    budget: self.budget,
                    duration: started.elapsed(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn drive(&mut self, cancel: &CancelToken) -> Result<HuntState, EngineError> {
        if !self.wait_for_start(cancel).await {
            return Ok(HuntState::Cancelled);
        }
        self.state = HuntState::Running;

        loop {
            if cancel.is_cancelled() {
                return Ok(HuntState::Cancelled);
            }
            if self.budget.is_exhausted() {
                return Ok(HuntState::Exhausted);
            }
            let Some(course) = self.queue.pop_front() else {
                return Ok(HuntState::Completed);
            };

            self.observer.on_attempt(&course);
            let attempt_start = Instant::now();
            let outcome =
                AttemptOutcome::from_claim(self.claimer.claim(&self.session, &course).await);
            self.attempts.push(ClaimAttempt {
                course_id: course.id.clone(),
                course_name: course.name.clone(),
                outcome: outcome.clone(),
                duration: attempt_start.elapsed(),
            });

            match outcome {
                AttemptOutcome::Claimed => {
                    info!(course = %course.name, "seat claimed");
                    let mut course = course;
                    course.claimed_at = Some(Utc::now());
                    self.observer.on_claimed(&course);
                    self.claimed.push(course);
                }
                AttemptOutcome::SessionExpired => {
                    // The course stays at the head and is retried.
                    self.queue.push_front(course);
                    self.budget.record();
                    warn!(spent = self.budget.spent(), "session expired");
                    self.observer.on_session_expired();
                    if self.budget.is_exhausted() {
                        return Ok(HuntState::Exhausted);
                    }
                    let fresh = self.provider.obtain(&self.credentials).await?;
                    self.session = fresh;
                    debug!("session refreshed");
                }
                AttemptOutcome::Rejected(reason) | AttemptOutcome::Transport(reason) => {
                    self.budget.record();
                    warn!(course = %course.name, %reason, "claim set aside");
                    self.observer.on_set_aside(&course, &reason);
                    self.set_aside.push(course);
                }
            }

            if self.budget.is_exhausted() {
                return Ok(HuntState::Exhausted);
            }
            if self.queue.is_empty() {
                return Ok(HuntState::Completed);
            }
            if cancel.is_cancelled() {
                return Ok(HuntState::Cancelled);
            }
            if !self.pause(cancel).await {
                return Ok(HuntState::Cancelled);
            }
        }
    }

    /// Blocks until the configured start time, interruptible at sub-second
    /// granularity. Returns false when cancelled. No network activity
    /// happens here; the countdown hook is display-only.
    async fn wait_for_start(&mut self, cancel: &CancelToken) -> bool {
        let Some(at) = self.start_at else {
            return true;
        };
        let mut cancel = cancel.clone();
        loop {
            let now = Local::now();
            if now >= at {
                return true;
            }
            self.state = HuntState::Scheduled;
            let remaining = (at - now).to_std().unwrap_or(Duration::ZERO);
            self.observer.on_countdown(remaining);
            let step = remaining.min(Duration::from_secs(1));
            tokio::select! {
                () = cancel.cancelled() => return false,
                () = tokio::time::sleep(step) => {}
            }
        }
    }

    /// The inter-attempt delay. Returns false when cancelled.
    async fn pause(&mut self, cancel: &CancelToken) -> bool {
        if self.wait.is_zero() {
            return true;
        }
        self.state = HuntState::Waiting;
        self.observer.on_wait(self.wait);
        let mut cancel = cancel.clone();
        let resumed = tokio::select! {
            () = cancel.cancelled() => false,
            () = tokio::time::sleep(self.wait) => true,
        };
        if resumed {
            self.state = HuntState::Running;
        }
        resumed
    }

    /// Merges set-aside courses and the untried remainder back into the
    /// queue for persistence. Idempotent: a second invocation on the same
    /// state leaves the queue unchanged.
    fn reconcile(&mut self) {
        if self.set_aside.is_empty() {
            return;
        }
        let pending: Vec<Course> = self.queue.drain(..).collect();
        self.queue.extend(self.set_aside.drain(..));
        self.queue.extend(pending);
    }
}

// ============================================================================
// Tests
// ============================================================================
