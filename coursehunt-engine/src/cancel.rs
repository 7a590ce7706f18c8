//! Cooperative cancellation.
//!
//! Cancellation is an explicit token polled (or awaited) at every suspend
//! point, never an unwind. The engine checks it during the scheduled-start
//! wait, during the inter-attempt delay, and immediately after each claim
//! attempt.

use tokio::sync::watch;

/// Creates a connected handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The signalling side, held by whoever delivers the operator interrupt.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals cancellation to every token cloned from this pair.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// The observing side, passed into every suspend point.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// True once cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when cancellation is signalled; pends forever if the
    /// handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
