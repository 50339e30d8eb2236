//! Cooperative cancellation for asynchronous graph rewrites.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

use depot_core::{DepotError, DepotResult};

/// Cancellation signal shared between a caller and in-flight rewrites.
///
/// Cloned handles observe the same signal. Once fired it stays fired; there
/// is no reset.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fired: AtomicBool,
    notify: Notify,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal; all current and future waits complete immediately.
    pub fn cancel(&self) {
        self.inner.fired.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Error out if the signal has fired.
    pub fn guard(&self) -> DepotResult<()> {
        if self.is_cancelled() {
            Err(DepotError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait until the signal fires.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let notified = self.inner.notify.notified();
            // Re-check after registering so a cancel() racing this call is
            // not missed.
            if self.is_cancelled() {
                break;
            }
            notified.await;
        }
    }
}
