//! Cancellation signal with an optional deadline.
//!
//! A [`CancelToken`] is handed to every suspending operation of the request
//! path (rate limiter waits, retry backoff, in-flight requests). Cloning the
//! token shares the signal; cancelling any clone wakes every waiter at once.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a suspended operation was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CancelReason {
    /// [`CancelToken::cancel`] was called.
    #[error("operation cancelled")]
    Cancelled,
    /// The token's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug)]
struct Inner {
    signal: watch::Sender<bool>,
    deadline: Option<Instant>,
}

/// Cloneable cancellation handle.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token that only fires when cancelled explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A token that also fires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    /// A token that also fires `timeout` from now. A timeout too large to
    /// represent means no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout))
    }

    fn build(deadline: Option<Instant>) -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner { signal, deadline }),
        }
    }

    /// Fires the token. Idempotent.
    pub fn cancel(&self) {
        self.inner.signal.send_replace(true);
    }

    /// The deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns the reason if the token has already fired.
    pub fn check(&self) -> Result<(), CancelReason> {
        if *self.inner.signal.borrow() {
            return Err(CancelReason::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(CancelReason::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Returns true once the token has fired for either reason.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Completes when the token fires, yielding the reason.
    ///
    /// Meant to be raced against other futures in `tokio::select!`.
    pub async fn cancelled(&self) -> CancelReason {
        let mut receiver = self.inner.signal.subscribe();
        let explicit = async move {
            // The sender lives in `inner`, which `self` keeps alive, so this
            // only returns once the flag is set.
            let _ = receiver.wait_for(|cancelled| *cancelled).await;
        };

        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = explicit => CancelReason::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                explicit.await;
                CancelReason::Cancelled
            }
        }
    }
}
