//! Token-bucket rate limiter shared by outbound requests.
//!
//! Tokens refill continuously at `requests_per_second` up to `burst`. Each
//! request takes one token; when the bucket is empty the caller sleeps for
//! exactly the time needed to refill the deficit, or until its
//! [`CancelToken`] fires.

use super::cancel::{CancelReason, CancelToken};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Rate limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained refill rate in tokens per second.
    pub requests_per_second: f64,
    /// Bucket capacity; also the number of requests admitted back to back.
    pub burst: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5.0,
            burst: 10,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter. Share it between tasks behind an `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    max_tokens: f64,
    refill_rate: f64,
}

impl RateLimiter {
    /// Creates a limiter that starts with a full bucket.
    ///
    /// A non-positive or non-finite rate never refills: once the initial
    /// burst is spent, [`acquire`](Self::acquire) waits until cancelled.
    #[must_use]
    pub fn new(requests_per_second: f64, burst: u32) -> Self {
        let max_tokens = f64::from(burst);
        Self {
            bucket: Mutex::new(Bucket {
                tokens: max_tokens,
                last_refill: Instant::now(),
            }),
            max_tokens,
            refill_rate: requests_per_second,
        }
    }

    /// Creates a limiter from its configuration.
    #[must_use]
    pub fn from_config(config: &RateLimiterConfig) -> Self {
        Self::new(config.requests_per_second, config.burst)
    }

    /// Bucket capacity.
    #[must_use]
    pub fn burst(&self) -> f64 {
        self.max_tokens
    }

    /// Refill rate in tokens per second.
    #[must_use]
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    fn lock(&self) -> MutexGuard<'_, Bucket> {
        // Poisoning is ignored: every update leaves the bucket consistent.
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        if self.refill_rate.is_finite() && self.refill_rate > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        }
        bucket.last_refill = now;
    }

    /// Tokens currently available, after crediting elapsed time.
    #[must_use]
    pub fn available_tokens(&self) -> f64 {
        let mut bucket = self.lock();
        self.refill(&mut bucket);
        bucket.tokens
    }

    /// Takes a token if one is available right now.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        self.try_take().is_ok()
    }

    /// One refill-and-take step. On failure returns how long to wait for the
    /// deficit, or `None` if the bucket never refills.
    fn try_take(&self) -> Result<(), Option<Duration>> {
        let mut bucket = self.lock();
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            trace!("token acquired, {:.3} left", bucket.tokens);
            return Ok(());
        }

        let deficit = 1.0 - bucket.tokens;
        Err(Duration::try_from_secs_f64(deficit / self.refill_rate).ok())
    }

    /// Waits until a token is available, then consumes it.
    ///
    /// Cancellation during the wait returns the token's reason and consumes
    /// nothing. Concurrent callers never share a token; there is no fairness
    /// guarantee among them.
    pub async fn acquire(&self, cancel: &CancelToken) -> Result<(), CancelReason> {
        loop {
            let wait = match self.try_take() {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };

            match wait {
                Some(wait) => {
                    debug!("rate limited, waiting {:?} for a token", wait);
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        reason = cancel.cancelled() => return Err(reason),
                    }
                }
                None => {
                    debug!("rate limiter never refills, waiting for cancellation");
                    return Err(cancel.cancelled().await);
                }
            }
        }
    }
}
