//! Exponential backoff with jitter over an [`HttpTransport`].
//!
//! One logical request becomes at most `max_retries + 1` sequential
//! attempts. Transport failures and responses with a retryable status are
//! retried after a backoff that grows by `backoff_factor` per retry, is
//! clamped to `max_backoff`, and is then perturbed by up to `±jitter` of
//! itself. A `Retry-After` header replaces the computed wait.

use super::cancel::CancelToken;
use super::error::TransportError;
use super::http::{HttpRequest, HttpResponse, HttpTransport};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Status codes treated as transient by default.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry behavior of a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Ceiling applied before jitter.
    pub max_backoff: Duration,
    /// Backoff multiplier per retry (2.0 doubles).
    pub backoff_factor: f64,
    /// Jitter as a fraction of the backoff, in `[0, 1]`.
    pub jitter: f64,
    /// Statuses worth retrying.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: 0.1,
            retry_on_status: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryConfig {
    /// Creates a retry configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that sends each request exactly once.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Sets the number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial backoff and its ceiling.
    #[must_use]
    pub fn with_backoff(mut self, initial_backoff: Duration, max_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self.max_backoff = max_backoff;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Sets the jitter fraction.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Replaces the set of retryable statuses.
    #[must_use]
    pub fn with_retry_on_status(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_on_status = statuses.into();
        self
    }

    /// Returns true if `status` is in the retryable set.
    #[must_use]
    pub fn should_retry(&self, status: u16) -> bool {
        should_retry(status, &self.retry_on_status)
    }
}

/// Returns true if `status` is one of `retry_on_status`.
#[must_use]
pub fn should_retry(status: u16, retry_on_status: &[u16]) -> bool {
    retry_on_status.contains(&status)
}

/// Backoff for one retry: `base` clamped to `max`, then moved uniformly at
/// random by up to `jitter × backoff` in either direction.
#[must_use]
pub fn compute_backoff(base: Duration, max: Duration, jitter: f64) -> Duration {
    compute_backoff_with(base, max, jitter, &mut rand::thread_rng())
}

/// [`compute_backoff`] with a caller-supplied random source.
#[must_use]
pub fn compute_backoff_with<R: Rng + ?Sized>(
    base: Duration,
    max: Duration,
    jitter: f64,
    rng: &mut R,
) -> Duration {
    let backoff = base.min(max);

    let jitter = if jitter.is_finite() {
        jitter.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if jitter == 0.0 {
        return backoff;
    }

    let seconds = backoff.as_secs_f64();
    let offset = rng.gen_range(-1.0..=1.0) * seconds * jitter;
    Duration::try_from_secs_f64((seconds + offset).max(0.0)).unwrap_or(backoff)
}

/// Grows `current` by `factor`, saturating instead of overflowing.
fn next_backoff(current: Duration, factor: f64) -> Duration {
    let next = current.as_secs_f64() * factor;
    if next.is_nan() || next < 0.0 {
        return current;
    }
    Duration::try_from_secs_f64(next).unwrap_or(Duration::MAX)
}

/// Sends `request` through `transport`, retrying transient failures.
///
/// - A transport error is retried while retries remain; afterwards it is
///   returned wrapped in [`TransportError::RetriesExhausted`].
/// - A response whose status is retryable is discarded and retried while
///   retries remain; on the last attempt it is returned as-is.
/// - Any other response is returned immediately.
///
/// Both the attempts and the waits between them race against `cancel`, and
/// cancellation is reported as [`TransportError::Cancelled`].
pub async fn with_retry<T: HttpTransport>(
    transport: &T,
    request: &HttpRequest,
    config: &RetryConfig,
    cancel: &CancelToken,
) -> Result<HttpResponse, TransportError> {
    let mut backoff = config.initial_backoff;
    let mut attempt: u32 = 0;

    loop {
        cancel.check()?;

        let outcome = tokio::select! {
            outcome = transport.execute(request) => outcome,
            reason = cancel.cancelled() => return Err(reason.into()),
        };
        let retries_left = attempt < config.max_retries;

        let wait = match outcome {
            Err(error) if retries_left => {
                let wait = compute_backoff(backoff, config.max_backoff, config.jitter);
                warn!(
                    "attempt {} for {} failed: {}, retrying in {:?}",
                    attempt + 1,
                    request.url,
                    error,
                    wait
                );
                wait
            }
            Err(error) => {
                return Err(TransportError::RetriesExhausted {
                    attempts: attempt + 1,
                    source: Box::new(error),
                });
            }
            Ok(response) if retries_left && config.should_retry(response.status) => {
                let wait = response
                    .retry_after()
                    .unwrap_or_else(|| compute_backoff(backoff, config.max_backoff, config.jitter));
                warn!(
                    "attempt {} for {} returned status {}, retrying in {:?}",
                    attempt + 1,
                    request.url,
                    response.status,
                    wait
                );
                wait
            }
            Ok(response) => {
                debug!(
                    "{} answered {} after {} attempt(s)",
                    request.url,
                    response.status,
                    attempt + 1
                );
                return Ok(response);
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            reason = cancel.cancelled() => return Err(reason.into()),
        }

        backoff = next_backoff(backoff, config.backoff_factor);
        attempt += 1;
    }
}
