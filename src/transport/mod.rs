//! Request-path plumbing: token-bucket rate limiting, exponential backoff
//! with jitter, cancellation, and an HTTP client tying them together.
//!
//! Nothing here touches the pricing engine. The limiter is the only shared
//! mutable state; every wait races a [`CancelToken`].

mod cancel;
mod client;
mod error;
mod http;
mod rate_limiter;
mod retry;

pub use cancel::{CancelReason, CancelToken};
pub use client::{Client, ClientConfig, DEFAULT_USER_AGENT};
pub use error::TransportError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ProxyConfig, ReqwestTransport};
pub use rate_limiter::{RateLimiter, RateLimiterConfig};
pub use retry::{
    DEFAULT_RETRY_STATUSES, RetryConfig, compute_backoff, compute_backoff_with, should_retry,
    with_retry,
};
