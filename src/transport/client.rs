//! Rate-limited, retrying HTTP client.
//!
//! A [`Client`] is constructed explicitly by the caller and owns its
//! transport, an optional shared [`RateLimiter`] and a [`RetryConfig`]. Each
//! logical request takes one limiter token and then goes through
//! [`with_retry`].

use super::cancel::CancelToken;
use super::error::TransportError;
use super::http::{HttpRequest, HttpResponse, HttpTransport, ProxyConfig, ReqwestTransport};
use super::rate_limiter::{RateLimiter, RateLimiterConfig};
use super::retry::{RetryConfig, with_retry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Browser user agent sent by default; the upstream rejects library agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Per-attempt timeout.
    pub timeout: Duration,
    pub retry: RetryConfig,
    /// Admission control; `None` sends without limiting.
    pub rate_limit: Option<RateLimiterConfig>,
    pub proxy: Option<ProxyConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            rate_limit: None,
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// HTTP client with admission control and retries.
#[derive(Debug)]
pub struct Client<T = ReqwestTransport> {
    transport: T,
    rate_limiter: Option<Arc<RateLimiter>>,
    retry: RetryConfig,
}

impl Client<ReqwestTransport> {
    /// Builds a reqwest-backed client.
    ///
    /// # Errors
    /// Fails if the proxy URL is invalid or the TLS backend cannot start.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        info!(
            "http client ready: timeout {:?}, {} retries, rate limit {:?}, proxy {}",
            config.timeout,
            config.retry.max_retries,
            config.rate_limit,
            config.proxy.is_some()
        );
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: HttpTransport> Client<T> {
    /// Builds a client over any transport.
    #[must_use]
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            rate_limiter: config
                .rate_limit
                .as_ref()
                .map(|rate_limit| Arc::new(RateLimiter::from_config(rate_limit))),
            retry: config.retry,
        }
    }

    /// Replaces the limiter, e.g. to share one bucket across clients.
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiter>> {
        self.rate_limiter.as_ref()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Takes a limiter token, then sends `request` under the retry policy.
    pub async fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, TransportError> {
        if let Some(rate_limiter) = &self.rate_limiter {
            rate_limiter.acquire(cancel).await?;
        }
        with_retry(&self.transport, request, &self.retry, cancel).await
    }

    /// Sends a `GET` to `url`.
    pub async fn get(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, TransportError> {
        if url.trim().is_empty() {
            return Err(TransportError::invalid_request("empty url"));
        }
        self.send(&HttpRequest::get(url), cancel).await
    }

    /// Sends a `GET` to `url` and decodes a successful JSON body.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<R, TransportError> {
        let response = self.get(url, cancel).await?.error_for_status()?;
        debug!("decoding {} bytes from {}", response.body.len(), url);
        response.json()
    }
}
