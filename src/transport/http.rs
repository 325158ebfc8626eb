//! HTTP request/response values and the transport seam.
//!
//! The retry policy only needs to replay a request and look at the status
//! code, headers and body of what comes back. [`HttpTransport`] captures
//! exactly that; [`ReqwestTransport`] is the production implementation and
//! tests plug in scripted transports.

use super::client::ClientConfig;
use super::error::TransportError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::trace;

/// HTTP methods used against the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// A replayable HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A `GET` request without headers.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `POST` request carrying `body`.
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with the given status and no headers or body.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of header `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Server-requested delay from a `Retry-After` header given in seconds
    /// (fractions accepted). Dates and negative values are ignored.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds: f64 = self.header("Retry-After")?.trim().parse().ok()?;
        Duration::try_from_secs_f64(seconds).ok()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turns a non-2xx response into [`TransportError::Status`].
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                message: self.text(),
            })
        }
    }
}

/// Executes one HTTP exchange. Implementations must not retry on their own.
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and reads the whole response.
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Outbound proxy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://proxy:8080`.
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Proxy without credentials.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Checks that the URL parses and names a scheme reqwest can proxy.
    pub fn validate(&self) -> Result<(), TransportError> {
        let url = reqwest::Url::parse(&self.url).map_err(|err| {
            TransportError::invalid_request(format!("proxy url {:?}: {}", self.url, err))
        })?;
        match url.scheme() {
            "http" | "https" | "socks5" | "socks5h" => Ok(()),
            scheme => Err(TransportError::invalid_request(format!(
                "unsupported proxy scheme {scheme:?}"
            ))),
        }
    }

    /// Adds basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// [`HttpTransport`] backed by a `reqwest::Client` with a cookie store.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying client from the user agent, timeout and proxy
    /// of `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_store(true);

        if let Some(proxy_config) = config.proxy.as_ref().filter(|proxy| !proxy.url.is_empty()) {
            proxy_config.validate()?;
            let mut proxy = reqwest::Proxy::all(proxy_config.url.as_str())?;
            if let Some(username) = &proxy_config.username {
                let password = proxy_config.password.as_deref().unwrap_or_default();
                proxy = proxy.basic_auth(username, password);
            }
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an already configured client.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();
        trace!(
            "{} {} -> {} ({} bytes)",
            method_name(request.method),
            request.url,
            status,
            body.len()
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn method_name(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    }
}
