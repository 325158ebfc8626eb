//! Example of rate limiting and retries against a throttling upstream
//!
//! This example shows how to:
//! 1. Plug a custom transport into the client
//! 2. Share one token bucket between concurrent tasks
//! 3. Recover from 429/503 answers with backoff and Retry-After
//! 4. Bound the whole run with a deadline

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};
use yfquant_rs::prelude::{
    CancelToken, Client, ClientConfig, HttpRequest, HttpResponse, HttpTransport, RateLimiterConfig,
    RetryConfig, TransportError,
};

/// Upstream that throttles every third request and fails every seventh.
#[derive(Default)]
struct FlakyUpstream {
    requests: AtomicU32,
}

impl HttpTransport for FlakyUpstream {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let n = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(20)).await;

        if n % 7 == 0 {
            return Err(TransportError::connection("connection reset by peer"));
        }
        if n % 3 == 0 {
            return Ok(HttpResponse::new(429).with_header("Retry-After", "0.5"));
        }
        let body = format!(r#"{{"url": "{}", "request": {}}}"#, request.url, n);
        Ok(HttpResponse::new(200).with_body(body))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = ClientConfig::default()
        .with_rate_limit(RateLimiterConfig {
            requests_per_second: 4.0,
            burst: 2,
        })
        .with_retry(
            RetryConfig::default()
                .with_backoff(Duration::from_millis(200), Duration::from_secs(2))
                .with_max_retries(4),
        );
    let client = Arc::new(Client::with_transport(FlakyUpstream::default(), config));
    let cancel = CancelToken::with_timeout(Duration::from_secs(20));
    let start = Instant::now();

    let tasks: Vec<_> = ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "META"]
        .into_iter()
        .map(|symbol| {
            let client = Arc::clone(&client);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let url = format!("https://upstream.invalid/v7/quote?symbols={symbol}");
                let result = client.get_json::<serde_json::Value>(&url, &cancel).await;
                (symbol, result)
            })
        })
        .collect();

    for task in tasks {
        let (symbol, result) = task.await?;
        match result {
            Ok(body) => info!("{symbol}: served by request #{}", body["request"]),
            Err(err) => error!("{symbol}: {err}"),
        }
    }

    info!(
        "{} upstream requests in {:?}",
        client.transport().requests.load(Ordering::SeqCst),
        start.elapsed()
    );
    Ok(())
}
