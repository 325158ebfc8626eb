use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use yfquant_rs::transport::{
    CancelToken, Client, ClientConfig, HttpRequest, HttpResponse, HttpTransport, RetryConfig,
    TransportError, compute_backoff, with_retry,
};

struct Scripted {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: AtomicU32,
}

impl Scripted {
    fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpTransport for Scripted {
    async fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(HttpResponse::new(200)))
    }
}

#[test]
fn test_backoff_clamp() {
    let max = Duration::from_secs(30);
    assert_eq!(compute_backoff(Duration::from_secs(60), max, 0.0), max);
    assert_eq!(
        compute_backoff(Duration::from_secs(1), max, 0.0),
        Duration::from_secs(1)
    );
}

#[test]
fn test_jitter_stays_within_fraction() {
    let max = Duration::from_secs(30);
    for _ in 0..500 {
        let backoff = compute_backoff(Duration::from_secs(10), max, 0.2);
        assert!(backoff >= Duration::from_secs(8));
        assert!(backoff <= Duration::from_secs(12));
    }
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_status_returns_immediately() {
    for status in [200, 201, 400, 404] {
        let transport = Scripted::new(vec![Ok(HttpResponse::new(status))]);
        let start = Instant::now();

        let response = with_retry(
            &transport,
            &HttpRequest::get("https://example.com"),
            &RetryConfig::default(),
            &CancelToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status, status);
        assert_eq!(transport.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

#[tokio::test(start_paused = true)]
async fn test_backoff_is_clamped_between_attempts() {
    let transport = Scripted::new(vec![
        Ok(HttpResponse::new(500)),
        Ok(HttpResponse::new(500)),
        Ok(HttpResponse::new(500)),
        Ok(HttpResponse::new(200)),
    ]);
    let config = RetryConfig::default()
        .with_jitter(0.0)
        .with_backoff(Duration::from_secs(2), Duration::from_secs(3));
    let start = Instant::now();

    let response = with_retry(
        &transport,
        &HttpRequest::get("https://example.com"),
        &config,
        &CancelToken::new(),
    )
    .await
    .unwrap();

    // 2s, then 4s and 8s clamped to 3s.
    assert_eq!(response.status, 200);
    assert!(start.elapsed() >= Duration::from_secs(8));
    assert!(start.elapsed() < Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_retries_surface_first_error() {
    let transport = Scripted::new(vec![Err(TransportError::connection("refused"))]);

    let err = with_retry(
        &transport,
        &HttpRequest::get("https://example.com"),
        &RetryConfig::disabled(),
        &CancelToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        TransportError::RetriesExhausted { attempts: 1, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_client_honors_retry_after() {
    let transport = Scripted::new(vec![
        Ok(HttpResponse::new(429).with_header("retry-after", "4")),
        Ok(HttpResponse::new(200).with_body(r#"{"ok": true}"#)),
    ]);
    let client = Client::with_transport(
        transport,
        ClientConfig::default().with_retry(RetryConfig::default().with_jitter(0.0)),
    );
    let start = Instant::now();

    let value: serde_json::Value = client
        .get_json("https://example.com", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(value["ok"], true);
    assert!(start.elapsed() >= Duration::from_secs(4));
    assert_eq!(client.transport().calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_covers_whole_request() {
    let transport = Scripted::new(vec![
        Ok(HttpResponse::new(503)),
        Ok(HttpResponse::new(503)),
        Ok(HttpResponse::new(503)),
    ]);
    let config = RetryConfig::default().with_jitter(0.0);
    let cancel = CancelToken::with_timeout(Duration::from_millis(2500));

    let err = with_retry(
        &transport,
        &HttpRequest::get("https://example.com"),
        &config,
        &cancel,
    )
    .await
    .unwrap_err();

    // Attempts at 0s and 1s; the 2s wait crosses the deadline.
    assert!(err.is_cancelled());
    assert_eq!(transport.calls(), 2);
}
