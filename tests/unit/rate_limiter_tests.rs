use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use yfquant_rs::transport::{CancelReason, CancelToken, RateLimiter, RateLimiterConfig};

#[tokio::test(start_paused = true)]
async fn test_burst_admission_then_partial_refill() {
    let limiter = RateLimiter::new(10.0, 5);
    let cancel = CancelToken::new();
    let start = Instant::now();

    for _ in 0..5 {
        limiter.acquire(&cancel).await.unwrap();
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(!limiter.try_acquire());

    limiter.acquire(&cancel).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(99));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_never_overdraw() {
    let limiter = Arc::new(RateLimiter::from_config(&RateLimiterConfig {
        requests_per_second: 4.0,
        burst: 2,
    }));
    let cancel = CancelToken::new();
    let start = Instant::now();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Two from the burst, four more at 4/s.
    assert!(start.elapsed() >= Duration::from_millis(999));
    assert!(limiter.available_tokens() >= 0.0);
    assert!(limiter.available_tokens() <= 2.0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_wakes_every_waiter() {
    let limiter = Arc::new(RateLimiter::new(0.01, 1));
    assert!(limiter.try_acquire());
    let cancel = CancelToken::new();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await })
        })
        .collect();

    tokio::time::advance(Duration::from_millis(10)).await;
    cancel.cancel();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Err(CancelReason::Cancelled));
    }
}
