//! # yfquant-rs
//!
//! Options analytics and resilient request plumbing for a market-data client.
//!
//! ## Pricing
//!
//! [`pricing`] implements European option pricing with the Black-Scholes
//! model: theoretical prices, the five Greeks (theta per calendar day, vega
//! and rho per percentage point), implied volatility by Newton-Raphson, and
//! Greeks enrichment of whole option chains.
//!
//! ## Transport
//!
//! [`transport`] protects an upstream API from bursts and transient failures:
//! a shared token-bucket [`RateLimiter`](transport::RateLimiter), an
//! exponential backoff with jitter that honors `Retry-After`, and a
//! [`Client`](transport::Client) that combines both over `reqwest`. Every
//! wait can be cancelled through a [`CancelToken`](transport::CancelToken).
//!
//! ## Example
//!
//! ```
//! use yfquant_rs::prelude::*;
//!
//! let params = OptionParams::call(100.0, 100.0, 1.0, 0.05);
//! let greeks = BlackScholes::greeks(&params, 0.20).unwrap();
//! assert!(greeks.gamma > 0.0 && greeks.theta < 0.0);
//!
//! let limiter = RateLimiter::new(5.0, 10);
//! assert!(limiter.try_acquire());
//! ```

pub mod pricing;
pub mod transport;
pub mod utils;

pub mod prelude;

pub use pricing::{
    Greeks, OptionChain, OptionChainWithGreeks, OptionType, black_scholes_price, compute_greeks,
    enrich_chain_with_greeks, implied_volatility,
};
pub use transport::{CancelToken, Client, ClientConfig, RateLimiter, RetryConfig, TransportError};
