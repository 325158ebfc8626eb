//! Commonly used types and functions.

pub use crate::pricing::{
    BlackScholes, Greeks, IVError, IvSolution, IvStatus, OptionChain, OptionChainWithGreeks,
    OptionContract, OptionParams, OptionType, OptionWithGreeks, SolverConfig,
    black_scholes_price, compute_greeks, enrich_chain_with_greeks, implied_volatility, solve_iv,
};
pub use crate::transport::{
    CancelReason, CancelToken, Client, ClientConfig, HttpRequest, HttpResponse, HttpTransport,
    ProxyConfig, RateLimiter, RateLimiterConfig, RetryConfig, TransportError, with_retry,
};
pub use crate::utils::current_unix_seconds;
