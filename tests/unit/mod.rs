mod greeks_tests;
mod iv_tests;
mod rate_limiter_tests;
mod retry_tests;
