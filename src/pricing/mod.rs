//! Options pricing and Greeks.
//!
//! This module prices European options with the Black-Scholes model, derives
//! the five first-order Greeks analytically, recovers implied volatility from
//! an observed price via Newton-Raphson, and attaches Greeks to whole option
//! chains.
//!
//! Every function here is pure: no I/O, no shared state, no panics on
//! degenerate inputs. Greeks that are undefined (at expiry, zero volatility)
//! come back as `None` rather than NaN.
//!
//! # Example
//!
//! ```
//! use yfquant_rs::pricing::{OptionType, black_scholes_price, compute_greeks, implied_volatility};
//!
//! let greeks = compute_greeks(150.0, 150.0, 0.05, 0.25, 0.25, OptionType::Call).unwrap();
//! assert!(greeks.delta > 0.45 && greeks.delta < 0.65);
//!
//! let price = black_scholes_price(150.0, 150.0, 0.05, 0.25, 0.25, OptionType::Call);
//! let iv = implied_volatility(price, 150.0, 150.0, 0.05, 0.25, OptionType::Call);
//! assert!((iv - 0.25).abs() < 0.01);
//! ```

mod black_scholes;
mod chain;
mod error;
mod solver;
mod types;

pub use black_scholes::BlackScholes;
pub use chain::{
    MIN_TIME_TO_EXPIRY, OptionChain, OptionChainWithGreeks, OptionContract, OptionWithGreeks,
    enrich_chain_with_greeks, option_with_greeks,
};
pub use error::IVError;
pub use solver::{IvSolution, IvStatus, SolverConfig, solve_iv};
pub use types::{Greeks, OptionParams, OptionType};

/// Computes the five Greeks for one option, or `None` when the time to
/// expiry or the volatility is not strictly positive.
#[must_use]
pub fn compute_greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    time_to_expiry: f64,
    volatility: f64,
    option_type: OptionType,
) -> Option<Greeks> {
    let params = OptionParams::new(spot, strike, time_to_expiry, rate, option_type);
    BlackScholes::greeks(&params, volatility)
}

/// Theoretical Black-Scholes price; intrinsic value at or past expiry.
#[must_use]
pub fn black_scholes_price(
    spot: f64,
    strike: f64,
    rate: f64,
    time_to_expiry: f64,
    volatility: f64,
    option_type: OptionType,
) -> f64 {
    let params = OptionParams::new(spot, strike, time_to_expiry, rate, option_type);
    BlackScholes::price(&params, volatility)
}

/// Best-effort implied volatility with the default solver settings.
///
/// Always returns a number. Use [`solve_iv`] to learn whether it converged.
#[must_use]
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time_to_expiry: f64,
    option_type: OptionType,
) -> f64 {
    let params = OptionParams::new(spot, strike, time_to_expiry, rate, option_type);
    solve_iv(&params, market_price, &SolverConfig::default()).iv
}
