//! Newton-Raphson solver for implied volatility calculation.
//!
//! This module provides a numerical solver to find the implied volatility
//! that makes the Black-Scholes price equal to the observed market price.
//!
//! The solver is best-effort: it always hands back a volatility. Whether that
//! value actually reproduces the market price is reported in
//! [`IvSolution::status`], and [`IvSolution::into_result`] turns every
//! non-converged outcome into an [`IVError`].

use super::black_scholes::BlackScholes;
use super::error::IVError;
use super::types::OptionParams;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration for the Newton-Raphson solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Convergence tolerance on the absolute price difference.
    pub tolerance: f64,
    /// Initial IV guess (default: 0.3 = 30%).
    pub initial_guess: f64,
    /// Minimum IV bound (default: 0.001 = 0.1%).
    pub min_iv: f64,
    /// Maximum IV bound (default: 5.0 = 500%).
    pub max_iv: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            initial_guess: 0.3,
            min_iv: 0.001,
            max_iv: 5.0,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the initial IV guess.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Sets the IV bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }
}

/// How the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IvStatus {
    /// Model price matched the market price within tolerance.
    Converged,
    /// Vega was exactly zero; the estimate could not be refined further.
    ZeroVega,
    /// Iteration budget exhausted without meeting the tolerance.
    MaxIterations,
    /// Spot, strike or market price unusable; the initial guess is returned.
    InvalidInput,
}

/// Outcome of one implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvSolution {
    /// Volatility estimate (always populated).
    pub iv: f64,
    /// Number of Newton iterations evaluated.
    pub iterations: u32,
    /// Why the solver stopped.
    pub status: IvStatus,
}

impl IvSolution {
    /// Returns true if the tolerance was met.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == IvStatus::Converged
    }

    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.iv * 100.0
    }

    /// Converts the outcome into a `Result`, failing for anything but
    /// [`IvStatus::Converged`].
    pub fn into_result(self) -> Result<f64, IVError> {
        match self.status {
            IvStatus::Converged => Ok(self.iv),
            IvStatus::ZeroVega => Err(IVError::ZeroVega {
                iteration: self.iterations.saturating_sub(1),
                last_iv: self.iv,
            }),
            IvStatus::MaxIterations => Err(IVError::ConvergenceFailure {
                iterations: self.iterations,
                last_iv: self.iv,
            }),
            IvStatus::InvalidInput => Err(IVError::InvalidParams {
                message: "spot, strike and market price must be positive and finite".to_string(),
            }),
        }
    }
}

/// Solves for implied volatility using the Newton-Raphson method.
///
/// Starting from `config.initial_guess`, each iteration evaluates the model
/// price and raw vega, then steps σ ← σ + (market - model) / vega and clamps
/// σ into `[min_iv, max_iv]`. A vega of exactly zero stops the iteration
/// before the tolerance check.
///
/// # Arguments
/// - `params`: Option parameters (spot, strike, time, rate, type)
/// - `market_price`: Observed market price to match
/// - `config`: Solver configuration
///
/// # Example
/// ```
/// use yfquant_rs::pricing::{BlackScholes, IvStatus, OptionParams, SolverConfig, solve_iv};
///
/// let params = OptionParams::call(100.0, 100.0, 0.25, 0.05);
/// let market_price = BlackScholes::price(&params, 0.25);
///
/// let solution = solve_iv(&params, market_price, &SolverConfig::default());
/// assert_eq!(solution.status, IvStatus::Converged);
/// assert!((solution.iv - 0.25).abs() < 1e-3);
/// ```
#[must_use]
pub fn solve_iv(params: &OptionParams, market_price: f64, config: &SolverConfig) -> IvSolution {
    if !params.has_valid_prices() || !market_price.is_finite() {
        debug!(
            "implied volatility inputs rejected: spot={}, strike={}, price={}",
            params.spot, params.strike, market_price
        );
        return IvSolution {
            iv: config.initial_guess,
            iterations: 0,
            status: IvStatus::InvalidInput,
        };
    }

    let mut iv = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let price = BlackScholes::price(params, iv);
        let vega = BlackScholes::vega(params, iv);

        if vega == 0.0 {
            trace!("zero vega at iteration {}, iv={}", iteration, iv);
            return IvSolution {
                iv,
                iterations: iteration + 1,
                status: IvStatus::ZeroVega,
            };
        }

        let diff = market_price - price;
        if diff.abs() < config.tolerance {
            trace!("converged after {} iterations, iv={}", iteration + 1, iv);
            return IvSolution {
                iv,
                iterations: iteration + 1,
                status: IvStatus::Converged,
            };
        }

        // Inverted or NaN bounds must not panic; the upper bound wins.
        iv = (iv + diff / vega).max(config.min_iv).min(config.max_iv);
    }

    debug!(
        "implied volatility did not converge after {} iterations, last iv={}",
        config.max_iterations, iv
    );
    IvSolution {
        iv,
        iterations: config.max_iterations,
        status: IvStatus::MaxIterations,
    }
}
