//! Error types for implied volatility calculation.
//!
//! The solver itself never fails; these errors are produced on request by
//! [`IvSolution::into_result`](super::solver::IvSolution::into_result) for
//! callers that want non-convergence surfaced as a hard error.

use std::fmt;

/// Errors specific to IV calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum IVError {
    /// Newton-Raphson solver did not converge within max iterations.
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last IV estimate before giving up.
        last_iv: f64,
    },

    /// Vega vanished, so no Newton step could be taken.
    ZeroVega {
        /// Iteration at which vega was zero.
        iteration: u32,
        /// IV estimate at that point.
        last_iv: f64,
    },

    /// Invalid input parameters for IV calculation.
    InvalidParams {
        /// Description of the invalid parameter.
        message: String,
    },
}

impl fmt::Display for IVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IVError::ConvergenceFailure {
                iterations,
                last_iv,
            } => {
                write!(
                    f,
                    "solver did not converge after {iterations} iterations, last IV: {last_iv:.4}"
                )
            }
            IVError::ZeroVega { iteration, last_iv } => {
                write!(
                    f,
                    "vega is zero at iteration {iteration}, last IV: {last_iv:.4}"
                )
            }
            IVError::InvalidParams { message } => {
                write!(f, "invalid parameters: {message}")
            }
        }
    }
}

impl std::error::Error for IVError {}
