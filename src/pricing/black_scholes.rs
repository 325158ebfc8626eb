//! Black-Scholes pricing model and Greeks calculation.
//!
//! Closed-form European option prices and their analytic first and second
//! order sensitivities. Everything here is a pure function of its inputs and
//! is safe to call from any number of threads.

use super::types::{Greeks, OptionParams, OptionType};
use std::f64::consts::PI;
use tracing::trace;

/// Square root of 2, precomputed for efficiency.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Calendar days used to convert annual theta into daily decay.
const DAYS_PER_YEAR: f64 = 365.0;

/// Scaling from per-unit vega/rho to per-percentage-point vega/rho.
const PERCENT: f64 = 100.0;

/// Black-Scholes pricing model implementation.
///
/// Provides methods for calculating option prices and Greeks
/// using the Black-Scholes-Merton formula.
pub struct BlackScholes;

impl BlackScholes {
    /// Approximation of the error function (erf).
    ///
    /// Uses Abramowitz and Stegun approximation (formula 7.1.26)
    /// with maximum error of 1.5×10⁻⁷.
    #[must_use]
    pub fn erf(x: f64) -> f64 {
        const A1: f64 = 0.254829592;
        const A2: f64 = -0.284496736;
        const A3: f64 = 1.421413741;
        const A4: f64 = -1.453152027;
        const A5: f64 = 1.061405429;
        const P: f64 = 0.3275911;

        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();

        let t = 1.0 / (1.0 + P * x);
        let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

        sign * y
    }

    /// Standard normal cumulative distribution function Φ(x) = P(Z ≤ x).
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * (1.0 + Self::erf(x / SQRT_2))
    }

    /// Standard normal probability density function φ(x).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    ///
    /// # Arguments
    /// - `spot`: Current underlying price (S)
    /// - `strike`: Option strike price (K)
    /// - `rate`: Risk-free interest rate (r)
    /// - `time`: Time to expiration in years (T)
    /// - `vol`: Volatility (σ)
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, time: f64, vol: f64) -> f64 {
        let sqrt_time = time.sqrt();
        ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * sqrt_time)
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol * time.sqrt()
    }

    /// Calculates the theoretical option price using Black-Scholes formula.
    ///
    /// For calls: C = S·N(d1) - K·e^(-rT)·N(d2)
    /// For puts:  P = K·e^(-rT)·N(-d2) - S·N(-d1)
    ///
    /// Degenerate inputs never produce NaN:
    /// - at or past expiry the intrinsic value is returned;
    /// - a non-positive spot or strike also falls back to intrinsic value;
    /// - a non-positive volatility returns the discounted intrinsic value,
    ///   which is the σ → 0 limit of the formula.
    ///
    /// # Arguments
    /// - `params`: Option parameters (spot, strike, time, rate, type)
    /// - `vol`: Volatility (σ)
    #[must_use]
    pub fn price(params: &OptionParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 || !params.has_valid_prices() {
            return params.intrinsic_value();
        }

        let discount = (-params.risk_free_rate * params.time_to_expiry).exp();

        if vol.is_nan() || vol <= 0.0 {
            return match params.option_type {
                OptionType::Call => (params.spot - params.strike * discount).max(0.0),
                OptionType::Put => (params.strike * discount - params.spot).max(0.0),
            };
        }

        let d1 = Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.time_to_expiry,
            vol,
        );
        let d2 = Self::d2(d1, vol, params.time_to_expiry);

        match params.option_type {
            OptionType::Call => {
                params.spot * Self::norm_cdf(d1) - params.strike * discount * Self::norm_cdf(d2)
            }
            OptionType::Put => {
                params.strike * discount * Self::norm_cdf(-d2) - params.spot * Self::norm_cdf(-d1)
            }
        }
    }

    /// Calculates raw vega (∂price/∂σ) for the IV solver.
    ///
    /// Vega = S · N'(d1) · √T
    ///
    /// Unlike [`Greeks::vega`] this is the per-unit derivative, not scaled to
    /// one volatility point. Returns `0.0` when it is undefined.
    #[must_use]
    pub fn vega(params: &OptionParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 || vol.is_nan() || vol <= 0.0 {
            return 0.0;
        }
        if !params.has_valid_prices() {
            return 0.0;
        }

        let d1 = Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.time_to_expiry,
            vol,
        );
        params.spot * Self::norm_pdf(d1) * params.time_to_expiry.sqrt()
    }

    /// Calculates all five Greeks in one evaluation of the model.
    ///
    /// Returns `None` when the time to expiry or the volatility is not
    /// strictly positive, or when spot/strike cannot enter a logarithm.
    /// First and second derivatives are undefined at expiry, so no intrinsic
    /// approximation is attempted.
    ///
    /// - Delta: N(d1) for calls, N(d1) - 1 for puts
    /// - Gamma: N'(d1) / (S·σ·√T)
    /// - Theta: [-S·N'(d1)·σ / (2√T) ∓ r·K·e^(-rT)·N(±d2)] / 365
    /// - Vega:  S·√T·N'(d1) / 100
    /// - Rho:   ±K·T·e^(-rT)·N(±d2) / 100
    #[must_use]
    pub fn greeks(params: &OptionParams, vol: f64) -> Option<Greeks> {
        if params.time_to_expiry.is_nan() || params.time_to_expiry <= 0.0 {
            return None;
        }
        if vol.is_nan() || vol <= 0.0 || !vol.is_finite() {
            return None;
        }
        if !params.has_valid_prices() {
            return None;
        }

        let spot = params.spot;
        let strike = params.strike;
        let rate = params.risk_free_rate;
        let time = params.time_to_expiry;
        let sqrt_time = time.sqrt();

        let d1 = Self::d1(spot, strike, rate, time, vol);
        let d2 = Self::d2(d1, vol, time);
        let discount = (-rate * time).exp();

        let cdf_d1 = Self::norm_cdf(d1);
        let cdf_d2 = Self::norm_cdf(d2);
        let cdf_neg_d2 = Self::norm_cdf(-d2);
        let pdf_d1 = Self::norm_pdf(d1);

        let decay = -(spot * pdf_d1 * vol) / (2.0 * sqrt_time);

        let (delta, theta_annual, rho) = match params.option_type {
            OptionType::Call => (
                cdf_d1,
                decay - rate * strike * discount * cdf_d2,
                strike * time * discount * cdf_d2 / PERCENT,
            ),
            OptionType::Put => (
                cdf_d1 - 1.0,
                decay + rate * strike * discount * cdf_neg_d2,
                -strike * time * discount * cdf_neg_d2 / PERCENT,
            ),
        };

        let greeks = Greeks {
            delta,
            gamma: pdf_d1 / (spot * vol * sqrt_time),
            theta: theta_annual / DAYS_PER_YEAR,
            vega: spot * sqrt_time * pdf_d1 / PERCENT,
            rho,
        };
        trace!("greeks d1={:.6} d2={:.6}: {:?}", d1, d2, greeks);
        Some(greeks)
    }
}
