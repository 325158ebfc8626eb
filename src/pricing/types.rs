//! Types shared by the pricer, the Greeks calculator and the IV solver.

use serde::{Deserialize, Serialize};

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl OptionType {
    /// Returns true for calls.
    #[must_use]
    pub fn is_call(self) -> bool {
        self == OptionType::Call
    }
}

/// Market and contract inputs for one Black-Scholes evaluation.
///
/// Volatility is deliberately not part of the parameters: the pricer and
/// the Greeks take it as a separate argument so the IV solver can vary it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    /// Underlying spot price.
    pub spot: f64,
    /// Option strike price.
    pub strike: f64,
    /// Time to expiration in years (e.g., 30 days = 30.0 / 365.0).
    pub time_to_expiry: f64,
    /// Continuously-compounded risk-free rate (annualized, e.g., 0.05 for 5%).
    pub risk_free_rate: f64,
    /// Option type (Call or Put).
    pub option_type: OptionType,
}

impl OptionParams {
    /// Creates new option parameters.
    ///
    /// # Arguments
    /// - `spot`: Underlying spot price
    /// - `strike`: Option strike price
    /// - `time_to_expiry`: Time to expiration in years
    /// - `risk_free_rate`: Risk-free interest rate (annualized)
    /// - `option_type`: Call or Put
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            option_type,
        }
    }

    /// Creates parameters for a call option.
    #[must_use]
    pub fn call(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Call,
        )
    }

    /// Creates parameters for a put option.
    #[must_use]
    pub fn put(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Put,
        )
    }

    /// Calculates the intrinsic value of the option.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        match self.option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// Returns true when spot and strike are strictly positive and every
    /// input is finite, i.e. the log-moneyness `ln(S/K)` is defined.
    #[must_use]
    pub fn has_valid_prices(&self) -> bool {
        self.spot.is_finite()
            && self.strike.is_finite()
            && self.time_to_expiry.is_finite()
            && self.risk_free_rate.is_finite()
            && self.spot > 0.0
            && self.strike > 0.0
    }

    /// Returns true if the option is in-the-money.
    #[must_use]
    pub fn is_itm(&self) -> bool {
        self.intrinsic_value() > 0.0
    }

    /// Returns true if the option is at-the-money (within 0.1% of strike).
    #[must_use]
    pub fn is_atm(&self) -> bool {
        (self.spot - self.strike).abs() / self.strike < 0.001
    }

    /// Returns true if the option is out-of-the-money.
    #[must_use]
    pub fn is_otm(&self) -> bool {
        !self.is_itm() && !self.is_atm()
    }
}

/// The five first-order option Greeks for one option and one set of
/// market parameters.
///
/// Theta is per calendar day. Vega and rho are per one percentage point move
/// in volatility and rate respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Price change per $1 move in spot.
    pub delta: f64,
    /// Delta change per $1 move in spot.
    pub gamma: f64,
    /// Price change per calendar day.
    pub theta: f64,
    /// Price change per 1 vol point.
    pub vega: f64,
    /// Price change per 1 rate point.
    pub rho: f64,
}

impl Greeks {
    /// Creates a Greeks value.
    #[must_use]
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Scales every sensitivity by `factor` (contract multiplier, position size).
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }
}
