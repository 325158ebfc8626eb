//! Option chains and Greeks enrichment.
//!
//! An [`OptionChain`] is the snapshot a data provider returns for one
//! underlying: the spot price, the listed expirations and strikes, and the
//! call and put contracts. Enrichment attaches Black-Scholes Greeks to every
//! contract using the contract's own implied volatility.

use super::black_scholes::BlackScholes;
use super::types::{Greeks, OptionParams, OptionType};
use crate::utils::{current_unix_seconds, years_until};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Time to expiry substituted for contracts at or past expiration, in years.
pub const MIN_TIME_TO_EXPIRY: f64 = 0.0001;

/// A single listed option contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    pub contract_symbol: String,
    pub strike: f64,
    pub currency: String,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub volume: i64,
    pub open_interest: i64,
    pub bid: f64,
    pub ask: f64,
    pub contract_size: String,
    /// Expiration as unix seconds.
    pub expiration: i64,
    /// Last trade as unix seconds.
    pub last_trade_date: i64,
    /// Annualized implied volatility as a fraction (0.25 = 25%).
    pub implied_volatility: f64,
    pub in_the_money: bool,
}

impl OptionContract {
    /// Mid of bid and ask, or `None` unless both sides are quoted.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some((self.bid + self.ask) / 2.0)
        } else {
            None
        }
    }
}

/// Option chain for one underlying at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChain {
    pub symbol: String,
    pub underlying_price: f64,
    /// Listed expirations as unix seconds.
    pub expiration_dates: Vec<i64>,
    pub strikes: Vec<f64>,
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

/// A contract together with its Greeks, when they could be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionWithGreeks {
    #[serde(flatten)]
    pub option: OptionContract,
    pub greeks: Option<Greeks>,
}

/// An [`OptionChain`] where every contract carries its Greeks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainWithGreeks {
    pub symbol: String,
    pub underlying_price: f64,
    pub expiration_dates: Vec<i64>,
    pub strikes: Vec<f64>,
    pub calls: Vec<OptionWithGreeks>,
    pub puts: Vec<OptionWithGreeks>,
}

impl OptionChainWithGreeks {
    /// Number of contracts, calls and puts together, whose Greeks are absent.
    #[must_use]
    pub fn contracts_without_greeks(&self) -> usize {
        self.calls
            .iter()
            .chain(self.puts.iter())
            .filter(|contract| contract.greeks.is_none())
            .count()
    }
}

/// Computes Greeks for one contract of a chain.
///
/// Time to expiry is measured from `now` (unix seconds) on a 365.25-day year.
/// Contracts at or past expiration are priced with [`MIN_TIME_TO_EXPIRY`]
/// instead of being skipped; Greeks are still absent when the contract's
/// implied volatility is not positive.
#[must_use]
pub fn option_with_greeks(
    option: &OptionContract,
    underlying_price: f64,
    risk_free_rate: f64,
    option_type: OptionType,
    now: i64,
) -> OptionWithGreeks {
    let mut time_to_expiry = years_until(option.expiration, now);
    if time_to_expiry <= 0.0 {
        time_to_expiry = MIN_TIME_TO_EXPIRY;
    }

    let params = OptionParams::new(
        underlying_price,
        option.strike,
        time_to_expiry,
        risk_free_rate,
        option_type,
    );

    OptionWithGreeks {
        option: option.clone(),
        greeks: BlackScholes::greeks(&params, option.implied_volatility),
    }
}

impl OptionChain {
    /// Returns a copy of the chain with Greeks attached, using the current
    /// wall-clock time to measure time to expiry.
    #[must_use]
    pub fn with_greeks(&self, risk_free_rate: f64) -> OptionChainWithGreeks {
        self.with_greeks_at(risk_free_rate, current_unix_seconds())
    }

    /// Returns a copy of the chain with Greeks attached, measuring time to
    /// expiry from `now` (unix seconds).
    ///
    /// Calls and puts keep their original order. A contract whose Greeks
    /// cannot be computed is kept with `greeks: None`.
    #[must_use]
    pub fn with_greeks_at(&self, risk_free_rate: f64, now: i64) -> OptionChainWithGreeks {
        let enrich = |contracts: &[OptionContract], option_type: OptionType| {
            contracts
                .iter()
                .map(|contract| {
                    option_with_greeks(
                        contract,
                        self.underlying_price,
                        risk_free_rate,
                        option_type,
                        now,
                    )
                })
                .collect::<Vec<_>>()
        };

        let result = OptionChainWithGreeks {
            symbol: self.symbol.clone(),
            underlying_price: self.underlying_price,
            expiration_dates: self.expiration_dates.clone(),
            strikes: self.strikes.clone(),
            calls: enrich(&self.calls, OptionType::Call),
            puts: enrich(&self.puts, OptionType::Put),
        };

        debug!(
            "enriched {} calls and {} puts for {}, {} without greeks",
            result.calls.len(),
            result.puts.len(),
            result.symbol,
            result.contracts_without_greeks()
        );
        result
    }
}

/// Attaches Greeks to every contract of `chain`; see [`OptionChain::with_greeks`].
#[must_use]
pub fn enrich_chain_with_greeks(chain: &OptionChain, risk_free_rate: f64) -> OptionChainWithGreeks {
    chain.with_greeks(risk_free_rate)
}
