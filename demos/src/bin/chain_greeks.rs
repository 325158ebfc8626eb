//! Example attaching Greeks to an option chain
//!
//! This example shows how to:
//! 1. Build an option chain snapshot for one underlying
//! 2. Enrich every contract with Black-Scholes Greeks
//! 3. Recover implied volatility from a quoted mid price
//! 4. Serialize the enriched chain to JSON

use tracing::{info, warn};
use yfquant_rs::prelude::{
    OptionChain, OptionContract, OptionParams, OptionType, SolverConfig, current_unix_seconds,
    solve_iv,
};

const DAY: i64 = 86_400;

/// Builds a synthetic chain with a volatility smile around `spot`.
fn build_chain(symbol: &str, spot: f64, now: i64) -> OptionChain {
    let expiration = now + 30 * DAY;
    let strikes: Vec<f64> = (-4i32..=4).map(|step| spot + f64::from(step) * 5.0).collect();

    let contract = |strike: f64, kind: &str| {
        let moneyness = (strike / spot).ln();
        OptionContract {
            contract_symbol: format!("{symbol}{kind}{strike:08.0}"),
            strike,
            currency: "USD".to_string(),
            expiration,
            implied_volatility: 0.22 + 0.8 * moneyness * moneyness,
            contract_size: "REGULAR".to_string(),
            in_the_money: if kind == "C" { strike < spot } else { strike > spot },
            ..Default::default()
        }
    };

    OptionChain {
        symbol: symbol.to_string(),
        underlying_price: spot,
        expiration_dates: vec![expiration],
        calls: strikes.iter().map(|&k| contract(k, "C")).collect(),
        puts: strikes.iter().map(|&k| contract(k, "P")).collect(),
        strikes,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let now = current_unix_seconds();
    let chain = build_chain("AAPL", 190.0, now);
    let enriched = chain.with_greeks_at(0.045, now);

    info!(
        "{} @ {:.2}: {} calls, {} puts",
        enriched.symbol,
        enriched.underlying_price,
        enriched.calls.len(),
        enriched.puts.len()
    );

    for call in &enriched.calls {
        match &call.greeks {
            Some(g) => info!(
                "{:>20} K={:>6.1} delta={:+.3} gamma={:.4} theta={:+.4}/day vega={:.4} rho={:+.4}",
                call.option.contract_symbol,
                call.option.strike,
                g.delta,
                g.gamma,
                g.theta,
                g.vega,
                g.rho
            ),
            None => warn!("{} has no Greeks", call.option.contract_symbol),
        }
    }

    // Round-trip a quoted price through the solver.
    let params = OptionParams::new(190.0, 195.0, 30.0 / 365.25, 0.045, OptionType::Put);
    let quoted = 8.15;
    let solution = solve_iv(&params, quoted, &SolverConfig::default());
    info!(
        "put K=195 quoted {:.2}: iv={:.2}% after {} iterations ({:?})",
        quoted,
        solution.iv_percent(),
        solution.iterations,
        solution.status
    );

    println!("{}", serde_json::to_string_pretty(&enriched)?);
    Ok(())
}
