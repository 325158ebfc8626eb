use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use yfquant_rs::pricing::{
    BlackScholes, OptionChain, OptionContract, OptionParams, SolverConfig, solve_iv,
};
use yfquant_rs::transport::RateLimiter;

fn bench_price_and_greeks(c: &mut Criterion) {
    let params = OptionParams::call(150.0, 150.0, 0.25, 0.05);

    c.bench_function("black_scholes_price", |b| {
        b.iter(|| black_box(BlackScholes::price(black_box(&params), black_box(0.25))))
    });

    c.bench_function("black_scholes_greeks", |b| {
        b.iter(|| black_box(BlackScholes::greeks(black_box(&params), black_box(0.25))))
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("implied_volatility");

    for strike in [120.0, 150.0, 180.0] {
        let params = OptionParams::put(150.0, strike, 0.5, 0.05);
        let market_price = BlackScholes::price(&params, 0.35);

        group.bench_with_input(BenchmarkId::from_parameter(strike), &strike, |b, _| {
            b.iter(|| black_box(solve_iv(black_box(&params), black_box(market_price), &config)))
        });
    }

    group.finish();
}

fn bench_chain_enrichment(c: &mut Criterion) {
    let expiration = 1_700_000_000 + 45 * 86_400;
    let contracts: Vec<OptionContract> = (0..200u32)
        .map(|i| OptionContract {
            contract_symbol: format!("SPY-{i}"),
            strike: 100.0 + f64::from(i),
            expiration,
            implied_volatility: 0.2 + f64::from(i) * 0.001,
            ..Default::default()
        })
        .collect();
    let chain = OptionChain {
        symbol: "SPY".to_string(),
        underlying_price: 200.0,
        expiration_dates: vec![expiration],
        strikes: contracts.iter().map(|c| c.strike).collect(),
        calls: contracts.clone(),
        puts: contracts,
    };

    c.bench_function("chain_with_greeks_400", |b| {
        b.iter(|| black_box(chain.with_greeks_at(black_box(0.05), 1_700_000_000)))
    });
}

fn bench_rate_limiter(c: &mut Criterion) {
    let limiter = RateLimiter::new(1e9, 1_000_000);

    c.bench_function("rate_limiter_try_acquire", |b| {
        b.iter(|| black_box(limiter.try_acquire()))
    });
}

criterion_group!(
    benches,
    bench_price_and_greeks,
    bench_implied_volatility,
    bench_chain_enrichment,
    bench_rate_limiter
);
criterion_main!(benches);
