use approx::assert_abs_diff_eq;
use yfquant_rs::pricing::{
    IVError, IvStatus, OptionParams, OptionType, SolverConfig, black_scholes_price,
    implied_volatility, solve_iv,
};

#[test]
fn test_iv_round_trip() {
    let price = black_scholes_price(150.0, 150.0, 0.05, 0.25, 0.25, OptionType::Call);
    let iv = implied_volatility(price, 150.0, 150.0, 0.05, 0.25, OptionType::Call);
    assert_abs_diff_eq!(iv, 0.25, epsilon = 0.01);
}

#[test]
fn test_iv_round_trip_puts_across_strikes() {
    for strike in [120.0, 140.0, 150.0, 160.0, 180.0] {
        let price = black_scholes_price(150.0, strike, 0.03, 0.5, 0.4, OptionType::Put);
        let iv = implied_volatility(price, 150.0, strike, 0.03, 0.5, OptionType::Put);
        assert_abs_diff_eq!(iv, 0.4, epsilon = 0.01);
    }
}

#[test]
fn test_unreachable_price_reports_non_convergence() {
    let params = OptionParams::call(100.0, 100.0, 1.0, 0.05);
    let solution = solve_iv(&params, 150.0, &SolverConfig::default());

    assert_eq!(solution.status, IvStatus::MaxIterations);
    assert!(!solution.is_converged());
    assert!(solution.iv <= 5.0);
    assert!(matches!(
        solution.into_result(),
        Err(IVError::ConvergenceFailure { .. })
    ));
}

#[test]
fn test_expired_option_hits_zero_vega() {
    let params = OptionParams::put(100.0, 110.0, 0.0, 0.05);
    let solution = solve_iv(&params, 10.0, &SolverConfig::default());

    assert_eq!(solution.status, IvStatus::ZeroVega);
    assert_abs_diff_eq!(solution.iv, 0.3, epsilon = 1e-12);
    assert_abs_diff_eq!(
        implied_volatility(10.0, 100.0, 110.0, 0.05, 0.0, OptionType::Put),
        0.3,
        epsilon = 1e-12
    );
}

#[test]
fn test_custom_solver_config() {
    let params = OptionParams::call(100.0, 105.0, 0.5, 0.02);
    let price = black_scholes_price(100.0, 105.0, 0.02, 0.5, 0.6, OptionType::Call);
    let config = SolverConfig::default()
        .with_initial_guess(0.5)
        .with_tolerance(1e-8);

    let solution = solve_iv(&params, price, &config);
    assert!(solution.is_converged());
    assert_abs_diff_eq!(solution.iv, 0.6, epsilon = 1e-6);
}
