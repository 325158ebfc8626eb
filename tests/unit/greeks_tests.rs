use approx::assert_relative_eq;
use proptest::prelude::*;
use yfquant_rs::pricing::{OptionType, black_scholes_price, compute_greeks};

#[test]
fn test_atm_call_delta() {
    let greeks = compute_greeks(150.0, 150.0, 0.05, 0.25, 0.25, OptionType::Call).unwrap();
    assert!(
        (0.45..=0.65).contains(&greeks.delta),
        "delta {}",
        greeks.delta
    );
}

#[test]
fn test_atm_put_delta() {
    let greeks = compute_greeks(150.0, 150.0, 0.05, 0.25, 0.25, OptionType::Put).unwrap();
    assert!(
        (-0.65..=-0.35).contains(&greeks.delta),
        "delta {}",
        greeks.delta
    );
}

#[test]
fn test_call_and_put_share_gamma_and_vega() {
    let call = compute_greeks(120.0, 110.0, 0.03, 0.5, 0.3, OptionType::Call).unwrap();
    let put = compute_greeks(120.0, 110.0, 0.03, 0.5, 0.3, OptionType::Put).unwrap();

    assert_relative_eq!(call.gamma, put.gamma, epsilon = 1e-12);
    assert_relative_eq!(call.vega, put.vega, epsilon = 1e-12);
    assert_relative_eq!(call.delta - put.delta, 1.0, epsilon = 1e-7);
}

#[test]
fn test_degenerate_inputs_yield_no_greeks() {
    for option_type in [OptionType::Call, OptionType::Put] {
        assert!(compute_greeks(100.0, 100.0, 0.05, 0.0, 0.2, option_type).is_none());
        assert!(compute_greeks(100.0, 100.0, 0.05, -1e-9, 0.2, option_type).is_none());
        assert!(compute_greeks(100.0, 100.0, 0.05, 0.5, 0.0, option_type).is_none());
        assert!(compute_greeks(100.0, 100.0, 0.05, 0.5, -0.2, option_type).is_none());
        assert!(compute_greeks(0.0, 100.0, 0.05, 0.5, 0.2, option_type).is_none());
        assert!(compute_greeks(100.0, -5.0, 0.05, 0.5, 0.2, option_type).is_none());
    }
}

#[test]
fn test_intrinsic_value_at_expiry() {
    assert_eq!(
        black_scholes_price(160.0, 150.0, 0.05, 0.0, 0.25, OptionType::Call),
        10.0
    );
    assert_eq!(
        black_scholes_price(140.0, 150.0, 0.05, 0.0, 0.25, OptionType::Call),
        0.0
    );
    assert_eq!(
        black_scholes_price(140.0, 150.0, 0.05, 0.0, 0.25, OptionType::Put),
        10.0
    );
}

#[test]
fn test_put_call_parity() {
    let (spot, strike, rate, time) = (150.0, 140.0, 0.04, 0.75);
    let call = black_scholes_price(spot, strike, rate, time, 0.35, OptionType::Call);
    let put = black_scholes_price(spot, strike, rate, time, 0.35, OptionType::Put);
    let forward = spot - strike * (-rate * time).exp();

    assert_relative_eq!(call - put, forward, epsilon = 1e-6);
}

proptest! {
    #[test]
    fn prop_long_option_signs(
        spot in 50.0f64..500.0,
        moneyness in 0.9f64..1.1,
        rate in 0.0f64..0.02,
        time in 0.1f64..1.0,
        vol in 0.2f64..0.8,
    ) {
        // Deep in-the-money puts can carry positive theta, so strikes stay
        // near the money and rates modest.
        let strike = spot * moneyness;
        for option_type in [OptionType::Call, OptionType::Put] {
            let greeks = compute_greeks(spot, strike, rate, time, vol, option_type).unwrap();
            prop_assert!(greeks.gamma > 0.0);
            prop_assert!(greeks.vega > 0.0);
            prop_assert!(greeks.theta < 0.0, "theta {} for {:?}", greeks.theta, option_type);
        }
    }

    #[test]
    fn prop_non_positive_time_is_absent(
        spot in 1.0f64..1000.0,
        strike in 1.0f64..1000.0,
        rate in -0.05f64..0.2,
        time in -5.0f64..=0.0,
        vol in 0.01f64..2.0,
    ) {
        prop_assert!(compute_greeks(spot, strike, rate, time, vol, OptionType::Call).is_none());
        prop_assert!(compute_greeks(spot, strike, rate, time, vol, OptionType::Put).is_none());
    }

    #[test]
    fn prop_delta_bounds(
        spot in 10.0f64..500.0,
        strike in 10.0f64..500.0,
        rate in 0.0f64..0.1,
        time in 0.01f64..3.0,
        vol in 0.05f64..1.5,
    ) {
        let call = compute_greeks(spot, strike, rate, time, vol, OptionType::Call).unwrap();
        let put = compute_greeks(spot, strike, rate, time, vol, OptionType::Put).unwrap();
        prop_assert!((0.0..=1.0).contains(&call.delta));
        prop_assert!((-1.0..=0.0).contains(&put.delta));
    }
}
