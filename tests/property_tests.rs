//! Property-based tests using proptest.
//!
//! Pricing identities, solver round trips, simulation invariants and surface
//! bounds checked over random inputs.

use proptest::prelude::*;
use volsim::core::{OptionType, SmileObservation};
use volsim::models::black_scholes::{price, vega};
use volsim::models::{build_vol_surface, implied_volatility};
use volsim::simulation::{
    price_barrier_up_and_out_call, price_european, simulate, simulate_antithetic, GbmParams,
};

// --- Property Test 1: implied volatility round trip ---

proptest! {
    /// Pricing at σ then solving the price recovers σ whenever the price is
    /// sensitive enough to volatility to pin it down.
    #[test]
    fn iv_round_trip(
        sigma in 0.01_f64..3.0,
        strike in 70.0_f64..140.0,
        time in 0.1_f64..3.0,
        rate in -0.01_f64..0.08,
        is_call in any::<bool>(),
    ) {
        let spot = 100.0;
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };

        prop_assume!(vega(spot, strike, rate, sigma, time) > 1e-2);

        let market = price(spot, strike, rate, sigma, time, option_type).unwrap();
        let iv = implied_volatility(market, spot, strike, rate, time, option_type);

        prop_assert!(iv.is_some(), "no vol recovered for price {}", market);
        let iv = iv.unwrap();
        prop_assert!(
            (iv - sigma).abs() < 1e-4,
            "recovered {} for true vol {}",
            iv,
            sigma
        );
    }
}

// --- Property Test 2: put-call parity ---

proptest! {
    #[test]
    fn put_call_parity_holds(
        spot in 10.0_f64..500.0,
        strike in 10.0_f64..500.0,
        sigma in 0.01_f64..3.0,
        time in 0.01_f64..5.0,
        rate in -0.02_f64..0.1,
    ) {
        let call = price(spot, strike, rate, sigma, time, OptionType::Call).unwrap();
        let put = price(spot, strike, rate, sigma, time, OptionType::Put).unwrap();
        let forward_value = spot - strike * (-rate * time).exp();

        prop_assert!(
            (call - put - forward_value).abs() < 1e-9 * spot.max(strike),
            "C - P = {} vs S - K·df = {}",
            call - put,
            forward_value
        );
    }
}

// --- Property Test 3: monotonicity in spot and volatility ---

proptest! {
    #[test]
    fn call_increases_with_spot_and_vol(
        spot in 50.0_f64..150.0,
        strike in 50.0_f64..150.0,
        sigma in 0.05_f64..1.0,
        time in 0.05_f64..2.0,
        bump in 0.01_f64..5.0,
    ) {
        let rate = 0.03;
        let base = price(spot, strike, rate, sigma, time, OptionType::Call).unwrap();
        let up_spot = price(spot + bump, strike, rate, sigma, time, OptionType::Call).unwrap();
        let up_vol = price(spot, strike, rate, sigma + bump / 10.0, time, OptionType::Call).unwrap();
        let put = price(spot, strike, rate, sigma, time, OptionType::Put).unwrap();
        let put_up_spot = price(spot + bump, strike, rate, sigma, time, OptionType::Put).unwrap();

        let eps = 1e-12 * spot;
        prop_assert!(up_spot >= base - eps);
        prop_assert!(up_vol >= base - eps);
        prop_assert!(put_up_spot <= put + eps);
    }
}

// --- Property Test 4: simulated paths stay positive and reproducible ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn paths_positive_and_reproducible(
        spot in 1.0_f64..1_000.0,
        rate in -0.05_f64..0.2,
        sigma in 0.01_f64..2.0,
        time in 0.01_f64..5.0,
        n_steps in 1_usize..40,
        n_paths in 1_usize..60,
        seed in any::<u64>(),
    ) {
        let params = GbmParams::new(spot, rate, sigma, time);

        let a = simulate(&params, n_steps, n_paths, Some(seed)).unwrap();
        prop_assert!(a.paths().iter().all(|&s| s > 0.0 && s.is_finite()));
        prop_assert!(a.paths().column(0).iter().all(|&s| s == spot));
        prop_assert_eq!(&a, &simulate(&params, n_steps, n_paths, Some(seed)).unwrap());

        let b = simulate_antithetic(&params, n_steps, n_paths, Some(seed)).unwrap();
        prop_assert!(b.paths().iter().all(|&s| s > 0.0));
    }
}

// --- Property Test 5: knockout never adds value ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn barrier_bounded_by_vanilla(
        strike in 60.0_f64..140.0,
        barrier_offset in 0.0_f64..100.0,
        sigma in 0.05_f64..1.0,
        seed in any::<u64>(),
    ) {
        let params = GbmParams::new(100.0, 0.03, sigma, 1.0);
        let paths = simulate(&params, 20, 200, Some(seed)).unwrap();

        let vanilla = price_european(&paths, strike, OptionType::Call).unwrap();
        let knock = price_barrier_up_and_out_call(&paths, strike, 100.0 + barrier_offset).unwrap();

        prop_assert!(knock.price <= vanilla.price);
        for (k, v) in knock.payoffs.iter().zip(&vanilla.payoffs) {
            prop_assert!(*k == 0.0 || k == v);
        }
    }
}

// --- Property Test 6: surface values stay within the observed range ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Linear interpolation and nearest-site fill are both convex
    /// combinations of observed vols, so no cell can leave their range.
    #[test]
    fn surface_bounded_by_observations(
        points in prop::collection::vec(
            (50.0_f64..150.0, 0.05_f64..2.0, 0.05_f64..0.8),
            1..25,
        ),
        grid_size in 1_usize..20,
    ) {
        let observations: Vec<SmileObservation> = points
            .iter()
            .map(|&(strike, maturity, iv)| SmileObservation {
                strike,
                maturity,
                observed_price: 1.0,
                rate: 0.0,
                spot: 100.0,
                option_type: OptionType::Call,
                implied_vol: Some(iv),
            })
            .collect();

        let lo = points.iter().map(|p| p.2).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p.2).fold(f64::NEG_INFINITY, f64::max);

        let surface = build_vol_surface(&observations, grid_size).unwrap();
        prop_assert_eq!(surface.dim(), (grid_size, grid_size));
        for &v in surface.vols.iter() {
            prop_assert!(v.is_finite());
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "cell {} outside [{}, {}]", v, lo, hi);
        }
    }
}
