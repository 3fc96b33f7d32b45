//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing
//! - Greeks computation and analytic vega
//! - Closed form for the discretely monitored geometric-average Asian option
//!
//! This is the single pricing function behind the implied volatility solver and
//! the Monte Carlo benchmarks. Rates are continuously compounded, volatility is
//! annualized, maturity is in years.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::{ensure_finite, ensure_positive, Greeks, OptionSpec, OptionType, VolSimError, VolSimResult};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, vol, time) - vol * time.sqrt()
}

fn check_inputs(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> VolSimResult<()> {
    if !(vol > 0.0) {
        return Err(VolSimError::pricing(format!("volatility must be positive, got {vol}")));
    }
    if !(time > 0.0) {
        return Err(VolSimError::pricing(format!("maturity must be positive, got {time}")));
    }
    ensure_positive(spot, "spot")?;
    ensure_positive(strike, "strike")?;
    ensure_finite(rate, "rate")?;
    ensure_finite(vol, "volatility")?;
    ensure_finite(time, "maturity")?;
    Ok(())
}

/// Black-Scholes European option price
///
/// Fails when volatility or maturity is not strictly positive.
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> VolSimResult<f64> {
    check_inputs(spot, strike, rate, vol, time)?;

    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d1 - vol * time.sqrt();
    let discounted_strike = strike * (-rate * time).exp();

    let value = match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };
    Ok(value)
}

/// [`price`] for a bundled spec
pub fn price_spec(spec: &OptionSpec) -> VolSimResult<f64> {
    price(
        spec.spot,
        spec.strike,
        spec.rate,
        spec.vol,
        spec.maturity,
        spec.option_type,
    )
}

/// Vega dV/dσ, identical for calls and puts.
///
/// Assumes inputs already accepted by [`price`].
pub fn vega(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    let d1 = d1(spot, strike, rate, vol, time);
    spot * norm_pdf(d1) * time.sqrt()
}

/// Black-Scholes Greeks
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> VolSimResult<Greeks> {
    check_inputs(spot, strike, rate, vol, time)?;

    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d1 - vol * time.sqrt();
    let df = (-rate * time).exp();
    let sqrt_t = time.sqrt();
    let pdf_d1 = norm_pdf(d1);

    let delta = match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    // Gamma and vega are the same for call and put
    let gamma = pdf_d1 / (spot * vol * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t;

    let decay = -spot * pdf_d1 * vol / (2.0 * sqrt_t);
    let (theta, rho) = match option_type {
        OptionType::Call => (
            decay - rate * strike * df * norm_cdf(d2),
            strike * time * df * norm_cdf(d2),
        ),
        OptionType::Put => (
            decay + rate * strike * df * norm_cdf(-d2),
            -strike * time * df * norm_cdf(-d2),
        ),
    };

    Ok(Greeks::new(delta, gamma, theta, vega, rho))
}

/// Price of a geometric-average Asian option monitored at the `n_steps`
/// equally spaced dates after inception (t=0 excluded).
///
/// The log of the geometric average is normal with
/// mean `ln S + (r - σ²/2)·dt·(n+1)/2` and
/// variance `σ²·dt·(n+1)(2n+1)/(6n)`.
pub fn geometric_asian_price(spec: &OptionSpec, n_steps: usize) -> VolSimResult<f64> {
    spec.validate()?;
    if n_steps == 0 {
        return Err(VolSimError::invalid_input("n_steps must be positive"));
    }

    let n = n_steps as f64;
    let dt = spec.maturity / n;
    let vol = spec.vol;

    let mean = spec.spot.ln() + (spec.rate - 0.5 * vol * vol) * dt * (n + 1.0) / 2.0;
    let variance = vol * vol * dt * (n + 1.0) * (2.0 * n + 1.0) / (6.0 * n);
    let sd = variance.sqrt();

    let forward = (mean + 0.5 * variance).exp();
    let d2 = (mean - spec.strike.ln()) / sd;
    let d1 = d2 + sd;
    let df = spec.discount_factor();

    let value = match spec.option_type {
        OptionType::Call => df * (forward * norm_cdf(d1) - spec.strike * norm_cdf(d2)),
        OptionType::Put => df * (spec.strike * norm_cdf(-d2) - forward * norm_cdf(-d1)),
    };
    Ok(value)
}
