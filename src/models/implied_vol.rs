//! Implied volatility solver
//!
//! Newton-Raphson on the Black-Scholes price with analytic vega, falling back
//! to bracketed bisection. Each phase reports why it stopped through
//! [`SolveFailure`]; the top-level entry points turn a double failure into a
//! missing value so that one bad quote never aborts a batch.

use std::fmt;

use super::black_scholes::{price, vega};
pub use crate::config::SolverConfig;
use crate::core::{OptionType, VolSimError};

/// Why a solver phase gave up
#[derive(Debug)]
pub enum SolveFailure {
    /// Vega fell below the configured floor
    FlatVega { vol: f64, vega: f64 },
    /// A Newton step left the admissible band
    OutOfBounds { vol: f64 },
    /// The pricing function rejected its inputs
    Pricing(VolSimError),
    /// Pricing errors at both bisection bounds share a sign
    Unbracketed { low_error: f64, high_error: f64 },
    /// Iteration budget exhausted
    NotConverged { iterations: usize },
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlatVega { vol, vega } => write!(f, "vega {vega:e} too small at vol {vol}"),
            Self::OutOfBounds { vol } => write!(f, "newton step left admissible band: {vol}"),
            Self::Pricing(e) => write!(f, "{e}"),
            Self::Unbracketed {
                low_error,
                high_error,
            } => write!(f, "no root bracketed: errors {low_error} and {high_error}"),
            Self::NotConverged { iterations } => {
                write!(f, "no convergence after {iterations} iterations")
            }
        }
    }
}

impl From<VolSimError> for SolveFailure {
    fn from(e: VolSimError) -> Self {
        Self::Pricing(e)
    }
}

/// Which phase produced a volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    Newton,
    Bisection,
}

/// Outcome of the two-phase solve for one observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvSolution {
    /// Implied volatility, `None` when both phases failed
    pub vol: Option<f64>,
    /// Phase that succeeded
    pub method: Option<SolveMethod>,
}

impl IvSolution {
    fn missing() -> Self {
        Self {
            vol: None,
            method: None,
        }
    }
}

/// Newton-Raphson phase
pub fn newton(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
    config: &SolverConfig,
) -> Result<f64, SolveFailure> {
    let mut vol = config.initial_vol;

    for iteration in 0..config.max_iterations {
        let diff = price(spot, strike, rate, vol, time, option_type)? - market_price;
        tracing::trace!(iteration, vol, diff, "newton step");

        if diff.abs() < config.tolerance {
            return Ok(vol);
        }

        let vega = vega(spot, strike, rate, vol, time);
        if !(vega >= config.vega_floor) {
            return Err(SolveFailure::FlatVega { vol, vega });
        }

        vol -= diff / vega;
        if !(vol > config.vol_lower && vol <= config.vol_upper) {
            return Err(SolveFailure::OutOfBounds { vol });
        }
    }

    Err(SolveFailure::NotConverged {
        iterations: config.max_iterations,
    })
}

/// Bisection phase over `[config.vol_lower, config.vol_upper]`
pub fn bisection(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
    config: &SolverConfig,
) -> Result<f64, SolveFailure> {
    let error_at = |vol: f64| -> Result<f64, SolveFailure> {
        Ok(price(spot, strike, rate, vol, time, option_type)? - market_price)
    };

    let mut low = config.vol_lower;
    let mut high = config.vol_upper;
    let mut low_error = error_at(low)?;
    let high_error = error_at(high)?;

    if low_error == 0.0 {
        return Ok(low);
    }
    if high_error == 0.0 {
        return Ok(high);
    }
    if low_error.signum() == high_error.signum() || low_error.is_nan() || high_error.is_nan() {
        return Err(SolveFailure::Unbracketed {
            low_error,
            high_error,
        });
    }

    for _ in 0..config.max_iterations {
        let mid = 0.5 * (low + high);
        let mid_error = error_at(mid)?;

        if mid_error.abs() < config.tolerance || (high - low) < config.tolerance {
            return Ok(mid);
        }

        if mid_error.signum() == low_error.signum() {
            low = mid;
            low_error = mid_error;
        } else {
            high = mid;
        }
    }

    Err(SolveFailure::NotConverged {
        iterations: config.max_iterations,
    })
}

/// Newton first, bisection on any Newton failure
pub fn solve(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
    config: &SolverConfig,
) -> IvSolution {
    let newton_failure = match newton(market_price, spot, strike, rate, time, option_type, config) {
        Ok(vol) => {
            return IvSolution {
                vol: Some(vol),
                method: Some(SolveMethod::Newton),
            }
        }
        Err(failure) => failure,
    };
    tracing::debug!(strike, time, %newton_failure, "newton failed, falling back to bisection");

    match bisection(market_price, spot, strike, rate, time, option_type, config) {
        Ok(vol) => IvSolution {
            vol: Some(vol),
            method: Some(SolveMethod::Bisection),
        },
        Err(failure) => {
            tracing::debug!(strike, time, %failure, "implied volatility not recovered");
            IvSolution::missing()
        }
    }
}

/// Implied volatility with default solver settings; `None` when unrecoverable
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
) -> Option<f64> {
    solve(
        market_price,
        spot,
        strike,
        rate,
        time,
        option_type,
        &SolverConfig::default(),
    )
    .vol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_vol() {
        let spot = 100.0;
        let strike = 100.0;
        let rate = 0.05;
        let vol = 0.25;
        let time = 0.5;

        let market_price = price(spot, strike, rate, vol, time, OptionType::Call).unwrap();
        let iv = implied_volatility(market_price, spot, strike, rate, time, OptionType::Call).unwrap();

        assert!((iv - vol).abs() < 1e-4);
    }

    #[test]
    fn test_iv_otm_put() {
        let market_price = price(100.0, 90.0, 0.05, 0.30, 0.25, OptionType::Put).unwrap();
        let solution = solve(
            market_price,
            100.0,
            90.0,
            0.05,
            0.25,
            OptionType::Put,
            &SolverConfig::default(),
        );

        assert_eq!(solution.method, Some(SolveMethod::Newton));
        assert!((solution.vol.unwrap() - 0.30).abs() < 1e-4);
    }

    #[test]
    fn test_newton_flat_vega_falls_back_to_bisection() {
        // Far OTM short-dated call: vega at the 20% starting point is ~0
        let (spot, strike, rate, time) = (100.0, 250.0, 0.01, 0.1);
        let market_price = price(spot, strike, rate, 1.5, time, OptionType::Call).unwrap();
        let config = SolverConfig::default();

        let newton_result = newton(market_price, spot, strike, rate, time, OptionType::Call, &config);
        assert!(matches!(newton_result, Err(SolveFailure::FlatVega { .. })));

        let solution = solve(market_price, spot, strike, rate, time, OptionType::Call, &config);
        assert_eq!(solution.method, Some(SolveMethod::Bisection));
        assert!((solution.vol.unwrap() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_newton_out_of_bounds() {
        // A price above the no-arbitrage bound drives sigma beyond the band
        let config = SolverConfig::default();
        let result = newton(99.0, 100.0, 100.0, 0.0, 1.0, OptionType::Call, &config);
        assert!(matches!(
            result,
            Err(SolveFailure::OutOfBounds { .. }) | Err(SolveFailure::FlatVega { .. })
        ));
    }

    #[test]
    fn test_bisection_unbracketed_is_not_an_error() {
        // Both bounds price below the observed value
        let config = SolverConfig::default();
        let result = bisection(150.0, 100.0, 100.0, 0.05, 1.0, OptionType::Call, &config);
        assert!(matches!(result, Err(SolveFailure::Unbracketed { .. })));

        let iv = implied_volatility(150.0, 100.0, 100.0, 0.05, 1.0, OptionType::Call);
        assert!(iv.is_none());
    }

    #[test]
    fn test_bisection_same_sign_with_narrow_bounds() {
        let market_price = price(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
        let config = SolverConfig {
            vol_lower: 0.3,
            vol_upper: 0.6,
            ..Default::default()
        };
        let result = bisection(market_price, 100.0, 100.0, 0.05, 1.0, OptionType::Call, &config);
        assert!(matches!(result, Err(SolveFailure::Unbracketed { .. })));
    }

    #[test]
    fn test_bisection_root_at_bound() {
        let config = SolverConfig {
            vol_lower: 0.3,
            vol_upper: 0.6,
            ..Default::default()
        };
        for vol in [0.3, 0.6] {
            let market_price = price(100.0, 100.0, 0.05, vol, 1.0, OptionType::Call).unwrap();
            let result = bisection(market_price, 100.0, 100.0, 0.05, 1.0, OptionType::Call, &config);
            assert_eq!(result.unwrap(), vol);
        }
    }

    #[test]
    fn test_bisection_recovers_vol() {
        let market_price = price(100.0, 120.0, 0.02, 0.35, 2.0, OptionType::Call).unwrap();
        let vol = bisection(
            market_price,
            100.0,
            120.0,
            0.02,
            2.0,
            OptionType::Call,
            &SolverConfig::default(),
        )
        .unwrap();
        assert!((vol - 0.35).abs() < 1e-4);
    }

    #[test]
    fn test_bisection_budget_exhausted() {
        let market_price = price(100.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call).unwrap();
        let config = SolverConfig {
            tolerance: 1e-14,
            max_iterations: 3,
            ..Default::default()
        };
        let result = bisection(market_price, 100.0, 100.0, 0.05, 1.0, OptionType::Call, &config);
        assert!(matches!(result, Err(SolveFailure::NotConverged { iterations: 3 })));
    }

    #[test]
    fn test_invalid_maturity_yields_missing_value() {
        // Pricing rejects T=0 in both phases; the result is a missing value
        let solution = solve(5.0, 100.0, 100.0, 0.05, 0.0, OptionType::Call, &SolverConfig::default());
        assert!(solution.vol.is_none());
        assert!(solution.method.is_none());
    }
}
