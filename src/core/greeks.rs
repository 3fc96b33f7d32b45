//! Option Greeks
//!
//! First order sensitivities plus gamma under Black-Scholes.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
///
/// Raw model units: vega per 1.0 of volatility, theta per year, rho per 1.0 of
/// rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS
    pub delta: f64,
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Theta: dV/dt
    pub theta: f64,
    /// Vega: dV/dσ
    pub vega: f64,
    /// Rho: dV/dr
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Theta per calendar day
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }

    /// Vega per 1% volatility move
    pub fn vega_per_point(&self) -> f64 {
        self.vega / 100.0
    }

    /// Rho per 1% rate move
    pub fn rho_per_point(&self) -> f64 {
        self.rho / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        let g = Greeks::new(0.6, 0.02, -6.5, 37.5, 53.2);
        assert!((g.theta_per_day() - (-6.5 / 365.0)).abs() < 1e-12);
        assert!((g.vega_per_point() - 0.375).abs() < 1e-12);
        assert!((g.rho_per_point() - 0.532).abs() < 1e-12);
    }
}
