//! Option contract definitions
//!
//! A European option is fully described by [`OptionSpec`]: spot, strike, rate,
//! volatility, maturity and payoff direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, ensure_positive, VolSimError, VolSimResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for OptionType {
    type Err = VolSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(VolSimError::invalid_input(format!(
                "option_type must be \"call\" or \"put\", got \"{other}\""
            ))),
        }
    }
}

/// Inputs to a single European option valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Spot price of the underlying
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Annualized volatility
    pub vol: f64,
    /// Time to maturity in years
    pub maturity: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionSpec {
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        vol: f64,
        maturity: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            rate,
            vol,
            maturity,
            option_type,
        }
    }

    pub fn call(spot: f64, strike: f64, rate: f64, vol: f64, maturity: f64) -> Self {
        Self::new(spot, strike, rate, vol, maturity, OptionType::Call)
    }

    pub fn put(spot: f64, strike: f64, rate: f64, vol: f64, maturity: f64) -> Self {
        Self::new(spot, strike, rate, vol, maturity, OptionType::Put)
    }

    /// Copy of this spec with a different payoff direction
    pub fn with_type(self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self
        }
    }

    /// Discount factor exp(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Validate parameters
    pub fn validate(&self) -> VolSimResult<()> {
        ensure_positive(self.spot, "spot")?;
        ensure_positive(self.strike, "strike")?;
        ensure_finite(self.rate, "rate")?;
        ensure_positive(self.vol, "volatility")?;
        ensure_positive(self.maturity, "maturity")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_type() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);

        let err = "straddle".parse::<OptionType>().unwrap_err();
        assert!(matches!(err, VolSimError::InvalidInput(_)));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OptionType::Put).unwrap();
        assert_eq!(json, "\"put\"");
        let parsed: OptionType = serde_json::from_str("\"call\"").unwrap();
        assert_eq!(parsed, OptionType::Call);
    }

    #[test]
    fn test_spec_validation() {
        let spec = OptionSpec::call(100.0, 100.0, 0.05, 0.2, 1.0);
        assert!(spec.validate().is_ok());
        assert!(OptionSpec::call(100.0, 100.0, 0.05, 0.0, 1.0).validate().is_err());
        assert!(OptionSpec::put(100.0, 100.0, -0.01, 0.2, 0.0).validate().is_err());
        // Negative rates are legitimate
        assert!(OptionSpec::put(100.0, 100.0, -0.01, 0.2, 1.0).validate().is_ok());
    }

    #[test]
    fn test_discount_factor() {
        let spec = OptionSpec::call(100.0, 100.0, 0.05, 0.2, 2.0);
        assert!((spec.discount_factor() - (-0.1_f64).exp()).abs() < 1e-15);
    }
}
