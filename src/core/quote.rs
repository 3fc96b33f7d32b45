//! Option quote data
//!
//! One option-chain row per [`OptionQuote`]; the implied volatility solved for
//! it lives in a [`SmileObservation`]. Observations sharing a maturity form a
//! [`Smile`].

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, VolSimResult};
use super::option::OptionType;

/// A single observed option price from an option chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying spot at quote time
    pub underlying_price: f64,
    /// Strike price
    pub strike: f64,
    /// Time to maturity in years
    pub maturity: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Observed option price
    pub option_price: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionQuote {
    pub fn new(
        underlying_price: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        option_price: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            underlying_price,
            strike,
            maturity,
            rate,
            option_price,
            option_type,
        }
    }

    /// Build a quote from loosely typed fields, normalising the option type.
    pub fn from_raw(
        underlying_price: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        option_price: f64,
        option_type: &str,
    ) -> VolSimResult<Self> {
        let quote = Self::new(
            underlying_price,
            strike,
            maturity,
            rate,
            option_price,
            option_type.parse()?,
        );
        quote.validate()?;
        Ok(quote)
    }

    /// All numeric fields must be finite. Domain problems (e.g. zero maturity)
    /// are left to the solver, which reports them as a missing volatility.
    pub fn validate(&self) -> VolSimResult<()> {
        ensure_finite(self.underlying_price, "underlying_price")?;
        ensure_finite(self.strike, "strike")?;
        ensure_finite(self.maturity, "maturity")?;
        ensure_finite(self.rate, "rate")?;
        ensure_finite(self.option_price, "option_price")?;
        Ok(())
    }
}

/// An option quote together with its solved implied volatility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmileObservation {
    pub strike: f64,
    pub maturity: f64,
    pub observed_price: f64,
    pub rate: f64,
    pub spot: f64,
    pub option_type: OptionType,
    /// `None` when neither Newton nor bisection recovered a volatility
    pub implied_vol: Option<f64>,
}

impl SmileObservation {
    pub fn from_quote(quote: &OptionQuote, implied_vol: Option<f64>) -> Self {
        Self {
            strike: quote.strike,
            maturity: quote.maturity,
            observed_price: quote.option_price,
            rate: quote.rate,
            spot: quote.underlying_price,
            option_type: quote.option_type,
            implied_vol,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.implied_vol.is_none()
    }
}

/// Implied volatilities for every quote at one maturity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smile {
    /// Time to maturity in years
    pub maturity: f64,
    /// Observations in the order the quotes appeared in the chain
    pub observations: Vec<SmileObservation>,
}

impl Smile {
    pub fn new(maturity: f64, observations: Vec<SmileObservation>) -> Self {
        Self {
            maturity,
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations without an implied volatility
    pub fn missing_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_missing()).count()
    }

    /// (strike, implied vol) pairs for the observations that solved
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.observations
            .iter()
            .filter_map(|o| o.implied_vol.map(|iv| (o.strike, iv)))
            .collect()
    }

    /// Points for a single option type, sorted by strike
    pub fn points_for(&self, option_type: OptionType) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .observations
            .iter()
            .filter(|o| o.option_type == option_type)
            .filter_map(|o| o.implied_vol.map(|iv| (o.strike, iv)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }
}
