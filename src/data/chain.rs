//! Option chain loading and synthetic chains
//!
//! Chains are JSON arrays of rows:
//!
//! ```json
//! [{"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
//!   "rate": 0.01, "option_price": 6.12, "option_type": "Call"}]
//! ```
//!
//! `option_type` is matched case-insensitively; anything other than call or
//! put rejects the whole file before any row is solved.

use std::fs;
use std::path::Path;

use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::core::{OptionQuote, OptionType, VolSimError, VolSimResult};
use crate::models::black_scholes::price;
use crate::models::surface_builder::linspace;
use crate::simulation::make_rng;

/// A chain row as found on disk
#[derive(Debug, Clone, Deserialize)]
struct RawQuote {
    underlying_price: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    option_price: f64,
    option_type: String,
}

/// Parse a JSON option chain held in memory
pub fn parse_option_chain(json: &str) -> VolSimResult<Vec<OptionQuote>> {
    let rows: Vec<RawQuote> = serde_json::from_str(json)?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            OptionQuote::from_raw(
                row.underlying_price,
                row.strike,
                row.maturity,
                row.rate,
                row.option_price,
                &row.option_type,
            )
            .map_err(|e| VolSimError::data(format!("row {i}: {e}")))
        })
        .collect()
}

/// Load an option chain from a JSON file
pub fn load_option_chain(path: impl AsRef<Path>) -> VolSimResult<Vec<OptionQuote>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let quotes = parse_option_chain(&json)?;
    tracing::info!(rows = quotes.len(), path = %path.display(), "Loaded option chain");
    Ok(quotes)
}

/// Write an option chain as a JSON array
pub fn write_option_chain(quotes: &[OptionQuote], path: impl AsRef<Path>) -> VolSimResult<()> {
    let json = serde_json::to_string_pretty(quotes)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Synthetic chain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockChainConfig {
    /// Strikes per maturity, evenly spaced over [0.7·spot, 1.3·spot]
    pub n_strikes: usize,
    /// Maturities in years
    pub maturities: Vec<f64>,
    pub spot: f64,
    pub rate: f64,
    /// At-the-money volatility before the term-structure lift
    pub base_vol: f64,
    /// Std dev of Gaussian noise added to every price
    pub noise: f64,
}

impl Default for MockChainConfig {
    fn default() -> Self {
        Self {
            n_strikes: 7,
            maturities: vec![0.1, 0.25, 0.5, 1.0],
            spot: 100.0,
            rate: 0.01,
            base_vol: 0.2,
            noise: 0.01,
        }
    }
}

impl MockChainConfig {
    /// Volatility used to price the synthetic quote at (strike, maturity):
    /// a quadratic smile in moneyness plus a logarithmic term structure
    pub fn vol_at(&self, strike: f64, maturity: f64) -> f64 {
        let skew = 0.15 * (strike / self.spot - 1.0).powi(2);
        (self.base_vol + skew + 0.05 * maturity.ln_1p()).max(1e-4)
    }
}

/// Call and put quotes for every (maturity, strike) pair.
///
/// Maturity-major, strikes ascending, call before put. `seed` fixes the price
/// noise.
pub fn generate_mock_chain(config: &MockChainConfig, seed: Option<u64>) -> VolSimResult<Vec<OptionQuote>> {
    if config.n_strikes == 0 || config.maturities.is_empty() {
        return Err(VolSimError::invalid_input(
            "mock chain needs at least one strike and one maturity",
        ));
    }
    let noise = Normal::new(0.0, config.noise)
        .map_err(|e| VolSimError::invalid_input(format!("invalid price noise {}: {e}", config.noise)))?;
    let mut rng = make_rng(seed);

    let strikes = linspace(0.7 * config.spot, 1.3 * config.spot, config.n_strikes);
    let mut quotes = Vec::with_capacity(2 * strikes.len() * config.maturities.len());

    for &maturity in &config.maturities {
        for &strike in &strikes {
            let vol = config.vol_at(strike, maturity);
            for option_type in [OptionType::Call, OptionType::Put] {
                let fair = price(config.spot, strike, config.rate, vol, maturity, option_type)?;
                quotes.push(OptionQuote::new(
                    config.spot,
                    strike,
                    maturity,
                    config.rate,
                    fair + noise.sample(&mut rng),
                    option_type,
                ));
            }
        }
    }

    tracing::debug!(rows = quotes.len(), "generated mock option chain");
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_normalises_option_type() {
        let json = r#"[
            {"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
             "rate": 0.01, "option_price": 6.1, "option_type": "CALL"},
            {"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
             "rate": 0.01, "option_price": 1.2, "option_type": " Put "}
        ]"#;
        let quotes = parse_option_chain(json).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].option_type, OptionType::Call);
        assert_eq!(quotes[1].option_type, OptionType::Put);
        assert_eq!(quotes[1].option_price, 1.2);
    }

    #[test]
    fn test_unknown_option_type_is_fatal() {
        let json = r#"[
            {"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
             "rate": 0.01, "option_price": 6.1, "option_type": "call"},
            {"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
             "rate": 0.01, "option_price": 6.1, "option_type": "straddle"}
        ]"#;
        let err = parse_option_chain(json).unwrap_err();
        assert!(matches!(err, VolSimError::Data(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let json = r#"[{"underlying_price": 100.0, "strike": 95.0, "maturity": 0.25,
                        "option_price": 6.1, "option_type": "call"}]"#;
        assert!(matches!(
            parse_option_chain(json),
            Err(VolSimError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chain.json");

        let quotes = generate_mock_chain(&MockChainConfig::default(), Some(1)).unwrap();
        write_option_chain(&quotes, &path).unwrap();
        let loaded = load_option_chain(&path).unwrap();
        assert_eq!(loaded.len(), quotes.len());
        for (a, b) in loaded.iter().zip(&quotes) {
            assert_eq!(a.option_type, b.option_type);
            assert_eq!(a.maturity, b.maturity);
            assert!((a.option_price - b.option_price).abs() < 1e-12);
            assert!((a.strike - b.strike).abs() < 1e-12);
        }

        assert!(load_option_chain(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_mock_chain_layout() {
        let config = MockChainConfig::default();
        let quotes = generate_mock_chain(&config, Some(42)).unwrap();
        assert_eq!(quotes.len(), 2 * 7 * 4);

        assert_eq!(quotes[0].maturity, 0.1);
        assert_eq!(quotes[0].option_type, OptionType::Call);
        assert_eq!(quotes[1].option_type, OptionType::Put);
        assert!((quotes[0].strike - 70.0).abs() < 1e-12);
        assert!((quotes[12].strike - 130.0).abs() < 1e-9);
        assert_eq!(quotes.last().map(|q| q.maturity), Some(1.0));

        // Same seed, same noise
        assert_eq!(quotes, generate_mock_chain(&config, Some(42)).unwrap());
    }

    #[test]
    fn test_noiseless_chain_prices_exactly() {
        let config = MockChainConfig {
            noise: 0.0,
            ..Default::default()
        };
        let quotes = generate_mock_chain(&config, None).unwrap();
        let q = &quotes[6];
        let vol = config.vol_at(q.strike, q.maturity);
        let expected = price(q.underlying_price, q.strike, q.rate, vol, q.maturity, q.option_type).unwrap();
        assert_eq!(q.option_price, expected);
        assert!((config.vol_at(100.0, 0.0) - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_mock_config() {
        let empty = MockChainConfig {
            maturities: vec![],
            ..Default::default()
        };
        assert!(generate_mock_chain(&empty, Some(1)).is_err());

        let negative_noise = MockChainConfig {
            noise: -1.0,
            ..Default::default()
        };
        assert!(generate_mock_chain(&negative_noise, Some(1)).is_err());
    }
}
