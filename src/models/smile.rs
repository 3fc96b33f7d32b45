//! Implied volatility smiles
//!
//! Groups an option chain by exact maturity and solves every row for its
//! implied volatility. Rows are independent, so the solves run on the rayon
//! pool; output order follows the input order.

use rayon::prelude::*;

use super::implied_vol::{solve, SolverConfig};
use crate::core::{OptionQuote, Smile, SmileObservation, VolSimError, VolSimResult};

/// Check every row before any solving starts
pub fn validate_chain(quotes: &[OptionQuote]) -> VolSimResult<()> {
    for (row, quote) in quotes.iter().enumerate() {
        quote
            .validate()
            .map_err(|e| VolSimError::data(format!("row {row}: {e}")))?;
    }
    Ok(())
}

/// Solve a single quote
pub fn solve_quote(quote: &OptionQuote, config: &SolverConfig) -> SmileObservation {
    let solution = solve(
        quote.option_price,
        quote.underlying_price,
        quote.strike,
        quote.rate,
        quote.maturity,
        quote.option_type,
        config,
    );
    SmileObservation::from_quote(quote, solution.vol)
}

/// Implied volatilities for all quotes whose maturity equals `maturity` exactly.
///
/// No matching rows gives an empty smile.
pub fn compute_iv_for_maturity(
    quotes: &[OptionQuote],
    maturity: f64,
    config: &SolverConfig,
) -> Smile {
    let observations: Vec<SmileObservation> = quotes
        .par_iter()
        .filter(|q| q.maturity == maturity)
        .map(|q| solve_quote(q, config))
        .collect();

    Smile::new(maturity, observations)
}

/// Distinct maturities in order of first appearance
pub fn maturities(quotes: &[OptionQuote]) -> Vec<f64> {
    let mut seen: Vec<f64> = Vec::new();
    for q in quotes {
        if !seen.contains(&q.maturity) {
            seen.push(q.maturity);
        }
    }
    seen
}

/// One smile per distinct maturity in the chain
pub fn compute_all_smiles(quotes: &[OptionQuote], config: &SolverConfig) -> VolSimResult<Vec<Smile>> {
    validate_chain(quotes)?;
    config.validate()?;

    let smiles: Vec<Smile> = maturities(quotes)
        .into_iter()
        .map(|t| compute_iv_for_maturity(quotes, t, config))
        .collect();

    let total: usize = smiles.iter().map(Smile::len).sum();
    let missing: usize = smiles.iter().map(Smile::missing_count).sum();
    tracing::info!(
        smiles = smiles.len(),
        observations = total,
        missing,
        "Solved implied volatility smiles"
    );

    Ok(smiles)
}
