//! Monte Carlo convergence diagnostics

use serde::{Deserialize, Serialize};

use super::payoffs::mc_european;
use crate::core::{OptionSpec, VolSimError, VolSimResult};
use crate::models::black_scholes::price_spec;

/// Price estimated with a given number of paths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceRecord {
    pub path_count: usize,
    pub estimated_price: f64,
}

/// Monte Carlo price next to its closed-form benchmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub mc_price: f64,
    pub closed_form_price: f64,
    pub absolute_error: f64,
    /// `None` when the benchmark price is exactly zero
    pub relative_error: Option<f64>,
}

impl BenchmarkComparison {
    pub fn new(mc_price: f64, closed_form_price: f64) -> Self {
        let absolute_error = (mc_price - closed_form_price).abs();
        let relative_error = if closed_form_price != 0.0 {
            Some(absolute_error / closed_form_price.abs())
        } else {
            None
        };
        Self {
            mc_price,
            closed_form_price,
            absolute_error,
            relative_error,
        }
    }
}

/// Run `pricer` once per path count and collect the prices, ordered by path count.
///
/// Every run is independent; seeding is up to the pricer.
pub fn estimate_convergence<F>(path_counts: &[usize], pricer: F) -> VolSimResult<Vec<ConvergenceRecord>>
where
    F: Fn(usize) -> VolSimResult<f64>,
{
    if path_counts.is_empty() {
        return Err(VolSimError::invalid_input("no path counts given"));
    }
    if path_counts.contains(&0) {
        return Err(VolSimError::invalid_input("path counts must be positive"));
    }

    let mut counts = path_counts.to_vec();
    counts.sort_unstable();

    let records = counts
        .into_iter()
        .map(|path_count| {
            let estimated_price = pricer(path_count)?;
            tracing::debug!(path_count, estimated_price, "convergence run");
            Ok(ConvergenceRecord {
                path_count,
                estimated_price,
            })
        })
        .collect::<VolSimResult<Vec<_>>>()?;

    tracing::info!(runs = records.len(), "Convergence study complete");
    Ok(records)
}

/// Price a European option by Monte Carlo and compare with Black-Scholes
pub fn compare_with_black_scholes(
    spec: &OptionSpec,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<BenchmarkComparison> {
    let mc = mc_european(spec, n_steps, n_paths, seed)?;
    let closed_form = price_spec(spec)?;
    let comparison = BenchmarkComparison::new(mc.price, closed_form);

    tracing::info!(
        mc_price = comparison.mc_price,
        closed_form_price = comparison.closed_form_price,
        absolute_error = comparison.absolute_error,
        n_paths,
        "Monte Carlo benchmark"
    );
    Ok(comparison)
}
