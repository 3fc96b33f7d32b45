//! Monte Carlo payoff evaluators
//!
//! Each evaluator reads a [`PathEnsemble`], computes one payoff per path and
//! discounts the mean at the ensemble's own rate and maturity. Averaging
//! payoffs (Asian) and the barrier check use the `n_steps` post-initial
//! samples; the initial spot is never monitored.
//!
//! The barrier is monitored discretely at the simulation grid points only.
//! Crossings between grid points go unseen, so the knockout probability is
//! underestimated relative to continuous monitoring and the price is biased
//! upwards; the bias shrinks as `n_steps` grows.

use ndarray::{ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::paths::{simulate, simulate_antithetic, GbmParams, PathEnsemble};
use crate::core::{ensure_positive, OptionSpec, OptionType, VolSimError, VolSimResult};

/// Monte Carlo price with its undiscounted per-path payoffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McEstimate {
    /// Discounted mean payoff
    pub price: f64,
    /// Undiscounted payoff of each path, in path order
    pub payoffs: Vec<f64>,
    /// Discount factor applied to the mean
    pub discount_factor: f64,
}

impl McEstimate {
    fn from_payoffs(payoffs: Vec<f64>, discount_factor: f64) -> Self {
        let mean = payoffs.iter().sum::<f64>() / payoffs.len() as f64;
        Self {
            price: discount_factor * mean,
            payoffs,
            discount_factor,
        }
    }

    pub fn n_paths(&self) -> usize {
        self.payoffs.len()
    }

    /// Standard error of the discounted price estimate (zero for a single path)
    pub fn standard_error(&self) -> f64 {
        let n = self.payoffs.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.payoffs.iter().sum::<f64>() / n as f64;
        let var = self.payoffs.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        self.discount_factor * (var / n as f64).sqrt()
    }

    /// (low, high) at `z` standard errors
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        let half = z * self.standard_error();
        (self.price - half, self.price + half)
    }
}

fn monitoring_window(paths: &PathEnsemble) -> VolSimResult<()> {
    if paths.n_steps() == 0 {
        return Err(VolSimError::invalid_input(
            "path ensemble has no monitoring dates after t=0",
        ));
    }
    Ok(())
}

fn monitored(path: ArrayView1<'_, f64>) -> ArrayView1<'_, f64> {
    path.slice_move(ndarray::s![1..])
}

fn price_by<F>(paths: &PathEnsemble, strike: f64, payoff: F) -> VolSimResult<McEstimate>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    ensure_positive(strike, "strike")?;
    monitoring_window(paths)?;

    let payoffs: Vec<f64> = paths.paths().axis_iter(Axis(0)).map(payoff).collect();
    Ok(McEstimate::from_payoffs(payoffs, paths.params().discount_factor()))
}

/// European payoff on the terminal price
pub fn price_european(
    paths: &PathEnsemble,
    strike: f64,
    option_type: OptionType,
) -> VolSimResult<McEstimate> {
    price_by(paths, strike, |path| {
        option_type.intrinsic(path[path.len() - 1], strike)
    })
}

/// Arithmetic-average Asian over the post-initial samples
pub fn price_asian_arithmetic(
    paths: &PathEnsemble,
    strike: f64,
    option_type: OptionType,
) -> VolSimResult<McEstimate> {
    price_by(paths, strike, |path| {
        let window = monitored(path);
        let average = window.sum() / window.len() as f64;
        option_type.intrinsic(average, strike)
    })
}

/// Geometric-average Asian over the post-initial samples
pub fn price_asian_geometric(
    paths: &PathEnsemble,
    strike: f64,
    option_type: OptionType,
) -> VolSimResult<McEstimate> {
    price_by(paths, strike, |path| {
        let window = monitored(path);
        let log_mean = window.iter().map(|s| s.ln()).sum::<f64>() / window.len() as f64;
        option_type.intrinsic(log_mean.exp(), strike)
    })
}

/// Up-and-out call: knocked out when any post-initial sample reaches `barrier`
pub fn price_barrier_up_and_out_call(
    paths: &PathEnsemble,
    strike: f64,
    barrier: f64,
) -> VolSimResult<McEstimate> {
    ensure_positive(barrier, "barrier")?;

    price_by(paths, strike, |path| {
        let knocked_out = monitored(path).iter().any(|&s| s >= barrier);
        if knocked_out {
            0.0
        } else {
            OptionType::Call.intrinsic(path[path.len() - 1], strike)
        }
    })
}

/// Simulate and price a European option
pub fn mc_european(
    spec: &OptionSpec,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<McEstimate> {
    spec.validate()?;
    let paths = simulate(&GbmParams::from_spec(spec), n_steps, n_paths, seed)?;
    price_european(&paths, spec.strike, spec.option_type)
}

/// Simulate and price an arithmetic Asian, optionally with antithetic pairs
pub fn mc_asian_arithmetic(
    spec: &OptionSpec,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
    antithetic: bool,
) -> VolSimResult<McEstimate> {
    spec.validate()?;
    let params = GbmParams::from_spec(spec);
    let paths = if antithetic {
        simulate_antithetic(&params, n_steps, n_paths, seed)?
    } else {
        simulate(&params, n_steps, n_paths, seed)?
    };
    price_asian_arithmetic(&paths, spec.strike, spec.option_type)
}

/// Simulate and price a geometric Asian
pub fn mc_asian_geometric(
    spec: &OptionSpec,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<McEstimate> {
    spec.validate()?;
    let paths = simulate(&GbmParams::from_spec(spec), n_steps, n_paths, seed)?;
    price_asian_geometric(&paths, spec.strike, spec.option_type)
}

/// Simulate and price an up-and-out call. `spec.option_type` must be a call.
pub fn mc_barrier_up_and_out_call(
    spec: &OptionSpec,
    barrier: f64,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<McEstimate> {
    spec.validate()?;
    if spec.option_type != OptionType::Call {
        return Err(VolSimError::invalid_input(
            "up-and-out barrier pricing is defined for calls only",
        ));
    }
    let paths = simulate(&GbmParams::from_spec(spec), n_steps, n_paths, seed)?;
    price_barrier_up_and_out_call(&paths, spec.strike, barrier)
}
