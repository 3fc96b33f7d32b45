//! Geometric Brownian motion path simulation
//!
//! Paths are discretised exactly in log space:
//! `S_t = S_{t-1} · exp((r − σ²/2)·dt + σ·√dt·Z)`, one standard normal per
//! path per step. Draws are consumed step-major (all paths for step 1, then
//! all paths for step 2, ...), so a seeded run is fully determined by its
//! parameters and seed.

use ndarray::{concatenate, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::rng::{derive_seeds, make_rng, standard_normal};
use crate::core::{ensure_finite, ensure_positive, OptionSpec, VolSimError, VolSimResult};

/// Risk-neutral GBM dynamics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Initial spot S0
    pub spot: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Annualized volatility
    pub vol: f64,
    /// Horizon in years
    pub maturity: f64,
}

impl GbmParams {
    pub fn new(spot: f64, rate: f64, vol: f64, maturity: f64) -> Self {
        Self {
            spot,
            rate,
            vol,
            maturity,
        }
    }

    pub fn from_spec(spec: &OptionSpec) -> Self {
        Self::new(spec.spot, spec.rate, spec.vol, spec.maturity)
    }

    pub fn validate(&self) -> VolSimResult<()> {
        ensure_positive(self.spot, "spot")?;
        ensure_positive(self.vol, "volatility")?;
        ensure_positive(self.maturity, "maturity")?;
        ensure_finite(self.rate, "rate")?;
        Ok(())
    }

    /// exp(−rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Per-step (drift, diffusion) in log space
    fn increments(&self, n_steps: usize) -> (f64, f64) {
        let dt = self.maturity / n_steps as f64;
        (
            (self.rate - 0.5 * self.vol * self.vol) * dt,
            self.vol * dt.sqrt(),
        )
    }
}

/// Simulated paths, shape (n_paths, n_steps + 1). Column 0 is the initial spot.
///
/// Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnsemble {
    paths: Array2<f64>,
    params: GbmParams,
}

impl PathEnsemble {
    /// Wrap externally produced paths.
    ///
    /// Every value must be finite and positive and column 0 must equal the
    /// initial spot of `params`.
    pub fn from_array(paths: Array2<f64>, params: GbmParams) -> VolSimResult<Self> {
        params.validate()?;
        let (rows, cols) = paths.dim();
        if rows == 0 || cols == 0 {
            return Err(VolSimError::invalid_input(format!(
                "path ensemble must be non-empty, got shape ({rows}, {cols})"
            )));
        }
        if paths.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(VolSimError::invalid_input("path values must be finite and positive"));
        }
        if paths.column(0).iter().any(|&s| s != params.spot) {
            return Err(VolSimError::invalid_input("column 0 must equal the initial spot"));
        }
        Ok(Self { paths, params })
    }

    pub fn paths(&self) -> ArrayView2<'_, f64> {
        self.paths.view()
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn n_paths(&self) -> usize {
        self.paths.nrows()
    }

    pub fn n_steps(&self) -> usize {
        self.paths.ncols() - 1
    }

    /// Prices at maturity, one per path
    pub fn terminal(&self) -> ArrayView1<'_, f64> {
        self.paths.column(self.paths.ncols() - 1)
    }

    /// Path `i` including the initial spot
    pub fn path(&self, i: usize) -> ArrayView1<'_, f64> {
        self.paths.row(i)
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.paths
    }
}

fn check_sizes(n_steps: usize, n_paths: usize) -> VolSimResult<()> {
    if n_steps == 0 {
        return Err(VolSimError::invalid_input("n_steps must be positive"));
    }
    if n_paths == 0 {
        return Err(VolSimError::invalid_input("n_paths must be positive"));
    }
    Ok(())
}

/// Simulate with a caller-supplied stream
pub fn simulate_with_rng<R: Rng + ?Sized>(
    params: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    rng: &mut R,
) -> VolSimResult<PathEnsemble> {
    params.validate()?;
    check_sizes(n_steps, n_paths)?;

    let (drift, diffusion) = params.increments(n_steps);
    let mut paths = Array2::zeros((n_paths, n_steps + 1));
    paths.column_mut(0).fill(params.spot);

    for step in 1..=n_steps {
        for i in 0..n_paths {
            let z = standard_normal(rng);
            paths[[i, step]] = paths[[i, step - 1]] * (drift + diffusion * z).exp();
        }
    }

    Ok(PathEnsemble {
        paths,
        params: *params,
    })
}

/// Simulate `n_paths` GBM paths over `n_steps` equal steps.
///
/// `seed = None` draws from OS entropy and is not reproducible.
pub fn simulate(
    params: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<PathEnsemble> {
    params.validate()?;
    check_sizes(n_steps, n_paths)?;
    tracing::debug!(n_paths, n_steps, seeded = seed.is_some(), "simulating GBM paths");

    simulate_with_rng(params, n_steps, n_paths, &mut make_rng(seed))
}

/// Antithetic simulation with a caller-supplied stream.
///
/// Rows `0..h` use `+Z` and rows `h..2h` use `−Z` with the same draws, where
/// `h = n_paths / 2`. With an odd count the last row takes its own draw, after
/// the paired draws of each step.
pub fn simulate_antithetic_with_rng<R: Rng + ?Sized>(
    params: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    rng: &mut R,
) -> VolSimResult<PathEnsemble> {
    params.validate()?;
    check_sizes(n_steps, n_paths)?;

    let (drift, diffusion) = params.increments(n_steps);
    let half = n_paths / 2;
    let mut paths = Array2::zeros((n_paths, n_steps + 1));
    paths.column_mut(0).fill(params.spot);

    for step in 1..=n_steps {
        for i in 0..half {
            let z = standard_normal(rng);
            paths[[i, step]] = paths[[i, step - 1]] * (drift + diffusion * z).exp();
            paths[[i + half, step]] = paths[[i + half, step - 1]] * (drift - diffusion * z).exp();
        }
        if n_paths % 2 == 1 {
            let last = n_paths - 1;
            let z = standard_normal(rng);
            paths[[last, step]] = paths[[last, step - 1]] * (drift + diffusion * z).exp();
        }
    }

    Ok(PathEnsemble {
        paths,
        params: *params,
    })
}

/// Antithetic variant of [`simulate`]
pub fn simulate_antithetic(
    params: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
) -> VolSimResult<PathEnsemble> {
    params.validate()?;
    check_sizes(n_steps, n_paths)?;
    tracing::debug!(n_paths, n_steps, pairs = n_paths / 2, "simulating antithetic GBM paths");

    simulate_antithetic_with_rng(params, n_steps, n_paths, &mut make_rng(seed))
}

/// Chunked simulation on the rayon pool.
///
/// Paths are split into chunks of `chunk_size` (the last one takes the
/// remainder). Each chunk gets a sub-seed derived up front from `seed`, so the
/// output depends on `(seed, chunk_size)` only and not on the number of
/// threads. When everything fits in one chunk this is plain [`simulate`].
pub fn simulate_parallel(
    params: &GbmParams,
    n_steps: usize,
    n_paths: usize,
    chunk_size: usize,
    seed: Option<u64>,
) -> VolSimResult<PathEnsemble> {
    params.validate()?;
    check_sizes(n_steps, n_paths)?;
    if chunk_size == 0 {
        return Err(VolSimError::invalid_input("chunk_size must be positive"));
    }

    if n_paths <= chunk_size {
        return simulate(params, n_steps, n_paths, seed);
    }

    let n_chunks = n_paths.div_ceil(chunk_size);
    let seeds = derive_seeds(seed, n_chunks);
    let sizes: Vec<usize> = (0..n_chunks)
        .map(|c| chunk_size.min(n_paths - c * chunk_size))
        .collect();
    tracing::debug!(n_paths, n_steps, n_chunks, chunk_size, "simulating GBM paths in parallel");

    let chunks = sizes
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&size, &sub_seed)| {
            simulate_with_rng(params, n_steps, size, &mut make_rng(Some(sub_seed)))
        })
        .collect::<VolSimResult<Vec<PathEnsemble>>>()?;

    let views: Vec<ArrayView2<'_, f64>> = chunks.iter().map(PathEnsemble::paths).collect();
    let paths = concatenate(Axis(0), &views)
        .map_err(|e| VolSimError::numerical(format!("failed to join path chunks: {e}")))?;

    Ok(PathEnsemble {
        paths,
        params: *params,
    })
}
