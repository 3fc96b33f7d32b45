//! Volatility surface construction
//!
//! Scattered (strike, maturity, implied vol) observations are interpolated
//! onto a regular `grid_size × grid_size` grid spanning the observed strike
//! and maturity ranges. Cells inside the convex hull of the observations are
//! linear over a Delaunay triangulation; the rest take the nearest
//! observation's value, so every cell of the result is finite.

use ndarray::Array1;

use crate::config::SurfaceConfig;
use crate::core::{Smile, SmileObservation, VolSimError, VolSimResult, VolatilitySurface};
use crate::interp::{ScatteredInterpolator, Site};

/// Default number of grid points per axis
pub const DEFAULT_GRID_SIZE: usize = 50;

/// `n` evenly spaced points from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    Array1::linspace(start, end, n).to_vec()
}

/// Interpolate observations onto a regular grid.
///
/// Observations without an implied volatility are skipped and counted on the
/// returned surface. Distances are taken in raw (strike, maturity) units.
pub fn build_vol_surface(
    observations: &[SmileObservation],
    grid_size: usize,
) -> VolSimResult<VolatilitySurface> {
    interpolate_surface(observations, grid_size, false)
}

fn interpolate_surface(
    observations: &[SmileObservation],
    grid_size: usize,
    rescale: bool,
) -> VolSimResult<VolatilitySurface> {
    if observations.is_empty() {
        return Err(VolSimError::invalid_input(
            "cannot build a surface from zero observations",
        ));
    }
    if grid_size == 0 {
        return Err(VolSimError::invalid_input("grid_size must be positive"));
    }

    let sites: Vec<Site> = observations
        .iter()
        .filter_map(|o| o.implied_vol.map(|iv| Site::new(o.strike, o.maturity, iv)))
        .collect();
    let missing_count = observations.len() - sites.len();

    if sites.is_empty() {
        return Err(VolSimError::invalid_input(format!(
            "all {missing_count} observations lack an implied volatility"
        )));
    }

    let interpolator = ScatteredInterpolator::with_rescale(&sites, rescale)?;

    let (k_min, k_max) = min_max(sites.iter().map(|s| s.x));
    let (t_min, t_max) = min_max(sites.iter().map(|s| s.y));
    let strike_axis = linspace(k_min, k_max, grid_size);
    let maturity_axis = linspace(t_min, t_max, grid_size);

    let fill = interpolator.grid(&strike_axis, &maturity_axis);
    tracing::info!(
        observations = sites.len(),
        distinct_sites = interpolator.site_count(),
        missing = missing_count,
        grid_size,
        rescale,
        linear_cells = fill.linear_cells,
        nearest_cells = fill.nearest_cells,
        "Built volatility surface"
    );

    VolatilitySurface::from_grid(
        strike_axis,
        maturity_axis,
        fill.values,
        sites.len(),
        missing_count,
    )
}

/// [`build_vol_surface`] over every observation of every smile
pub fn build_vol_surface_from_smiles(
    smiles: &[Smile],
    grid_size: usize,
) -> VolSimResult<VolatilitySurface> {
    let observations: Vec<SmileObservation> = smiles
        .iter()
        .flat_map(|s| s.observations.iter().copied())
        .collect();
    build_vol_surface(&observations, grid_size)
}

/// [`build_vol_surface`] with grid size and axis rescaling taken from configuration
pub fn build_vol_surface_with_config(
    observations: &[SmileObservation],
    config: &SurfaceConfig,
) -> VolSimResult<VolatilitySurface> {
    config.validate()?;
    interpolate_surface(observations, config.grid_size, config.rescale)
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
