//! Scattered-data interpolation onto regular grids
//!
//! Triangles and nearest-site distances are computed in the sites' own
//! coordinates. [`ScatteredInterpolator::with_rescale`] can instead shift and
//! scale both axes into the unit box first, so that an axis measured in
//! currency units and one measured in years weigh equally.

use ndarray::Array2;

use super::delaunay::Triangulation;
use crate::core::{VolSimError, VolSimResult};

/// A scattered sample `(x, y) -> value`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl Site {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// Collapse sites sharing exact coordinates into one site holding the mean value.
///
/// Output is sorted by (x, y).
pub fn merge_duplicates(sites: &[Site]) -> Vec<Site> {
    let mut sorted = sites.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let mut merged: Vec<Site> = Vec::with_capacity(sorted.len());
    let mut count = 0usize;
    for site in sorted {
        match merged.last_mut() {
            Some(last) if last.x == site.x && last.y == site.y => {
                count += 1;
                last.value += (site.value - last.value) / count as f64;
            }
            _ => {
                merged.push(site);
                count = 1;
            }
        }
    }
    merged
}

/// Values produced for a grid plus how each cell was filled
#[derive(Debug, Clone)]
pub struct GridFill {
    /// Shape (ys.len(), xs.len())
    pub values: Array2<f64>,
    pub linear_cells: usize,
    pub nearest_cells: usize,
}

/// Piecewise-linear interpolant over the Delaunay triangulation of the sites,
/// with nearest-site lookup for points outside the convex hull
#[derive(Debug, Clone)]
pub struct ScatteredInterpolator {
    triangulation: Triangulation,
    values: Vec<f64>,
    origin: [f64; 2],
    scale: [f64; 2],
}

impl ScatteredInterpolator {
    /// Build from sites in raw coordinates; duplicates are averaged first.
    pub fn new(sites: &[Site]) -> VolSimResult<Self> {
        Self::with_rescale(sites, false)
    }

    /// Build from sites, optionally rescaling both axes to the unit box
    /// before triangulating and before nearest-site search.
    pub fn with_rescale(sites: &[Site], rescale: bool) -> VolSimResult<Self> {
        if sites.is_empty() {
            return Err(VolSimError::invalid_input("no interpolation sites"));
        }
        if let Some(bad) = sites
            .iter()
            .find(|s| !(s.x.is_finite() && s.y.is_finite() && s.value.is_finite()))
        {
            return Err(VolSimError::invalid_input(format!(
                "non-finite interpolation site ({}, {}) -> {}",
                bad.x, bad.y, bad.value
            )));
        }

        let sites = merge_duplicates(sites);

        let (origin, scale) = if rescale {
            let (min_x, max_x) = bounds(sites.iter().map(|s| s.x));
            let (min_y, max_y) = bounds(sites.iter().map(|s| s.y));
            (
                [min_x, min_y],
                [extent(min_x, max_x), extent(min_y, max_y)],
            )
        } else {
            ([0.0, 0.0], [1.0, 1.0])
        };

        let points: Vec<[f64; 2]> = sites
            .iter()
            .map(|s| [(s.x - origin[0]) / scale[0], (s.y - origin[1]) / scale[1]])
            .collect();
        let triangulation = Triangulation::new(&points);
        tracing::trace!(
            sites = points.len(),
            rescale,
            triangles = triangulation.triangles().len(),
            "triangulated interpolation sites"
        );

        Ok(Self {
            triangulation,
            values: sites.iter().map(|s| s.value).collect(),
            origin,
            scale,
        })
    }

    fn normalize(&self, x: f64, y: f64) -> [f64; 2] {
        [
            (x - self.origin[0]) / self.scale[0],
            (y - self.origin[1]) / self.scale[1],
        ]
    }

    /// Distinct sites after merging duplicates
    pub fn site_count(&self) -> usize {
        self.values.len()
    }

    /// Whether any triangle exists (at least three non-collinear sites)
    pub fn is_triangulated(&self) -> bool {
        !self.triangulation.is_empty()
    }

    /// Barycentric interpolation; `None` outside the convex hull
    pub fn linear(&self, x: f64, y: f64) -> Option<f64> {
        let (tri, weights) = self.triangulation.locate(self.normalize(x, y))?;
        Some(
            tri.iter()
                .zip(weights.iter())
                .map(|(&i, &w)| w * self.values[i])
                .sum(),
        )
    }

    /// Value of the closest site; ties go to the first site in (x, y) order
    pub fn nearest(&self, x: f64, y: f64) -> f64 {
        let p = self.normalize(x, y);
        let mut best = (f64::INFINITY, self.values[0]);
        for (site, &value) in self.triangulation.points().iter().zip(&self.values) {
            let d = (site[0] - p[0]).powi(2) + (site[1] - p[1]).powi(2);
            if d < best.0 {
                best = (d, value);
            }
        }
        best.1
    }

    /// Linear inside the hull, nearest elsewhere
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.linear(x, y).unwrap_or_else(|| self.nearest(x, y))
    }

    /// Fill the grid `ys × xs` (rows follow `ys`)
    pub fn grid(&self, xs: &[f64], ys: &[f64]) -> GridFill {
        let mut linear_cells = 0;
        let mut nearest_cells = 0;
        let values = Array2::from_shape_fn((ys.len(), xs.len()), |(i, j)| {
            match self.linear(xs[j], ys[i]) {
                Some(v) => {
                    linear_cells += 1;
                    v
                }
                None => {
                    nearest_cells += 1;
                    self.nearest(xs[j], ys[i])
                }
            }
        });

        GridFill {
            values,
            linear_cells,
            nearest_cells,
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn extent(min: f64, max: f64) -> f64 {
    let span = max - min;
    if span > 0.0 {
        span
    } else {
        1.0
    }
}
