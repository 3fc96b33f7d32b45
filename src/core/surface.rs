//! Volatility Surface
//!
//! Implied volatility on a regular (strike, maturity) grid. The three meshes
//! follow the `meshgrid` convention: row `i` holds maturity `maturity_axis[i]`,
//! column `j` holds strike `strike_axis[j]`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::error::{VolSimError, VolSimResult};

/// Interpolated implied volatility surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilitySurface {
    /// Strike grid points, ascending
    pub strike_axis: Vec<f64>,
    /// Maturity grid points (years), ascending
    pub maturity_axis: Vec<f64>,
    /// Strike mesh [maturity, strike] -> strike
    pub strikes: Array2<f64>,
    /// Maturity mesh [maturity, strike] -> maturity
    pub maturities: Array2<f64>,
    /// Volatility mesh [maturity, strike] -> vol
    pub vols: Array2<f64>,
    /// Observations used as interpolation sites
    pub observation_count: usize,
    /// Observations dropped because their implied vol was missing
    pub missing_count: usize,
}

impl VolatilitySurface {
    /// Assemble a surface from its axes and a vol grid shaped (maturities, strikes)
    pub fn from_grid(
        strike_axis: Vec<f64>,
        maturity_axis: Vec<f64>,
        vols: Array2<f64>,
        observation_count: usize,
        missing_count: usize,
    ) -> VolSimResult<Self> {
        let shape = (maturity_axis.len(), strike_axis.len());
        if vols.dim() != shape {
            return Err(VolSimError::invalid_input(format!(
                "vol grid shape {:?} does not match axes {:?}",
                vols.dim(),
                shape
            )));
        }

        let strikes = Array2::from_shape_fn(shape, |(_, j)| strike_axis[j]);
        let maturities = Array2::from_shape_fn(shape, |(i, _)| maturity_axis[i]);

        Ok(Self {
            strike_axis,
            maturity_axis,
            strikes,
            maturities,
            vols,
            observation_count,
            missing_count,
        })
    }

    /// Grid shape as (maturities, strikes)
    pub fn dim(&self) -> (usize, usize) {
        self.vols.dim()
    }

    /// (min strike, max strike)
    pub fn strike_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.strike_axis.first()?, *self.strike_axis.last()?))
    }

    /// (min maturity, max maturity)
    pub fn maturity_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.maturity_axis.first()?, *self.maturity_axis.last()?))
    }

    /// Interpolate volatility at (strike, maturity); clamps outside the grid
    pub fn interpolate(&self, strike: f64, maturity: f64) -> Option<f64> {
        if self.strike_axis.is_empty() || self.maturity_axis.is_empty() {
            return None;
        }

        let (si_lo, si_hi, s_frac) = find_bracket(&self.strike_axis, strike)?;
        let (mi_lo, mi_hi, m_frac) = find_bracket(&self.maturity_axis, maturity)?;

        // Bilinear interpolation
        let v00 = self.vols[[mi_lo, si_lo]];
        let v01 = self.vols[[mi_lo, si_hi]];
        let v10 = self.vols[[mi_hi, si_lo]];
        let v11 = self.vols[[mi_hi, si_hi]];

        let v0 = v00 * (1.0 - s_frac) + v01 * s_frac;
        let v1 = v10 * (1.0 - s_frac) + v11 * s_frac;

        Some(v0 * (1.0 - m_frac) + v1 * m_frac)
    }

    /// Smile across the strike axis at the given maturity
    pub fn smile_at(&self, maturity: f64) -> Option<Vec<(f64, f64)>> {
        self.strike_axis
            .iter()
            .map(|&k| self.interpolate(k, maturity).map(|v| (k, v)))
            .collect()
    }

    /// Total variance at (strike, maturity): σ²T
    pub fn total_variance(&self, strike: f64, maturity: f64) -> Option<f64> {
        self.interpolate(strike, maturity)
            .map(|v| v * v * maturity)
    }

    /// True when every grid cell holds a finite volatility
    pub fn is_complete(&self) -> bool {
        self.vols.iter().all(|v| v.is_finite())
    }
}

/// Bracketing indices and interpolation fraction, clamped to the axis ends
fn find_bracket(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    if axis.is_empty() || value.is_nan() {
        return None;
    }

    let last = axis.len() - 1;
    if value <= axis[0] {
        return Some((0, 0, 0.0));
    }
    if value >= axis[last] {
        return Some((last, last, 0.0));
    }

    // Axis is ascending, so the partition point is the upper bracket
    let hi = axis.partition_point(|&x| x <= value).min(last);
    let lo = hi - 1;
    let width = axis[hi] - axis[lo];
    let frac = if width > 0.0 {
        (value - axis[lo]) / width
    } else {
        0.0
    };
    Some((lo, hi, frac))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed_surface() -> VolatilitySurface {
        let strikes = vec![90.0, 95.0, 100.0, 105.0, 110.0];
        let maturities = vec![0.25, 0.5, 1.0];
        let vols = Array2::from_shape_fn((3, 5), |(i, j)| 0.20 + 0.01 * i as f64 - 0.005 * j as f64);
        VolatilitySurface::from_grid(strikes, maturities, vols, 15, 0).unwrap()
    }

    #[test]
    fn test_meshes_share_shape() {
        let surface = skewed_surface();
        assert_eq!(surface.strikes.dim(), (3, 5));
        assert_eq!(surface.maturities.dim(), (3, 5));
        assert_eq!(surface.strikes[[2, 4]], 110.0);
        assert_eq!(surface.maturities[[2, 4]], 1.0);
        assert_eq!(surface.strike_bounds(), Some((90.0, 110.0)));
        assert_eq!(surface.maturity_bounds(), Some((0.25, 1.0)));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let res = VolatilitySurface::from_grid(
            vec![90.0, 100.0],
            vec![0.5],
            Array2::zeros((2, 2)),
            4,
            0,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_surface_interpolation() {
        // Flat vol surface at 20%
        let surface = VolatilitySurface::from_grid(
            vec![90.0, 100.0, 110.0],
            vec![0.25, 0.5, 1.0],
            Array2::from_elem((3, 3), 0.20),
            9,
            0,
        )
        .unwrap();

        let vol = surface.interpolate(102.0, 0.4).unwrap();
        assert!((vol - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_hits_nodes_and_clamps() {
        let surface = skewed_surface();
        assert!((surface.interpolate(100.0, 0.5).unwrap() - 0.20).abs() < 1e-12);
        // Midway between two strikes on a grid row
        let mid = surface.interpolate(92.5, 0.25).unwrap();
        assert!((mid - 0.1975).abs() < 1e-12);
        // Outside the box clamps to the edge
        assert_eq!(surface.interpolate(50.0, 0.1), surface.interpolate(90.0, 0.25));
        assert!(surface.interpolate(f64::NAN, 0.5).is_none());
    }

    #[test]
    fn test_smile_and_total_variance() {
        let surface = skewed_surface();
        let smile = surface.smile_at(1.0).unwrap();
        assert_eq!(smile.len(), 5);
        assert!((smile[0].1 - 0.22).abs() < 1e-12);

        let w = surface.total_variance(100.0, 1.0).unwrap();
        assert!((w - 0.21 * 0.21).abs() < 1e-12);
        assert!(surface.is_complete());
    }
}
