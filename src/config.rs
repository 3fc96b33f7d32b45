//! Configuration for the solver, simulator and surface builder
//!
//! Every section has defaults, so a JSON config file only needs to name the
//! fields it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{VolSimError, VolSimResult};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolSimConfig {
    /// Implied volatility solver
    pub solver: SolverConfig,
    /// Monte Carlo path simulation
    pub simulation: SimulationConfig,
    /// Surface interpolation
    pub surface: SurfaceConfig,
}

impl VolSimConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> VolSimResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty-printed JSON
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> VolSimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> VolSimResult<()> {
        self.solver.validate()?;
        self.simulation.validate()?;
        self.surface.validate()
    }
}

/// Implied volatility solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Newton starting point
    /// Default: 0.2
    pub initial_vol: f64,

    /// Absolute pricing error accepted as converged; also the minimum
    /// bisection bracket width
    /// Default: 1e-6
    pub tolerance: f64,

    /// Iteration budget for each phase
    /// Default: 100
    pub max_iterations: usize,

    /// Newton gives up when vega drops below this
    /// Default: 1e-8
    pub vega_floor: f64,

    /// Lower edge of the admissible band, exclusive for Newton;
    /// also the low bisection bound
    /// Default: 1e-4
    pub vol_lower: f64,

    /// Upper edge of the admissible band; also the high bisection bound
    /// Default: 5.0
    pub vol_upper: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_vol: 0.2,
            tolerance: 1e-6,
            max_iterations: 100,
            vega_floor: 1e-8,
            vol_lower: 1e-4,
            vol_upper: 5.0,
        }
    }
}

impl SolverConfig {
    /// Tighter tolerance, bigger budget
    pub fn precise() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> VolSimResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(VolSimError::invalid_input("solver tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(VolSimError::invalid_input("solver max_iterations must be positive"));
        }
        if !(self.vol_lower > 0.0 && self.vol_lower < self.vol_upper && self.vol_upper.is_finite()) {
            return Err(VolSimError::invalid_input(format!(
                "solver bounds must satisfy 0 < vol_lower < vol_upper, got [{}, {}]",
                self.vol_lower, self.vol_upper
            )));
        }
        if !(self.initial_vol.is_finite() && self.initial_vol > 0.0) {
            return Err(VolSimError::invalid_input("solver initial_vol must be positive"));
        }
        Ok(())
    }
}

/// Monte Carlo simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time steps per path
    /// Default: 252 (daily monitoring over one year)
    pub n_steps: usize,

    /// Number of simulated paths
    /// Default: 20_000
    pub n_paths: usize,

    /// Paths per parallel chunk
    /// Default: 10_000
    pub chunk_size: usize,

    /// Pair every draw with its negation
    /// Default: false
    pub antithetic: bool,

    /// Master seed; None draws from OS entropy
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_steps: 252,
            n_paths: 20_000,
            chunk_size: 10_000,
            antithetic: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> VolSimResult<()> {
        if self.n_steps == 0 {
            return Err(VolSimError::invalid_input("n_steps must be positive"));
        }
        if self.n_paths == 0 {
            return Err(VolSimError::invalid_input("n_paths must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(VolSimError::invalid_input("chunk_size must be positive"));
        }
        Ok(())
    }
}

/// Surface interpolation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Grid points along each axis
    /// Default: 50
    pub grid_size: usize,

    /// Rescale strike and maturity to the unit box before interpolating
    /// Default: false (raw Euclidean distance)
    pub rescale: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid_size: 50,
            rescale: false,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> VolSimResult<()> {
        if self.grid_size == 0 {
            return Err(VolSimError::invalid_input("grid_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = VolSimConfig::default();
        assert_eq!(config.solver.initial_vol, 0.2);
        assert_eq!(config.solver.tolerance, 1e-6);
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.surface.grid_size, 50);
        assert!(!config.surface.rescale);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VolSimConfig =
            serde_json::from_str(r#"{"simulation": {"n_paths": 5000, "seed": 7}}"#).unwrap();
        assert_eq!(config.simulation.n_paths, 5000);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.n_steps, 252);
        assert_eq!(config.solver, SolverConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("volsim.json");

        let mut config = VolSimConfig::default();
        config.solver = SolverConfig::precise();
        config.surface.grid_size = 20;
        config.to_json_file(&path).unwrap();

        let loaded = VolSimConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"surface": {"grid_size": 0}}"#).unwrap();
        assert!(matches!(
            VolSimConfig::from_json_file(&path),
            Err(VolSimError::InvalidInput(_))
        ));

        let bad = SolverConfig {
            vol_lower: 5.0,
            vol_upper: 1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
