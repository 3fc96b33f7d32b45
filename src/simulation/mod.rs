//! Monte Carlo Simulation
//!
//! - Seeded random streams and per-chunk seed derivation
//! - GBM path ensembles (plain, antithetic, chunk-parallel)
//! - Payoff evaluators for European, Asian and barrier options
//! - Convergence studies against the closed form

pub mod convergence;
pub mod paths;
pub mod payoffs;
pub mod rng;

pub use convergence::*;
pub use paths::*;
pub use payoffs::*;
pub use rng::{derive_seeds, make_rng, SimRng};
