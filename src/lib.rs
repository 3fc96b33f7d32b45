//! # volsim - Implied Volatility Surfaces and Monte Carlo Exotics
//!
//! Black-Scholes pricing, implied volatility recovery from observed option
//! prices, smile and surface construction from option chains, and Monte Carlo
//! pricing of path-dependent payoffs under geometric Brownian motion.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: closed-form European prices, Greeks, geometric Asian
//! - **IV Solver**: Newton-Raphson with bisection fallback; failures become
//!   missing values rather than errors
//! - **Smiles / Surface**: per-maturity IV solves, Delaunay-linear gridding
//!   with nearest-neighbour back-fill
//! - **Path Simulator**: seeded GBM ensembles, antithetic pairing, chunked
//!   parallel simulation on rayon
//! - **Payoffs**: European, arithmetic/geometric Asian, up-and-out barrier,
//!   convergence studies
//!
//! ## Usage
//!
//! ```rust,no_run
//! use volsim::prelude::*;
//!
//! // Smiles and a surface from a synthetic chain
//! let chain = generate_mock_chain(&MockChainConfig::default(), Some(42)).unwrap();
//! let smiles = compute_all_smiles(&chain, &SolverConfig::default()).unwrap();
//! let surface = build_vol_surface_from_smiles(&smiles, 50).unwrap();
//!
//! // Asian call by Monte Carlo
//! let spec = OptionSpec::call(100.0, 100.0, 0.05, 0.2, 1.0);
//! let asian = mc_asian_arithmetic(&spec, 252, 50_000, Some(7), true).unwrap();
//! println!("{:.4} ± {:.4}", asian.price, asian.standard_error());
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - American / early-exercise pricing
//! - Stochastic or local volatility models
//! - Continuous barrier monitoring (barriers are checked at grid points only)
//! - Plotting (surfaces and convergence tables are exported as JSON)

pub mod config;
pub mod core;
pub mod data;
pub mod interp;
pub mod models;
pub mod simulation;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        Greeks, OptionQuote, OptionSpec, OptionType, Smile, SmileObservation, VolSimError,
        VolSimResult, VolatilitySurface,
    };

    // Configuration
    pub use crate::config::{SimulationConfig, SolverConfig, SurfaceConfig, VolSimConfig};

    // Data
    pub use crate::data::{
        generate_mock_chain, load_option_chain, write_convergence_json, write_surface_json,
        MockChainConfig,
    };

    // Models
    pub use crate::models::{
        build_vol_surface,
        build_vol_surface_from_smiles,
        compute_all_smiles,
        compute_iv_for_maturity,
        geometric_asian_price,
        greeks as bs_greeks,
        implied_volatility,
        // Black-Scholes
        price as bs_price,
        // IV solver
        solve as solve_iv,
        IvSolution,
        SolveMethod,
    };

    // Simulation
    pub use crate::simulation::{
        compare_with_black_scholes, estimate_convergence, mc_asian_arithmetic, mc_asian_geometric,
        mc_barrier_up_and_out_call, mc_european, simulate, simulate_antithetic, simulate_parallel,
        BenchmarkComparison, ConvergenceRecord, GbmParams, McEstimate, PathEnsemble,
    };
}

// Re-export main types at crate root
pub use crate::core::{VolSimError, VolSimResult};
pub use crate::simulation::{GbmParams, PathEnsemble};
