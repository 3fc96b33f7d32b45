//! Volatility Models
//!
//! Implements:
//! - Black-Scholes (baseline pricing, Greeks, geometric Asian closed form)
//! - Implied volatility solver (Newton with bisection fallback)
//! - Smile construction from option chains
//! - Volatility surface construction from scattered observations

pub mod black_scholes;
pub mod implied_vol;
pub mod smile;
pub mod surface_builder;

pub use black_scholes::*;
pub use implied_vol::*;
pub use smile::*;
pub use surface_builder::*;
