//! Data input and output
//!
//! Handles:
//! - Option chain loading (JSON) and synthetic chains
//! - JSON export of surfaces, smiles and convergence tables

pub mod chain;
pub mod export;

pub use chain::*;
pub use export::*;
