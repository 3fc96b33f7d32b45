//! Core data types for volsim
//!
//! Defines fundamental types:
//! - OptionSpec / OptionType: contract and market inputs for one valuation
//! - OptionQuote / SmileObservation / Smile: option-chain rows and solved vols
//! - VolatilitySurface: interpolated implied volatility grid
//! - Greeks: Black-Scholes sensitivities

pub mod error;
pub mod greeks;
pub mod option;
pub mod quote;
pub mod surface;

pub use error::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
pub use surface::*;
