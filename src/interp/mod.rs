//! Scattered-data interpolation
//!
//! - Delaunay triangulation of planar sites
//! - Linear (barycentric) interpolation with nearest-site back-fill

pub mod delaunay;
pub mod scattered;

pub use delaunay::Triangulation;
pub use scattered::{merge_duplicates, GridFill, ScatteredInterpolator, Site};
