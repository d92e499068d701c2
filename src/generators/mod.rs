//! Table generators
//!
//! Each generator takes the random source explicitly. Call order is fixed by
//! `Dataset::generate`: interactions, then soil series, then crop yields.

pub mod interactions;
pub mod soil_series;
pub mod crop_yields;

pub use interactions::generate_interactions;
pub use soil_series::generate_soil_samples;
pub use crop_yields::{generate_crop_yields, SoilIndex};
