//! Utility modules shared by the generators
//!
//! - Classification: ordered tier tables for quality/health labels
//! - Numeric: rounding and simple statistics
//! - Frames: typed rows to/from Polars DataFrames

pub mod classify;
pub mod numeric;
pub mod frames;

// Re-export commonly used items
pub use classify::{TierTable, QUALITY_TIERS, HEALTH_TIERS, classify_quality, classify_health};
pub use numeric::{round2, cents_floor, linear_slope, pearson};
