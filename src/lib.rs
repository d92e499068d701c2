//! Synthetic Agronomic Dataset Generator
//!
//! Produces three mutually consistent tables from one seed: a nutrient
//! interaction graph, a per-region soil time series, and per-crop yield
//! records joined to the soil series by (region, year). Quality and health
//! tiers are step functions of the generated scores, and sustainability
//! trends are projected per region for the dashboard.
//!
//! Layout:
//! - `config`: run configuration and validation
//! - `generators/`: the three table generators
//! - `dataset`: seeded run orchestration
//! - `writer` / `data`: all-or-nothing CSV output and reload with integrity checks
//! - `forecast`: linear trend projection
//! - `summary`: aggregate views
//! - `utils/`: tier tables, numeric helpers, DataFrame conversion

pub mod error;
pub mod types;
pub mod config;
pub mod utils;
pub mod generators;
pub mod dataset;
pub mod writer;
pub mod data;
pub mod forecast;
pub mod summary;

// Re-export commonly used types
pub use error::{Result, SynthError};
pub use types::{CropHealth, CropYieldRecord, EffectType, ForecastPoint, NutrientEdge, SeriesRow, SoilQuality, SoilSample};
pub use config::{DatasetConfig, DistributionParams, RegionSpec};
pub use dataset::Dataset;
pub use generators::SoilIndex;
pub use writer::{write_tables, WrittenTables};
pub use data::{verify_dataset, IntegrityReport, TableData};
pub use forecast::{extend_with_forecast, fit_trends, project_trends, RegionTrend};
