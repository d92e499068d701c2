//! Error taxonomy for dataset generation
//!
//! Three fatal classes: configuration problems (caught before any draw),
//! referential-integrity failures (a yield row without its soil sample),
//! and I/O failures surfaced verbatim with the offending path.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    /// Malformed or missing vocabulary, region, or range input.
    #[error("Invalid configuration for '{field}': {reason}")]
    Config { field: String, reason: String },

    /// A yield row could not find the soil sample keyed by its (region, year).
    #[error("No soil sample for region '{region}' in year {year}")]
    MissingSoilSample { region: String, year: i32 },

    /// A persisted or in-memory table violates one of its invariants.
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data frame error: {0}")]
    Frame(#[from] PolarsError),
}

impl SynthError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SynthError::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SynthError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
