//! Derived views for the dashboard
//!
//! Small aggregates the visualization layer reads: mean yield per
//! (region, crop), nutrient/score correlations, and each region's latest
//! soil sample.

use crate::error::Result;
use crate::types::{CropYieldRecord, SoilSample};
use crate::utils::frames::{f64_values, string_values, yields_frame};
use crate::utils::{pearson, round2};
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct AverageYield {
    pub region: String,
    pub crop: String,
    pub mean_yield_kg_per_hectare: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientCorrelation {
    pub nutrient: String,
    /// `None` when either series is constant
    pub correlation: Option<f64>,
}

/// Mean yield per (region, crop), sorted by region then crop.
pub fn average_yields(records: &[CropYieldRecord]) -> Result<Vec<AverageYield>> {
    let df = yields_frame(records)?
        .lazy()
        .group_by([col("region"), col("crop_type")])
        .agg([col("yield_kg_per_hectare").mean().alias("mean_yield_kg_per_hectare")])
        .sort(["region", "crop_type"], SortMultipleOptions::default())
        .collect()?;

    let regions = string_values(&df, "region")?;
    let crops = string_values(&df, "crop_type")?;
    let means = f64_values(&df, "mean_yield_kg_per_hectare")?;

    Ok(regions
        .into_iter()
        .zip(crops)
        .zip(means)
        .map(|((region, crop), mean)| AverageYield {
            region,
            crop,
            mean_yield_kg_per_hectare: mean,
        })
        .collect())
}

/// Pearson correlation of each nutrient's concentration with the
/// sustainability score, rounded to 2 decimals.
pub fn nutrient_score_correlations(samples: &[SoilSample], nutrients: &[String]) -> Vec<NutrientCorrelation> {
    let scores: Vec<f64> = samples.iter().map(|s| s.sustainability_score).collect();

    nutrients
        .iter()
        .enumerate()
        .map(|(idx, nutrient)| {
            let concentrations: Vec<f64> = samples
                .iter()
                .filter_map(|s| s.concentrations.get(idx).copied())
                .collect();
            NutrientCorrelation {
                nutrient: nutrient.clone(),
                correlation: pearson(&concentrations, &scores).map(round2),
            }
        })
        .collect()
}

/// Each region's most recent sample, regions in order of first appearance.
pub fn latest_snapshot(samples: &[SoilSample]) -> Vec<&SoilSample> {
    let mut latest: Vec<&SoilSample> = Vec::new();
    for sample in samples {
        match latest.iter().position(|s| s.region == sample.region) {
            Some(idx) if sample.year > latest[idx].year => latest[idx] = sample,
            Some(_) => {}
            None => latest.push(sample),
        }
    }
    latest
}
