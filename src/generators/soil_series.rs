//! Regional soil time series
//!
//! One sample per (year, region): year ascending on the outside, regions in
//! declaration order inside. Each sample draws one concentration per nutrient
//! (uniform) and a sustainability score (normal, clipped to [0, 100],
//! rounded to 2 decimals), then classifies the score into a quality tier.

use crate::config::{DatasetConfig, SCORE_RANGE};
use crate::error::{Result, SynthError};
use crate::types::SoilSample;
use crate::utils::{classify_quality, round2};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;

pub fn generate_soil_samples<R: Rng>(config: &DatasetConfig, rng: &mut R) -> Result<Vec<SoilSample>> {
    let params = &config.distributions;
    let concentration = Uniform::new_inclusive(params.concentration_min, params.concentration_max);
    let score_dist = Normal::new(params.score_mean, params.score_std_dev)
        .map_err(|e| SynthError::config("score_std_dev", e.to_string()))?;

    let years = config.years();
    let mut samples = Vec::with_capacity(years.len() * config.regions.len());

    for &year in &years {
        for region in &config.regions {
            let concentrations: Vec<f64> = config
                .nutrients
                .iter()
                .map(|_| concentration.sample(rng))
                .collect();

            let raw_score: f64 = score_dist.sample(rng);
            let sustainability_score = round2(raw_score.clamp(SCORE_RANGE.0, SCORE_RANGE.1));

            samples.push(SoilSample {
                region: region.name.clone(),
                climate_zone: region.climate_zone.clone(),
                year,
                concentrations,
                sustainability_score,
                quality: classify_quality(sustainability_score),
            });
        }
    }

    tracing::info!(
        "Soil series: {} samples ({} years × {} regions)",
        samples.len(),
        years.len(),
        config.regions.len()
    );

    Ok(samples)
}
