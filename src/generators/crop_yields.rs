//! Crop yield table joined to the soil series
//!
//! Iterates (year, region, crop) with crop innermost, draws a yield, and
//! attaches the sustainability score of the soil sample with the same
//! (region, year) through an index built once from the soil table.

use crate::config::DatasetConfig;
use crate::error::{Result, SynthError};
use crate::types::{CropYieldRecord, SoilSample};
use crate::utils::{classify_health, round2};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rustc_hash::FxHashMap;

/// (region, year) → sustainability score
#[derive(Debug, Default)]
pub struct SoilIndex {
    scores: FxHashMap<String, FxHashMap<i32, f64>>,
}

impl SoilIndex {
    /// Build from the soil table. A repeated (region, year) key is an integrity error.
    pub fn build(samples: &[SoilSample]) -> Result<Self> {
        let mut scores: FxHashMap<String, FxHashMap<i32, f64>> = FxHashMap::default();

        for sample in samples {
            let by_year = scores.entry(sample.region.clone()).or_default();
            if by_year.insert(sample.year, sample.sustainability_score).is_some() {
                return Err(SynthError::Integrity(format!(
                    "duplicate soil sample for region '{}' in year {}",
                    sample.region, sample.year
                )));
            }
        }

        Ok(Self { scores })
    }

    pub fn get(&self, region: &str, year: i32) -> Option<f64> {
        self.scores.get(region)?.get(&year).copied()
    }

    /// Checked lookup; a miss is a referential-integrity failure.
    pub fn score(&self, region: &str, year: i32) -> Result<f64> {
        self.get(region, year).ok_or_else(|| SynthError::MissingSoilSample {
            region: region.to_string(),
            year,
        })
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(|by_year| by_year.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn generate_crop_yields<R: Rng>(
    config: &DatasetConfig,
    soil: &SoilIndex,
    rng: &mut R,
) -> Result<Vec<CropYieldRecord>> {
    let params = &config.distributions;
    let yield_dist = Uniform::new_inclusive(params.yield_min, params.yield_max);

    let years = config.years();
    let mut records = Vec::with_capacity(years.len() * config.regions.len() * config.crops.len());

    for &year in &years {
        for region in &config.regions {
            let soil_score = soil.score(&region.name, year)?;

            for crop in &config.crops {
                let yield_kg = round2(yield_dist.sample(rng));

                records.push(CropYieldRecord {
                    region: region.name.clone(),
                    climate_zone: region.climate_zone.clone(),
                    year,
                    crop: crop.clone(),
                    yield_kg_per_hectare: yield_kg,
                    soil_sustainability_score: soil_score,
                    health: classify_health(yield_kg),
                });
            }
        }
    }

    tracing::info!(
        "Crop yields: {} records ({} crops per region-year)",
        records.len(),
        config.crops.len()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::generate_soil_samples;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_record_carries_its_soil_score() {
        let config = DatasetConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let samples = generate_soil_samples(&config, &mut rng).unwrap();
        let index = SoilIndex::build(&samples).unwrap();
        let records = generate_crop_yields(&config, &index, &mut rng).unwrap();

        assert_eq!(records.len(), 11 * 5 * 5);
        for record in &records {
            let matches: Vec<&SoilSample> = samples
                .iter()
                .filter(|s| s.region == record.region && s.year == record.year)
                .collect();
            assert_eq!(matches.len(), 1);
            assert_eq!(record.soil_sustainability_score, matches[0].sustainability_score);
            assert_eq!(record.climate_zone, matches[0].climate_zone);
            assert!((2000.0..=8000.0).contains(&record.yield_kg_per_hectare));
            assert_eq!(record.health, classify_health(record.yield_kg_per_hectare));
        }
    }

    #[test]
    fn test_crop_is_innermost_loop() {
        let config = DatasetConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let samples = generate_soil_samples(&config, &mut rng).unwrap();
        let index = SoilIndex::build(&samples).unwrap();
        let records = generate_crop_yields(&config, &index, &mut rng).unwrap();

        let first: Vec<(&str, &str)> = records[..6]
            .iter()
            .map(|r| (r.region.as_str(), r.crop.as_str()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("North", "Wheat"),
                ("North", "Corn"),
                ("North", "Soybean"),
                ("North", "Rice"),
                ("North", "Barley"),
                ("South", "Wheat"),
            ]
        );
    }

    #[test]
    fn test_missing_soil_sample_is_fatal() {
        let config = DatasetConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut samples = generate_soil_samples(&config, &mut rng).unwrap();
        samples.retain(|s| !(s.region == "West" && s.year == 2020));
        let index = SoilIndex::build(&samples).unwrap();

        let err = generate_crop_yields(&config, &index, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SynthError::MissingSoilSample { ref region, year: 2020 } if region == "West"
        ));
    }

    #[test]
    fn test_duplicate_soil_key_rejected() {
        let config = DatasetConfig::default();
        let mut samples = generate_soil_samples(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        samples.push(samples[3].clone());
        assert!(matches!(SoilIndex::build(&samples), Err(SynthError::Integrity(_))));
    }
}
