//! Loading persisted tables
//!
//! Reads the three CSV tables back with Polars and rebuilds typed rows, then
//! re-checks the invariants a consumer relies on: row counts, edge
//! uniqueness, score bounds, tier labels, and the exact soil-score join.

use crate::config::DistributionParams;
use crate::dataset::Dataset;
use crate::error::{Result, SynthError};
use crate::generators::SoilIndex;
use crate::types::{CropHealth, CropYieldRecord, EffectType, NutrientEdge, SoilQuality, SoilSample};
use crate::utils::frames::{
    f64_values, i32_values, require_columns, soil_columns, string_values, INTERACTION_COLUMNS,
    SOIL_LEADING_COLUMNS, SOIL_TRAILING_COLUMNS, YIELD_COLUMNS,
};
use crate::utils::{classify_health, classify_quality};
use crate::writer::{INTERACTIONS_FILE, SOIL_FILE, YIELDS_FILE};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::HashSet;
use std::path::Path;

/// Raw frames of a persisted run
pub struct TableData {
    pub interactions: DataFrame,
    pub soil_samples: DataFrame,
    pub crop_yields: DataFrame,
}

/// Counts gathered while verifying a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub nutrients: usize,
    pub regions: usize,
    pub years: usize,
    pub crops: usize,
    pub edges: usize,
    pub soil_rows: usize,
    pub yield_rows: usize,
}

impl TableData {
    /// Load all three tables from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let interactions = read_csv(&dir.join(INTERACTIONS_FILE))?;
        let soil_samples = read_csv(&dir.join(SOIL_FILE))?;
        let crop_yields = read_csv(&dir.join(YIELDS_FILE))?;

        tracing::info!(
            "Loaded {} edges, {} soil samples, {} yield records from {}",
            interactions.height(),
            soil_samples.height(),
            crop_yields.height(),
            dir.display()
        );

        Ok(Self {
            interactions,
            soil_samples,
            crop_yields,
        })
    }

    /// Nutrient columns sit between the leading and trailing soil columns.
    pub fn nutrients(&self) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .soil_samples
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let lead = SOIL_LEADING_COLUMNS.len();
        let trail = SOIL_TRAILING_COLUMNS.len();
        if names.len() <= lead + trail {
            return Err(SynthError::Integrity(format!(
                "soil_samples has no nutrient columns: {:?}",
                names
            )));
        }
        Ok(names[lead..names.len() - trail].to_vec())
    }

    /// Rebuild typed tables. Column sets and label vocabularies are checked here.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let nutrients = self.nutrients()?;
        Ok(Dataset {
            interactions: self.parse_interactions()?,
            soil_samples: self.parse_soil_samples(&nutrients)?,
            crop_yields: self.parse_crop_yields()?,
            nutrients,
        })
    }

    fn parse_interactions(&self) -> Result<Vec<NutrientEdge>> {
        let df = &self.interactions;
        let expected: Vec<String> = INTERACTION_COLUMNS.iter().map(|c| c.to_string()).collect();
        require_columns(df, &expected, "nutrient_interactions")?;

        let sources = string_values(df, "source_nutrient")?;
        let targets = string_values(df, "target_nutrient")?;
        let effects = string_values(df, "effect_type")?;
        let weights = f64_values(df, "weight")?;

        sources
            .into_iter()
            .zip(targets)
            .zip(effects)
            .zip(weights)
            .map(|(((source, target), effect), weight)| {
                let effect = EffectType::parse(&effect)
                    .ok_or_else(|| SynthError::Integrity(format!("unknown effect type '{}'", effect)))?;
                Ok(NutrientEdge {
                    source,
                    target,
                    effect,
                    weight,
                })
            })
            .collect()
    }

    fn parse_soil_samples(&self, nutrients: &[String]) -> Result<Vec<SoilSample>> {
        let df = &self.soil_samples;
        require_columns(df, &soil_columns(nutrients), "soil_samples")?;

        let regions = string_values(df, "region")?;
        let zones = string_values(df, "climate_zone")?;
        let years = i32_values(df, "year")?;
        let scores = f64_values(df, "sustainability_score")?;
        let qualities = string_values(df, "soil_quality")?;
        let concentration_columns: Vec<Vec<f64>> = nutrients
            .iter()
            .map(|n| f64_values(df, n))
            .collect::<Result<_>>()?;

        let mut samples = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let quality = SoilQuality::parse(&qualities[idx]).ok_or_else(|| {
                SynthError::Integrity(format!("unknown soil quality '{}'", qualities[idx]))
            })?;
            samples.push(SoilSample {
                region: regions[idx].clone(),
                climate_zone: zones[idx].clone(),
                year: years[idx],
                concentrations: concentration_columns.iter().map(|c| c[idx]).collect(),
                sustainability_score: scores[idx],
                quality,
            });
        }
        Ok(samples)
    }

    fn parse_crop_yields(&self) -> Result<Vec<CropYieldRecord>> {
        let df = &self.crop_yields;
        let expected: Vec<String> = YIELD_COLUMNS.iter().map(|c| c.to_string()).collect();
        require_columns(df, &expected, "crop_yields")?;

        let regions = string_values(df, "region")?;
        let zones = string_values(df, "climate_zone")?;
        let years = i32_values(df, "year")?;
        let crops = string_values(df, "crop_type")?;
        let yields = f64_values(df, "yield_kg_per_hectare")?;
        let scores = f64_values(df, "soil_sustainability_score")?;
        let health = string_values(df, "crop_health")?;

        let mut records = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let tier = CropHealth::parse(&health[idx]).ok_or_else(|| {
                SynthError::Integrity(format!("unknown crop health '{}'", health[idx]))
            })?;
            records.push(CropYieldRecord {
                region: regions[idx].clone(),
                climate_zone: zones[idx].clone(),
                year: years[idx],
                crop: crops[idx].clone(),
                yield_kg_per_hectare: yields[idx],
                soil_sustainability_score: scores[idx],
                health: tier,
            });
        }
        Ok(records)
    }

    /// Parse and verify in one step.
    pub fn verify_integrity(&self, params: &DistributionParams) -> Result<IntegrityReport> {
        verify_dataset(&self.to_dataset()?, params)
    }
}

/// Check every cross-table invariant of a dataset, with value ranges taken
/// from the distribution parameters it was generated under.
pub fn verify_dataset(dataset: &Dataset, params: &DistributionParams) -> Result<IntegrityReport> {
    let fail = |msg: String| Err(SynthError::Integrity(msg));

    // Interaction graph
    let n = dataset.nutrients.len();
    let vocabulary: HashSet<&str> = dataset.nutrients.iter().map(String::as_str).collect();
    let mut pairs = HashSet::new();
    for edge in &dataset.interactions {
        if edge.source == edge.target {
            return fail(format!("self-loop on nutrient '{}'", edge.source));
        }
        if !vocabulary.contains(edge.source.as_str()) || !vocabulary.contains(edge.target.as_str()) {
            return fail(format!("edge {} → {} outside the vocabulary", edge.source, edge.target));
        }
        if !pairs.insert((edge.source.as_str(), edge.target.as_str())) {
            return fail(format!("duplicate edge {} → {}", edge.source, edge.target));
        }
        if !(edge.weight > params.weight_min && edge.weight <= params.weight_max) {
            return fail(format!(
                "edge {} → {} weight {} outside ({}, {}]",
                edge.source, edge.target, edge.weight, params.weight_min, params.weight_max
            ));
        }
    }
    if dataset.interactions.len() > n * n.saturating_sub(1) {
        return fail(format!("{} edges exceed the {}-nutrient maximum", dataset.interactions.len(), n));
    }

    // Soil series
    let regions: HashSet<&str> = dataset.soil_samples.iter().map(|s| s.region.as_str()).collect();
    let years: HashSet<i32> = dataset.soil_samples.iter().map(|s| s.year).collect();
    for sample in &dataset.soil_samples {
        if !(0.0..=100.0).contains(&sample.sustainability_score) {
            return fail(format!(
                "score {} out of range for {} {}",
                sample.sustainability_score, sample.region, sample.year
            ));
        }
        let concentration_range = params.concentration_min..=params.concentration_max;
        if let Some(value) = sample
            .concentrations
            .iter()
            .find(|value| !concentration_range.contains(*value))
        {
            return fail(format!(
                "concentration {} outside [{}, {}] for {} {}",
                value, params.concentration_min, params.concentration_max, sample.region, sample.year
            ));
        }
        if sample.quality != classify_quality(sample.sustainability_score) {
            return fail(format!(
                "quality {} does not match score {} for {} {}",
                sample.quality, sample.sustainability_score, sample.region, sample.year
            ));
        }
    }
    let index = SoilIndex::build(&dataset.soil_samples)?;
    let zones: FxHashMap<(&str, i32), &str> = dataset
        .soil_samples
        .iter()
        .map(|s| ((s.region.as_str(), s.year), s.climate_zone.as_str()))
        .collect();
    if dataset.soil_samples.len() != regions.len() * years.len() {
        return fail(format!(
            "{} soil rows for {} regions × {} years",
            dataset.soil_samples.len(),
            regions.len(),
            years.len()
        ));
    }

    // Crop yields
    let crops: HashSet<&str> = dataset.crop_yields.iter().map(|r| r.crop.as_str()).collect();
    let mut keys = HashSet::new();
    for record in &dataset.crop_yields {
        let score = index.score(&record.region, record.year)?;
        if zones.get(&(record.region.as_str(), record.year)) != Some(&record.climate_zone.as_str()) {
            return fail(format!(
                "yield row {} {} {} has climate zone '{}' unlike its soil sample",
                record.region, record.year, record.crop, record.climate_zone
            ));
        }
        if !(params.yield_min..=params.yield_max).contains(&record.yield_kg_per_hectare) {
            return fail(format!(
                "yield {} outside [{}, {}] for {} {} {}",
                record.yield_kg_per_hectare,
                params.yield_min,
                params.yield_max,
                record.region,
                record.year,
                record.crop
            ));
        }
        if record.soil_sustainability_score != score {
            return fail(format!(
                "yield row {} {} {} carries score {} but soil sample has {}",
                record.region, record.year, record.crop, record.soil_sustainability_score, score
            ));
        }
        if record.health != classify_health(record.yield_kg_per_hectare) {
            return fail(format!(
                "health {} does not match yield {}",
                record.health, record.yield_kg_per_hectare
            ));
        }
        if !keys.insert((record.region.as_str(), record.year, record.crop.as_str())) {
            return fail(format!(
                "duplicate yield row {} {} {}",
                record.region, record.year, record.crop
            ));
        }
    }
    if dataset.crop_yields.len() != dataset.soil_samples.len() * crops.len() {
        return fail(format!(
            "{} yield rows for {} soil rows × {} crops",
            dataset.crop_yields.len(),
            dataset.soil_samples.len(),
            crops.len()
        ));
    }

    Ok(IntegrityReport {
        nutrients: n,
        regions: regions.len(),
        years: years.len(),
        crops: crops.len(),
        edges: dataset.interactions.len(),
        soil_rows: dataset.soil_samples.len(),
        yield_rows: dataset.crop_yields.len(),
    })
}

/// Load a CSV with a header row
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(SynthError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "table not found"),
        ));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()?;
    Ok(df)
}
