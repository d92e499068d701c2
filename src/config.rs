//! Run configuration
//!
//! Vocabularies, the region → climate-zone mapping, the year range, and the
//! sampling parameters for one generation run. Defaults reproduce the
//! reference dataset (seed 42, 2015-2025, five regions, five crops).
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Optional JSON file (`DatasetConfig::load`, path from `SOIL_SYNTH_CONFIG`
//!    in the binaries)
//! 3. Environment: `SOIL_SYNTH_SEED`, `DATA_DIR`

use crate::error::{Result, SynthError};
use crate::utils::cents_floor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG: &str = "SOIL_SYNTH_CONFIG";
pub const ENV_SEED: &str = "SOIL_SYNTH_SEED";
pub const ENV_DATA_DIR: &str = "DATA_DIR";

/// Sustainability scores are clipped into this closed range.
pub const SCORE_RANGE: (f64, f64) = (0.0, 100.0);

/// A region and its (static) climate zone.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionSpec {
    pub name: String,
    pub climate_zone: String,
}

impl RegionSpec {
    pub fn new(name: &str, climate_zone: &str) -> Self {
        Self {
            name: name.to_string(),
            climate_zone: climate_zone.to_string(),
        }
    }
}

/// Categorical probabilities for a nutrient pair's effect draw.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EffectProbabilities {
    pub antagonism: f64,
    pub stimulation: f64,
    pub none: f64,
}

impl Default for EffectProbabilities {
    fn default() -> Self {
        Self {
            antagonism: 0.3,
            stimulation: 0.3,
            none: 0.4,
        }
    }
}

/// Sampling parameters for every generated column.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DistributionParams {
    pub effect_probabilities: EffectProbabilities,
    /// Edge weights fall in (weight_min, weight_max]
    pub weight_min: f64,
    pub weight_max: f64,
    pub concentration_min: f64,
    pub concentration_max: f64,
    pub score_mean: f64,
    pub score_std_dev: f64,
    pub yield_min: f64,
    pub yield_max: f64,
}

impl Default for DistributionParams {
    fn default() -> Self {
        Self {
            effect_probabilities: EffectProbabilities::default(),
            weight_min: 0.1,
            weight_max: 1.0,
            concentration_min: 10.0,
            concentration_max: 100.0,
            score_mean: 70.0,
            score_std_dev: 10.0,
            yield_min: 2000.0,
            yield_max: 8000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub seed: u64,
    pub start_year: i32,
    /// Inclusive
    pub end_year: i32,
    pub nutrients: Vec<String>,
    pub regions: Vec<RegionSpec>,
    pub crops: Vec<String>,
    pub projection_years: Vec<i32>,
    pub output_dir: PathBuf,
    pub distributions: DistributionParams,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            seed: 42,
            start_year: 2015,
            end_year: 2025,
            nutrients: strings(&["N", "P", "K", "Ca", "Mg", "Fe", "Zn", "Cu", "Mn", "B", "Mo"]),
            regions: vec![
                RegionSpec::new("North", "Cold"),
                RegionSpec::new("South", "Hot"),
                RegionSpec::new("East", "Temperate"),
                RegionSpec::new("West", "Dry"),
                RegionSpec::new("Central", "Temperate"),
            ],
            crops: strings(&["Wheat", "Corn", "Soybean", "Rice", "Barley"]),
            projection_years: vec![2026, 2027, 2028],
            output_dir: PathBuf::from("data"),
            distributions: DistributionParams::default(),
        }
    }
}

impl DatasetConfig {
    /// Load configuration from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;

        serde_json::from_str(&contents)
            .map_err(|e| SynthError::config(path.display().to_string(), e.to_string()))
    }

    /// Apply `SOIL_SYNTH_SEED` and `DATA_DIR` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = raw.trim().parse().map_err(|_| {
                SynthError::config(ENV_SEED, format!("'{}' is not an unsigned integer", raw))
            })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if dir.trim().is_empty() {
                return Err(SynthError::config(ENV_DATA_DIR, "must not be blank"));
            }
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Historical years, ascending.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }

    /// Check every input before any row is drawn.
    pub fn validate(&self) -> Result<()> {
        check_vocabulary("nutrients", self.nutrients.iter().map(String::as_str))?;
        check_vocabulary("regions", self.regions.iter().map(|r| r.name.as_str()))?;
        check_vocabulary("crops", self.crops.iter().map(String::as_str))?;

        if let Some(region) = self.regions.iter().find(|r| r.climate_zone.trim().is_empty()) {
            return Err(SynthError::config(
                "regions",
                format!("region '{}' has no climate zone", region.name),
            ));
        }

        if self.start_year > self.end_year {
            return Err(SynthError::config(
                "start_year",
                format!("{} is after end_year {}", self.start_year, self.end_year),
            ));
        }

        let mut previous = self.end_year;
        for &year in &self.projection_years {
            if year <= previous {
                return Err(SynthError::config(
                    "projection_years",
                    format!("{} must be after {} (strictly ascending, past end_year)", year, previous),
                ));
            }
            previous = year;
        }

        self.distributions.validate()
    }
}

impl DistributionParams {
    /// Smallest and largest weight, in hundredths, that a rounded edge
    /// weight may take inside (weight_min, weight_max].
    pub fn weight_cents(&self) -> (i64, i64) {
        (cents_floor(self.weight_min) + 1, cents_floor(self.weight_max))
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.effect_probabilities;
        let probs = [p.antagonism, p.stimulation, p.none];
        if probs.iter().any(|v| !v.is_finite() || *v < 0.0) || probs.iter().sum::<f64>() <= 0.0 {
            return Err(SynthError::config(
                "effect_probabilities",
                "must be finite, non-negative, and not all zero",
            ));
        }

        check_range("weight", self.weight_min, self.weight_max, true)?;
        if self.weight_min < 0.0 {
            return Err(SynthError::config("weight", "lower bound must not be negative"));
        }
        let (lowest, highest) = self.weight_cents();
        if lowest > highest {
            return Err(SynthError::config(
                "weight",
                format!(
                    "no 2-decimal value lies in ({}, {}]",
                    self.weight_min, self.weight_max
                ),
            ));
        }
        check_range("concentration", self.concentration_min, self.concentration_max, false)?;
        check_range("yield", self.yield_min, self.yield_max, false)?;

        if !self.score_mean.is_finite() {
            return Err(SynthError::config("score_mean", "must be finite"));
        }
        if !self.score_std_dev.is_finite() || self.score_std_dev <= 0.0 {
            return Err(SynthError::config("score_std_dev", "must be positive and finite"));
        }
        Ok(())
    }
}

fn check_vocabulary<'a>(field: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(SynthError::config(field, "contains a blank name"));
        }
        if !seen.insert(name) {
            return Err(SynthError::config(field, format!("duplicate entry '{}'", name)));
        }
    }
    if seen.is_empty() {
        return Err(SynthError::config(field, "must not be empty"));
    }
    Ok(())
}

fn check_range(field: &str, min: f64, max: f64, strict: bool) -> Result<()> {
    let ordered = if strict { min < max } else { min <= max };
    if !min.is_finite() || !max.is_finite() || !ordered {
        return Err(SynthError::config(
            field,
            format!("invalid range [{}, {}]", min, max),
        ));
    }
    Ok(())
}
