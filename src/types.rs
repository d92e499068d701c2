//! Row types for the three generated tables and the derived forecast series.
//!
//! Concentrations are stored positionally, aligned with the run's nutrient
//! vocabulary order; the writer turns each position into its own column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pairwise nutrient effect. "none" draws are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Antagonism,
    Stimulation,
}

impl EffectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectType::Antagonism => "antagonism",
            EffectType::Stimulation => "stimulation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "antagonism" => Some(EffectType::Antagonism),
            "stimulation" => Some(EffectType::Stimulation),
            _ => None,
        }
    }
}

/// Soil quality tier derived from the sustainability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilQuality {
    Low,
    Medium,
    High,
}

impl SoilQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilQuality::Low => "Low",
            SoilQuality::Medium => "Medium",
            SoilQuality::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(SoilQuality::Low),
            "Medium" => Some(SoilQuality::Medium),
            "High" => Some(SoilQuality::High),
            _ => None,
        }
    }
}

/// Crop health tier derived from yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropHealth {
    Poor,
    Moderate,
    Excellent,
}

impl CropHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropHealth::Poor => "Poor",
            CropHealth::Moderate => "Moderate",
            CropHealth::Excellent => "Excellent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Poor" => Some(CropHealth::Poor),
            "Moderate" => Some(CropHealth::Moderate),
            "Excellent" => Some(CropHealth::Excellent),
            _ => None,
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(EffectType, SoilQuality, CropHealth);

/// Directed, weighted edge of the nutrient interaction graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientEdge {
    pub source: String,
    pub target: String,
    pub effect: EffectType,
    pub weight: f64,
}

/// One soil measurement per (region, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub region: String,
    pub climate_zone: String,
    pub year: i32,
    /// Aligned with the nutrient vocabulary order
    pub concentrations: Vec<f64>,
    pub sustainability_score: f64,
    pub quality: SoilQuality,
}

/// One yield record per (region, year, crop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYieldRecord {
    pub region: String,
    pub climate_zone: String,
    pub year: i32,
    pub crop: String,
    pub yield_kg_per_hectare: f64,
    /// Copied from the soil sample with the same (region, year)
    pub soil_sustainability_score: f64,
    pub health: CropHealth,
}

/// Extrapolated sustainability score for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub region: String,
    pub year: i32,
    pub projected_score: f64,
}

/// Soil-series row that may be either measured or projected.
///
/// Projected rows have no concentrations and no quality tier; consumers must
/// treat those cells as unavailable, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub region: String,
    pub climate_zone: String,
    pub year: i32,
    pub concentrations: Option<Vec<f64>>,
    pub sustainability_score: f64,
    pub quality: Option<SoilQuality>,
}

impl SeriesRow {
    pub fn is_projected(&self) -> bool {
        self.concentrations.is_none()
    }
}

impl From<&SoilSample> for SeriesRow {
    fn from(sample: &SoilSample) -> Self {
        SeriesRow {
            region: sample.region.clone(),
            climate_zone: sample.climate_zone.clone(),
            year: sample.year,
            concentrations: Some(sample.concentrations.clone()),
            sustainability_score: sample.sustainability_score,
            quality: Some(sample.quality),
        }
    }
}
