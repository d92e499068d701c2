//! Tier classification for soil quality and crop health.
//!
//! Each tier table is an ordered list of exclusive upper bounds. A value is
//! assigned the first label whose bound it falls below; anything at or above
//! the last bound gets the top label.

use crate::types::{CropHealth, SoilQuality};

/// Ordered (upper_bound, label) pairs evaluated with a single scan.
#[derive(Debug, Clone, Copy)]
pub struct TierTable<T: Copy + 'static> {
    bands: &'static [(f64, T)],
    top: T,
}

impl<T: Copy + 'static> TierTable<T> {
    pub const fn new(bands: &'static [(f64, T)], top: T) -> Self {
        Self { bands, top }
    }

    pub fn classify(&self, value: f64) -> T {
        self.bands
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, label)| *label)
            .unwrap_or(self.top)
    }

    /// Bounds in ascending order, for integrity checks and reporting.
    pub fn bounds(&self) -> impl Iterator<Item = f64> + '_ {
        self.bands.iter().map(|(upper, _)| *upper)
    }
}

// ============================================================================
// Soil Quality
// ============================================================================

/// score < 60 → Low, 60 ≤ score < 80 → Medium, score ≥ 80 → High
pub const QUALITY_TIERS: TierTable<SoilQuality> = TierTable::new(
    &[(60.0, SoilQuality::Low), (80.0, SoilQuality::Medium)],
    SoilQuality::High,
);

pub fn classify_quality(score: f64) -> SoilQuality {
    QUALITY_TIERS.classify(score)
}

// ============================================================================
// Crop Health
// ============================================================================

/// yield < 3500 → Poor, 3500 ≤ yield < 6000 → Moderate, yield ≥ 6000 → Excellent
pub const HEALTH_TIERS: TierTable<CropHealth> = TierTable::new(
    &[(3500.0, CropHealth::Poor), (6000.0, CropHealth::Moderate)],
    CropHealth::Excellent,
);

pub fn classify_health(yield_kg: f64) -> CropHealth {
    HEALTH_TIERS.classify(yield_kg)
}
