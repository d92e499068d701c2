//! Sustainability trend projection
//!
//! Fits a per-region least-squares line of score against year over the
//! historical soil series and extends it from the region's last observed
//! score: projected(y) = last_score + (y - last_year) × slope.

use crate::error::{Result, SynthError};
use crate::types::{ForecastPoint, SeriesRow, SoilSample};
use crate::utils::linear_slope;

/// Linear trend fitted to one region's history.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTrend {
    pub region: String,
    pub climate_zone: String,
    pub slope: f64,
    pub last_year: i32,
    pub last_score: f64,
}

impl RegionTrend {
    pub fn project(&self, year: i32) -> f64 {
        self.last_score + f64::from(year - self.last_year) * self.slope
    }
}

/// Fit one trend per region, regions in order of first appearance.
///
/// A region with fewer than two distinct years has no defined slope and is
/// held flat at its last score.
pub fn fit_trends(samples: &[SoilSample]) -> Vec<RegionTrend> {
    let mut regions: Vec<&str> = Vec::new();
    for sample in samples {
        if !regions.contains(&sample.region.as_str()) {
            regions.push(&sample.region);
        }
    }

    regions
        .into_iter()
        .filter_map(|region| {
            let mut history: Vec<&SoilSample> =
                samples.iter().filter(|s| s.region == region).collect();
            history.sort_by_key(|s| s.year);

            let last = *history.last()?;
            let xs: Vec<f64> = history.iter().map(|s| f64::from(s.year)).collect();
            let ys: Vec<f64> = history.iter().map(|s| s.sustainability_score).collect();

            let slope = linear_slope(&xs, &ys).unwrap_or_else(|| {
                tracing::warn!(
                    "Region '{}' has {} historical point(s); projecting a flat trend",
                    region,
                    history.len()
                );
                0.0
            });
            tracing::debug!("Region '{}': slope {:.4}/year from {} points", region, slope, history.len());

            Some(RegionTrend {
                region: region.to_string(),
                climate_zone: last.climate_zone.clone(),
                slope,
                last_year: last.year,
                last_score: last.sustainability_score,
            })
        })
        .collect()
}

/// Project every region onto `projection_years`.
///
/// Requested years must be strictly ascending and each must lie after the
/// region's last historical year.
pub fn project_trends(samples: &[SoilSample], projection_years: &[i32]) -> Result<Vec<ForecastPoint>> {
    if let Some(pair) = projection_years.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(SynthError::config(
            "projection_years",
            format!("{} follows {}; years must be strictly ascending", pair[1], pair[0]),
        ));
    }

    let trends = fit_trends(samples);
    let mut points = Vec::with_capacity(trends.len() * projection_years.len());

    for trend in &trends {
        for &year in projection_years {
            if year <= trend.last_year {
                return Err(SynthError::config(
                    "projection_years",
                    format!(
                        "{} is not after the last historical year {} of region '{}'",
                        year, trend.last_year, trend.region
                    ),
                ));
            }
            points.push(ForecastPoint {
                region: trend.region.clone(),
                year,
                projected_score: trend.project(year),
            });
        }
    }

    tracing::info!(
        "Projected {} points for {} regions",
        points.len(),
        trends.len()
    );

    Ok(points)
}

/// Historical rows followed by projected rows with unavailable nutrient and tier cells.
///
/// Every point must name a region present in `samples`, which supplies its
/// climate zone.
pub fn extend_with_forecast(samples: &[SoilSample], points: &[ForecastPoint]) -> Result<Vec<SeriesRow>> {
    let mut rows: Vec<SeriesRow> = samples.iter().map(SeriesRow::from).collect();

    for point in points {
        let climate_zone = samples
            .iter()
            .find(|s| s.region == point.region)
            .map(|s| s.climate_zone.clone())
            .ok_or_else(|| {
                SynthError::Integrity(format!(
                    "projected region '{}' has no historical samples",
                    point.region
                ))
            })?;

        rows.push(SeriesRow {
            region: point.region.clone(),
            climate_zone,
            year: point.year,
            concentrations: None,
            sustainability_score: point.projected_score,
            quality: None,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::classify_quality;
    use approx::assert_relative_eq;

    fn sample(region: &str, year: i32, score: f64) -> SoilSample {
        SoilSample {
            region: region.to_string(),
            climate_zone: "Temperate".to_string(),
            year,
            concentrations: vec![50.0, 60.0],
            sustainability_score: score,
            quality: classify_quality(score),
        }
    }

    #[test]
    fn test_linear_series_extrapolates() {
        let samples = vec![
            sample("East", 2023, 70.0),
            sample("East", 2024, 72.0),
            sample("East", 2025, 74.0),
        ];
        let points = project_trends(&samples, &[2026, 2027]).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, 2026);
        assert_relative_eq!(points[0].projected_score, 76.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].projected_score, 78.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projects_from_last_score_not_fitted_line() {
        // Slope 2.0, but the last observation sits below the fitted line
        let samples = vec![
            sample("West", 2023, 70.0),
            sample("West", 2024, 75.0),
            sample("West", 2025, 74.0),
        ];
        let points = project_trends(&samples, &[2026]).unwrap();
        assert_relative_eq!(points[0].projected_score, 76.0, epsilon = 1e-9);
    }

    #[test]
    fn test_regions_fit_independently_from_unsorted_input() {
        let samples = vec![
            sample("North", 2025, 60.0),
            sample("South", 2024, 80.0),
            sample("North", 2024, 62.0),
            sample("South", 2025, 81.0),
        ];
        let trends = fit_trends(&samples);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].region, "North");
        assert_relative_eq!(trends[0].slope, -2.0, epsilon = 1e-9);
        assert_eq!(trends[0].last_year, 2025);
        assert_relative_eq!(trends[1].slope, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_point_is_flat() {
        let samples = vec![sample("Central", 2025, 66.5)];
        let points = project_trends(&samples, &[2026, 2028]).unwrap();
        assert!(points.iter().all(|p| p.projected_score == 66.5));
    }

    #[test]
    fn test_rejects_past_projection_year() {
        let samples = vec![sample("East", 2024, 70.0), sample("East", 2025, 71.0)];
        assert!(project_trends(&samples, &[2025]).is_err());
    }

    #[test]
    fn test_rejects_unordered_or_repeated_projection_years() {
        let samples = vec![sample("East", 2024, 70.0), sample("East", 2025, 71.0)];
        for years in [&[2027, 2026][..], &[2026, 2026][..], &[2027, 2026, 2026][..]] {
            let err = project_trends(&samples, years).unwrap_err();
            assert!(
                matches!(&err, SynthError::Config { field, .. } if field == "projection_years"),
                "{:?} accepted: {}",
                years,
                err
            );
        }
        assert_eq!(project_trends(&samples, &[2026, 2030]).unwrap().len(), 2);
    }

    #[test]
    fn test_forecast_for_unknown_region_is_rejected() {
        let samples = vec![sample("East", 2024, 70.0), sample("East", 2025, 72.0)];
        let points = vec![ForecastPoint {
            region: "Atlantis".to_string(),
            year: 2026,
            projected_score: 70.0,
        }];
        assert!(matches!(
            extend_with_forecast(&samples, &points),
            Err(SynthError::Integrity(_))
        ));
    }

    #[test]
    fn test_projected_rows_leave_nutrients_and_tier_unset() {
        let samples = vec![sample("East", 2024, 70.0), sample("East", 2025, 72.0)];
        let points = project_trends(&samples, &[2026]).unwrap();
        let rows = extend_with_forecast(&samples, &points).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(!rows[1].is_projected());
        assert_eq!(rows[1].quality, Some(classify_quality(72.0)));

        let projected = &rows[2];
        assert!(projected.is_projected());
        assert_eq!(projected.quality, None);
        assert_eq!(projected.climate_zone, "Temperate");
        assert_relative_eq!(projected.sustainability_score, 74.0, epsilon = 1e-9);
    }
}
