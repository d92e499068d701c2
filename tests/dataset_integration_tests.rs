//! Dataset Integration Tests
//!
//! Runs the full pipeline against temporary directories: generate, write,
//! reload, verify, and project.

use approx::assert_relative_eq;
use soil_synth_rust::data::read_csv;
use soil_synth_rust::utils::frames::series_frame;
use soil_synth_rust::utils::{classify_health, classify_quality};
use soil_synth_rust::writer::{write_csv, FORECAST_FILE, INTERACTIONS_FILE, SOIL_FILE, YIELDS_FILE};
use soil_synth_rust::{
    extend_with_forecast, project_trends, write_tables, CropHealth, Dataset, DatasetConfig, DistributionParams,
    SoilQuality, SoilSample, TableData,
};
use std::fs;
use std::path::Path;

fn generate_into(dir: &Path, seed: u64) -> Dataset {
    let config = DatasetConfig {
        seed,
        output_dir: dir.to_path_buf(),
        ..DatasetConfig::default()
    };
    let dataset = Dataset::generate(&config).expect("generation failed");
    write_tables(&dataset, &config.output_dir).expect("write failed");
    dataset
}

#[test]
fn test_written_tables_reload_and_verify() {
    let dir = tempfile::tempdir().unwrap();
    let generated = generate_into(dir.path(), 42);

    let tables = TableData::load(dir.path()).unwrap();
    let report = tables.verify_integrity(&DistributionParams::default()).unwrap();

    assert_eq!(report.nutrients, 11);
    assert_eq!(report.soil_rows, 11 * 5);
    assert_eq!(report.yield_rows, 11 * 5 * 5);
    assert!(report.edges <= 11 * 10);
    assert_eq!(report.edges, generated.interactions.len());

    let loaded = tables.to_dataset().unwrap();
    assert_eq!(loaded.nutrients, generated.nutrients);
    for (a, b) in loaded.soil_samples.iter().zip(&generated.soil_samples) {
        assert_eq!((a.region.as_str(), a.year), (b.region.as_str(), b.year));
        assert_relative_eq!(a.sustainability_score, b.sustainability_score, epsilon = 1e-9);
        assert_eq!(a.quality, b.quality);
    }
}

#[test]
fn test_join_holds_in_persisted_tables() {
    let dir = tempfile::tempdir().unwrap();
    generate_into(dir.path(), 11);

    let loaded = TableData::load(dir.path()).unwrap().to_dataset().unwrap();
    for record in &loaded.crop_yields {
        let matches: Vec<&SoilSample> = loaded
            .soil_samples
            .iter()
            .filter(|s| s.region == record.region && s.year == record.year)
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(record.soil_sustainability_score, matches[0].sustainability_score);
    }
}

#[test]
fn test_same_seed_writes_identical_bytes() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    generate_into(first.path(), 42);
    generate_into(second.path(), 42);

    for name in [INTERACTIONS_FILE, SOIL_FILE, YIELDS_FILE] {
        let a = fs::read(first.path().join(name)).unwrap();
        let b = fs::read(second.path().join(name)).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

#[test]
fn test_different_seed_writes_different_tables() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    generate_into(first.path(), 42);
    generate_into(second.path(), 7);

    let a = fs::read(first.path().join(SOIL_FILE)).unwrap();
    let b = fs::read(second.path().join(SOIL_FILE)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_soil_header_matches_dashboard_schema() {
    let dir = tempfile::tempdir().unwrap();
    generate_into(dir.path(), 42);

    let soil = fs::read_to_string(dir.path().join(SOIL_FILE)).unwrap();
    let header = soil.lines().next().unwrap();
    assert_eq!(
        header,
        "region,climate_zone,year,N,P,K,Ca,Mg,Fe,Zn,Cu,Mn,B,Mo,sustainability_score,soil_quality"
    );

    let edges = fs::read_to_string(dir.path().join(INTERACTIONS_FILE)).unwrap();
    assert_eq!(edges.lines().next().unwrap(), "source_nutrient,target_nutrient,effect_type,weight");
}

#[test]
fn test_tier_boundaries() {
    assert_eq!(classify_quality(60.00), SoilQuality::Medium);
    assert_eq!(classify_quality(79.999), SoilQuality::Medium);
    assert_eq!(classify_quality(80.00), SoilQuality::High);
    assert_eq!(classify_health(3500.00), CropHealth::Moderate);
    assert_eq!(classify_health(6000.00), CropHealth::Excellent);
}

#[test]
fn test_forecast_table_leaves_projected_cells_empty() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = generate_into(dir.path(), 42);

    let points = project_trends(&dataset.soil_samples, &[2026, 2027, 2028]).unwrap();
    assert_eq!(points.len(), 5 * 3);

    let rows = extend_with_forecast(&dataset.soil_samples, &points).unwrap();
    let mut df = series_frame(&rows, &dataset.nutrients).unwrap();
    let path = dir.path().join(FORECAST_FILE);
    write_csv(&mut df, &path).unwrap();

    let reloaded = read_csv(&path).unwrap();
    assert_eq!(reloaded.height(), 55 + 15);
    assert_eq!(reloaded.column("N").unwrap().null_count(), 15);
    assert_eq!(reloaded.column("soil_quality").unwrap().null_count(), 15);
    assert_eq!(reloaded.column("sustainability_score").unwrap().null_count(), 0);
}

#[test]
fn test_reload_rejects_tables_from_wider_distributions() {
    let dir = tempfile::tempdir().unwrap();
    generate_into(dir.path(), 42);

    // Yields drawn from [2000, 8000] cannot satisfy a narrower range
    let narrow = DistributionParams {
        yield_min: 5000.0,
        ..DistributionParams::default()
    };
    let tables = TableData::load(dir.path()).unwrap();
    assert!(tables.verify_integrity(&DistributionParams::default()).is_ok());
    assert!(tables.verify_integrity(&narrow).is_err());
}
