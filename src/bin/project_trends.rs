//! Project regional sustainability trends from a written soil table
//!
//! Reads the tables under DATA_DIR, fits a linear trend per region, and
//! writes soil_forecast.csv: the historical series followed by projected
//! rows whose nutrient and quality cells are empty.
//!
//! Usage:
//!   cargo run --bin project_trends

use soil_synth_rust::config::ENV_CONFIG;
use soil_synth_rust::utils::frames::series_frame;
use soil_synth_rust::writer::{write_csv, FORECAST_FILE};
use soil_synth_rust::{
    extend_with_forecast, fit_trends, project_trends, verify_dataset, DatasetConfig, TableData,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil_synth_rust=info,project_trends=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match std::env::var(ENV_CONFIG) {
        Ok(path) => DatasetConfig::load(Path::new(&path))?,
        Err(_) => DatasetConfig::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;

    let dataset = TableData::load(&config.output_dir)?.to_dataset()?;
    let report = verify_dataset(&dataset, &config.distributions)?;
    tracing::info!(
        "Verified {} regions × {} years ({} yield rows)",
        report.regions,
        report.years,
        report.yield_rows
    );

    for trend in fit_trends(&dataset.soil_samples) {
        tracing::info!(
            "  {:<10} slope {:>7.3}/yr from {:.2} in {}",
            trend.region,
            trend.slope,
            trend.last_score,
            trend.last_year
        );
    }

    let points = project_trends(&dataset.soil_samples, &config.projection_years)?;
    let rows = extend_with_forecast(&dataset.soil_samples, &points)?;
    let mut df = series_frame(&rows, &dataset.nutrients)?;

    let path = config.output_dir.join(FORECAST_FILE);
    write_csv(&mut df, &path)?;
    tracing::info!("Wrote {} ({} rows, {} projected)", path.display(), df.height(), points.len());

    Ok(())
}
