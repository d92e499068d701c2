//! Generate the three agronomic tables
//!
//! Usage:
//!   cargo run --bin generate_dataset
//!
//! Environment:
//!   SOIL_SYNTH_CONFIG  optional JSON config file
//!   SOIL_SYNTH_SEED    seed override
//!   DATA_DIR           output directory override (default: data)

use soil_synth_rust::config::ENV_CONFIG;
use soil_synth_rust::summary::{average_yields, nutrient_score_correlations};
use soil_synth_rust::{verify_dataset, write_tables, Dataset, DatasetConfig};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil_synth_rust=info,generate_dataset=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match std::env::var(ENV_CONFIG) {
        Ok(path) => {
            tracing::info!("Loading configuration: {}", path);
            DatasetConfig::load(Path::new(&path))?
        }
        Err(_) => DatasetConfig::default(),
    };
    config.apply_env_overrides()?;

    tracing::info!("Configuration:");
    tracing::info!("  Seed: {}", config.seed);
    tracing::info!("  Years: {}-{}", config.start_year, config.end_year);
    tracing::info!("  Regions: {}", config.regions.len());
    tracing::info!("  Crops: {}", config.crops.len());
    tracing::info!("  Output: {}", config.output_dir.display());

    let start = Instant::now();
    let dataset = Dataset::generate(&config)?;
    let report = verify_dataset(&dataset, &config.distributions)?;
    let written = write_tables(&dataset, &config.output_dir)?;

    println!("\n{}", "=".repeat(70));
    println!("DATASET WRITTEN ({:.1} ms)", start.elapsed().as_secs_f64() * 1000.0);
    println!("{}", "=".repeat(70));
    println!("  {:<28} {:>6} rows", written.interactions.display(), report.edges);
    println!("  {:<28} {:>6} rows", written.soil_samples.display(), report.soil_rows);
    println!("  {:<28} {:>6} rows", written.crop_yields.display(), report.yield_rows);

    println!("\nNutrient / sustainability correlation:");
    for corr in nutrient_score_correlations(&dataset.soil_samples, &dataset.nutrients) {
        match corr.correlation {
            Some(r) => println!("  {:<4} {:>6.2}", corr.nutrient, r),
            None => println!("  {:<4}    n/a", corr.nutrient),
        }
    }

    println!("\nAverage yield (kg/ha):");
    for avg in average_yields(&dataset.crop_yields)? {
        println!("  {:<10} {:<10} {:>9.2}", avg.region, avg.crop, avg.mean_yield_kg_per_hectare);
    }
    println!();

    Ok(())
}
