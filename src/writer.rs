//! Table persistence
//!
//! The three tables are committed together: each is first written to a
//! `.tmp` sibling, and only when all three are on disk are they renamed into
//! place. Any failure removes whatever was staged or committed, so a reader
//! never sees a mix of old and new tables from one run.

use crate::dataset::Dataset;
use crate::error::{Result, SynthError};
use crate::utils::frames::{interactions_frame, soil_frame, yields_frame};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const INTERACTIONS_FILE: &str = "nutrient_interactions.csv";
pub const SOIL_FILE: &str = "soil_samples.csv";
pub const YIELDS_FILE: &str = "crop_yields.csv";
pub const FORECAST_FILE: &str = "soil_forecast.csv";

/// Final paths of a committed run.
#[derive(Debug, Clone)]
pub struct WrittenTables {
    pub interactions: PathBuf,
    pub soil_samples: PathBuf,
    pub crop_yields: PathBuf,
}

/// Write one frame as comma-delimited CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| SynthError::io(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    file.sync_all().map_err(|e| SynthError::io(path, e))?;
    Ok(())
}

/// Write all three tables into `dir`, all or nothing.
pub fn write_tables(dataset: &Dataset, dir: &Path) -> Result<WrittenTables> {
    fs::create_dir_all(dir).map_err(|e| SynthError::io(dir, e))?;

    let mut tables = vec![
        (INTERACTIONS_FILE, interactions_frame(&dataset.interactions)?),
        (SOIL_FILE, soil_frame(&dataset.soil_samples, &dataset.nutrients)?),
        (YIELDS_FILE, yields_frame(&dataset.crop_yields)?),
    ];

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(tables.len());
    for (name, df) in tables.iter_mut() {
        let name: &str = *name;
        let target = dir.join(name);
        let tmp = dir.join(format!("{}.tmp", name));

        if let Err(err) = write_csv(df, &tmp) {
            discard(staged.iter().map(|(tmp, _)| tmp.as_path()).chain([tmp.as_path()]));
            return Err(err);
        }
        tracing::debug!("Staged {} ({} rows)", tmp.display(), df.height());
        staged.push((tmp, target));
    }

    for (idx, (tmp, target)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(tmp, target) {
            // Roll back: committed targets before idx, staged files from idx on
            discard(
                staged[..idx]
                    .iter()
                    .map(|(_, target)| target.as_path())
                    .chain(staged[idx..].iter().map(|(tmp, _)| tmp.as_path())),
            );
            return Err(SynthError::io(target, err));
        }
    }

    tracing::info!(
        "Wrote {} edges, {} soil samples, {} yield records to {}",
        dataset.interactions.len(),
        dataset.soil_samples.len(),
        dataset.crop_yields.len(),
        dir.display()
    );

    Ok(WrittenTables {
        interactions: dir.join(INTERACTIONS_FILE),
        soil_samples: dir.join(SOIL_FILE),
        crop_yields: dir.join(YIELDS_FILE),
    })
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;

    #[test]
    fn test_writes_three_tables_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let written = write_tables(&dataset, dir.path()).unwrap();

        assert!(written.interactions.exists());
        assert!(written.soil_samples.exists());
        assert!(written.crop_yields.exists());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let header = fs::read_to_string(&written.crop_yields).unwrap();
        assert!(header.starts_with(
            "region,climate_zone,year,crop_type,yield_kg_per_hectare,soil_sustainability_score,crop_health\n"
        ));
    }

    #[test]
    fn test_failed_commit_leaves_no_tables_behind() {
        let dir = tempfile::tempdir().unwrap();
        // Staging succeeds, but the last rename hits a directory
        fs::create_dir(dir.path().join(YIELDS_FILE)).unwrap();

        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let err = write_tables(&dataset, dir.path()).unwrap_err();
        assert!(matches!(err, SynthError::Io { .. }));

        assert!(!dir.path().join(INTERACTIONS_FILE).exists());
        assert!(!dir.path().join(SOIL_FILE).exists());
        assert!(dir.path().join(YIELDS_FILE).is_dir());

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![YIELDS_FILE.to_string()]);
    }

    #[test]
    fn test_unwritable_directory_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "occupied").unwrap();

        let dataset = Dataset::generate(&DatasetConfig::default()).unwrap();
        let err = write_tables(&dataset, &blocker).unwrap_err();
        assert!(matches!(err, SynthError::Io { .. }));
    }
}
