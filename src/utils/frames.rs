//! Typed rows ↔ Polars DataFrames
//!
//! Column names and order here are the interface to the dashboard layer;
//! renaming or reordering any of them is a breaking change.

use crate::error::{Result, SynthError};
use crate::types::{CropYieldRecord, NutrientEdge, SeriesRow, SoilSample};
use polars::prelude::*;

pub const INTERACTION_COLUMNS: [&str; 4] = ["source_nutrient", "target_nutrient", "effect_type", "weight"];

/// Leading soil columns; nutrient columns follow, then `SOIL_TRAILING_COLUMNS`.
pub const SOIL_LEADING_COLUMNS: [&str; 3] = ["region", "climate_zone", "year"];
pub const SOIL_TRAILING_COLUMNS: [&str; 2] = ["sustainability_score", "soil_quality"];

pub const YIELD_COLUMNS: [&str; 7] = [
    "region",
    "climate_zone",
    "year",
    "crop_type",
    "yield_kg_per_hectare",
    "soil_sustainability_score",
    "crop_health",
];

/// Full ordered soil column list for a nutrient vocabulary.
pub fn soil_columns(nutrients: &[String]) -> Vec<String> {
    SOIL_LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(nutrients.iter().cloned())
        .chain(SOIL_TRAILING_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

pub fn interactions_frame(edges: &[NutrientEdge]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(INTERACTION_COLUMNS[0].into(), edges.iter().map(|e| e.source.as_str()).collect::<Vec<_>>()),
        Column::new(INTERACTION_COLUMNS[1].into(), edges.iter().map(|e| e.target.as_str()).collect::<Vec<_>>()),
        Column::new(INTERACTION_COLUMNS[2].into(), edges.iter().map(|e| e.effect.as_str()).collect::<Vec<_>>()),
        Column::new(INTERACTION_COLUMNS[3].into(), edges.iter().map(|e| e.weight).collect::<Vec<_>>()),
    ];
    Ok(DataFrame::new(columns)?)
}

pub fn soil_frame(samples: &[SoilSample], nutrients: &[String]) -> Result<DataFrame> {
    let rows: Vec<SeriesRow> = samples.iter().map(SeriesRow::from).collect();
    series_frame(&rows, nutrients)
}

/// Soil-schema frame where projected rows carry null nutrient and tier cells.
pub fn series_frame(rows: &[SeriesRow], nutrients: &[String]) -> Result<DataFrame> {
    if let Some(row) = rows
        .iter()
        .find(|r| r.concentrations.as_ref().is_some_and(|c| c.len() != nutrients.len()))
    {
        return Err(SynthError::Integrity(format!(
            "row for region '{}' in year {} does not match the {}-nutrient vocabulary",
            row.region,
            row.year,
            nutrients.len()
        )));
    }

    let mut columns = Vec::with_capacity(nutrients.len() + 5);
    columns.push(Column::new("region".into(), rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>()));
    columns.push(Column::new("climate_zone".into(), rows.iter().map(|r| r.climate_zone.as_str()).collect::<Vec<_>>()));
    columns.push(Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<i32>>()));

    for (idx, nutrient) in nutrients.iter().enumerate() {
        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|r| r.concentrations.as_ref().map(|c| c[idx]))
            .collect();
        columns.push(Column::new(nutrient.as_str().into(), values));
    }

    columns.push(Column::new(
        "sustainability_score".into(),
        rows.iter().map(|r| r.sustainability_score).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "soil_quality".into(),
        rows.iter().map(|r| r.quality.map(|q| q.as_str())).collect::<Vec<Option<&str>>>(),
    ));

    Ok(DataFrame::new(columns)?)
}

pub fn yields_frame(records: &[CropYieldRecord]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(YIELD_COLUMNS[0].into(), records.iter().map(|r| r.region.as_str()).collect::<Vec<_>>()),
        Column::new(YIELD_COLUMNS[1].into(), records.iter().map(|r| r.climate_zone.as_str()).collect::<Vec<_>>()),
        Column::new(YIELD_COLUMNS[2].into(), records.iter().map(|r| r.year).collect::<Vec<i32>>()),
        Column::new(YIELD_COLUMNS[3].into(), records.iter().map(|r| r.crop.as_str()).collect::<Vec<_>>()),
        Column::new(YIELD_COLUMNS[4].into(), records.iter().map(|r| r.yield_kg_per_hectare).collect::<Vec<_>>()),
        Column::new(YIELD_COLUMNS[5].into(), records.iter().map(|r| r.soil_sustainability_score).collect::<Vec<_>>()),
        Column::new(YIELD_COLUMNS[6].into(), records.iter().map(|r| r.health.as_str()).collect::<Vec<_>>()),
    ];
    Ok(DataFrame::new(columns)?)
}

// ============================================================================
// Column extraction (loaded frames)
// ============================================================================

/// Fail unless the frame's columns are exactly `expected`, in order.
pub fn require_columns(df: &DataFrame, expected: &[String], table: &str) -> Result<()> {
    let actual: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    if actual != expected {
        return Err(SynthError::Integrity(format!(
            "{}: expected columns {:?}, found {:?}",
            table, expected, actual
        )));
    }
    Ok(())
}

pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| v.map(str::to_string).ok_or_else(|| null_cell(name, idx)))
        .collect()
}

pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    column
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| v.ok_or_else(|| null_cell(name, idx)))
        .collect()
}

pub fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<i32>> {
    let column = df.column(name)?.cast(&DataType::Int32)?;
    column
        .i32()?
        .into_iter()
        .enumerate()
        .map(|(idx, v)| v.ok_or_else(|| null_cell(name, idx)))
        .collect()
}

fn null_cell(column: &str, row: usize) -> SynthError {
    SynthError::Integrity(format!("null value in column '{}' at row {}", column, row))
}
