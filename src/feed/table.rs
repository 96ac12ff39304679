//! Tabular transect feed (CSV or Parquet) loaded with Polars.
//!
//! Columns: `id`, `site_id`, `along_dist` and the optional `trend`, `r2_score`,
//! `rmse`, `beach_slope`, `mae`, `cil`, `ciu`, `orientation`. Optional columns
//! that are missing from the file read as all-null.

use crate::feed::{order_records, FeedId, FeedRecord};
use crate::types::Transect;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"))
}

/// Read the whole table.
fn read_table(path: &Path) -> Result<DataFrame> {
    if is_parquet(path) {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {:?}", path))?
            .collect()
            .with_context(|| format!("Failed to load transects parquet: {:?}", path))
    } else {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load transects CSV: {:?}", path))
    }
}

/// Column as text, or all-null when absent.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    match df.column(name) {
        Ok(column) => {
            let column = column.cast(&DataType::String)?;
            Ok(column
                .str()?
                .into_iter()
                .map(|opt| opt.map(str::to_string))
                .collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

/// Column as f64, or all-null when absent. NaN cells read as null.
fn number_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    match df.column(name) {
        Ok(column) => {
            let column = column.cast(&DataType::Float64)?;
            Ok(column
                .f64()?
                .into_iter()
                .map(|opt| opt.filter(|v| !v.is_nan()))
                .collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

/// The `id` column. String ids stay text; any other type reads as a number.
fn id_column(df: &DataFrame) -> Result<Vec<Option<FeedId>>> {
    match df.column("id") {
        Ok(column) if column.dtype() == &DataType::String => Ok(text_column(df, "id")?
            .into_iter()
            .map(|opt| opt.map(FeedId::Text))
            .collect()),
        Ok(_) => Ok(number_column(df, "id")?
            .into_iter()
            .map(|opt| opt.map(FeedId::Number))
            .collect()),
        Err(_) => Ok(vec![None; df.height()]),
    }
}

/// Rows of `df` belonging to `site_id`, in table order.
pub fn site_records(df: &DataFrame, site_id: &str) -> Result<Vec<Transect>> {
    let site_column = df
        .column("site_id")
        .context("Transect table has no `site_id` column")?
        .cast(&DataType::String)?;
    let mask: BooleanChunked = site_column
        .str()?
        .into_iter()
        .map(|opt| opt.map_or(false, |s| s == site_id))
        .collect();
    let site = df.filter(&mask)?;

    let ids = id_column(&site)?;
    let sites = text_column(&site, "site_id")?;
    let along = number_column(&site, "along_dist")?;
    let trend = number_column(&site, "trend")?;
    let r2 = number_column(&site, "r2_score")?;
    let rmse = number_column(&site, "rmse")?;
    let slope = number_column(&site, "beach_slope")?;
    let mae = number_column(&site, "mae")?;
    let cil = number_column(&site, "cil")?;
    let ciu = number_column(&site, "ciu")?;
    let orientation = number_column(&site, "orientation")?;

    let records: Vec<FeedRecord> = (0..site.height())
        .map(|i| FeedRecord {
            id: ids[i].clone(),
            site_id: sites[i].clone(),
            along_dist: along[i],
            trend: trend[i],
            r2_score: r2[i],
            rmse: rmse[i],
            beach_slope: slope[i],
            mae: mae[i],
            cil: cil[i],
            ciu: ciu[i],
            orientation: orientation[i],
        })
        .collect();

    Ok(order_records(records)?)
}

/// Load one site's transects from a CSV or Parquet table.
pub fn load_site_transects(path: &Path, site_id: &str) -> Result<Vec<Transect>> {
    let df = read_table(path)?;
    tracing::debug!(path = %path.display(), rows = df.height(), "Loaded transect table");

    site_records(&df, site_id)
        .with_context(|| format!("Failed to load transects for site '{}' from {:?}", site_id, path))
}
