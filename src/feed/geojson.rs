//! GeoJSON FeatureCollection feed.
//!
//! Expected feature properties: `id`, `site_id`, `along_dist`, and the optional
//! `trend`, `r2_score`, `rmse`, `beach_slope`, `mae`, `cil`, `ciu`,
//! `orientation`. Geometry is ignored.

use crate::feed::{order_records, FeedId, FeedRecord};
use crate::types::Transect;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: TransectProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TransectProperties {
    id: Value,
    site_id: Option<String>,
    along_dist: Option<f64>,
    trend: Option<f64>,
    r2_score: Option<f64>,
    rmse: Option<f64>,
    beach_slope: Option<f64>,
    mae: Option<f64>,
    cil: Option<f64>,
    ciu: Option<f64>,
    orientation: Option<f64>,
}

/// Read a JSON id, keeping numbers numeric for ordering.
fn feed_id(id: &Value) -> Option<FeedId> {
    match id {
        Value::Null => None,
        Value::String(s) => Some(FeedId::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(FeedId::Number),
        other => Some(FeedId::Text(other.to_string())),
    }
}

/// Parse a FeatureCollection document and return one site's transects.
pub fn parse_site_transects(json: &str, site_id: &str) -> Result<Vec<Transect>> {
    let collection: FeatureCollection =
        serde_json::from_str(json).context("Invalid GeoJSON FeatureCollection")?;

    let records: Vec<FeedRecord> = collection
        .features
        .into_iter()
        .map(|f| f.properties)
        .filter(|p| p.site_id.as_deref() == Some(site_id))
        .map(|p| FeedRecord {
            id: feed_id(&p.id),
            site_id: p.site_id,
            along_dist: p.along_dist,
            trend: p.trend,
            r2_score: p.r2_score,
            rmse: p.rmse,
            beach_slope: p.beach_slope,
            mae: p.mae,
            cil: p.cil,
            ciu: p.ciu,
            orientation: p.orientation,
        })
        .collect();

    let transects = order_records(records)?;
    tracing::debug!(site_id, transects = transects.len(), "Parsed GeoJSON transects");
    Ok(transects)
}

/// Load one site's transects from a GeoJSON file.
pub fn load_site_transects(path: &Path, site_id: &str) -> Result<Vec<Transect>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transects file: {:?}", path))?;

    parse_site_transects(&contents, site_id)
        .with_context(|| format!("Failed to load transects for site '{}' from {:?}", site_id, path))
}
