//! Transect feeds.
//!
//! Loaders turn a geospatial store into the ordered `Vec<Transect>` the engine
//! consumes. Both loaders filter to one site, order by transect id and assign
//! `position_index` by that order.

pub mod geojson;
pub mod table;

use crate::error::ZoningError;
use crate::types::Transect;
use anyhow::Result;
use std::cmp::Ordering;
use std::path::Path;

/// Transect id as read from the feed. Numeric ids order numerically.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FeedId {
    Number(f64),
    Text(String),
}

impl FeedId {
    /// Numbers before text; no id sorts first.
    fn compare(a: &Option<FeedId>, b: &Option<FeedId>) -> Ordering {
        match (a, b) {
            (Some(FeedId::Number(x)), Some(FeedId::Number(y))) => x.total_cmp(y),
            (Some(FeedId::Text(x)), Some(FeedId::Text(y))) => x.cmp(y),
            (Some(FeedId::Number(_)), Some(FeedId::Text(_))) => Ordering::Less,
            (Some(FeedId::Text(_)), Some(FeedId::Number(_))) => Ordering::Greater,
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        }
    }

    fn into_text(self) -> String {
        match self {
            FeedId::Number(n) => n.to_string(),
            FeedId::Text(s) => s,
        }
    }
}

/// One feed row before ordering.
#[derive(Debug, Clone, Default)]
pub(crate) struct FeedRecord {
    pub id: Option<FeedId>,
    pub site_id: Option<String>,
    pub along_dist: Option<f64>,
    pub trend: Option<f64>,
    pub r2_score: Option<f64>,
    pub rmse: Option<f64>,
    pub beach_slope: Option<f64>,
    pub mae: Option<f64>,
    pub cil: Option<f64>,
    pub ciu: Option<f64>,
    pub orientation: Option<f64>,
}

/// Sort records by id and number them. Stable sort keeps feed order for equal ids.
pub(crate) fn order_records(mut records: Vec<FeedRecord>) -> Result<Vec<Transect>, ZoningError> {
    records.sort_by(|a, b| FeedId::compare(&a.id, &b.id));

    records
        .into_iter()
        .enumerate()
        .map(|(position_index, r)| {
            let along_distance_m = r.along_dist.ok_or_else(|| {
                ZoningError::validation(position_index, "along_distance_m", "is missing (`along_dist`)")
            })?;
            Ok(Transect {
                position_index,
                along_distance_m,
                trend_m_per_year: r.trend,
                r2_score: r.r2_score,
                rmse_m: r.rmse,
                beach_slope: r.beach_slope,
                transect_id: r.id.map(FeedId::into_text),
                site_id: r.site_id,
                mae_m: r.mae,
                ci_lower: r.cil,
                ci_upper: r.ciu,
                orientation_deg: r.orientation,
            })
        })
        .collect()
}

/// Pick a loader by file extension (`.csv`, `.parquet`, anything else as GeoJSON).
pub fn load_site_transects(path: &Path, site_id: &str) -> Result<Vec<Transect>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") | Some("parquet") => table::load_site_transects(path, site_id),
        _ => geojson::load_site_transects(path, site_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, along: Option<f64>) -> FeedRecord {
        FeedRecord {
            id: Some(FeedId::Text(id.to_string())),
            along_dist: along,
            ..FeedRecord::default()
        }
    }

    #[test]
    fn test_order_records_numbers_by_id() {
        let transects = order_records(vec![
            record("b", Some(10.0)),
            record("c", Some(20.0)),
            record("a", Some(0.0)),
        ])
        .unwrap();
        let ids: Vec<_> = transects.iter().map(|t| t.display_id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(transects[2].position_index, 2);
        assert_eq!(transects[2].along_distance_m, 20.0);
    }

    #[test]
    fn test_numeric_ids_order_numerically() {
        let records = [10.0, 2.0, 11.0, 1.0]
            .into_iter()
            .map(|n| FeedRecord {
                id: Some(FeedId::Number(n)),
                along_dist: Some(n * 100.0),
                ..FeedRecord::default()
            })
            .collect();
        let transects = order_records(records).unwrap();
        let ids: Vec<_> = transects.iter().map(|t| t.display_id()).collect();
        assert_eq!(ids, vec!["1", "2", "10", "11"]);
        assert!(crate::engine::validate(&transects).is_ok());
    }

    #[test]
    fn test_order_records_requires_along_dist() {
        let err = order_records(vec![record("a", Some(0.0)), record("b", None)]).unwrap_err();
        assert!(matches!(
            err,
            ZoningError::Validation { position_index: 1, field: "along_distance_m", .. }
        ));
    }
}
