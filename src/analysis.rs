//! Site-level analysis report.
//!
//! Wraps one engine run into the JSON document consumed by the publication
//! templating layer.

use crate::classify::rules::ZoneDefinitions;
use crate::engine::ZoningEngine;
use crate::error::ZoningError;
use crate::types::{Transect, Zone, ZoneCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message reported for a site with no transects.
pub const NO_TRANSECTS_MESSAGE: &str = "No transects found for site";

/// Classification of a single transect, as reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransectClassification {
    pub transect_id: String,
    pub position_index: usize,
    pub along_distance_m: f64,
    pub trend_m_per_year: Option<f64>,
    pub zone_classification: ZoneCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    pub min_zone_length: usize,
}

/// Complete narrative zoning result for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub site_id: String,
    pub transect_count: usize,
    pub zone_count: usize,
    pub zones: Vec<Zone>,
    pub zone_type_distribution: BTreeMap<ZoneCategory, usize>,
    pub transects: Vec<TransectClassification>,
    pub zone_definitions_used: ZoneDefinitions,
    pub analysis_parameters: AnalysisParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SiteAnalysis {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Compact JSON (no whitespace).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Run the engine over one site's transects and build the report.
///
/// An empty feed is not an error: the report carries
/// [`NO_TRANSECTS_MESSAGE`] in `error` and no zones.
pub fn analyze_site(
    engine: &ZoningEngine,
    site_id: &str,
    transects: &[Transect],
) -> Result<SiteAnalysis, ZoningError> {
    let config = engine.config();
    let parameters = AnalysisParameters {
        min_zone_length: config.min_zone_length,
    };

    if transects.is_empty() {
        tracing::warn!(site_id, "{}", NO_TRANSECTS_MESSAGE);
        return Ok(SiteAnalysis {
            site_id: site_id.to_string(),
            transect_count: 0,
            zone_count: 0,
            zones: Vec::new(),
            zone_type_distribution: BTreeMap::new(),
            transects: Vec::new(),
            zone_definitions_used: config.definitions.clone(),
            analysis_parameters: parameters,
            error: Some(NO_TRANSECTS_MESSAGE.to_string()),
        });
    }

    let run = engine.run(Some(site_id), transects)?;

    let mut zone_type_distribution = BTreeMap::new();
    for zone in &run.zones {
        *zone_type_distribution.entry(zone.category).or_insert(0) += 1;
    }

    let classifications = transects
        .iter()
        .zip(&run.categories)
        .map(|(t, &category)| TransectClassification {
            transect_id: t.display_id(),
            position_index: t.position_index,
            along_distance_m: t.along_distance_m,
            trend_m_per_year: t.trend_m_per_year,
            zone_classification: category,
        })
        .collect();

    Ok(SiteAnalysis {
        site_id: site_id.to_string(),
        transect_count: transects.len(),
        zone_count: run.zones.len(),
        zones: run.zones,
        zone_type_distribution,
        transects: classifications,
        zone_definitions_used: config.definitions.clone(),
        analysis_parameters: parameters,
        error: None,
    })
}
