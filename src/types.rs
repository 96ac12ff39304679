//! Core records flowing through the zoning pipeline.
//!
//! Transects are read-only input. Candidates are produced by the grouper and
//! consumed by the filter; zones are the terminal output.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Transect
// ============================================================================

/// One cross-shore measurement point along a coastline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transect {
    /// 0-based ordinal; adjacency is defined by consecutive values.
    pub position_index: usize,
    /// Along-shore chainage in meters (non-decreasing along the feed).
    pub along_distance_m: f64,
    /// Shoreline change rate, negative = erosion.
    pub trend_m_per_year: Option<f64>,
    pub r2_score: Option<f64>,
    pub rmse_m: Option<f64>,
    pub beach_slope: Option<f64>,

    /// Identifier from the source feed (e.g. "aus0001-0003").
    #[serde(default)]
    pub transect_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,

    // Secondary regression statistics, aggregated but never classified on
    #[serde(default)]
    pub mae_m: Option<f64>,
    #[serde(default)]
    pub ci_lower: Option<f64>,
    #[serde(default)]
    pub ci_upper: Option<f64>,
    #[serde(default)]
    pub orientation_deg: Option<f64>,
}

impl Transect {
    /// Transect with only the mandatory fields set.
    pub fn new(position_index: usize, along_distance_m: f64) -> Self {
        Self {
            position_index,
            along_distance_m,
            trend_m_per_year: None,
            r2_score: None,
            rmse_m: None,
            beach_slope: None,
            transect_id: None,
            site_id: None,
            mae_m: None,
            ci_lower: None,
            ci_upper: None,
            orientation_deg: None,
        }
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend_m_per_year = Some(trend);
        self
    }

    pub fn with_r2(mut self, r2: f64) -> Self {
        self.r2_score = Some(r2);
        self
    }

    pub fn with_rmse(mut self, rmse: f64) -> Self {
        self.rmse_m = Some(rmse);
        self
    }

    pub fn with_slope(mut self, slope: f64) -> Self {
        self.beach_slope = Some(slope);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.transect_id = Some(id.into());
        self
    }

    /// Identifier used in reports; falls back to the position index.
    pub fn display_id(&self) -> String {
        self.transect_id
            .clone()
            .unwrap_or_else(|| self.position_index.to_string())
    }
}

// ============================================================================
// Zone categories
// ============================================================================

/// Behavioral classification of a transect or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneCategory {
    RapidErosion,
    ModerateErosion,
    RapidAccretion,
    ModerateAccretion,
    HighUncertainty,
    SteepBeach,
    LowEnergy,
    Stable,
    NoData,
}

impl ZoneCategory {
    pub const ALL: [ZoneCategory; 9] = [
        ZoneCategory::RapidErosion,
        ZoneCategory::ModerateErosion,
        ZoneCategory::RapidAccretion,
        ZoneCategory::ModerateAccretion,
        ZoneCategory::HighUncertainty,
        ZoneCategory::SteepBeach,
        ZoneCategory::LowEnergy,
        ZoneCategory::Stable,
        ZoneCategory::NoData,
    ];

    /// Snake-case key, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneCategory::RapidErosion => "rapid_erosion",
            ZoneCategory::ModerateErosion => "moderate_erosion",
            ZoneCategory::RapidAccretion => "rapid_accretion",
            ZoneCategory::ModerateAccretion => "moderate_accretion",
            ZoneCategory::HighUncertainty => "high_uncertainty",
            ZoneCategory::SteepBeach => "steep_beach",
            ZoneCategory::LowEnergy => "low_energy",
            ZoneCategory::Stable => "stable",
            ZoneCategory::NoData => "no_data",
        }
    }

    /// Whether zones of this category carry a meaningful shoreline change rate.
    pub fn has_rate(&self) -> bool {
        matches!(
            self,
            ZoneCategory::RapidErosion
                | ZoneCategory::ModerateErosion
                | ZoneCategory::RapidAccretion
                | ZoneCategory::ModerateAccretion
        )
    }
}

impl fmt::Display for ZoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transect paired with its classification.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedTransect<'a> {
    pub transect: &'a Transect,
    pub category: ZoneCategory,
}

// ============================================================================
// Candidates and zones
// ============================================================================

/// Maximal run of consecutive transects sharing one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCandidate {
    pub category: ZoneCategory,
    pub start_index: usize,
    /// Inclusive.
    pub end_index: usize,
    pub transect_count: usize,
}

impl ZoneCandidate {
    pub(crate) fn open(category: ZoneCategory, index: usize) -> Self {
        Self {
            category,
            start_index: index,
            end_index: index,
            transect_count: 1,
        }
    }

    pub(crate) fn extend_to(&mut self, index: usize) {
        self.end_index = index;
        self.transect_count += 1;
    }
}

/// Secondary statistics over a zone's members. `None` where no member has the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub avg_beach_slope: Option<f64>,
    pub avg_r2: Option<f64>,
    pub max_trend: Option<f64>,
    pub min_trend: Option<f64>,
    pub avg_rmse: Option<f64>,
    pub avg_mae: Option<f64>,
    pub avg_ci_lower: Option<f64>,
    pub avg_ci_upper: Option<f64>,
    pub avg_orientation: Option<f64>,
}

/// Retained zone with aggregated statistics and narrative text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub zone_name: String,
    pub category: ZoneCategory,
    pub start_index: usize,
    pub end_index: usize,
    pub transect_count: usize,
    pub start_along_distance_m: f64,
    pub end_along_distance_m: f64,
    pub length_km: f64,
    pub mean_trend_m_per_year: Option<f64>,
    pub start_transect_id: String,
    pub end_transect_id: String,
    pub transect_ids: Vec<String>,
    pub statistics: ZoneStatistics,
    pub narrative_text: String,
}

impl Zone {
    /// The candidate this zone was aggregated from.
    pub fn candidate(&self) -> ZoneCandidate {
        ZoneCandidate {
            category: self.category,
            start_index: self.start_index,
            end_index: self.end_index,
            transect_count: self.transect_count,
        }
    }
}
