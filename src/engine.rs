//! Zoning pipeline: validate → classify → group → filter → aggregate → narrate.

use crate::classify::classifier::classify_all;
use crate::config::ZoningConfig;
use crate::error::ZoningError;
use crate::narrative::generator::NarrativeGenerator;
use crate::types::{Transect, Zone, ZoneCandidate, ZoneCategory};
use crate::zoning::{aggregate, filter_short_zones, group};

/// Site label used in zone names when the feed carries none.
pub const UNKNOWN_SITE: &str = "unknown_site";

/// Everything a run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct ZoningRun {
    /// Category of every input transect, in input order.
    pub categories: Vec<ZoneCategory>,
    /// All runs before filtering.
    pub candidates: Vec<ZoneCandidate>,
    /// Retained zones ordered by `start_index`.
    pub zones: Vec<Zone>,
}

/// Check the feed before any classification happens.
///
/// `position_index` must equal the record's offset (0-based, consecutive),
/// `along_distance_m` must be finite and non-decreasing, and any optional
/// feature that is present must be finite.
pub fn validate(transects: &[Transect]) -> Result<(), ZoningError> {
    let mut previous_distance: Option<f64> = None;

    for (offset, t) in transects.iter().enumerate() {
        if t.position_index != offset {
            return Err(ZoningError::validation(
                t.position_index,
                "position_index",
                format!("expected {} (indices must be 0-based and consecutive)", offset),
            ));
        }

        if !t.along_distance_m.is_finite() {
            return Err(ZoningError::validation(t.position_index, "along_distance_m", "is not finite"));
        }
        if let Some(prev) = previous_distance {
            if t.along_distance_m < prev {
                return Err(ZoningError::validation(
                    t.position_index,
                    "along_distance_m",
                    format!("decreases from {} to {}", prev, t.along_distance_m),
                ));
            }
        }
        previous_distance = Some(t.along_distance_m);

        let optional = [
            ("trend_m_per_year", t.trend_m_per_year),
            ("r2_score", t.r2_score),
            ("rmse_m", t.rmse_m),
            ("beach_slope", t.beach_slope),
            ("mae_m", t.mae_m),
            ("ci_lower", t.ci_lower),
            ("ci_upper", t.ci_upper),
            ("orientation_deg", t.orientation_deg),
        ];
        for (field, value) in optional {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ZoningError::validation(t.position_index, field, "is not finite"));
            }
        }
    }

    Ok(())
}

/// Narrative zone engine.
#[derive(Debug, Clone, Default)]
pub struct ZoningEngine {
    config: ZoningConfig,
}

impl ZoningEngine {
    pub fn new(config: ZoningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZoningConfig {
        &self.config
    }

    /// Zones for an unnamed feed.
    pub fn identify_zones(&self, transects: &[Transect]) -> Result<Vec<Zone>, ZoningError> {
        Ok(self.run(None, transects)?.zones)
    }

    /// Full run. Zone names use `site_id`, else the first transect's site, else
    /// [`UNKNOWN_SITE`].
    pub fn run(&self, site_id: Option<&str>, transects: &[Transect]) -> Result<ZoningRun, ZoningError> {
        validate(transects)?;

        let site = site_id
            .or_else(|| transects.first().and_then(|t| t.site_id.as_deref()))
            .unwrap_or(UNKNOWN_SITE);

        let classified = classify_all(transects, &self.config.definitions);
        let candidates = group(&classified);
        tracing::debug!(site, candidates = candidates.len(), "Grouped transects into runs");

        let retained = filter_short_zones(candidates.clone(), self.config.min_zone_length);

        let narrator = NarrativeGenerator::new(&self.config.definitions);
        let zones = retained
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let mut zone = aggregate(candidate, transects)?;
                zone.zone_name = format!("{}_{}_zone_{:02}", site, zone.category, i + 1);
                zone.narrative_text = narrator.narrate(&zone);
                Ok(zone)
            })
            .collect::<Result<Vec<Zone>, ZoningError>>()?;

        tracing::info!(
            site,
            transects = transects.len(),
            candidates = candidates.len(),
            zones = zones.len(),
            min_zone_length = self.config.min_zone_length,
            "Narrative zoning complete"
        );

        Ok(ZoningRun {
            categories: classified.iter().map(|c| c.category).collect(),
            candidates,
            zones,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(trends: &[Option<f64>]) -> Vec<Transect> {
        trends
            .iter()
            .enumerate()
            .map(|(i, &trend)| {
                let mut t = Transect::new(i, i as f64 * 100.0).with_r2(0.7).with_rmse(5.0).with_slope(0.06);
                t.trend_m_per_year = trend;
                t
            })
            .collect()
    }

    #[test]
    fn test_validate_rejects_gap_in_positions() {
        let mut transects = feed(&[Some(0.0); 4]);
        transects[2].position_index = 3;
        transects[3].position_index = 4;
        let err = validate(&transects).unwrap_err();
        assert!(matches!(
            err,
            ZoningError::Validation { position_index: 3, field: "position_index", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_decreasing_distance() {
        let mut transects = feed(&[Some(0.0); 3]);
        transects[2].along_distance_m = 50.0;
        let err = validate(&transects).unwrap_err();
        assert!(matches!(
            err,
            ZoningError::Validation { position_index: 2, field: "along_distance_m", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_nan_feature() {
        let mut transects = feed(&[Some(0.0); 3]);
        transects[1].beach_slope = Some(f64::NAN);
        let err = validate(&transects).unwrap_err();
        assert!(matches!(
            err,
            ZoningError::Validation { position_index: 1, field: "beach_slope", .. }
        ));
    }

    #[test]
    fn test_validate_allows_equal_distances_and_missing_features() {
        let mut transects = feed(&[None, Some(0.1), None]);
        transects[1].along_distance_m = 0.0;
        transects[1].r2_score = None;
        assert!(validate(&transects).is_ok());
    }

    #[test]
    fn test_invalid_feed_fails_before_classification() {
        let mut transects = feed(&[Some(-1.0); 5]);
        transects[4].along_distance_m = f64::INFINITY;
        assert!(ZoningEngine::default().identify_zones(&transects).is_err());
    }

    #[test]
    fn test_zone_names_and_ordering() {
        let trends: Vec<Option<f64>> = [-1.0, -1.0, -1.0, 0.0, 0.5, 0.5, 0.5, 0.5]
            .into_iter()
            .map(Some)
            .collect();
        let mut transects = feed(&trends);
        for t in &mut transects {
            t.site_id = Some("aus0001".to_string());
        }

        let run = ZoningEngine::default().run(None, &transects).unwrap();
        assert_eq!(run.categories.len(), 8);
        assert_eq!(run.candidates.len(), 3);
        assert_eq!(run.zones.len(), 2);
        assert_eq!(run.zones[0].zone_name, "aus0001_rapid_erosion_zone_01");
        assert_eq!(run.zones[1].zone_name, "aus0001_moderate_accretion_zone_02");
        assert!(run.zones[0].start_index < run.zones[1].start_index);
        assert!(run.zones.iter().all(|z| !z.narrative_text.is_empty()));

        let named = ZoningEngine::default().run(Some("nzd0002"), &transects).unwrap();
        assert_eq!(named.zones[0].zone_name, "nzd0002_rapid_erosion_zone_01");
    }

    #[test]
    fn test_empty_feed() {
        let run = ZoningEngine::default().run(None, &[]).unwrap();
        assert!(run.categories.is_empty());
        assert!(run.candidates.is_empty());
        assert!(run.zones.is_empty());
    }

    #[test]
    fn test_unknown_site_name() {
        let transects = feed(&[None, None, None]);
        let zones = ZoningEngine::default().identify_zones(&transects).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].zone_name, "unknown_site_no_data_zone_01");
        assert_eq!(zones[0].mean_trend_m_per_year, None);
    }
}
