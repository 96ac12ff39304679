//! End-to-end zoning pipeline tests.
//!
//! Runs classification, grouping, filtering, aggregation and narration together
//! on small hand-built coastlines and on generated feeds.

use approx::assert_relative_eq;
use narrative_zoning::{
    classify, classify_all, filter_short_zones, group, Transect, ZoneCategory, ZoneDefinitions,
    ZoningConfig, ZoningEngine, ZoningError,
};

/// Transect with mid-range secondary features so only the trend decides.
fn transect(i: usize, along: f64, trend: Option<f64>) -> Transect {
    let mut t = Transect::new(i, along).with_r2(0.6).with_rmse(8.0).with_slope(0.06);
    t.trend_m_per_year = trend;
    t
}

fn feed_km(trends: &[f64]) -> Vec<Transect> {
    trends
        .iter()
        .enumerate()
        .map(|(i, &trend)| transect(i, i as f64 * 1000.0, Some(trend)))
        .collect()
}

/// Small deterministic generator for property checks.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn feature(&mut self, lo: f64, hi: f64, missing_rate: f64) -> Option<f64> {
        if self.next_f64() < missing_rate {
            None
        } else {
            Some(lo + (hi - lo) * self.next_f64())
        }
    }
}

fn random_feed(seed: u64, n: usize) -> Vec<Transect> {
    let mut rng = Lcg(seed);
    let mut along = 0.0;
    (0..n)
        .map(|i| {
            along += 50.0 + 100.0 * rng.next_f64();
            let mut t = Transect::new(i, along);
            t.trend_m_per_year = rng.feature(-1.5, 1.5, 0.1);
            t.r2_score = rng.feature(0.0, 1.0, 0.1);
            t.rmse_m = rng.feature(0.0, 40.0, 0.1);
            t.beach_slope = rng.feature(0.0, 0.12, 0.2);
            t
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_single_rapid_erosion_zone() {
    let transects = feed_km(&[-1.0, -0.9, -0.9]);
    assert!(transects.iter().all(|t| classify(t) == ZoneCategory::RapidErosion));

    let zones = ZoningEngine::default().identify_zones(&transects).unwrap();
    assert_eq!(zones.len(), 1);

    let zone = &zones[0];
    assert_eq!(zone.category, ZoneCategory::RapidErosion);
    assert_eq!(zone.transect_count, 3);
    assert_relative_eq!(zone.length_km, 2.0, epsilon = 1e-12);
    assert_relative_eq!(zone.mean_trend_m_per_year.unwrap(), -0.9333, epsilon = 0.001);
    assert_eq!(zone.start_along_distance_m, 0.0);
    assert_eq!(zone.end_along_distance_m, 2000.0);
    assert!(zone.narrative_text.contains("2.0km"));
    assert!(zone.narrative_text.contains("0.9m/year"));
}

#[test]
fn scenario_b_short_stable_run_is_dropped() {
    let transects = feed_km(&[0.1, 0.1]);
    assert!(transects.iter().all(|t| classify(t) == ZoneCategory::Stable));

    // without fit quality the same trends read as uncertain, and are still too short
    let bare: Vec<Transect> = (0..2).map(|i| Transect::new(i, i as f64).with_trend(0.1)).collect();
    assert!(bare.iter().all(|t| classify(t) == ZoneCategory::HighUncertainty));
    assert!(ZoningEngine::default().identify_zones(&bare).unwrap().is_empty());

    let zones = ZoningEngine::default().identify_zones(&transects).unwrap();
    assert!(zones.is_empty());
}

#[test]
fn scenario_c_no_data_precedes_uncertainty() {
    let t = Transect::new(0, 0.0).with_r2(0.9);
    assert_eq!(classify(&t), ZoneCategory::NoData);

    let t = Transect::new(0, 0.0).with_r2(0.01).with_rmse(50.0);
    assert_eq!(classify(&t), ZoneCategory::NoData);
}

#[test]
fn scenario_d_boundary_is_moderate() {
    assert_eq!(classify(&transect(0, 0.0, Some(-0.8))), ZoneCategory::ModerateErosion);
    assert_eq!(classify(&transect(0, 0.0, Some(0.8))), ZoneCategory::ModerateAccretion);
}

#[test]
fn scenario_e_only_middle_run_survives() {
    let transects = feed_km(&[-1.0, -1.0, 0.0, 0.0, 0.0, -1.0]);
    let defs = ZoneDefinitions::default();
    let classified = classify_all(&transects, &defs);

    let categories: Vec<ZoneCategory> = classified.iter().map(|c| c.category).collect();
    use ZoneCategory::{RapidErosion as RE, Stable as S};
    assert_eq!(categories, vec![RE, RE, S, S, S, RE]);

    let candidates = group(&classified);
    let sizes: Vec<usize> = candidates.iter().map(|c| c.transect_count).collect();
    assert_eq!(sizes, vec![2, 3, 1]);

    let kept = filter_short_zones(candidates, 3);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].category, ZoneCategory::Stable);
    assert_eq!((kept[0].start_index, kept[0].end_index), (2, 4));

    let zones = ZoningEngine::default().identify_zones(&transects).unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].category, ZoneCategory::Stable);
    assert_relative_eq!(zones[0].length_km, 2.0, epsilon = 1e-12);
}

// ============================================================================
// Properties over generated feeds
// ============================================================================

#[test]
fn classification_is_total_and_deterministic() {
    let defs = ZoneDefinitions::default();
    for seed in 1..20 {
        let transects = random_feed(seed, 200);
        let first = classify_all(&transects, &defs);
        let second = classify_all(&transects, &defs);
        for (a, b) in first.iter().zip(&second) {
            assert!(ZoneCategory::ALL.contains(&a.category));
            assert_eq!(a.category, b.category);
            assert_eq!(a.category, classify(a.transect));
        }
    }
}

#[test]
fn grouping_partitions_every_feed() {
    let defs = ZoneDefinitions::default();
    for seed in 1..20 {
        let n = 1 + (seed as usize * 37) % 300;
        let transects = random_feed(seed, n);
        let classified = classify_all(&transects, &defs);
        let candidates = group(&classified);

        let total: usize = candidates.iter().map(|c| c.transect_count).sum();
        assert_eq!(total, n);

        let mut next = 0;
        for c in &candidates {
            assert_eq!(c.start_index, next);
            for i in c.start_index..=c.end_index {
                assert_eq!(classified[i].category, c.category);
            }
            next = c.end_index + 1;
        }
        assert_eq!(next, n);

        for pair in candidates.windows(2) {
            assert_ne!(pair[0].category, pair[1].category);
        }
    }
}

#[test]
fn zones_respect_min_length_and_order() {
    for min_zone_length in [1, 2, 3, 5] {
        let engine = ZoningEngine::new(ZoningConfig::default().with_min_zone_length(min_zone_length));
        for seed in 1..10 {
            let transects = random_feed(seed, 400);
            let run = engine.run(Some("gen"), &transects).unwrap();

            assert!(run.zones.len() <= run.candidates.len());
            assert!(run.zones.iter().all(|z| z.transect_count >= min_zone_length));
            for pair in run.zones.windows(2) {
                assert!(pair[0].end_index < pair[1].start_index);
            }
            for zone in &run.zones {
                assert!(zone.length_km >= 0.0);
                assert!(!zone.narrative_text.is_empty());
                if zone.category == ZoneCategory::NoData {
                    assert_eq!(zone.mean_trend_m_per_year, None);
                }
            }
        }
    }
}

#[test]
fn rerunning_yields_identical_zones() {
    let transects = random_feed(42, 250);
    let engine = ZoningEngine::new(ZoningConfig::default().with_min_zone_length(2));
    let first = engine.identify_zones(&transects).unwrap();
    let second = engine.identify_zones(&transects).unwrap();
    assert_eq!(first, second);

    for zone in &first {
        let again = narrative_zoning::aggregate(&zone.candidate(), &transects).unwrap();
        assert_eq!(again.length_km, zone.length_km);
        assert_eq!(again.mean_trend_m_per_year, zone.mean_trend_m_per_year);
        assert_eq!(again.statistics, zone.statistics);
    }
}

#[test]
fn malformed_feed_is_rejected_with_context() {
    let mut transects = feed_km(&[-1.0, -1.0, -1.0]);
    transects.swap(0, 1);

    let err = ZoningEngine::default().identify_zones(&transects).unwrap_err();
    match err {
        ZoningError::Validation { position_index, field, .. } => {
            assert_eq!(position_index, 1);
            assert_eq!(field, "position_index");
        }
        other => panic!("unexpected error: {other}"),
    }
}
