//! Per-zone summary statistics.

use crate::error::ZoningError;
use crate::types::{Transect, Zone, ZoneCandidate, ZoneStatistics};

/// Arithmetic mean of the defined values, `None` if there are none.
fn mean<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Members of a candidate within a feed sorted by `position_index`.
fn members<'a>(candidate: &ZoneCandidate, transects: &'a [Transect]) -> &'a [Transect] {
    let lo = transects.partition_point(|t| t.position_index < candidate.start_index);
    let hi = transects.partition_point(|t| t.position_index <= candidate.end_index);
    &transects[lo..hi.max(lo)]
}

/// Aggregate a candidate into a zone.
///
/// `zone_name` and `narrative_text` are left empty; the engine fills them once
/// the zone's ordinal and template are known.
///
/// Fails with [`ZoningError::MissingData`] when the candidate does not select
/// the transects it claims, which means the grouper produced a bad run.
pub fn aggregate(candidate: &ZoneCandidate, transects: &[Transect]) -> Result<Zone, ZoningError> {
    let members = members(candidate, transects);

    let missing = || ZoningError::MissingData {
        category: candidate.category,
        start_index: candidate.start_index,
        end_index: candidate.end_index,
    };
    if members.len() != candidate.transect_count {
        return Err(missing());
    }
    let (Some(first), Some(last)) = (members.first(), members.last()) else {
        return Err(missing());
    };

    let trends = || members.iter().filter_map(|t| t.trend_m_per_year);

    let statistics = ZoneStatistics {
        avg_beach_slope: mean(members.iter().map(|t| t.beach_slope)),
        avg_r2: mean(members.iter().map(|t| t.r2_score)),
        max_trend: trends().reduce(f64::max),
        min_trend: trends().reduce(f64::min),
        avg_rmse: mean(members.iter().map(|t| t.rmse_m)),
        avg_mae: mean(members.iter().map(|t| t.mae_m)),
        avg_ci_lower: mean(members.iter().map(|t| t.ci_lower)),
        avg_ci_upper: mean(members.iter().map(|t| t.ci_upper)),
        avg_orientation: mean(members.iter().map(|t| t.orientation_deg)),
    };

    Ok(Zone {
        zone_name: String::new(),
        category: candidate.category,
        start_index: candidate.start_index,
        end_index: candidate.end_index,
        transect_count: members.len(),
        start_along_distance_m: first.along_distance_m,
        end_along_distance_m: last.along_distance_m,
        length_km: (last.along_distance_m - first.along_distance_m) / 1000.0,
        mean_trend_m_per_year: mean(members.iter().map(|t| t.trend_m_per_year)),
        start_transect_id: first.display_id(),
        end_transect_id: last.display_id(),
        transect_ids: members.iter().map(Transect::display_id).collect(),
        statistics,
        narrative_text: String::new(),
    })
}
