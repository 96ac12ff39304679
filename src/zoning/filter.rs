//! Drops zone candidates too short to be meaningful.

use crate::types::ZoneCandidate;

/// Minimum number of transects a candidate needs to become a zone.
pub const DEFAULT_MIN_ZONE_LENGTH: usize = 3;

/// Keep candidates with at least `min_length` transects.
///
/// Short runs are discarded outright; their transects are not folded into a
/// neighbouring zone.
pub fn filter_short_zones(candidates: Vec<ZoneCandidate>, min_length: usize) -> Vec<ZoneCandidate> {
    let before = candidates.len();
    let kept: Vec<ZoneCandidate> = candidates
        .into_iter()
        .filter(|c| c.transect_count >= min_length)
        .collect();

    tracing::debug!(
        before,
        kept = kept.len(),
        min_length,
        "Filtered short zone candidates"
    );
    kept
}
