//! Error types for the zoning engine.

use crate::types::ZoneCategory;
use thiserror::Error;

/// Errors raised by the zoning pipeline.
///
/// Missing optional features (trend, r², RMSE, slope) are never errors; they are
/// routed through the classification rules instead.
#[derive(Debug, Error)]
pub enum ZoningError {
    /// Malformed input detected before classification.
    #[error("Invalid transect at position {position_index}: field `{field}` {reason}")]
    Validation {
        position_index: usize,
        field: &'static str,
        reason: String,
    },

    /// A zone candidate selected no transects. Indicates a grouping defect.
    #[error("Zone candidate {category} [{start_index}..={end_index}] has no member transects")]
    MissingData {
        category: ZoneCategory,
        start_index: usize,
        end_index: usize,
    },

    /// Zone definition table could not be used.
    #[error("Invalid zone definitions: {0}")]
    InvalidDefinitions(String),
}

impl ZoningError {
    pub(crate) fn validation(position_index: usize, field: &'static str, reason: impl Into<String>) -> Self {
        ZoningError::Validation {
            position_index,
            field,
            reason: reason.into(),
        }
    }
}
