//! Engine configuration.

use crate::classify::rules::ZoneDefinitions;
use crate::zoning::filter::DEFAULT_MIN_ZONE_LENGTH;
use anyhow::Result;
use std::path::Path;

/// Environment variable overriding the default minimum zone length.
pub const MIN_ZONE_LENGTH_ENV: &str = "NARRATIVE_MIN_ZONE_LENGTH";

/// Tunables for a zoning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoningConfig {
    /// Candidates with fewer transects are dropped.
    pub min_zone_length: usize,
    /// Classification rules and description templates.
    pub definitions: ZoneDefinitions,
}

impl Default for ZoningConfig {
    fn default() -> Self {
        Self {
            min_zone_length: DEFAULT_MIN_ZONE_LENGTH,
            definitions: ZoneDefinitions::default(),
        }
    }
}

impl ZoningConfig {
    /// Defaults, with `min_zone_length` taken from the environment when set and valid.
    pub fn from_env() -> Self {
        let min_zone_length = std::env::var(MIN_ZONE_LENGTH_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MIN_ZONE_LENGTH);

        Self {
            min_zone_length,
            ..Self::default()
        }
    }

    pub fn with_min_zone_length(mut self, min_zone_length: usize) -> Self {
        self.min_zone_length = min_zone_length;
        self
    }

    pub fn with_definitions(mut self, definitions: ZoneDefinitions) -> Self {
        self.definitions = definitions;
        self
    }

    /// Replace the definition table with one loaded from a JSON file.
    pub fn with_definitions_file(self, path: &Path) -> Result<Self> {
        let definitions = ZoneDefinitions::load(path)?;
        tracing::info!(path = %path.display(), rules = definitions.rules().len(), "Loaded custom zone definitions");
        Ok(self.with_definitions(definitions))
    }
}
