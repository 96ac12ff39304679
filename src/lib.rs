//! Narrative Zoning
//!
//! Turns an ordered feed of shoreline transects into labeled, human-readable
//! zones of coherent coastal behavior.
//!
//! Pipeline (each stage consumes the previous stage's output immutably):
//! - `classify/`: rule-table classification of each transect
//! - `zoning/`: run-length grouping, short-run filtering, per-zone aggregation
//! - `narrative/`: templated zone descriptions
//! - `engine`: validation and orchestration of the stages
//! - `analysis`: site-level JSON report
//! - `feed/`: GeoJSON and CSV/Parquet transect loaders

pub mod analysis;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod narrative;
pub mod types;
pub mod zoning;

// Re-export commonly used types
pub use analysis::{analyze_site, SiteAnalysis};
pub use classify::{classify, classify_all, ZoneDefinitions};
pub use config::ZoningConfig;
pub use engine::{validate, ZoningEngine, ZoningRun};
pub use error::ZoningError;
pub use narrative::narrate;
pub use types::{ClassifiedTransect, Transect, Zone, ZoneCandidate, ZoneCategory, ZoneStatistics};
pub use zoning::{aggregate, filter_short_zones, group, DEFAULT_MIN_ZONE_LENGTH};
