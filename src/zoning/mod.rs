//! Run-length grouping, noise filtering, and per-zone aggregation.

pub mod aggregator;
pub mod filter;
pub mod grouper;

pub use aggregator::aggregate;
pub use filter::{filter_short_zones, DEFAULT_MIN_ZONE_LENGTH};
pub use grouper::group;
