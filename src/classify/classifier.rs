//! Maps transects to zone categories using a definition table.

use crate::classify::rules::ZoneDefinitions;
use crate::types::{ClassifiedTransect, Transect, ZoneCategory};
use rayon::prelude::*;
use std::sync::OnceLock;

fn default_definitions() -> &'static ZoneDefinitions {
    static DEFAULTS: OnceLock<ZoneDefinitions> = OnceLock::new();
    DEFAULTS.get_or_init(ZoneDefinitions::default)
}

/// Classify one transect with the built-in table.
pub fn classify(transect: &Transect) -> ZoneCategory {
    default_definitions().classify(transect)
}

/// Classify one transect with a custom table.
pub fn classify_with(transect: &Transect, definitions: &ZoneDefinitions) -> ZoneCategory {
    definitions.classify(transect)
}

/// Classify a whole feed.
///
/// Each transect is independent so the work is spread across the rayon pool;
/// the output keeps input order.
pub fn classify_all<'a>(
    transects: &'a [Transect],
    definitions: &ZoneDefinitions,
) -> Vec<ClassifiedTransect<'a>> {
    transects
        .par_iter()
        .map(|transect| ClassifiedTransect {
            transect,
            category: definitions.classify(transect),
        })
        .collect()
}
