//! Renders zones into one- or two-sentence descriptions.

use crate::classify::rules::ZoneDefinitions;
use crate::narrative::template::{render_template, TemplateVars};
use crate::types::Zone;
use std::sync::OnceLock;

/// Used when the definition table has no rule for the zone's category.
const UNCLASSIFIED_TEMPLATE: &str = "Unclassified zone spanning {length_km:.1f}km.";

/// Variables exposed to description templates.
///
/// Statistics the zone does not have (e.g. mean trend of a NoData zone) read as 0.
pub fn template_vars(zone: &Zone) -> TemplateVars {
    let stats = &zone.statistics;
    let or_zero = |value: Option<f64>| Some(value.unwrap_or(0.0));
    let mean_trend = zone.mean_trend_m_per_year;

    TemplateVars::new()
        .number("length_km", Some(zone.length_km))
        .number("mean_trend", or_zero(mean_trend))
        .number("avg_trend", or_zero(mean_trend))
        .number("avg_trend_abs", or_zero(mean_trend.map(f64::abs)))
        .count("transect_count", zone.transect_count)
        .number("avg_beach_slope", or_zero(stats.avg_beach_slope))
        .number("avg_slope", or_zero(stats.avg_beach_slope))
        .number("avg_r2", or_zero(stats.avg_r2))
        .number("max_trend", or_zero(stats.max_trend))
        .number("min_trend", or_zero(stats.min_trend))
        .number("avg_rmse", or_zero(stats.avg_rmse))
        .number("avg_mae", or_zero(stats.avg_mae))
        .number("avg_cil", or_zero(stats.avg_ci_lower))
        .number("avg_ciu", or_zero(stats.avg_ci_upper))
        .number("avg_orientation", or_zero(stats.avg_orientation))
}

/// Narrative generator bound to a definition table.
pub struct NarrativeGenerator<'a> {
    definitions: &'a ZoneDefinitions,
}

impl<'a> NarrativeGenerator<'a> {
    pub fn new(definitions: &'a ZoneDefinitions) -> Self {
        Self { definitions }
    }

    /// Describe a zone with its category's template.
    ///
    /// A template that cannot be rendered is logged and replaced by a generic
    /// length/count sentence; narration never fails.
    pub fn narrate(&self, zone: &Zone) -> String {
        let template = self
            .definitions
            .rule_for(zone.category)
            .map(|rule| rule.description_template.as_str())
            .unwrap_or(UNCLASSIFIED_TEMPLATE);

        match render_template(template, &template_vars(zone)) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    category = %zone.category,
                    start_index = zone.start_index,
                    error = %e,
                    "Description template failed, using generic text"
                );
                format!(
                    "Zone spanning {:.1}km with {} transects.",
                    zone.length_km, zone.transect_count
                )
            }
        }
    }
}

/// Describe a zone with the built-in templates.
pub fn narrate(zone: &Zone) -> String {
    static DEFAULTS: OnceLock<ZoneDefinitions> = OnceLock::new();
    NarrativeGenerator::new(DEFAULTS.get_or_init(ZoneDefinitions::default)).narrate(zone)
}
