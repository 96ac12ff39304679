//! Zone definition table.
//!
//! Classification is driven by an ordered list of rules, each pairing a set of
//! conditions with a category and a narrative template. The table is plain data:
//! it can be inspected, reordered, serialized, and loaded from JSON.
//!
//! JSON shape (object keyed by category):
//!
//! ```json
//! {
//!   "high_uncertainty": {
//!     "priority": 6,
//!     "conditions": [
//!       {"field": "r2_score", "operator": "<", "value": 0.05, "allow_null": true},
//!       {"field": "rmse", "operator": ">", "value": 30, "allow_null": true}
//!     ],
//!     "logic": "OR",
//!     "description_template": "Data-limited zone over {length_km:.1f}km ..."
//!   }
//! }
//! ```

use crate::error::ZoningError;
use crate::types::{Transect, ZoneCategory};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Conditions
// ============================================================================

/// Transect feature a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "trend")]
    Trend,
    #[serde(rename = "r2_score")]
    R2Score,
    #[serde(rename = "rmse")]
    Rmse,
    #[serde(rename = "beach_slope")]
    BeachSlope,
    #[serde(rename = "mae")]
    Mae,
    #[serde(rename = "cil")]
    CiLower,
    #[serde(rename = "ciu")]
    CiUpper,
    #[serde(rename = "orientation")]
    Orientation,
}

impl Feature {
    pub fn value(&self, transect: &Transect) -> Option<f64> {
        match self {
            Feature::Trend => transect.trend_m_per_year,
            Feature::R2Score => transect.r2_score,
            Feature::Rmse => transect.rmse_m,
            Feature::BeachSlope => transect.beach_slope,
            Feature::Mae => transect.mae_m,
            Feature::CiLower => transect.ci_lower,
            Feature::CiUpper => transect.ci_upper,
            Feature::Orientation => transect.orientation_deg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "is_null")]
    IsNull,
}

/// How a rule combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// Single comparison against one transect feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: Feature,
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<f64>,
    /// Result of a numeric comparison when the feature is absent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_null: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Condition {
    pub fn new(field: Feature, operator: Operator, value: f64) -> Self {
        Self {
            field,
            operator,
            value: Some(value),
            allow_null: false,
        }
    }

    pub fn is_null(field: Feature) -> Self {
        Self {
            field,
            operator: Operator::IsNull,
            value: None,
            allow_null: false,
        }
    }

    /// Let the condition pass when the feature is absent.
    pub fn allowing_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn evaluate(&self, transect: &Transect) -> bool {
        let Some(actual) = self.field.value(transect) else {
            return self.operator == Operator::IsNull || self.allow_null;
        };
        let Some(threshold) = self.value else {
            // only is_null may omit its value; validated on load
            return false;
        };

        match self.operator {
            Operator::Lt => actual < threshold,
            Operator::Le => actual <= threshold,
            Operator::Gt => actual > threshold,
            Operator::Ge => actual >= threshold,
            Operator::Eq => actual == threshold,
            Operator::Ne => actual != threshold,
            Operator::IsNull => false,
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

/// One entry of the classification table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRule {
    pub category: ZoneCategory,
    /// Lower value = evaluated earlier.
    pub priority: u32,
    /// Empty means catch-all.
    pub conditions: Vec<Condition>,
    pub logic: Logic,
    pub description_template: String,
}

impl ZoneRule {
    pub fn matches(&self, transect: &Transect) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.logic {
            Logic::And => self.conditions.iter().all(|c| c.evaluate(transect)),
            Logic::Or => self.conditions.iter().any(|c| c.evaluate(transect)),
        }
    }
}

/// Serialized form of a rule; the category is the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub priority: u32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: Logic,
    pub description_template: String,
}

// ============================================================================
// Definition table
// ============================================================================

/// Ordered classification table plus narrative templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ZoneCategory, RuleSpec>",
    into = "BTreeMap<ZoneCategory, RuleSpec>"
)]
pub struct ZoneDefinitions {
    rules: Vec<ZoneRule>,
}

impl ZoneDefinitions {
    /// Build a table, ordering rules by priority (ties broken by category).
    pub fn new(mut rules: Vec<ZoneRule>) -> Result<Self, ZoningError> {
        for rule in &rules {
            for condition in &rule.conditions {
                if condition.operator != Operator::IsNull && condition.value.is_none() {
                    return Err(ZoningError::InvalidDefinitions(format!(
                        "{}: condition on {:?} with operator {:?} needs a value",
                        rule.category, condition.field, condition.operator
                    )));
                }
            }
        }

        let mut seen = Vec::with_capacity(rules.len());
        for rule in &rules {
            if seen.contains(&rule.category) {
                return Err(ZoningError::InvalidDefinitions(format!(
                    "{} is defined more than once",
                    rule.category
                )));
            }
            seen.push(rule.category);
        }

        rules.sort_by_key(|r| (r.priority, r.category));
        Ok(Self { rules })
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ZoneRule] {
        &self.rules
    }

    pub fn rule_for(&self, category: ZoneCategory) -> Option<&ZoneRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Categories in evaluation order.
    pub fn priority_order(&self) -> Vec<ZoneCategory> {
        self.rules.iter().map(|r| r.category).collect()
    }

    /// First matching rule's category; Stable when nothing matches.
    pub fn classify(&self, transect: &Transect) -> ZoneCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(transect))
            .map(|rule| rule.category)
            .unwrap_or(ZoneCategory::Stable)
    }

    pub fn from_json(json: &str) -> Result<Self, ZoningError> {
        serde_json::from_str(json).map_err(|e| ZoningError::InvalidDefinitions(e.to_string()))
    }

    /// Load a custom table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read zone definitions: {:?}", path))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse zone definitions: {:?}", path))
    }
}

impl TryFrom<BTreeMap<ZoneCategory, RuleSpec>> for ZoneDefinitions {
    type Error = ZoningError;

    fn try_from(specs: BTreeMap<ZoneCategory, RuleSpec>) -> Result<Self, Self::Error> {
        let rules = specs
            .into_iter()
            .map(|(category, spec)| ZoneRule {
                category,
                priority: spec.priority,
                conditions: spec.conditions,
                logic: spec.logic,
                description_template: spec.description_template,
            })
            .collect();
        ZoneDefinitions::new(rules)
    }
}

impl From<ZoneDefinitions> for BTreeMap<ZoneCategory, RuleSpec> {
    fn from(definitions: ZoneDefinitions) -> Self {
        definitions
            .rules
            .into_iter()
            .map(|rule| {
                (
                    rule.category,
                    RuleSpec {
                        priority: rule.priority,
                        conditions: rule.conditions,
                        logic: rule.logic,
                        description_template: rule.description_template,
                    },
                )
            })
            .collect()
    }
}

// ============================================================================
// Default table
// ============================================================================

/// Trend beyond which erosion/accretion is considered rapid (m/year).
pub const RAPID_TREND_THRESHOLD: f64 = 0.8;
/// Trend beyond which erosion/accretion is considered moderate (m/year).
pub const MODERATE_TREND_THRESHOLD: f64 = 0.3;
pub const MIN_RELIABLE_R2: f64 = 0.05;
pub const MAX_RELIABLE_RMSE_M: f64 = 30.0;
pub const STEEP_SLOPE_THRESHOLD: f64 = 0.08;
pub const GENTLE_SLOPE_THRESHOLD: f64 = 0.04;

impl Default for ZoneDefinitions {
    /// Built-in nine-category table.
    ///
    /// NoData is evaluated first: every later rule compares the trend, which is
    /// meaningless when it is absent. Trend bands carry both bounds so each rule
    /// is correct on its own, independent of table order.
    fn default() -> Self {
        use Feature::{BeachSlope, R2Score, Rmse, Trend};
        use Operator::{Ge, Gt, Le, Lt};

        let rule = |category, priority, conditions, logic, template: &str| ZoneRule {
            category,
            priority,
            conditions,
            logic,
            description_template: template.to_string(),
        };

        let rules = vec![
            rule(
                ZoneCategory::NoData,
                1,
                vec![Condition::is_null(Trend)],
                Logic::And,
                "No data zone spanning {length_km:.1f}km where insufficient observations prevent trend analysis.",
            ),
            rule(
                ZoneCategory::RapidErosion,
                2,
                vec![Condition::new(Trend, Lt, -RAPID_TREND_THRESHOLD)],
                Logic::And,
                "Critical erosion hotspot spanning {length_km:.1f}km with average retreat of {avg_trend_abs:.1f}m/year. This area requires immediate attention and monitoring.",
            ),
            rule(
                ZoneCategory::ModerateErosion,
                3,
                vec![
                    Condition::new(Trend, Ge, -RAPID_TREND_THRESHOLD),
                    Condition::new(Trend, Lt, -MODERATE_TREND_THRESHOLD),
                ],
                Logic::And,
                "Erosion zone extending {length_km:.1f}km showing consistent retreat averaging {avg_trend_abs:.1f}m/year. Ongoing erosion processes are evident.",
            ),
            rule(
                ZoneCategory::RapidAccretion,
                4,
                vec![Condition::new(Trend, Gt, RAPID_TREND_THRESHOLD)],
                Logic::And,
                "Dynamic accretion zone over {length_km:.1f}km with significant sand accumulation averaging {avg_trend:.1f}m/year. This area shows strong sediment deposition.",
            ),
            rule(
                ZoneCategory::ModerateAccretion,
                5,
                vec![
                    Condition::new(Trend, Gt, MODERATE_TREND_THRESHOLD),
                    Condition::new(Trend, Le, RAPID_TREND_THRESHOLD),
                ],
                Logic::And,
                "Stable accretion zone spanning {length_km:.1f}km with gradual beach building averaging {avg_trend:.1f}m/year. Positive sediment balance is maintained.",
            ),
            rule(
                ZoneCategory::HighUncertainty,
                6,
                vec![
                    Condition::new(R2Score, Lt, MIN_RELIABLE_R2).allowing_null(),
                    Condition::new(Rmse, Gt, MAX_RELIABLE_RMSE_M).allowing_null(),
                ],
                Logic::Or,
                "Data-limited zone over {length_km:.1f}km where shoreline trends are difficult to determine reliably. Additional monitoring may be needed.",
            ),
            rule(
                ZoneCategory::SteepBeach,
                7,
                vec![Condition::new(BeachSlope, Gt, STEEP_SLOPE_THRESHOLD)],
                Logic::And,
                "High-energy beach zone over {length_km:.1f}km characterized by steep beach profiles. This area may be vulnerable to storm impacts.",
            ),
            rule(
                ZoneCategory::LowEnergy,
                8,
                vec![Condition::new(BeachSlope, Lt, GENTLE_SLOPE_THRESHOLD)],
                Logic::And,
                "Protected shoreline segment spanning {length_km:.1f}km with gentle beach profiles indicating low wave energy conditions.",
            ),
            rule(
                ZoneCategory::Stable,
                9,
                vec![],
                Logic::And,
                "Stable shoreline segment extending {length_km:.1f}km showing minimal change over time. This area exhibits natural equilibrium.",
            ),
        ];

        ZoneDefinitions { rules }
    }
}
