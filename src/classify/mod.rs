//! Transect classification.

pub mod classifier;
pub mod rules;

pub use classifier::{classify, classify_all, classify_with};
pub use rules::{Condition, Feature, Logic, Operator, RuleSpec, ZoneDefinitions, ZoneRule};
