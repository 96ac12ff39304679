//! Natural-language zone descriptions.

pub mod generator;
pub mod template;

pub use generator::{narrate, NarrativeGenerator};
pub use template::{render_template, TemplateError, TemplateValue, TemplateVars};
