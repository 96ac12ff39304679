//! Minimal placeholder substitution for description templates.
//!
//! Supported syntax: `{name}`, `{name:.Nf}` (fixed decimals), and `{{` / `}}`
//! for literal braces.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("unknown placeholder `{0}`")]
    UnknownPlaceholder(String),

    #[error("placeholder `{0}` has no value for this zone")]
    UndefinedValue(String),

    #[error("unsupported format spec `{spec}` for `{name}`")]
    UnsupportedFormat { name: String, spec: String },

    #[error("malformed template at byte {0}")]
    Malformed(usize),
}

/// A value that can be substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateValue {
    Number(Option<f64>),
    Count(usize),
}

/// Named values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: BTreeMap<&'static str, TemplateValue>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, name: &'static str, value: Option<f64>) -> Self {
        self.values.insert(name, TemplateValue::Number(value));
        self
    }

    pub fn count(mut self, name: &'static str, value: usize) -> Self {
        self.values.insert(name, TemplateValue::Count(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<TemplateValue> {
        self.values.get(name).copied()
    }
}

/// Parse `.Nf` into N. An empty spec means default formatting.
fn parse_precision(name: &str, spec: &str) -> Result<Option<usize>, TemplateError> {
    if spec.is_empty() {
        return Ok(None);
    }
    let unsupported = || TemplateError::UnsupportedFormat {
        name: name.to_string(),
        spec: spec.to_string(),
    };
    let digits = spec
        .strip_prefix('.')
        .and_then(|s| s.strip_suffix('f'))
        .ok_or_else(unsupported)?;
    digits.parse::<usize>().map(Some).map_err(|_| unsupported())
}

fn format_value(name: &str, value: TemplateValue, precision: Option<usize>) -> Result<String, TemplateError> {
    match (value, precision) {
        (TemplateValue::Number(None), _) => Err(TemplateError::UndefinedValue(name.to_string())),
        (TemplateValue::Number(Some(v)), Some(p)) => Ok(format!("{:.*}", p, v)),
        (TemplateValue::Number(Some(v)), None) => Ok(format!("{}", v)),
        (TemplateValue::Count(n), Some(p)) => Ok(format!("{:.*}", p, n as f64)),
        (TemplateValue::Count(n), None) => Ok(n.to_string()),
    }
}

/// Substitute every placeholder in `template`.
pub fn render_template(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::Malformed(pos)),
            '{' => {
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(TemplateError::Malformed(pos)),
                        Some((_, c)) => body.push(c),
                    }
                }

                let (name, spec) = body.split_once(':').unwrap_or((body.as_str(), ""));
                let value = vars
                    .get(name)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
                let precision = parse_precision(name, spec)?;
                out.push_str(&format_value(name, value, precision)?);
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars::new()
            .number("length_km", Some(2.04))
            .number("avg_trend_abs", Some(0.9333))
            .number("mean_trend", None)
            .count("transect_count", 7)
    }

    #[test]
    fn test_fixed_precision() {
        let out = render_template("spanning {length_km:.1f}km at {avg_trend_abs:.2f}m/year", &vars()).unwrap();
        assert_eq!(out, "spanning 2.0km at 0.93m/year");
    }

    #[test]
    fn test_plain_placeholders_and_braces() {
        let out = render_template("{{{transect_count}}} transects", &vars()).unwrap();
        assert_eq!(out, "{7} transects");
    }

    #[test]
    fn test_count_with_precision() {
        let out = render_template("{transect_count:.1f}", &vars()).unwrap();
        assert_eq!(out, "7.0");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            render_template("{nope}", &vars()),
            Err(TemplateError::UnknownPlaceholder("nope".to_string()))
        );
        assert_eq!(
            render_template("{mean_trend:.1f}", &vars()),
            Err(TemplateError::UndefinedValue("mean_trend".to_string()))
        );
        assert!(matches!(
            render_template("{length_km:>8}", &vars()),
            Err(TemplateError::UnsupportedFormat { .. })
        ));
        assert_eq!(render_template("open {length_km", &vars()), Err(TemplateError::Malformed(5)));
        assert_eq!(render_template("stray } brace", &vars()), Err(TemplateError::Malformed(6)));
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render_template("plain text", &vars()).unwrap(), "plain text");
    }
}
