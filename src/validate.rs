//! Declarative per-endpoint input validation.
//!
//! Each resource declares an ordered rule list for its create and update
//! payloads; `validate` checks every rule even after a failure so the client
//! gets the complete violation list in one response.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

/// One field rule: expected type, whether the field is mandatory, and the
/// bounds that apply to it.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub min_exclusive: Option<f64>,
}

impl FieldRule {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required: false,
            max_length: None,
            min_exclusive: None,
        }
    }

    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            required: false,
            max_length: None,
            min_exclusive: None,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            required: false,
            max_length: None,
            min_exclusive: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn greater_than(mut self, min: f64) -> Self {
        self.min_exclusive = Some(min);
        self
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Check `record` against the rule list. JSON `null` counts as absent.
/// Pure: no side effects, and the violation list preserves rule order.
pub fn validate(rules: &[FieldRule], record: &Value) -> Result<(), Vec<Violation>> {
    let Some(object) = record.as_object() else {
        return Err(vec![Violation::new("body", "must be a JSON object")]);
    };

    let mut violations = Vec::new();
    for rule in rules {
        match object.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    violations.push(Violation::new(rule.name, "is required"));
                }
            }
            Some(value) => check_value(rule, value, &mut violations),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_value(rule: &FieldRule, value: &Value, violations: &mut Vec<Violation>) {
    match rule.kind {
        FieldKind::String => match value.as_str() {
            Some(s) => {
                if let Some(max) = rule.max_length {
                    if s.chars().count() > max {
                        violations.push(Violation::new(
                            rule.name,
                            format!("must be at most {max} characters"),
                        ));
                    }
                }
            }
            None => violations.push(Violation::new(rule.name, "must be a string")),
        },
        FieldKind::Number => {
            if !value.is_number() {
                violations.push(Violation::new(rule.name, "must be a number"));
            } else if let Some(min) = rule.min_exclusive {
                if value.as_f64().unwrap_or(f64::NEG_INFINITY) <= min {
                    violations.push(Violation::new(
                        rule.name,
                        format!("must be greater than {min}"),
                    ));
                }
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                violations.push(Violation::new(rule.name, "must be a boolean"));
            }
        }
    }
}

/// Decode a pre-validated record into its typed payload. A mismatch the
/// schema cannot express (e.g. a fractional year) still surfaces as a
/// violation rather than a server error.
pub fn from_record<T: serde::de::DeserializeOwned>(record: Value) -> Result<T, Vec<Violation>> {
    serde_json::from_value(record)
        .map_err(|e| vec![Violation::new("body", format!("malformed payload: {e}"))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::string("title").required().max_length(255),
        FieldRule::number("year").required().greater_than(1887.0),
        FieldRule::boolean("color").required(),
        FieldRule::string("notes").max_length(10),
    ];

    #[test]
    fn valid_record_passes() {
        let record = json!({ "title": "Inception", "year": 2010, "color": true });
        assert!(validate(RULES, &record).is_ok());
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let record = json!({ "title": "Inception" });
        let violations = validate(RULES, &record).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["year", "color"]);
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let record = json!({ "title": "T", "year": 1999, "color": false, "notes": null });
        assert!(validate(RULES, &record).is_ok());
    }

    #[test]
    fn present_optional_fields_must_satisfy_their_rules() {
        let record = json!({
            "title": "T", "year": 1999, "color": false,
            "notes": "way too long for ten",
        });
        let violations = validate(RULES, &record).unwrap_err();
        assert_eq!(violations, vec![Violation::new("notes", "must be at most 10 characters")]);
    }

    #[test]
    fn type_mismatches_are_reported_per_field() {
        let record = json!({ "title": 42, "year": "2010", "color": "yes" });
        let violations = validate(RULES, &record).unwrap_err();
        assert_eq!(
            violations,
            vec![
                Violation::new("title", "must be a string"),
                Violation::new("year", "must be a number"),
                Violation::new("color", "must be a boolean"),
            ]
        );
    }

    #[test]
    fn strict_lower_bound_rejects_the_bound_itself() {
        let record = json!({ "title": "T", "year": 1887, "color": true });
        let violations = validate(RULES, &record).unwrap_err();
        assert_eq!(violations, vec![Violation::new("year", "must be greater than 1887")]);

        let record = json!({ "title": "T", "year": 1888, "color": true });
        assert!(validate(RULES, &record).is_ok());
    }

    #[test]
    fn non_object_body_is_a_single_violation() {
        let violations = validate(RULES, &json!([1, 2, 3])).unwrap_err();
        assert_eq!(violations, vec![Violation::new("body", "must be a JSON object")]);
    }

    #[test]
    fn collects_all_violations_not_just_the_first() {
        let record = json!({ "year": 1800, "color": "nope" });
        let violations = validate(RULES, &record).unwrap_err();
        assert_eq!(violations.len(), 3); // missing title, year bound, color type
    }
}
