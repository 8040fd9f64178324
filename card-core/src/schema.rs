//! Validation schemas handed to edit dialogs.
//!
//! The card never validates anything itself; it forwards the schema to
//! the dialog, which decides when to check a submission.
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "name", "required": true, "kind": "string", "max_length": 40 },
//!     { "name": "age", "kind": "number" }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CardError, CardResult};

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Any JSON value.
    #[default]
    Any,
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// An array.
    Array,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// Rules for one field of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field name in the submitted object.
    pub name: String,
    /// Field must be present and non-null.
    #[serde(default)]
    pub required: bool,
    /// Expected type.
    #[serde(default)]
    pub kind: FieldKind,
    /// Minimum length of a string (in chars) or array.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Maximum length of a string (in chars) or array.
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl FieldRule {
    /// An optional field of any type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind: FieldKind::Any,
            min_length: None,
            max_length: None,
        }
    }

    /// Make the field mandatory.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the expected type.
    #[must_use]
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the minimum length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    fn check(&self, object: &serde_json::Map<String, Value>, errors: &mut Vec<FieldError>) {
        let value = match object.get(&self.name) {
            None | Some(Value::Null) => {
                if self.required {
                    errors.push(FieldError::new(&self.name, "is required"));
                }
                return;
            }
            Some(value) => value,
        };

        if !self.kind.matches(value) {
            errors.push(FieldError::new(
                &self.name,
                format!("must be a {}", self.kind.name()),
            ));
            return;
        }

        let length = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            _ => return,
        };
        if let Some(min) = self.min_length.filter(|&min| length < min) {
            errors.push(FieldError::new(
                &self.name,
                format!("must be at least {min} long"),
            ));
        }
        if let Some(max) = self.max_length.filter(|&max| length > max) {
            errors.push(FieldError::new(
                &self.name,
                format!("must be at most {max} long"),
            ));
        }
    }
}

/// A rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name, empty when the submission as a whole is rejected.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} {}", self.field, self.message)
        }
    }
}

/// Field rules for an edit submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSchema {
    /// Rules, checked in order.
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl ValidationSchema {
    /// A schema with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field rule.
    #[must_use]
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Parse a schema from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a schema.
    pub fn from_json(json: &str) -> CardResult<Self> {
        serde_json::from_str(json).map_err(CardError::Serialization)
    }

    /// Check a submission against every rule.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Validation`] with every violation found.
    pub fn validate(&self, submission: &Value) -> CardResult<()> {
        let Some(object) = submission.as_object() else {
            return Err(CardError::Validation(vec![FieldError::new(
                "",
                "submission must be an object",
            )]));
        };

        let mut errors = Vec::new();
        for rule in &self.fields {
            rule.check(object, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CardError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile_schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                FieldRule::new("name")
                    .required()
                    .kind(FieldKind::String)
                    .min_length(1)
                    .max_length(10),
            )
            .field(FieldRule::new("skills").kind(FieldKind::Array).max_length(2))
    }

    #[test]
    fn test_accepts_valid_submission() {
        let schema = profile_schema();
        assert!(schema.validate(&json!({"name": "Ada"})).is_ok());
        assert!(schema
            .validate(&json!({"name": "Ada", "skills": ["math"], "extra": 1}))
            .is_ok());
    }

    #[test]
    fn test_collects_every_violation() {
        let err = profile_schema()
            .validate(&json!({"name": "", "skills": ["a", "b", "c"]}))
            .expect_err("should reject");
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "skills"]);
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let schema = profile_schema();

        let err = schema.validate(&json!({})).expect_err("missing name");
        assert_eq!(err.field_errors()[0].message, "is required");

        let err = schema.validate(&json!({"name": 7})).expect_err("number name");
        assert_eq!(err.to_string(), "Validation failed: name must be a string");
    }

    #[test]
    fn test_rejects_non_object() {
        let err = profile_schema().validate(&json!("Ada")).expect_err("string");
        assert_eq!(err.field_errors()[0].field, "");
    }

    #[test]
    fn test_parse_from_json() {
        let schema = ValidationSchema::from_json(
            r#"{"fields":[{"name":"name","required":true,"kind":"string","max_length":40}]}"#,
        )
        .expect("parse");
        assert_eq!(
            schema,
            ValidationSchema::new().field(
                FieldRule::new("name")
                    .required()
                    .kind(FieldKind::String)
                    .max_length(40)
            )
        );
    }
}
