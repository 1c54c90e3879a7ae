//! # Schema Violations
//!
//! A [`Violation`] is one schema rule a document broke. The schema crate
//! produces them; the error model turns each into a
//! [`ConfigError::Validation`](crate::ConfigError::Validation).
//!
//! The [`ViolationKind`] discriminant decides how the violation is described
//! to users: missing required properties and type mismatches get dedicated
//! wording, everything else falls back to the validator's own message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViolationKind {
    /// A required property is absent.
    MissingProperty {
        /// Name of the missing property.
        property: String,
    },
    /// A property holds a value of the wrong JSON type.
    WrongType {
        /// Expected type(s) as written in the schema, comma separated.
        expected: String,
    },
    /// Any other rule (`anyOf`, `oneOf`, `not`, ...).
    Other,
}

/// A single schema violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// What kind of rule was broken.
    pub kind: ViolationKind,
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// The validator's human-readable message.
    pub message: String,
}

impl Violation {
    /// The instance path in dotted form: `/chapters/0/name` → `chapters.0.name`.
    pub fn property_path(&self) -> String {
        self.instance_path
            .strip_prefix('/')
            .unwrap_or(&self.instance_path)
            .replace('/', ".")
    }

    /// User-facing description of the violation.
    pub fn description(&self) -> String {
        match &self.kind {
            ViolationKind::MissingProperty { property } => {
                format!("Missing required property '{property}'")
            }
            ViolationKind::WrongType { expected } => format!(
                "The type of property '{}' must be {expected}",
                self.property_path()
            ),
            ViolationKind::Other if self.message.is_empty() => {
                "Unknown validation error".to_string()
            }
            ViolationKind::Other => self.message.clone(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}
