//! # Schema Validation
//!
//! Runtime validation of book configuration documents against the embedded
//! book schema (Draft 7).
//!
//! ## Trust Boundary
//!
//! Every document is validated before anything else reads it as a book.
//! Failures carry structured context: the instance path of the violating
//! field, the schema path that triggered the error, and a [`ViolationKind`]
//! that decides how the error is worded for users.
//!
//! ## Expected Types
//!
//! For `type` violations the expected type is read back from the schema
//! node the error points at, following internal `#/definitions/...` refs
//! along the way. A list of types is reported comma separated
//! (`string,number`). If the node cannot be resolved the violation is
//! reported with the validator's own message instead.

use std::fmt;

use bookcheck_core::{Violation, ViolationKind};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use thiserror::Error;

/// The book configuration schema, embedded at compile time.
pub const BOOK_SCHEMA: &str = include_str!("../schemas/book.schema.json");

/// Name reported for the embedded schema.
pub const BOOK_SCHEMA_NAME: &str = "book.schema.json";

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema text could not be parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A compiled book schema validator.
///
/// The schema is compiled once at construction; validation itself never
/// fails, it only reports violations. `SchemaValidator` is `Send + Sync`
/// and can be shared across threads.
pub struct SchemaValidator {
    /// Name used in error messages.
    schema_name: String,
    /// The schema document, kept for expected-type lookups.
    schema: Value,
    /// Compiled validator.
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile the embedded book schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if the embedded
    /// schema is not valid JSON, or `ValidatorBuildError` if it does not
    /// compile.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let schema: Value = serde_json::from_str(BOOK_SCHEMA).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: BOOK_SCHEMA_NAME.to_string(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        Self::from_schema(BOOK_SCHEMA_NAME, schema)
    }

    /// Compile an arbitrary Draft 7 schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema
    /// does not compile.
    pub fn from_schema(
        schema_name: impl Into<String>,
        schema: Value,
    ) -> Result<Self, SchemaValidationError> {
        let schema_name = schema_name.into();
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .build(&schema)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            schema_name,
            schema,
            validator,
        })
    }

    /// Name of the compiled schema.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// The schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Every violation `instance` has against the schema, in validator order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| self.to_violation(&e))
            .collect()
    }

    fn to_violation(&self, error: &ValidationError<'_>) -> Violation {
        let schema_path = error.schema_path.to_string();
        let kind = match &error.kind {
            ValidationErrorKind::Required { property } => ViolationKind::MissingProperty {
                property: match property {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            },
            ValidationErrorKind::Type { .. } => match expected_type(&self.schema, &schema_path) {
                Some(expected) => ViolationKind::WrongType { expected },
                None => ViolationKind::Other,
            },
            _ => ViolationKind::Other,
        };
        Violation {
            kind,
            instance_path: error.instance_path.to_string(),
            schema_path,
            message: error.to_string(),
        }
    }
}

/// Look up the `type` keyword a schema path ends at.
///
/// The path is walked one segment at a time from the schema root. Whenever
/// the current node carries an internal `$ref` and the next segment is not
/// found on the node itself, the walk continues from the referenced node.
fn expected_type(root: &Value, schema_path: &str) -> Option<String> {
    let mut node = root;
    for raw in schema_path.split('/').filter(|s| !s.is_empty()) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        if segment == "$ref" {
            let target = node.get("$ref")?.as_str()?;
            node = root.pointer(target.strip_prefix('#')?)?;
            continue;
        }
        node = match node {
            Value::Object(map) => match map.get(&segment) {
                Some(next) => next,
                None => resolve_ref(root, node)?.get(&segment)?,
            },
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => {
            let names: Option<Vec<&str>> = types.iter().map(Value::as_str).collect();
            Some(names?.join(","))
        }
        _ => None,
    }
}

/// Follow a single internal `$ref` on `node`.
fn resolve_ref<'a>(root: &'a Value, node: &Value) -> Option<&'a Value> {
    let target = node.get("$ref")?.as_str()?;
    root.pointer(target.strip_prefix('#')?)
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Book configs use only the JSON-compatible subset of YAML. Mapping keys
/// that are numbers or booleans are stringified; tags are dropped.
///
/// # Errors
///
/// Returns a description of the first node with no JSON equivalent: a
/// non-scalar mapping key or a non-finite float.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported mapping key: {other:?}")),
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
