//! # bookcheck-schema — Book Schema Validation
//!
//! Holds the JSON Schema every `.book.yml` file must satisfy and validates
//! parsed documents against it.
//!
//! ## Runtime Validation (`validate`)
//!
//! - [`SchemaValidator::new`] compiles the embedded schema once.
//! - [`SchemaValidator::violations`] lists every rule a document breaks as
//!   a [`bookcheck_core::Violation`].
//! - [`yaml_to_json`] converts a parsed YAML tree into the JSON tree the
//!   validator works on, keeping mapping order.
//!
//! ## Crate Policy
//!
//! - Depends only on `bookcheck-core` internally.
//! - The schema is embedded at compile time; no schema files are read at
//!   runtime and no `$ref` ever leaves the document.

pub mod validate;

pub use validate::{
    yaml_to_json, SchemaValidationError, SchemaValidator, BOOK_SCHEMA,
    BOOK_SCHEMA_NAME,
};
