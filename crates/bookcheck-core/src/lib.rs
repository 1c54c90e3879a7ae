//! # bookcheck-core — Foundational Types for bookcheck
//!
//! This crate defines the value types shared by every other crate in the
//! workspace. It has no knowledge of the file system, YAML parsing, or the
//! schema engine; those live in `bookcheck-schema` and `bookcheck-engine`.
//!
//! ## Key Types
//!
//! 1. **[`ConfigError`]**: the structured finding reported for a book
//!    configuration file. Every variant renders to the same
//!    `Description / Location / Suggestion` block and serializes to the same
//!    record shape, whatever produced it.
//!
//! 2. **[`Violation`]**: one schema rule broken by a document, with a
//!    discriminated [`ViolationKind`] (missing property, wrong type, other).
//!
//! 3. **[`LocationTracker`]**: an insertion-ordered multimap from a tracked
//!    value to every location it was seen at. Both uniqueness checks are
//!    written against it.
//!
//! 4. **[`Release`]**: the release name and date derived from a release
//!    branch reference by [`determine_release`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bookcheck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod formatting;
pub mod model;
pub mod release;
pub mod tracker;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use error::{ConfigError, ConfigErrorRecord, ErrorCategory, Location, Position};
pub use formatting::{bullet_list, cat, relativize_paths};
pub use model::{
    BookConfig, ChapterConfig, PageConfig, VariableValue, Variables, BOOK_CONFIG_SUFFIX,
    RELEASE_DATE_VARIABLE, RELEASE_VARIABLE, UNIQUE_ACROSS_FILES_KEYS, UNIQUE_WITHIN_FILE_KEY,
};
pub use release::{
    determine_release, determine_release_at, Release, ReleaseError, ReleaseOptions,
    DEFAULT_RELEASE_PREFIX, DEFAULT_TIMEZONE,
};
pub use tracker::LocationTracker;
pub use violation::{Violation, ViolationKind};
