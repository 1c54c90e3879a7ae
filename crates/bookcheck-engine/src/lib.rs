//! # bookcheck-engine — Book Config Validation Engine
//!
//! Runs every check over a repository's `.book.yml` files and returns one
//! ordered list of findings.
//!
//! ## Pipeline
//!
//! 1. [`FileEnumerator`] expands include patterns into candidate files.
//! 2. Each `.book.yml` file is read through a [`ConfigStore`], parsed, and
//!    validated against the book schema.
//! 3. Page `shortName`s are checked for repeats inside the file.
//! 4. Clean files optionally get the current release written into their
//!    `variables`.
//! 5. Book `name` and `sortOrder` are checked for repeats across files.
//!
//! Findings are plain [`bookcheck_core::ConfigError`] values. Only
//! infrastructure failures (I/O, bad patterns, a ref that does not name a
//! release) surface as [`EngineError`].
//!
//! ## Crate Policy
//!
//! - The engine reaches the filesystem only through [`FileEnumerator`] and
//!   [`ConfigStore`]; [`GlobEnumerator`] and [`FsStore`] are the defaults.
//! - Single-threaded. Files are processed and rewritten one at a time in
//!   enumeration order.

pub mod duplicates;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod store;

pub use duplicates::{check_unique_across_files, check_unique_within_file};
pub use engine::{validate_repo, RepoValidator, ValidateOptions, DEFAULT_INCLUDE};
pub use enumerate::{Enumeration, EnumerationError, FileEnumerator, GlobEnumerator};
pub use error::EngineError;
pub use store::{ConfigStore, FsStore};
