//! # Config Errors — Structured Findings
//!
//! Defines [`ConfigError`], the value reported for every problem found in a
//! set of book configuration files. A finding is never mutated after it is
//! created and is consumed two ways:
//!
//! - **Machine output**: [`ConfigErrorRecord`], the serialized
//!   `{category, description, location, suggestion}` shape.
//! - **Human output**: the `Display` impl, a `Description:` / `Location:` /
//!   `Suggestion:` block with working-directory prefixes rewritten to `.`.
//!
//! ## Location Shapes
//!
//! Most findings point at one file. Across-file duplicates point at every
//! file sharing the value, so [`Location`] is either a single string or a
//! list. A missing-config finding has an empty single location.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::formatting::relativize_paths;
use crate::violation::Violation;

/// Line and column reported by the YAML parser, both one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where a finding applies: one location, or several for across-file findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    /// A single file, optionally suffixed with `line:column`. May be empty.
    Single(String),
    /// Every file involved in the finding.
    Multiple(Vec<String>),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Single(location) => f.write_str(location),
            Location::Multiple(locations) => f.write_str(&locations.join(", ")),
        }
    }
}

/// Broad category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The file is not valid YAML.
    Parse,
    /// The document does not match the book schema.
    Schema,
    /// No config file matched the include patterns.
    MissingConfig,
    /// A value that must be unique is repeated.
    Uniqueness,
}

impl ErrorCategory {
    /// Stable lowercase label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Schema => "schema",
            ErrorCategory::MissingConfig => "missing_config",
            ErrorCategory::Uniqueness => "uniqueness",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in the book configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be parsed as YAML.
    Parse {
        /// Path of the offending file.
        file: String,
        /// The parser's message.
        message: String,
        /// Where the parser gave up, when it reported a position.
        position: Option<Position>,
    },

    /// The document broke one schema rule.
    Validation {
        /// Path of the offending file.
        file: String,
        /// The broken rule.
        violation: Violation,
    },

    /// No config files matched.
    MissingConfig {
        /// Directories that were searched.
        search_paths: Vec<String>,
    },

    /// A value is repeated at several paths inside one file.
    DuplicateWithinFile {
        /// Path of the offending file.
        file: String,
        /// The key whose values must be unique.
        key: String,
        /// The repeated value.
        value: String,
        /// Structural paths holding the value, e.g. `chapters[0].pages[1].shortName`.
        paths: Vec<String>,
    },

    /// A value is shared by several files.
    DuplicateAcrossFiles {
        /// Every file holding the value.
        files: Vec<String>,
        /// The key whose values must be unique.
        key: String,
        /// The repeated value.
        value: String,
    },
}

impl ConfigError {
    /// Build a parse error from the parser's message and optional position.
    pub fn parse(file: impl Into<String>, message: impl Into<String>, position: Option<Position>) -> Self {
        ConfigError::Parse {
            file: file.into(),
            message: message.into(),
            position,
        }
    }

    /// Build a validation error for one schema violation.
    pub fn validation(file: impl Into<String>, violation: Violation) -> Self {
        ConfigError::Validation {
            file: file.into(),
            violation,
        }
    }

    /// Build the error reported when no config files are found.
    pub fn missing_config(search_paths: Vec<String>) -> Self {
        ConfigError::MissingConfig { search_paths }
    }

    /// The broad category of this finding.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::Parse { .. } => ErrorCategory::Parse,
            ConfigError::Validation { .. } => ErrorCategory::Schema,
            ConfigError::MissingConfig { .. } => ErrorCategory::MissingConfig,
            ConfigError::DuplicateWithinFile { .. } | ConfigError::DuplicateAcrossFiles { .. } => {
                ErrorCategory::Uniqueness
            }
        }
    }

    /// Human-readable cause.
    pub fn description(&self) -> String {
        match self {
            ConfigError::Parse { message, .. } => message.clone(),
            ConfigError::Validation { violation, .. } => violation.description(),
            ConfigError::MissingConfig { search_paths } => format!(
                "No config files found. Searched paths: {}",
                search_paths.join(", ")
            ),
            ConfigError::DuplicateWithinFile {
                key, value, paths, ..
            } => format!(
                "Some pages have the same value for '{key}' ('{value}'): {}",
                paths.join(", ")
            ),
            ConfigError::DuplicateAcrossFiles { key, value, .. } => {
                format!("Some books have the same value for '{key}' ('{value}')")
            }
        }
    }

    /// Where the finding applies.
    pub fn location(&self) -> Location {
        match self {
            ConfigError::Parse {
                file,
                position: Some(position),
                ..
            } => Location::Single(format!("{file}:{position}")),
            ConfigError::Parse { file, .. }
            | ConfigError::Validation { file, .. }
            | ConfigError::DuplicateWithinFile { file, .. } => Location::Single(file.clone()),
            ConfigError::MissingConfig { .. } => Location::Single(String::new()),
            ConfigError::DuplicateAcrossFiles { files, .. } => Location::Multiple(files.clone()),
        }
    }

    /// Remediation hint.
    pub fn suggestion(&self) -> String {
        match self {
            ConfigError::Parse { .. } => "Fix YAML in the offending config file.".to_string(),
            ConfigError::Validation { .. } => {
                "Ensure all properties are correctly set based on the schema.".to_string()
            }
            ConfigError::MissingConfig { .. } => {
                "Add at least one valid book configuration file with the `.book.yml` extension."
                    .to_string()
            }
            ConfigError::DuplicateWithinFile { key, .. } => {
                format!("Ensure all values for '{key}' are unique within the file.")
            }
            ConfigError::DuplicateAcrossFiles { key, .. } => {
                format!("Ensure all books have unique values for '{key}'.")
            }
        }
    }

    /// The serializable record for machine consumers.
    pub fn to_record(&self) -> ConfigErrorRecord {
        ConfigErrorRecord {
            category: self.category(),
            description: self.description(),
            location: self.location(),
            suggestion: self.suggestion(),
        }
    }

    /// Render the text block without rewriting any paths.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Description: {}", self.description()),
            format!("Location: {}", self.location()),
        ];
        let suggestion = self.suggestion();
        if !suggestion.is_empty() {
            lines.push(format!("Suggestion: {suggestion}"));
        }
        lines.join("\n")
    }

    /// Render the text block with `base` rewritten to `.`.
    pub fn render_relative_to(&self, base: &Path) -> String {
        relativize_paths(&self.render(), base)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::env::current_dir() {
            Ok(cwd) => f.write_str(&self.render_relative_to(&cwd)),
            Err(_) => f.write_str(&self.render()),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Serialize for ConfigError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// The serialized shape of a [`ConfigError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigErrorRecord {
    /// Broad category.
    pub category: ErrorCategory,
    /// Human-readable cause.
    pub description: String,
    /// One location, or a list for across-file findings.
    pub location: Location,
    /// Remediation hint.
    pub suggestion: String,
}
