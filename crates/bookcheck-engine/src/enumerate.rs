//! # File Enumeration
//!
//! Expands include patterns into the files a run should look at.
//!
//! ## Pattern Syntax
//!
//! One glob per entry, resolved against the enumerator's base directory
//! unless absolute:
//!
//! - `*` and `?` stay within one path component; `**` crosses components.
//! - A leading `!` turns the entry into an exclude pattern.
//! - Blank entries and entries starting with `#` are ignored.
//! - A pattern that matches a directory also matches everything below it.
//!
//! ## Search Roots
//!
//! Each include pattern is walked from its longest literal directory
//! prefix: `docs/**/*.book.yml` walks `docs/`. Roots are reported back so a
//! caller can say where it looked when nothing matched.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;
use walkdir::WalkDir;

/// Files found for a set of include patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Matched regular files, sorted and de-duplicated.
    pub files: Vec<PathBuf>,
    /// Directories that were searched, in pattern order.
    pub search_paths: Vec<PathBuf>,
}

/// Errors from file enumeration.
#[derive(Error, Debug)]
pub enum EnumerationError {
    /// A pattern is not a valid glob.
    #[error("invalid include pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern as given.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// A directory under a search root could not be read.
    #[error("failed to search {}: {reason}", .root.display())]
    Walk {
        /// The search root being walked.
        root: PathBuf,
        /// Underlying error.
        reason: String,
    },
}

/// Expands include patterns into files.
pub trait FileEnumerator {
    /// Find every file matched by `include`.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerationError`] if a pattern is malformed or a search
    /// root cannot be walked.
    fn enumerate(
        &self,
        include: &[String],
        follow_symbolic_links: bool,
    ) -> Result<Enumeration, EnumerationError>;
}

/// [`FileEnumerator`] over the local filesystem.
#[derive(Debug, Clone)]
pub struct GlobEnumerator {
    base_dir: PathBuf,
}

impl GlobEnumerator {
    /// Resolve relative patterns against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory relative patterns are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn absolutize(&self, pattern: &str) -> PathBuf {
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            self.base_dir.join(pattern)
        }
    }
}

impl FileEnumerator for GlobEnumerator {
    fn enumerate(
        &self,
        include: &[String],
        follow_symbolic_links: bool,
    ) -> Result<Enumeration, EnumerationError> {
        let mut includes = GlobSetBuilder::new();
        let mut excludes = GlobSetBuilder::new();
        let mut search_paths: Vec<PathBuf> = Vec::new();

        for entry in include {
            let entry = entry.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let (negated, raw) = match entry.strip_prefix('!') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, entry),
            };
            let pattern = self.absolutize(raw);
            let target = if negated { &mut excludes } else { &mut includes };
            add_pattern(target, entry, &pattern)?;
            if !negated {
                let root = search_root(&pattern);
                if !search_paths.contains(&root) {
                    search_paths.push(root);
                }
            }
        }

        let includes = build(includes)?;
        let excludes = build(excludes)?;
        tracing::debug!(roots = ?search_paths, "searching for config files");

        let mut files = BTreeSet::new();
        for root in &search_paths {
            if !root.exists() {
                tracing::debug!(root = %root.display(), "search root does not exist");
                continue;
            }
            for entry in WalkDir::new(root).follow_links(follow_symbolic_links) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) if e.loop_ancestor().is_some() => {
                        tracing::warn!(error = %e, "skipping symbolic link loop");
                        continue;
                    }
                    Err(e) => {
                        return Err(EnumerationError::Walk {
                            root: root.clone(),
                            reason: e.to_string(),
                        })
                    }
                };
                let path = entry.path();
                let is_file = entry.file_type().is_file()
                    || (entry.path_is_symlink() && path.is_file());
                if is_file && includes.is_match(path) && !excludes.is_match(path) {
                    files.insert(path.to_path_buf());
                }
            }
        }

        Ok(Enumeration {
            files: files.into_iter().collect(),
            search_paths,
        })
    }
}

/// Add `pattern` and its implicit descendants to `builder`.
fn add_pattern(
    builder: &mut GlobSetBuilder,
    original: &str,
    pattern: &Path,
) -> Result<(), EnumerationError> {
    let text = pattern.to_string_lossy();
    let mut globs = vec![text.to_string()];
    if !text.ends_with("**") {
        globs.push(format!("{}/**", text.trim_end_matches('/')));
    }
    for glob in &globs {
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| EnumerationError::InvalidPattern {
                pattern: original.to_string(),
                reason: e.to_string(),
            })?;
        builder.add(compiled);
    }
    Ok(())
}

fn build(builder: GlobSetBuilder) -> Result<GlobSet, EnumerationError> {
    builder.build().map_err(|e| EnumerationError::InvalidPattern {
        pattern: String::new(),
        reason: e.to_string(),
    })
}

/// The longest leading run of components free of glob syntax.
fn search_root(pattern: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component {
            if part
                .to_string_lossy()
                .contains(|c: char| matches!(c, '*' | '?' | '[' | '{'))
            {
                break;
            }
        }
        root.push(component);
    }
    root
}
