//! # Validation Engine
//!
//! Drives one validation run over a repository.
//!
//! Per file, in enumeration order:
//!
//! 1. Parse the YAML. A parse failure is recorded and the file is skipped.
//! 2. Validate against the book schema, recording every violation.
//! 3. Check `shortName` values for repeats inside the file.
//! 4. When auto-update is on, a branch ref is known, and steps 1-3 found
//!    nothing, write the release name and date into `variables`.
//!
//! After the last file, `name` and `sortOrder` are checked across every
//! parsed file, including files with schema errors.
//!
//! The release is resolved lazily, once per run, right before the first
//! write. A ref that does not name a release therefore aborts the run
//! before any file is modified.

use std::path::{Path, PathBuf};

use bookcheck_core::{
    determine_release, ConfigError, Position, Release, ReleaseOptions,
    BOOK_CONFIG_SUFFIX, RELEASE_DATE_VARIABLE, RELEASE_VARIABLE, UNIQUE_ACROSS_FILES_KEYS,
    UNIQUE_WITHIN_FILE_KEY,
};
use bookcheck_schema::{yaml_to_json, SchemaValidator};
use serde_json::Value;
use serde_yaml::Mapping;

use crate::duplicates::{check_unique_across_files, check_unique_within_file};
use crate::enumerate::{FileEnumerator, GlobEnumerator};
use crate::error::EngineError;
use crate::store::{ConfigStore, FsStore};

/// Include pattern used when none is given.
pub const DEFAULT_INCLUDE: &str = "**/*.book.yml";

/// Settings for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Glob patterns selecting candidate files; `!` excludes.
    pub include: Vec<String>,
    /// Descend into symlinked directories while searching.
    pub follow_symbolic_links: bool,
    /// Write the current release into clean files.
    pub auto_update: bool,
    /// Fully formed ref of the branch that triggered the run.
    pub branch_ref: Option<String>,
    /// Release resolution settings.
    pub release: ReleaseOptions,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            include: vec![DEFAULT_INCLUDE.to_string()],
            follow_symbolic_links: true,
            auto_update: false,
            branch_ref: None,
            release: ReleaseOptions::default(),
        }
    }
}

/// A parsed config in both of its forms.
struct ParsedConfig {
    /// The YAML tree, edited and written back on auto-update.
    yaml: serde_yaml::Value,
    /// The order-preserving JSON tree every check reads.
    json: Value,
}

/// Validates a set of book configs.
pub struct RepoValidator<'a> {
    enumerator: &'a dyn FileEnumerator,
    store: &'a dyn ConfigStore,
    schema: SchemaValidator,
}

impl std::fmt::Debug for RepoValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<'a> RepoValidator<'a> {
    /// Create a validator using the embedded book schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Schema`] if the schema does not compile.
    pub fn new(
        enumerator: &'a dyn FileEnumerator,
        store: &'a dyn ConfigStore,
    ) -> Result<Self, EngineError> {
        Ok(Self::with_schema(enumerator, store, SchemaValidator::new()?))
    }

    /// Create a validator with an already compiled schema.
    pub fn with_schema(
        enumerator: &'a dyn FileEnumerator,
        store: &'a dyn ConfigStore,
        schema: SchemaValidator,
    ) -> Self {
        Self {
            enumerator,
            store,
            schema,
        }
    }

    /// Run every check and return the findings, empty when all configs are
    /// valid.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when enumeration fails, a matched file cannot
    /// be read or rewritten, or auto-update cannot resolve a release.
    pub fn validate(&self, options: &ValidateOptions) -> Result<Vec<ConfigError>, EngineError> {
        let enumeration = self
            .enumerator
            .enumerate(&options.include, options.follow_symbolic_links)?;
        tracing::debug!(count = enumeration.files.len(), "enumerated candidate files");

        let files: Vec<&PathBuf> = enumeration
            .files
            .iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(BOOK_CONFIG_SUFFIX))
            })
            .collect();

        if files.is_empty() {
            let search_paths = enumeration
                .search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            tracing::info!("no book config files found");
            return Ok(vec![ConfigError::missing_config(search_paths)]);
        }

        let update_ref = match (&options.branch_ref, options.auto_update) {
            (Some(branch_ref), true) => Some(branch_ref.as_str()),
            (None, true) => {
                tracing::warn!("auto-update requested without a branch ref; skipping updates");
                None
            }
            (_, false) => None,
        };

        let mut errors = Vec::new();
        let mut parsed: Vec<(String, Value)> = Vec::with_capacity(files.len());
        let mut release: Option<Release> = None;
        let mut updated = 0usize;

        for path in files {
            let file = path.display().to_string();
            tracing::debug!(file = %file, "parsing config");
            let bytes = self.store.read(path).map_err(|source| EngineError::Read {
                path: path.clone(),
                source,
            })?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(file = %file, "config is not UTF-8");
                    errors.push(ConfigError::parse(&file, e.to_string(), None));
                    continue;
                }
            };

            let config = match parse_config(&file, &text) {
                Ok(config) => config,
                Err(error) => {
                    tracing::debug!(file = %file, "parse failed");
                    errors.push(error);
                    continue;
                }
            };

            let before = errors.len();
            tracing::debug!(file = %file, "validating schema");
            errors.extend(
                self.schema
                    .violations(&config.json)
                    .into_iter()
                    .map(|violation| ConfigError::validation(&file, violation)),
            );
            tracing::debug!(file = %file, key = UNIQUE_WITHIN_FILE_KEY, "checking unique values");
            errors.extend(check_unique_within_file(
                &file,
                &config.json,
                UNIQUE_WITHIN_FILE_KEY,
            ));
            let clean = errors.len() == before;

            if clean {
                tracing::debug!(file = %file, book = %config.json["name"], "config is valid");
            }

            if let (true, Some(branch_ref)) = (clean, update_ref) {
                if release.is_none() {
                    let resolved = determine_release(branch_ref, &options.release)?;
                    tracing::info!(release = %resolved.name, date = %resolved.date, "resolved release");
                    release = Some(resolved);
                }
                if let Some(release) = &release {
                    self.write_release(path, config.yaml, release)?;
                    updated += 1;
                }
            }

            parsed.push((file, config.json));
        }

        tracing::debug!(files = parsed.len(), "checking unique values across files");
        errors.extend(check_unique_across_files(&parsed, &UNIQUE_ACROSS_FILES_KEYS));

        tracing::info!(
            files = parsed.len(),
            errors = errors.len(),
            updated,
            "validation finished"
        );
        Ok(errors)
    }

    fn write_release(
        &self,
        path: &Path,
        mut yaml: serde_yaml::Value,
        release: &Release,
    ) -> Result<(), EngineError> {
        let not_a_mapping = |what: &str| EngineError::Serialize {
            path: path.to_path_buf(),
            reason: format!("{what} is not a mapping"),
        };
        let root = yaml
            .as_mapping_mut()
            .ok_or_else(|| not_a_mapping("document root"))?;
        let variables = root
            .entry(serde_yaml::Value::from("variables"))
            .or_insert_with(|| serde_yaml::Value::Mapping(Mapping::new()));
        if variables.is_null() {
            *variables = serde_yaml::Value::Mapping(Mapping::new());
        }
        let variables = variables
            .as_mapping_mut()
            .ok_or_else(|| not_a_mapping("'variables'"))?;
        variables.insert(RELEASE_VARIABLE.into(), release.name.clone().into());
        variables.insert(RELEASE_DATE_VARIABLE.into(), release.date.clone().into());

        let contents = serde_yaml::to_string(&yaml).map_err(|e| EngineError::Serialize {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(file = %path.display(), "writing release variables");
        self.store
            .write(path, &contents)
            .map_err(|source| EngineError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Parse `text` into both trees, or the parse error to report for `file`.
fn parse_config(file: &str, text: &str) -> Result<ParsedConfig, ConfigError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| {
        let position = e.location().map(|location| Position {
            line: location.line(),
            column: location.column(),
        });
        ConfigError::parse(file, e.to_string(), position)
    })?;
    let json = yaml_to_json(&yaml).map_err(|message| ConfigError::parse(file, message, None))?;
    Ok(ParsedConfig { yaml, json })
}

/// Validate the configs under `base_dir` on the local filesystem.
///
/// # Errors
///
/// See [`RepoValidator::validate`].
pub fn validate_repo(
    base_dir: &Path,
    options: &ValidateOptions,
) -> Result<Vec<ConfigError>, EngineError> {
    let enumerator = GlobEnumerator::new(base_dir);
    RepoValidator::new(&enumerator, &FsStore)?.validate(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::io;

    use crate::enumerate::{Enumeration, EnumerationError};

    /// In-memory files keyed by path.
    #[derive(Default)]
    struct MemoryRepo {
        files: RefCell<BTreeMap<PathBuf, String>>,
        writes: RefCell<Vec<PathBuf>>,
    }

    impl MemoryRepo {
        fn with(files: &[(&str, &str)]) -> Self {
            let repo = Self::default();
            for (path, contents) in files {
                repo.files
                    .borrow_mut()
                    .insert(PathBuf::from(path), contents.to_string());
            }
            repo
        }

        fn contents(&self, path: &str) -> String {
            self.files.borrow()[Path::new(path)].clone()
        }
    }

    impl FileEnumerator for MemoryRepo {
        fn enumerate(&self, _: &[String], _: bool) -> Result<Enumeration, EnumerationError> {
            Ok(Enumeration {
                files: self.files.borrow().keys().cloned().collect(),
                search_paths: vec![PathBuf::from("/repo")],
            })
        }
    }

    impl ConfigStore for MemoryRepo {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .map(|contents| contents.clone().into_bytes())
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            self.writes.borrow_mut().push(path.to_path_buf());
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    fn run(repo: &MemoryRepo, options: &ValidateOptions) -> Result<Vec<ConfigError>, EngineError> {
        RepoValidator::new(repo, repo).unwrap().validate(options)
    }

    fn release_options(branch_ref: &str) -> ValidateOptions {
        ValidateOptions {
            auto_update: true,
            branch_ref: Some(branch_ref.to_string()),
            ..ValidateOptions::default()
        }
    }

    #[test]
    fn non_book_files_are_ignored() {
        let repo = MemoryRepo::with(&[("/repo/notes.yml", "name: x\n")]);
        let errors = run(&repo, &ValidateOptions::default()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].description(),
            "No config files found. Searched paths: /repo"
        );
    }

    #[test]
    fn parse_errors_carry_position() {
        let repo = MemoryRepo::with(&[("/repo/a.book.yml", "name: \"unterminated\nsortOrder: 1\n")]);
        let errors = run(&repo, &ValidateOptions::default()).unwrap();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::Parse {
                file, position, ..
            } => {
                assert_eq!(file, "/repo/a.book.yml");
                assert!(position.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn schema_errors_do_not_stop_uniqueness_checks() {
        let repo = MemoryRepo::with(&[
            ("/repo/a.book.yml", "name: Same\nsortOrder: one\n"),
            ("/repo/b.book.yml", "name: Same\nsortOrder: 2\n"),
        ]);
        let errors = run(&repo, &ValidateOptions::default()).unwrap();
        let categories: Vec<&str> = errors.iter().map(|e| e.category().as_str()).collect();
        assert_eq!(categories, ["schema", "uniqueness"]);
    }

    #[test]
    fn auto_update_writes_release_once_resolved() {
        let repo = MemoryRepo::with(&[
            ("/repo/a.book.yml", "name: A\nsortOrder: 1\n"),
            ("/repo/b.book.yml", "name: B\nsortOrder: 2\nvariables:\n  keep: me\n"),
        ]);
        let errors = run(&repo, &release_options("refs/heads/release/v1.0")).unwrap();
        assert!(errors.is_empty());
        assert_eq!(repo.writes.borrow().len(), 2);

        let b: serde_yaml::Value = serde_yaml::from_str(&repo.contents("/repo/b.book.yml")).unwrap();
        assert_eq!(b["variables"]["release"], serde_yaml::Value::from("1.0"));
        assert_eq!(b["variables"]["keep"], serde_yaml::Value::from("me"));
        assert!(b["variables"]["release_date"].as_str().is_some());
    }

    #[test]
    fn auto_update_without_ref_writes_nothing() {
        let repo = MemoryRepo::with(&[("/repo/a.book.yml", "name: A\nsortOrder: 1\n")]);
        let options = ValidateOptions {
            auto_update: true,
            ..ValidateOptions::default()
        };
        assert!(run(&repo, &options).unwrap().is_empty());
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn bad_ref_aborts_before_writing() {
        let repo = MemoryRepo::with(&[("/repo/a.book.yml", "name: A\nsortOrder: 1\n")]);
        let err = run(&repo, &release_options("refs/pull/2/merge")).unwrap_err();
        assert!(matches!(err, EngineError::Release(_)));
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn bad_ref_is_ignored_when_nothing_is_clean() {
        let repo = MemoryRepo::with(&[("/repo/a.book.yml", "name: A\n")]);
        let errors = run(&repo, &release_options("refs/pull/2/merge")).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn release_into_non_mapping_is_an_error() {
        let repo = MemoryRepo::default();
        let validator = RepoValidator::new(&repo, &repo).unwrap();
        let release = Release {
            name: "1.0".into(),
            date: "January 5, 2024".into(),
        };
        let path = Path::new("/repo/a.book.yml");

        let root = serde_yaml::Value::Sequence(vec![]);
        let err = validator.write_release(path, root, &release).unwrap_err();
        assert!(err.to_string().contains("document root is not a mapping"));

        let variables: serde_yaml::Value =
            serde_yaml::from_str("name: A\nvariables: [1]\n").unwrap();
        let err = validator.write_release(path, variables, &release).unwrap_err();
        assert!(matches!(err, EngineError::Serialize { .. }));
        assert!(repo.writes.borrow().is_empty());
    }

    #[test]
    fn unreadable_file_is_an_engine_error() {
        struct Listing;
        impl FileEnumerator for Listing {
            fn enumerate(&self, _: &[String], _: bool) -> Result<Enumeration, EnumerationError> {
                Ok(Enumeration {
                    files: vec![PathBuf::from("/repo/gone.book.yml")],
                    search_paths: vec![],
                })
            }
        }
        let store = MemoryRepo::default();
        let err = RepoValidator::new(&Listing, &store)
            .unwrap()
            .validate(&ValidateOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Read { .. }));
    }
}
