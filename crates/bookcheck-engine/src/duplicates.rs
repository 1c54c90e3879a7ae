//! # Duplicate Detection
//!
//! Two checks built on [`LocationTracker`]:
//!
//! - [`check_unique_within_file`] walks one parsed document depth first and
//!   tracks every string value of a key against its structural path, e.g.
//!   `chapters[0].pages[1].shortName`.
//! - [`check_unique_across_files`] tracks root-level values of a set of keys
//!   against the file they came from.
//!
//! A value seen at two or more locations yields one error listing all of
//! them. Empty values are never tracked.

use bookcheck_core::{ConfigError, LocationTracker};
use serde_json::Value;

/// Report values of `key` that repeat inside one document.
///
/// Only string values count. The walk follows document order, so paths in
/// an error appear in the order they occur in the file.
pub fn check_unique_within_file(file: &str, document: &Value, key: &str) -> Vec<ConfigError> {
    let mut tracker = LocationTracker::new();
    walk(document, key, "", &mut tracker);
    tracker
        .groups_with_more_than_one_member()
        .map(|(value, paths)| ConfigError::DuplicateWithinFile {
            file: file.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            paths: paths.to_vec(),
        })
        .collect()
}

fn walk(node: &Value, key: &str, path: &str, tracker: &mut LocationTracker<String>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(value)) = map.get(key) {
                tracker.track(value.as_str(), join(path, key));
            }
            for (name, child) in map {
                if is_container(child) {
                    walk(child, key, &join(path, name), tracker);
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if is_container(item) {
                    walk(item, key, &format!("{path}[{index}]"), tracker);
                }
            }
        }
        _ => {}
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Report root-level values of `keys` shared by more than one document.
///
/// `documents` pairs each file with its parsed tree, in the order files were
/// processed. Scalars are compared by their string form, so `sortOrder: 1`
/// and `sortOrder: "1"` collide. Missing, null, and non-scalar values are
/// ignored. Errors are grouped by key in `keys` order.
pub fn check_unique_across_files(documents: &[(String, Value)], keys: &[&str]) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for key in keys {
        let mut tracker = LocationTracker::new();
        for (file, document) in documents {
            if let Some(value) = document.get(key).and_then(scalar_string) {
                tracker.track(value, file.clone());
            }
        }
        errors.extend(tracker.groups_with_more_than_one_member().map(|(value, files)| {
            ConfigError::DuplicateAcrossFiles {
                files: files.to_vec(),
                key: key.to_string(),
                value: value.to_string(),
            }
        }));
    }
    errors
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
