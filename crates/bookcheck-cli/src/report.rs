//! # Reporting
//!
//! Renders validation findings for people and for CI.
//!
//! - Text: a header followed by one `Description:` / `Location:` /
//!   `Suggestion:` block per finding, blank-line separated, with the
//!   repository root rewritten to `.`.
//! - JSON: an array of `{category, description, location, suggestion}`.
//! - GitHub Actions: `errors=<json>` appended to the step output file and a
//!   markdown table appended to the step summary file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use bookcheck_core::{cat, relativize_paths, ConfigError};

/// First line of the text report.
pub const REPORT_HEADER: &str = "Some errors were found when validating the book configuration files";

/// Printed by the text report when nothing was found.
pub const CLEAN_MESSAGE: &str = "All book configuration files are valid.";

/// The human-readable report, with `base` rewritten to `.`.
pub fn render_text(errors: &[ConfigError], base: &Path) -> String {
    if errors.is_empty() {
        return CLEAN_MESSAGE.to_string();
    }
    let mut blocks = vec![REPORT_HEADER.to_string()];
    blocks.extend(errors.iter().map(|error| error.render_relative_to(base)));
    cat(&blocks, "\n\n")
}

/// The findings as a pretty-printed JSON array.
pub fn render_json(errors: &[ConfigError]) -> Result<String> {
    serde_json::to_string_pretty(errors).context("failed to serialize findings")
}

/// A markdown summary of the findings, with `base` rewritten to `.`.
pub fn render_step_summary(errors: &[ConfigError], base: &Path) -> String {
    let mut out = String::from("## Book configuration\n\n");
    if errors.is_empty() {
        out.push_str(CLEAN_MESSAGE);
        out.push('\n');
        return out;
    }
    out.push_str(&format!("{} problem(s) found.\n\n", errors.len()));
    out.push_str("| Category | Location | Description |\n");
    out.push_str("| --- | --- | --- |\n");
    for error in errors {
        let location = relativize_paths(&error.location().to_string(), base);
        let description = relativize_paths(&error.description(), base);
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            error.category(),
            table_cell(&location),
            table_cell(&description)
        ));
    }
    out
}

/// Escape a value for a single markdown table cell.
fn table_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', "<br>")
}

/// Append `errors=<json>` to the GitHub step output file.
pub fn append_output(path: &Path, errors: &[ConfigError]) -> Result<()> {
    let json = serde_json::to_string(errors).context("failed to serialize findings")?;
    append(path, &format!("errors={json}\n"))
}

/// Append the markdown summary to the GitHub step summary file.
pub fn append_step_summary(path: &Path, errors: &[ConfigError], base: &Path) -> Result<()> {
    append(path, &render_step_summary(errors, base))
}

fn append(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}
