//! # Text Formatting Helpers
//!
//! Small string builders shared by error rendering and the CLI report.

use std::path::Path;

/// Format a message followed by an indented bullet list, one bullet per line.
///
/// Each indent level is two spaces. Nesting is done by passing the output of
/// an inner call as one of the bullets with a deeper `indent_level`.
pub fn bullet_list(message: &str, bullets: &[String], indent_level: usize, bullet: char) -> String {
    let indent = "  ".repeat(indent_level);
    let lines: Vec<String> = bullets
        .iter()
        .map(|b| format!("{indent}{bullet} {b}"))
        .collect();
    format!("{message}\n{}", lines.join("\n"))
}

/// Join messages into one string separated by `spacer`.
pub fn cat(messages: &[String], spacer: &str) -> String {
    messages.join(spacer)
}

/// Replace every occurrence of `base` in `output` with `.`.
///
/// Used at render time so absolute paths under the working directory read
/// as relative ones. A `base` of `/` or an empty path is ignored, since
/// rewriting it would mangle every separator.
pub fn relativize_paths(output: &str, base: &Path) -> String {
    let base = base.to_string_lossy();
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return output.to_string();
    }
    output.replace(base, ".")
}
