//! # Validate Subcommand
//!
//! Validates every book configuration file in the repository and reports
//! the findings.
//!
//! Every flag falls back to the environment variable a GitHub Actions step
//! receives for the matching input, so the binary runs unchanged as an
//! action:
//!
//! ```bash
//! bookcheck validate --include '**/*.book.yml' --include '!drafts/**'
//! INPUT_AUTO-UPDATE=true GITHUB_REF=refs/heads/release/v1.0 bookcheck validate
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{builder::BoolishValueParser, ArgAction, Args, ValueEnum};

use bookcheck_core::{ReleaseOptions, DEFAULT_RELEASE_PREFIX, DEFAULT_TIMEZONE};
use bookcheck_engine::{validate_repo, ValidateOptions, DEFAULT_INCLUDE};

use crate::report;

/// How findings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks.
    Text,
    /// A JSON array of findings.
    Json,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Glob pattern selecting config files. Repeat, or separate with
    /// newlines; prefix with `!` to exclude.
    #[arg(
        long,
        env = "INPUT_INCLUDE",
        value_delimiter = '\n',
        default_value = DEFAULT_INCLUDE
    )]
    pub include: Vec<String>,

    /// Descend into symbolically linked directories while searching.
    #[arg(
        long,
        env = "INPUT_FOLLOW-SYMBOLIC-LINKS",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = true
    )]
    pub follow_symbolic_links: bool,

    /// Write the release name and date into every valid config.
    #[arg(
        long,
        env = "INPUT_AUTO-UPDATE",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub auto_update: bool,

    /// Branch name prefix that marks a release branch.
    #[arg(long, env = "INPUT_RELEASE-PREFIX", default_value = DEFAULT_RELEASE_PREFIX)]
    pub release_prefix: String,

    /// Timezone for the release date.
    #[arg(long, env = "INPUT_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Fully formed ref of the branch being validated.
    #[arg(long, env = "GITHUB_REF")]
    pub github_ref: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// File receiving step outputs.
    #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
    pub github_output: Option<PathBuf>,

    /// File receiving the step summary.
    #[arg(long, env = "GITHUB_STEP_SUMMARY", hide = true)]
    pub github_step_summary: Option<PathBuf>,
}

impl ValidateArgs {
    /// Engine options for these arguments.
    ///
    /// Include entries are split on newlines and trimmed; blank entries are
    /// dropped.
    pub fn options(&self) -> ValidateOptions {
        let include = self
            .include
            .iter()
            .flat_map(|entry| entry.lines())
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        ValidateOptions {
            include,
            follow_symbolic_links: self.follow_symbolic_links,
            auto_update: self.auto_update,
            branch_ref: self.github_ref.clone().filter(|r| !r.is_empty()),
            release: ReleaseOptions {
                timezone: self.timezone.clone(),
                release_prefix: self.release_prefix.clone(),
            },
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code 0 when every config is valid and 1 when anything was
/// found.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path) -> Result<u8> {
    let options = args.options();
    if options.include.is_empty() {
        bail!(
            "Argument to `include` must be a string of globs \
             (with newline characters separating globs)."
        );
    }
    tracing::debug!(
        include = ?options.include,
        auto_update = options.auto_update,
        release_prefix = %options.release.release_prefix,
        "validating book configs"
    );

    let errors = validate_repo(repo_root, &options).context("validation run failed")?;

    if let Some(path) = &args.github_output {
        report::append_output(path, &errors)?;
    }
    if let Some(path) = &args.github_step_summary {
        report::append_step_summary(path, &errors, repo_root)?;
    }

    match args.format {
        OutputFormat::Text => println!("{}", report::render_text(&errors, repo_root)),
        OutputFormat::Json => println!("{}", report::render_json(&errors)?),
    }

    Ok(if errors.is_empty() { 0 } else { 1 })
}
