//! # bookcheck-cli — Book Configuration Checker
//!
//! Provides the `bookcheck` command-line interface.
//!
//! ## Subcommands
//!
//! - `bookcheck validate`: Validate every `.book.yml` file in the
//!   repository, optionally writing the current release into clean files.
//! - `bookcheck release`: Print the release a branch ref resolves to.
//!
//! ```bash
//! bookcheck validate
//! bookcheck validate --format json --include 'courses/**/*.book.yml'
//! bookcheck -v validate --auto-update true --github-ref refs/heads/release/v1.0
//! bookcheck release refs/heads/release/v1.0
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; every check lives in `bookcheck-engine`.
//! - Handlers return the process exit code: 0 clean, 1 findings. Fatal
//!   errors propagate as `anyhow::Error` and also exit 1.

pub mod release;
pub mod report;
pub mod validate;
