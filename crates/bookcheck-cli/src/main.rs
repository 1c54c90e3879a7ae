//! # bookcheck CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookcheck_cli::release::{run_release, ReleaseArgs};
use bookcheck_cli::validate::{run_validate, ValidateArgs};

/// Validate book configuration files.
///
/// Checks every `.book.yml` file against the book schema, enforces unique
/// book names, sort orders, and page short names, and can stamp the current
/// release into each valid config.
#[derive(Parser, Debug)]
#[command(name = "bookcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Repository root; defaults to the current directory.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the repository's book configuration files.
    Validate(ValidateArgs),

    /// Show the release a branch ref resolves to.
    Release(ReleaseArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let repo_root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &repo_root),
        Commands::Release(args) => run_release(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcheck_cli::validate::OutputFormat;

    #[test]
    fn cli_parse_validate_defaults() {
        let cli = Cli::try_parse_from(["bookcheck", "validate"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.root.is_none());
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.include.is_empty());
    }

    #[test]
    fn cli_parse_validate_flags() {
        let cli = Cli::try_parse_from([
            "bookcheck",
            "-vv",
            "--root",
            "/repo",
            "validate",
            "--include",
            "a/**/*.book.yml",
            "--include",
            "!a/drafts/**",
            "--follow-symbolic-links",
            "false",
            "--auto-update",
            "true",
            "--release-prefix",
            "test/",
            "--timezone",
            "UTC",
            "--github-ref",
            "refs/heads/test/x",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, Some(PathBuf::from("/repo")));
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.include, ["a/**/*.book.yml", "!a/drafts/**"]);
        assert!(!args.follow_symbolic_links);
        assert!(args.auto_update);
        assert_eq!(args.release_prefix, "test/");
        assert_eq!(args.timezone, "UTC");
        assert_eq!(args.github_ref.as_deref(), Some("refs/heads/test/x"));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn cli_parse_newline_separated_include() {
        let cli =
            Cli::try_parse_from(["bookcheck", "validate", "--include", "a.book.yml\nb.book.yml"])
                .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.include, ["a.book.yml", "b.book.yml"]);
    }

    #[test]
    fn cli_parse_boolish_values() {
        let cli =
            Cli::try_parse_from(["bookcheck", "validate", "--auto-update", "yes"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(args.auto_update);
    }

    #[test]
    fn cli_parse_release() {
        let cli = Cli::try_parse_from([
            "bookcheck",
            "release",
            "refs/heads/release/v1.0",
            "--timezone",
            "UTC",
        ])
        .unwrap();
        let Commands::Release(args) = cli.command else {
            panic!("expected release");
        };
        assert_eq!(args.branch_ref, "refs/heads/release/v1.0");
        assert_eq!(args.timezone, "UTC");
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["bookcheck", "validate", "--format", "xml"]).is_err());
    }
}
