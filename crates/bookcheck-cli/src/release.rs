//! # Release Subcommand
//!
//! Prints the release that auto-update would write for a branch ref,
//! without touching any file.

use anyhow::{Context, Result};
use clap::Args;

use bookcheck_core::{
    bullet_list, determine_release, Release, ReleaseOptions, DEFAULT_RELEASE_PREFIX,
    DEFAULT_TIMEZONE,
};

/// Arguments for the release subcommand.
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Fully formed branch ref, e.g. `refs/heads/release/v1.0`.
    #[arg(env = "GITHUB_REF")]
    pub branch_ref: String,

    /// Branch name prefix that marks a release branch.
    #[arg(long, env = "INPUT_RELEASE-PREFIX", default_value = DEFAULT_RELEASE_PREFIX)]
    pub release_prefix: String,

    /// Timezone for the release date.
    #[arg(long, env = "INPUT_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,
}

/// Execute the release subcommand.
pub fn run_release(args: &ReleaseArgs) -> Result<u8> {
    let options = ReleaseOptions {
        timezone: args.timezone.clone(),
        release_prefix: args.release_prefix.clone(),
    };
    let release = determine_release(&args.branch_ref, &options)
        .with_context(|| format!("cannot resolve a release for '{}'", args.branch_ref))?;
    println!("{}", describe(&args.branch_ref, &release));
    Ok(0)
}

fn describe(branch_ref: &str, release: &Release) -> String {
    bullet_list(
        &format!("Release for '{branch_ref}':"),
        &[
            format!("name: {}", release.name),
            format!("date: {}", release.date),
        ],
        1,
        '-',
    )
}
