//! # Release Resolution
//!
//! Derives the release name and date written into book configs when
//! auto-update is enabled.
//!
//! A release is identified by the branch that triggered the run. The branch
//! reference must be fully formed, `refs/heads/<prefix><suffix>`, where the
//! prefix defaults to `release/`. Tag refs (`refs/tags/...`) and pull request
//! merge refs (`refs/pull/<n>/merge`) never resolve.
//!
//! The release name is the version number when the suffix looks like
//! `v1.2` or `v1.2.3`, and the suffix verbatim otherwise, even when empty.
//! The release date
//! is today's date in the requested timezone, rendered in long form
//! (`January 5, 2024`).
//!
//! Resolution failures are returned as [`ReleaseError`] so the caller decides
//! whether a non-release branch aborts the run or is skipped.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timezone used for the release date when none is given.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Branch name prefix that marks a release branch when none is given.
pub const DEFAULT_RELEASE_PREFIX: &str = "release/";

/// Ref namespace for branches.
const BRANCH_REF_NAMESPACE: &str = "refs/heads/";

/// Version-shaped branch suffix: `v` followed by two or three numeric parts.
const VERSION_PATTERN: &str = r"^v(\d+\.\d+(?:\.\d+)?)$";

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern compiles"))
}

/// Long-form calendar date, e.g. `January 5, 2024`.
const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Release name and date for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release name: a version number such as `1.0`, or the branch suffix.
    pub name: String,
    /// Release date in long form.
    pub date: String,
}

/// Settings for release resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOptions {
    /// Olson timezone name used for the release date.
    pub timezone: String,
    /// Branch name prefix that marks a release branch.
    pub release_prefix: String,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            release_prefix: DEFAULT_RELEASE_PREFIX.to_string(),
        }
    }
}

/// Errors from release resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    /// The ref is not a branch ref under the release prefix.
    #[error("'{branch_ref}' does not have the required prefix '{release_prefix}'")]
    NotReleaseBranch {
        /// The ref that was checked.
        branch_ref: String,
        /// The configured release prefix.
        release_prefix: String,
    },

    /// The timezone is not a known Olson name.
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Resolve the release for `branch_ref` as of now.
///
/// # Errors
///
/// See [`determine_release_at`].
pub fn determine_release(branch_ref: &str, options: &ReleaseOptions) -> Result<Release, ReleaseError> {
    determine_release_at(branch_ref, options, Utc::now())
}

/// Resolve the release for `branch_ref` as of `now`.
///
/// # Errors
///
/// - [`ReleaseError::NotReleaseBranch`] unless `branch_ref` starts with
///   `refs/heads/<release_prefix>`.
/// - [`ReleaseError::UnknownTimezone`] if the timezone does not parse.
pub fn determine_release_at(
    branch_ref: &str,
    options: &ReleaseOptions,
    now: DateTime<Utc>,
) -> Result<Release, ReleaseError> {
    let full_prefix = format!("{BRANCH_REF_NAMESPACE}{}", options.release_prefix);
    let suffix = branch_ref
        .strip_prefix(&full_prefix)
        .ok_or_else(|| ReleaseError::NotReleaseBranch {
            branch_ref: branch_ref.to_string(),
            release_prefix: options.release_prefix.clone(),
        })?;
    let name = match version_re().captures(suffix).and_then(|caps| caps.get(1)) {
        Some(number) => number.as_str().to_string(),
        None => suffix.to_string(),
    };

    Ok(Release {
        name,
        date: format_release_date(now, &options.timezone)?,
    })
}

/// Render `now` as a long-form date in `timezone`.
fn format_release_date(now: DateTime<Utc>, timezone: &str) -> Result<String, ReleaseError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| ReleaseError::UnknownTimezone(timezone.to_string()))?;
    Ok(now.with_timezone(&tz).format(LONG_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn defaults() -> ReleaseOptions {
        ReleaseOptions::default()
    }

    #[test]
    fn rejects_refs_outside_release_branches() {
        for branch_ref in [
            "refs/tags/feature-branch-1",
            "refs/pull/2/merge",
            "refs/heads/feature/v1.0",
            "release/v1.0",
        ] {
            let err = determine_release(branch_ref, &defaults()).unwrap_err();
            assert!(
                matches!(err, ReleaseError::NotReleaseBranch { .. }),
                "expected NotReleaseBranch for {branch_ref}, got {err:?}"
            );
        }
    }

    #[test]
    fn error_message_names_ref_and_prefix() {
        let err = determine_release("refs/tags/x", &defaults()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'refs/tags/x' does not have the required prefix 'release/'"
        );
    }

    #[test]
    fn extracts_version_number() {
        let release = determine_release("refs/heads/release/v1.0", &defaults()).unwrap();
        assert_eq!(release.name, "1.0");
        let patch = determine_release("refs/heads/release/v2.10.3", &defaults()).unwrap();
        assert_eq!(patch.name, "2.10.3");
    }

    #[test]
    fn keeps_non_version_suffix_verbatim() {
        let release = determine_release("refs/heads/release/anything", &defaults()).unwrap();
        assert_eq!(release.name, "anything");
        let four_parts = determine_release("refs/heads/release/v1.2.3.4", &defaults()).unwrap();
        assert_eq!(four_parts.name, "v1.2.3.4");
    }

    #[test]
    fn accepts_custom_prefix() {
        let options = ReleaseOptions {
            release_prefix: "test/".to_string(),
            ..defaults()
        };
        let release = determine_release("refs/heads/test/anything", &options).unwrap();
        assert_eq!(release.name, "anything");
        assert!(determine_release("refs/heads/release/anything", &options).is_err());
    }

    #[test]
    fn bare_prefix_resolves_to_empty_name() {
        let release = determine_release("refs/heads/release/", &defaults()).unwrap();
        assert_eq!(release.name, "");
        assert!(!release.date.is_empty());
    }

    #[test]
    fn formats_date_in_requested_timezone() {
        // 03:00 UTC on Jan 6 is still Jan 5 in Los Angeles.
        let now = Utc.with_ymd_and_hms(2024, 1, 6, 3, 0, 0).unwrap();
        let release = determine_release_at("refs/heads/release/v1.0", &defaults(), now).unwrap();
        assert_eq!(release.date, "January 5, 2024");

        let utc = ReleaseOptions {
            timezone: "UTC".to_string(),
            ..defaults()
        };
        let release = determine_release_at("refs/heads/release/v1.0", &utc, now).unwrap();
        assert_eq!(release.date, "January 6, 2024");
    }

    #[test]
    fn current_date_matches_now_in_timezone() {
        let tz: Tz = DEFAULT_TIMEZONE.parse().unwrap();
        let expected = Utc::now().with_timezone(&tz).format(LONG_DATE_FORMAT).to_string();
        let release = determine_release("refs/heads/release/v1.0", &defaults()).unwrap();
        // Guard against the run straddling midnight.
        let after = Utc::now().with_timezone(&tz).format(LONG_DATE_FORMAT).to_string();
        assert!(release.date == expected || release.date == after);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let options = ReleaseOptions {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..defaults()
        };
        let err = determine_release("refs/heads/release/v1.0", &options).unwrap_err();
        assert_eq!(err, ReleaseError::UnknownTimezone("Mars/Olympus_Mons".into()));
    }
}
