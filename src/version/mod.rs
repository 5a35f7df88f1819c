//! Version comparison and registry version metadata
//!
//! This module provides:
//! - The 3-component version comparator used for mismatch detection
//! - The stable-release filter (with the experimental-tag exemption)
//! - VersionInfo pairing a version with its publish timestamp

mod resolver;

pub use resolver::{SelectionContext, VersionResolver};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Strips a leading `^` or `~` range operator
pub fn normalize_version(version: &str) -> &str {
    version
        .strip_prefix('^')
        .or_else(|| version.strip_prefix('~'))
        .unwrap_or(version)
}

/// Compares two version strings as numeric major.minor.patch triples.
///
/// Leading `^`/`~` operators are stripped and missing or non-numeric
/// components are treated as 0, so `compare_versions("^1.2.0", "1.2.0")`
/// is `Equal`.
///
/// Known limitation: this is deliberately not full semver precedence.
/// Prerelease and build metadata are ignored (`1.0.0-beta` compares equal
/// to `1.0.0`) and components beyond the third are never examined. Kept
/// for compatibility with the mismatch and "is newer" semantics downstream.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let component = |s: &str, i: usize| -> u64 {
        normalize_version(s)
            .split('.')
            .nth(i)
            .and_then(|part| {
                // "2-beta" parses its numeric head; pure text parses as 0
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().ok()
            })
            .unwrap_or(0)
    };

    for i in 0..3 {
        match component(a, i).cmp(&component(b, i)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Returns true if the version string is a stable release.
///
/// Prerelease markers (`-`, `alpha`, `beta`, `rc`) disqualify a version,
/// except that `experimental` tags are treated as stable: certain framework
/// packages publish long-lived experimental lines that must stay selectable.
pub fn is_stable_version(version: &str) -> bool {
    if version.contains("experimental") {
        return true;
    }
    !version.contains('-')
        && !version.contains("alpha")
        && !version.contains("beta")
        && !version.contains("rc")
}

/// A package version paired with its registry publish timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub released_at: DateTime<Utc>,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>, released_at: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            released_at,
        }
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.version, &other.version)
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
