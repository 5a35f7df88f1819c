//! Version stability policy
//!
//! Governs how fresh and how major-version-distant a registry candidate may
//! be before the resolver will select it automatically.

use serde::{Deserialize, Serialize};

/// Policy applied when resolving ambiguous or wildcard versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPolicy {
    pub stability: StabilityPolicy,
}

/// Per-component stability rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityPolicy {
    pub major: MajorPolicy,
    pub minor: MinorPolicy,
    pub patch: PatchPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorPolicy {
    /// When true, candidates with a different major version are discarded
    pub freeze: bool,
    /// Minimum days since release before a candidate is eligible
    pub min_stability_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinorPolicy {
    /// Maximum allowed minor-version jump
    pub max_version_jump: u64,
    pub min_stability_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPolicy {
    /// Patch bumps are eligible without confirmation
    pub auto_update: bool,
    pub min_stability_days: i64,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            stability: StabilityPolicy {
                major: MajorPolicy {
                    freeze: true,
                    min_stability_days: 30,
                },
                minor: MinorPolicy {
                    max_version_jump: 1,
                    min_stability_days: 14,
                },
                patch: PatchPolicy {
                    auto_update: true,
                    min_stability_days: 7,
                },
            },
        }
    }
}
