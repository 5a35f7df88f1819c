//! Transient scan records
//!
//! Produced by a single check/update invocation and never persisted.

use serde::{Deserialize, Serialize};

/// A workspace declaring a different version than the canonical configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMismatch {
    /// Workspace path relative to the root
    pub workspace: String,
    /// Package name
    pub package: String,
    /// Version the canonical configuration expects
    pub expected: String,
    /// Version the workspace actually declares
    pub actual: String,
    /// True if the workspace's version sorts higher than the canonical one
    pub is_newer: bool,
}

/// A package declared by some workspace but absent from the canonical configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefinedPackage {
    pub name: String,
    pub version: String,
    /// Workspace path, or a comma-joined list after consolidation
    pub location: String,
}

impl UndefinedPackage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            location: location.into(),
        }
    }
}

/// Result of one workspace scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub mismatches: Vec<VersionMismatch>,
    pub has_newer_versions: bool,
    pub undefined_packages: Vec<UndefinedPackage>,
}

impl ScanReport {
    /// True when neither mismatches nor undefined packages were found
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.undefined_packages.is_empty()
    }
}
