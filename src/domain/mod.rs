//! Core domain models for depsync
//!
//! This module contains the fundamental types used throughout the application:
//! - Canonical dependency configuration (category -> package -> version)
//! - Workspace manifest dependency maps
//! - Scan records (mismatches, undefined packages)
//! - Update policy configuration (groups, safety toggles, category rules)
//! - Version stability policy

mod config;
mod manifest;
mod mismatch;
mod policy;
mod update_config;

pub use config::DependencyConfig;
pub use manifest::WorkspaceManifest;
pub use mismatch::{ScanReport, UndefinedPackage, VersionMismatch};
pub use policy::{MajorPolicy, MinorPolicy, PatchPolicy, StabilityPolicy, VersionPolicy};
pub use update_config::{CategoryRule, SafetyChecks, UpdateConfig, UpdateGroup};
