//! npm registry access
//!
//! This module provides:
//! - A shared HTTP client with retry logic
//! - The RegistryClient trait the rest of the crate depends on
//! - The production NpmRegistry implementation

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::NpmRegistry;

use crate::error::RegistryError;
use crate::version::VersionInfo;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Version metadata lookups against a package registry.
///
/// The production implementation talks to the npm registry over HTTP; tests
/// substitute fakes. The contract is "given a package name, return version
/// metadata", not "invoke a specific external binary".
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// The registry's current published version (the `latest` dist-tag)
    async fn latest_version(&self, package: &str) -> Result<String, RegistryError>;

    /// Every published version with its release timestamp, sorted ascending
    async fn available_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError>;

    /// The latest version's dependency ranges (empty map if none)
    async fn dependency_ranges(
        &self,
        package: &str,
    ) -> Result<BTreeMap<String, String>, RegistryError>;

    /// The latest version's peer-dependency ranges (empty map if none)
    async fn peer_dependency_ranges(
        &self,
        package: &str,
    ) -> Result<BTreeMap<String, String>, RegistryError>;
}
