//! npm registry client
//!
//! Fetches package metadata (packuments) from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryClient};
use crate::version::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// npm registry base URL
const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Production registry client over the npm HTTP API
pub struct NpmRegistry {
    client: HttpClient,
}

/// npm packument (the slice of it depsync reads)
#[derive(Debug, Deserialize)]
struct NpmPackument {
    /// dist-tags, of which `latest` is the published current version
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
    /// Per-version publish timestamps (plus `created`/`modified` entries)
    #[serde(default)]
    time: HashMap<String, String>,
    /// Per-version metadata
    #[serde(default)]
    versions: HashMap<String, NpmVersionMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct NpmVersionMetadata {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: BTreeMap<String, String>,
}

impl NpmRegistry {
    /// Create a new npm registry client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the packument URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", NPM_REGISTRY_URL, package)
    }

    async fn fetch_packument(&self, package: &str) -> Result<NpmPackument, RegistryError> {
        let url = self.build_url(package);
        self.client.get_json(&url, package).await
    }

    fn latest_tag(packument: &NpmPackument, package: &str) -> Result<String, RegistryError> {
        packument
            .dist_tags
            .get("latest")
            .cloned()
            .ok_or_else(|| RegistryError::MissingLatest {
                package: package.to_string(),
            })
    }
}

#[async_trait]
impl RegistryClient for NpmRegistry {
    async fn latest_version(&self, package: &str) -> Result<String, RegistryError> {
        let packument = self.fetch_packument(package).await?;
        Self::latest_tag(&packument, package)
    }

    async fn available_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
        let packument = self.fetch_packument(package).await?;

        let mut versions = Vec::new();
        for version in packument.versions.keys() {
            if let Some(time_str) = packument.time.get(version) {
                if let Ok(released_at) = time_str.parse::<DateTime<Utc>>() {
                    versions.push(VersionInfo::new(version.clone(), released_at));
                }
            }
        }

        versions.sort();
        Ok(versions)
    }

    async fn dependency_ranges(
        &self,
        package: &str,
    ) -> Result<BTreeMap<String, String>, RegistryError> {
        let packument = self.fetch_packument(package).await?;
        let latest = Self::latest_tag(&packument, package)?;
        Ok(packument
            .versions
            .get(&latest)
            .map(|meta| meta.dependencies.clone())
            .unwrap_or_default())
    }

    async fn peer_dependency_ranges(
        &self,
        package: &str,
    ) -> Result<BTreeMap<String, String>, RegistryError> {
        let packument = self.fetch_packument(package).await?;
        let latest = Self::latest_tag(&packument, package)?;
        Ok(packument
            .versions
            .get(&latest)
            .map(|meta| meta.peer_dependencies.clone())
            .unwrap_or_default())
    }
}
