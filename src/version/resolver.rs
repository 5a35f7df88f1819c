//! Policy-driven version resolution
//!
//! Resolves ambiguous and wildcard version specifiers against the registry
//! under a stability policy: stable releases only, optional major-version
//! freeze, a minimum days-since-release window, and satisfaction of the
//! package's own dependency/peer ranges.

use crate::domain::VersionPolicy;
use crate::error::ResolveError;
use crate::registry::RegistryClient;
use crate::version::{compare_versions, is_stable_version, normalize_version};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Inputs for one resolution: where the package is now and which ranges a
/// candidate must satisfy
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub current_version: String,
    pub dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
}

impl SelectionContext {
    pub fn new(current_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            ..Self::default()
        }
    }
}

/// Resolves versions against the registry under a stability policy
pub struct VersionResolver {
    registry: Arc<dyn RegistryClient>,
    policy: VersionPolicy,
    now: DateTime<Utc>,
}

impl VersionResolver {
    /// Create a resolver with the default policy
    pub fn new(registry: Arc<dyn RegistryClient>) -> Self {
        Self::with_policy(registry, VersionPolicy::default())
    }

    /// Create a resolver with a custom policy
    pub fn with_policy(registry: Arc<dyn RegistryClient>, policy: VersionPolicy) -> Self {
        Self {
            registry,
            policy,
            now: Utc::now(),
        }
    }

    /// Create a resolver with a fixed clock (for testing)
    pub fn with_time(
        registry: Arc<dyn RegistryClient>,
        policy: VersionPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            registry,
            policy,
            now,
        }
    }

    /// Selects the greatest registry version that survives the policy.
    ///
    /// Candidates are filtered to stable releases, optionally frozen to the
    /// current major, aged past the stability window, and checked against
    /// every supplied dependency/peer range. Survivors are sorted explicitly
    /// rather than trusting registry enumeration order.
    pub async fn select_appropriate_version(
        &self,
        package: &str,
        ctx: &SelectionContext,
    ) -> Result<String, ResolveError> {
        let versions = self.registry.available_versions(package).await?;

        let current = normalize_version(&ctx.current_version);
        let current_major = semver::Version::parse(current)
            .map_err(|e| ResolveError::InvalidVersion {
                package: package.to_string(),
                version: ctx.current_version.clone(),
                message: e.to_string(),
            })?
            .major;

        // The reference filter applies the major stability window to every
        // candidate; the minor/patch windows are policy data only.
        let min_days = self.policy.stability.major.min_stability_days;
        let freeze = self.policy.stability.major.freeze;

        let mut survivors: Vec<_> = versions
            .iter()
            .filter(|v| is_stable_version(&v.version))
            .filter(|v| match semver::Version::parse(&v.version) {
                Ok(parsed) => !freeze || parsed.major == current_major,
                Err(_) => false,
            })
            .filter(|v| (self.now - v.released_at).num_days() >= min_days)
            .filter(|v| {
                satisfies_all(&v.version, &ctx.dependencies)
                    && satisfies_all(&v.version, &ctx.peer_dependencies)
            })
            .collect();

        survivors.sort_by(|a, b| compare_versions(&a.version, &b.version));

        survivors
            .last()
            .map(|v| v.version.clone())
            .ok_or_else(|| ResolveError::NoCompatibleVersion {
                package: package.to_string(),
            })
    }

    /// Resolves a wildcard specifier (`*`, `^X...`, or `X.Y.Z` with embedded
    /// wildcard characters) to one concrete version.
    ///
    /// The search is pinned to the specifier's major where one is present;
    /// a bare `*` searches from a `0.0.0` baseline.
    pub async fn resolve_wildcard_version(
        &self,
        package: &str,
        wildcard: &str,
        dependencies: &BTreeMap<String, String>,
        peer_dependencies: &BTreeMap<String, String>,
    ) -> Result<String, ResolveError> {
        let major = if let Some(rest) = wildcard.strip_prefix('^') {
            rest.split('.').next().unwrap_or("0")
        } else if wildcard != "*" {
            wildcard.split('.').next().unwrap_or("0")
        } else {
            "*"
        };

        let baseline = if major == "*" {
            "0.0.0".to_string()
        } else {
            format!("{}.0.0", major)
        };

        let ctx = SelectionContext {
            current_version: baseline,
            dependencies: dependencies.clone(),
            peer_dependencies: peer_dependencies.clone(),
        };
        self.select_appropriate_version(package, &ctx).await
    }

    /// Normalizes a specifier to a fixed version for canonical storage.
    ///
    /// Strips range operators; resolves wildcard characters through the
    /// registry; passes `experimental` strings through unchanged with an
    /// informational note for known framework packages and a stability
    /// warning for anything else.
    pub async fn normalize_to_fixed_version(
        &self,
        version: &str,
        package: &str,
    ) -> Result<String, ResolveError> {
        let normalized = normalize_version(version).to_string();

        if normalized.contains("experimental") {
            if is_framework_experimental(package) {
                eprintln!(
                    "{} {} uses the experimental line {}",
                    "note:".cyan().bold(),
                    package,
                    normalized.dimmed()
                );
            } else {
                eprintln!(
                    "{} {}@{} is an experimental version; consider a stable release",
                    "warning:".yellow().bold(),
                    package,
                    normalized
                );
            }
            return Ok(normalized);
        }

        if normalized.chars().any(|c| matches!(c, 'x' | 'X' | '*')) {
            let dependencies = self
                .registry
                .dependency_ranges(package)
                .await
                .unwrap_or_default();
            let peer_dependencies = self
                .registry
                .peer_dependency_ranges(package)
                .await
                .unwrap_or_default();

            return self
                .resolve_wildcard_version(package, &normalized, &dependencies, &peer_dependencies)
                .await;
        }

        Ok(normalized)
    }
}

/// Framework packages that intentionally publish experimental lines
fn is_framework_experimental(package: &str) -> bool {
    package == "scheduler" || package == "next" || package.starts_with("@next")
}

/// True if the version satisfies every range in the map.
///
/// Ranges the semver crate cannot parse (npm `||` unions, tags) are treated
/// as non-constraining.
fn satisfies_all(version: &str, ranges: &BTreeMap<String, String>) -> bool {
    let Ok(parsed) = semver::Version::parse(version) else {
        return false;
    };
    ranges
        .values()
        .all(|range| match semver::VersionReq::parse(range) {
            Ok(req) => req.matches(&parsed),
            Err(_) => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::version::VersionInfo;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    /// Registry fake serving a fixed version list
    struct FixedRegistry {
        versions: Vec<VersionInfo>,
        dependencies: BTreeMap<String, String>,
        peer_dependencies: BTreeMap<String, String>,
    }

    impl FixedRegistry {
        fn new(versions: Vec<VersionInfo>) -> Self {
            Self {
                versions,
                dependencies: BTreeMap::new(),
                peer_dependencies: BTreeMap::new(),
            }
        }
    }

    #[async_trait]
    impl RegistryClient for FixedRegistry {
        async fn latest_version(&self, _package: &str) -> Result<String, RegistryError> {
            self.versions
                .last()
                .map(|v| v.version.clone())
                .ok_or_else(|| RegistryError::package_not_found("fixture"))
        }

        async fn available_versions(
            &self,
            _package: &str,
        ) -> Result<Vec<VersionInfo>, RegistryError> {
            Ok(self.versions.clone())
        }

        async fn dependency_ranges(
            &self,
            _package: &str,
        ) -> Result<BTreeMap<String, String>, RegistryError> {
            Ok(self.dependencies.clone())
        }

        async fn peer_dependency_ranges(
            &self,
            _package: &str,
        ) -> Result<BTreeMap<String, String>, RegistryError> {
            Ok(self.peer_dependencies.clone())
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn released(days_ago: i64) -> DateTime<Utc> {
        fixed_now() - Duration::days(days_ago)
    }

    fn resolver_with(versions: Vec<VersionInfo>) -> VersionResolver {
        VersionResolver::with_time(
            Arc::new(FixedRegistry::new(versions)),
            VersionPolicy::default(),
            fixed_now(),
        )
    }

    #[tokio::test]
    async fn test_select_respects_major_freeze() {
        let resolver = resolver_with(vec![
            VersionInfo::new("1.4.0", released(200)),
            VersionInfo::new("1.5.0", released(100)),
            VersionInfo::new("2.0.0", released(100)),
        ]);

        let version = resolver
            .select_appropriate_version("lodash", &SelectionContext::new("1.2.0"))
            .await
            .unwrap();
        assert_eq!(version, "1.5.0");
    }

    #[tokio::test]
    async fn test_select_respects_stability_window() {
        let resolver = resolver_with(vec![
            VersionInfo::new("1.4.0", released(60)),
            VersionInfo::new("1.5.0", released(3)),
        ]);

        let version = resolver
            .select_appropriate_version("lodash", &SelectionContext::new("1.2.0"))
            .await
            .unwrap();
        // 1.5.0 is only 3 days old; the 30-day window excludes it
        assert_eq!(version, "1.4.0");
    }

    #[tokio::test]
    async fn test_select_filters_prereleases() {
        let resolver = resolver_with(vec![
            VersionInfo::new("1.4.0", released(60)),
            VersionInfo::new("1.5.0-beta.1", released(60)),
            VersionInfo::new("1.6.0-rc", released(60)),
        ]);

        let version = resolver
            .select_appropriate_version("lodash", &SelectionContext::new("1.2.0"))
            .await
            .unwrap();
        assert_eq!(version, "1.4.0");
    }

    #[tokio::test]
    async fn test_select_sorts_survivors_explicitly() {
        // Registry order deliberately scrambled and lexicographically misleading
        let resolver = resolver_with(vec![
            VersionInfo::new("1.10.0", released(90)),
            VersionInfo::new("1.2.0", released(300)),
            VersionInfo::new("1.9.0", released(120)),
        ]);

        let version = resolver
            .select_appropriate_version("lodash", &SelectionContext::new("1.0.0"))
            .await
            .unwrap();
        assert_eq!(version, "1.10.0");
    }

    #[tokio::test]
    async fn test_select_checks_ranges() {
        let resolver = resolver_with(vec![
            VersionInfo::new("1.4.0", released(200)),
            VersionInfo::new("1.8.0", released(100)),
        ]);

        let mut ctx = SelectionContext::new("1.2.0");
        ctx.peer_dependencies
            .insert("react".to_string(), "<1.5.0".to_string());

        let version = resolver
            .select_appropriate_version("some-lib", &ctx)
            .await
            .unwrap();
        assert_eq!(version, "1.4.0");
    }

    #[tokio::test]
    async fn test_select_unparseable_range_is_skipped() {
        let resolver = resolver_with(vec![VersionInfo::new("1.4.0", released(200))]);

        let mut ctx = SelectionContext::new("1.2.0");
        ctx.dependencies
            .insert("react".to_string(), "^16 || ^17".to_string());

        let version = resolver
            .select_appropriate_version("some-lib", &ctx)
            .await
            .unwrap();
        assert_eq!(version, "1.4.0");
    }

    #[tokio::test]
    async fn test_select_no_compatible_version() {
        let resolver = resolver_with(vec![
            VersionInfo::new("2.0.0", released(100)),
            VersionInfo::new("3.0.0", released(100)),
        ]);

        let err = resolver
            .select_appropriate_version("lodash", &SelectionContext::new("1.2.0"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoCompatibleVersion { .. }));
    }

    #[tokio::test]
    async fn test_resolve_wildcard_caret_pins_major() {
        let resolver = resolver_with(vec![
            VersionInfo::new("17.0.2", released(400)),
            VersionInfo::new("18.2.0", released(100)),
        ]);

        let version = resolver
            .resolve_wildcard_version("react", "^18.x", &BTreeMap::new(), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(version, "18.2.0");
    }

    #[tokio::test]
    async fn test_resolve_wildcard_bare_star_searches_from_zero() {
        let resolver = resolver_with(vec![
            VersionInfo::new("0.4.0", released(100)),
            VersionInfo::new("0.5.0", released(40)),
        ]);

        let version = resolver
            .resolve_wildcard_version("tiny-lib", "*", &BTreeMap::new(), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(version, "0.5.0");
    }

    #[tokio::test]
    async fn test_resolve_wildcard_embedded() {
        let resolver = resolver_with(vec![
            VersionInfo::new("4.17.21", released(500)),
            VersionInfo::new("4.17.22", released(90)),
        ]);

        let version = resolver
            .resolve_wildcard_version("lodash", "4.x", &BTreeMap::new(), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(version, "4.17.22");
    }

    #[tokio::test]
    async fn test_normalize_fixed_version_strips_operators() {
        let resolver = resolver_with(vec![]);
        assert_eq!(
            resolver
                .normalize_to_fixed_version("^1.2.3", "lodash")
                .await
                .unwrap(),
            "1.2.3"
        );
        assert_eq!(
            resolver
                .normalize_to_fixed_version("~1.2.3", "lodash")
                .await
                .unwrap(),
            "1.2.3"
        );
    }

    #[tokio::test]
    async fn test_normalize_experimental_passes_through() {
        let resolver = resolver_with(vec![]);
        // Framework package and unknown package both keep the string unchanged
        assert_eq!(
            resolver
                .normalize_to_fixed_version("^0.0.0-experimental-abc", "scheduler")
                .await
                .unwrap(),
            "0.0.0-experimental-abc"
        );
        assert_eq!(
            resolver
                .normalize_to_fixed_version("1.0.0-experimental.2", "some-lib")
                .await
                .unwrap(),
            "1.0.0-experimental.2"
        );
    }

    #[tokio::test]
    async fn test_normalize_wildcard_resolves_via_registry() {
        let resolver = resolver_with(vec![
            VersionInfo::new("2.1.0", released(300)),
            VersionInfo::new("2.2.0", released(45)),
        ]);

        let version = resolver
            .normalize_to_fixed_version("2.x", "some-lib")
            .await
            .unwrap();
        assert_eq!(version, "2.2.0");
    }

    #[test]
    fn test_is_framework_experimental() {
        assert!(is_framework_experimental("next"));
        assert!(is_framework_experimental("scheduler"));
        assert!(is_framework_experimental("@next/mdx"));
        assert!(!is_framework_experimental("react"));
    }

    #[test]
    fn test_satisfies_all() {
        let mut ranges = BTreeMap::new();
        ranges.insert("a".to_string(), ">=1.0.0".to_string());
        ranges.insert("b".to_string(), "<2.0.0".to_string());
        assert!(satisfies_all("1.5.0", &ranges));
        assert!(!satisfies_all("2.5.0", &ranges));
        assert!(satisfies_all("1.0.0", &BTreeMap::new()));
    }
}
