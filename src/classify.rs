//! Package classification and cross-workspace consolidation
//!
//! This module provides:
//! - Internal-package exclusion (organization scope + platform tooling)
//! - The ordered, first-match-wins categorizer over regex rules
//! - Consolidation of duplicate undefined-package observations

use crate::domain::{UndefinedPackage, UpdateConfig};
use crate::error::ConfigError;
use crate::version::{compare_versions, normalize_version, VersionResolver};
use colored::Colorize;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Organization scope whose packages are never version-managed
pub const INTERNAL_SCOPE: &str = "@kit/";

/// Platform-internal tooling packages, excluded by exact name
pub const PLATFORM_INTERNAL_PACKAGES: &[&str] = &["@vercel/turbopack-ecmascript-runtime"];

/// True if the package is internal and must be skipped entirely
pub fn is_internal_package(name: &str) -> bool {
    if name.starts_with(INTERNAL_SCOPE) {
        return true;
    }

    if PLATFORM_INTERNAL_PACKAGES.contains(&name) {
        eprintln!(
            "{} {} is platform tooling and is excluded from version management",
            "note:".cyan().bold(),
            name
        );
        return true;
    }

    false
}

/// One compiled categorization rule
struct CompiledRule {
    name: String,
    patterns: Vec<Regex>,
}

/// Assigns packages to categories by ordered pattern rules
pub struct Categorizer {
    rules: Vec<CompiledRule>,
    default_category: String,
}

impl Categorizer {
    /// Compile the rule set from the update configuration
    pub fn from_config(config: &UpdateConfig) -> Result<Self, ConfigError> {
        let mut rules = Vec::new();
        for rule in &config.categories {
            let mut patterns = Vec::new();
            for pattern in &rule.patterns {
                let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    rule: rule.name.clone(),
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                patterns.push(regex);
            }
            rules.push(CompiledRule {
                name: rule.name.clone(),
                patterns,
            });
        }

        Ok(Self {
            rules,
            default_category: config.default_category.clone(),
        })
    }

    /// Returns the first matching rule's category, or the default.
    ///
    /// Rule order is a user-controlled priority: first match wins.
    pub fn categorize(&self, name: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.is_match(name)))
            .map(|rule| rule.name.as_str())
            .unwrap_or(&self.default_category)
    }

    /// Groups a batch of packages by category
    pub fn categorize_all(
        &self,
        packages: &[UndefinedPackage],
    ) -> BTreeMap<String, Vec<UndefinedPackage>> {
        let mut grouped: BTreeMap<String, Vec<UndefinedPackage>> = BTreeMap::new();
        for package in packages {
            grouped
                .entry(self.categorize(&package.name).to_string())
                .or_default()
                .push(package.clone());
        }
        grouped
    }
}

/// Deduplicated, comma-joined union of two location lists
pub fn merge_locations(a: &str, b: &str) -> String {
    let mut merged: Vec<&str> = Vec::new();
    for location in a.split(", ").chain(b.split(", ")) {
        let location = location.trim();
        if !location.is_empty() && !merged.contains(&location) {
            merged.push(location);
        }
    }
    merged.join(", ")
}

/// Merges duplicate undefined-package observations across workspaces.
///
/// Every observed version is normalized to a fixed version first (wildcards
/// resolve through the registry); one entry survives per package name with
/// the highest normalized version and the union of every observing
/// workspace. The result is order-independent: locations merge regardless of
/// which observation wins, and output is sorted by name.
pub async fn consolidate_packages(
    packages: &[UndefinedPackage],
    resolver: &VersionResolver,
) -> Vec<UndefinedPackage> {
    let mut merged: BTreeMap<String, UndefinedPackage> = BTreeMap::new();

    for package in packages {
        let normalized = match resolver
            .normalize_to_fixed_version(&package.version, &package.name)
            .await
        {
            Ok(version) => version,
            Err(e) => {
                // skip-and-continue: keep the package visible under its
                // prefix-stripped specifier instead of aborting the scan
                eprintln!(
                    "{} could not resolve '{}' for {}: {}",
                    "warning:".yellow().bold(),
                    package.version,
                    package.name,
                    e
                );
                normalize_version(&package.version).to_string()
            }
        };

        match merged.entry(package.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(UndefinedPackage::new(
                    &package.name,
                    normalized,
                    &package.location,
                ));
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.location = merge_locations(&existing.location, &package.location);
                if compare_versions(&normalized, &existing.version) == Ordering::Greater {
                    existing.version = normalized;
                }
            }
        }
    }

    merged.into_values().collect()
}
