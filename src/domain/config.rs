//! Canonical dependency configuration
//!
//! The single source of truth mapping category -> package -> approved
//! version. Canonical storage always holds fixed versions; range operators
//! are stripped before a version is written here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category -> package -> fixed version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyConfig {
    pub categories: BTreeMap<String, BTreeMap<String, String>>,
}

impl DependencyConfig {
    /// Creates an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any category registers the package.
    ///
    /// A package is assumed to live in at most one category; the first
    /// category found wins when looking up versions.
    pub fn contains_package(&self, name: &str) -> bool {
        self.categories.values().any(|pkgs| pkgs.contains_key(name))
    }

    /// Returns the approved version for a package, searching categories in order
    pub fn current_version(&self, name: &str) -> Option<&str> {
        self.categories
            .values()
            .find_map(|pkgs| pkgs.get(name).map(String::as_str))
    }

    /// Registers a package under a category, creating the category if needed
    pub fn register(&mut self, category: &str, name: &str, version: &str) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), version.to_string());
    }

    /// All registered package names, in category order then package order
    pub fn all_packages(&self) -> Vec<String> {
        self.categories
            .values()
            .flat_map(|pkgs| pkgs.keys().cloned())
            .collect()
    }

    /// Sets the version for a package wherever it is registered.
    ///
    /// Returns true if at least one entry was changed.
    pub fn set_version(&mut self, name: &str, version: &str) -> bool {
        let mut changed = false;
        for pkgs in self.categories.values_mut() {
            if let Some(entry) = pkgs.get_mut(name) {
                *entry = version.to_string();
                changed = true;
            }
        }
        changed
    }
}
