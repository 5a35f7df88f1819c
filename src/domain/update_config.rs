//! Update policy configuration
//!
//! Loaded once per run from tooling/configs/update-config.json. Everything
//! is optional in the file; missing sections fall back to defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "uncategorized".to_string()
}

/// Static update policy: named groups, safety toggles, categorization rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateConfig {
    /// Named groups of packages that update together
    pub update_groups: BTreeMap<String, UpdateGroup>,
    /// Post-update verification toggles
    pub safety_checks: SafetyChecks,
    /// Ordered categorization rules; first match wins
    pub categories: Vec<CategoryRule>,
    /// Category assigned when no rule matches
    pub default_category: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            update_groups: BTreeMap::new(),
            safety_checks: SafetyChecks::default(),
            categories: Vec::new(),
            default_category: default_category(),
        }
    }
}

/// A named group of packages that should be updated together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateGroup {
    pub packages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which verification steps run after an update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyChecks {
    #[serde(default = "default_true")]
    pub required_tests: bool,
    #[serde(default = "default_true")]
    pub type_check: bool,
    #[serde(default = "default_true")]
    pub lint: bool,
    #[serde(default = "default_true")]
    pub backup_before_update: bool,
}

impl Default for SafetyChecks {
    fn default() -> Self {
        Self {
            required_tests: true,
            type_check: true,
            lint: true,
            backup_before_update: true,
        }
    }
}

/// One categorization rule: regex patterns matched against package names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryRule {
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
