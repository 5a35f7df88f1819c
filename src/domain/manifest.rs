//! Workspace package manifest
//!
//! Only the dependency maps are modeled; manifests are rewritten through
//! format-preserving text replacement, never re-serialized from this type.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The dependency-bearing slice of one workspace's package.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspaceManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl WorkspaceManifest {
    /// dependencies and devDependencies merged into one map.
    ///
    /// A package declared in both sections yields the devDependencies
    /// specifier, matching how the maps are spread together when scanning.
    pub fn merged_dependencies(&self) -> BTreeMap<String, String> {
        let mut merged = self.dependencies.clone();
        merged.extend(self.dev_dependencies.clone());
        merged
    }

    /// Returns true if either section declares the package
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> WorkspaceManifest {
        serde_json::from_str(content).unwrap()
    }

    #[test]
    fn test_parse_both_sections() {
        let manifest = parse(
            r#"{
                "name": "web",
                "dependencies": { "react": "^18.2.0" },
                "devDependencies": { "typescript": "5.3.3" }
            }"#,
        );
        assert_eq!(manifest.name.as_deref(), Some("web"));
        assert_eq!(manifest.dependencies["react"], "^18.2.0");
        assert_eq!(manifest.dev_dependencies["typescript"], "5.3.3");
    }

    #[test]
    fn test_parse_missing_sections_default_empty() {
        let manifest = parse(r#"{ "name": "empty" }"#);
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.dev_dependencies.is_empty());
    }

    #[test]
    fn test_merged_dependencies() {
        let manifest = parse(
            r#"{
                "dependencies": { "react": "18.2.0", "lodash": "4.17.21" },
                "devDependencies": { "typescript": "5.3.3" }
            }"#,
        );
        let merged = manifest.merged_dependencies();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged["lodash"], "4.17.21");
    }

    #[test]
    fn test_merged_dev_wins_on_duplicate() {
        let manifest = parse(
            r#"{
                "dependencies": { "typescript": "5.0.0" },
                "devDependencies": { "typescript": "5.3.3" }
            }"#,
        );
        assert_eq!(manifest.merged_dependencies()["typescript"], "5.3.3");
    }

    #[test]
    fn test_declares() {
        let manifest = parse(
            r#"{
                "dependencies": { "react": "18.2.0" },
                "devDependencies": { "typescript": "5.3.3" }
            }"#,
        );
        assert!(manifest.declares("react"));
        assert!(manifest.declares("typescript"));
        assert!(!manifest.declares("vue"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let manifest = parse(
            r#"{
                "name": "web",
                "version": "0.0.1",
                "scripts": { "build": "next build" },
                "dependencies": { "next": "14.1.0" }
            }"#,
        );
        assert_eq!(manifest.dependencies["next"], "14.1.0");
    }
}
