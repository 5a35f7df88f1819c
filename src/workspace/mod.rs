//! Workspace filesystem access
//!
//! All file I/O goes through WorkspaceStore, rooted at the monorepo root:
//! - typed JSON read/write (write-to-temp-then-rename)
//! - workspace discovery from the root manifest's glob patterns
//! - format-preserving dependency rewrites in workspace manifests
//! - backup and rollback of the full manifest set

mod backup;

use crate::error::WorkspaceError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Canonical dependency configuration, relative to the root
pub const DEPENDENCIES_CONFIG_PATH: &str = "tooling/configs/dependencies.json";

/// Update policy configuration, relative to the root
pub const UPDATE_CONFIG_PATH: &str = "tooling/configs/update-config.json";

/// Backup directory name
pub const BACKUP_DIR: &str = ".version-manager-backup";

/// Dependency install directory, always excluded from discovery
const INSTALL_DIR: &str = "node_modules";

/// The root manifest's workspace declaration
#[derive(Debug, Deserialize)]
struct RootManifest {
    #[serde(default)]
    workspaces: Vec<String>,
}

/// Filesystem access rooted at the monorepo root
pub struct WorkspaceStore {
    root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a root-relative path
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read and parse a JSON file relative to the root
    pub fn read_json<T: DeserializeOwned>(
        &self,
        relative: impl AsRef<Path>,
    ) -> Result<T, WorkspaceError> {
        let path = self.path(&relative);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| WorkspaceError::read_error(path.clone(), e))?;
        serde_json::from_str(&content).map_err(|e| WorkspaceError::parse_error(path, e.to_string()))
    }

    /// Serialize a value as 2-space-indented JSON and write it.
    ///
    /// Writes to a temp file in the same directory first, then renames over
    /// the target, so a crash never leaves a half-written manifest behind.
    pub fn write_json<T: Serialize>(
        &self,
        relative: impl AsRef<Path>,
        data: &T,
    ) -> Result<(), WorkspaceError> {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| WorkspaceError::parse_error(self.path(&relative), e.to_string()))?;
        self.write_string(relative, &content)
    }

    /// Write raw text through the same temp-then-rename path
    pub fn write_string(
        &self,
        relative: impl AsRef<Path>,
        content: &str,
    ) -> Result<(), WorkspaceError> {
        let path = self.path(&relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| WorkspaceError::write_error(path.clone(), e))?;
        }

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|e| WorkspaceError::write_error(tmp.clone(), e))?;
        std::fs::rename(&tmp, &path).map_err(|e| WorkspaceError::write_error(path, e))
    }

    /// Read a file into a string
    pub fn read_string(&self, relative: impl AsRef<Path>) -> Result<String, WorkspaceError> {
        let path = self.path(&relative);
        std::fs::read_to_string(&path).map_err(|e| WorkspaceError::read_error(path, e))
    }

    /// Expands the root manifest's workspace glob patterns.
    ///
    /// Returns root-relative paths of every matching directory containing a
    /// package manifest, excluding anything under node_modules, sorted so
    /// the list is stable within a run.
    pub fn workspaces(&self) -> Result<Vec<String>, WorkspaceError> {
        let root_manifest: RootManifest = self.read_json("package.json")?;
        if root_manifest.workspaces.is_empty() {
            return Err(WorkspaceError::NoWorkspacePatterns {
                path: self.path("package.json"),
            });
        }

        let mut workspaces = Vec::new();
        for pattern in &root_manifest.workspaces {
            let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
            collect_matches(&self.root, &segments, PathBuf::new(), &mut workspaces);
        }

        workspaces.sort();
        workspaces.dedup();
        Ok(workspaces)
    }
}

/// Walks one pattern segment at a time, collecting directories that match
/// the full pattern and contain a package.json
fn collect_matches(dir: &Path, segments: &[&str], relative: PathBuf, out: &mut Vec<String>) {
    let Some((segment, rest)) = segments.split_first() else {
        if dir.join("package.json").is_file() {
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
        return;
    };

    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name == INSTALL_DIR || !entry.path().is_dir() {
            continue;
        }
        if segment_matches(segment, &name) {
            collect_matches(&entry.path(), rest, relative.join(&name), out);
        }
    }
}

/// Glob-segment match: `*` wildcards within one path segment
fn segment_matches(pattern: &str, name: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if !pattern.contains('*') {
        return pattern == name;
    }

    let mut remaining = name;
    let mut parts = pattern.split('*').peekable();
    let mut first = true;
    while let Some(part) = parts.next() {
        if first {
            first = false;
            if !part.is_empty() {
                match remaining.strip_prefix(part) {
                    Some(rest) => remaining = rest,
                    None => return false,
                }
            }
            continue;
        }
        if parts.peek().is_none() {
            // last literal must anchor at the end
            return part.is_empty() || remaining.ends_with(part);
        }
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }
    true
}

/// Rewrites dependency entries in manifest text, preserving formatting.
///
/// Each updated package's `"name": "version"` entry is replaced with the new
/// fixed version via text substitution, so key order, indentation, and every
/// unrelated field survive untouched. Returns the new content and whether
/// anything changed.
pub fn apply_updates_to_manifest(
    content: &str,
    updates: &BTreeMap<String, String>,
) -> (String, bool) {
    let mut result = content.to_string();
    let mut changed = false;

    for (package, version) in updates {
        let pattern = format!(r#"("{}"\s*:\s*)"[^"]+""#, regex::escape(package));
        // package names never produce an invalid pattern once escaped
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };

        let replaced = re.replace_all(&result, |caps: &regex::Captures| {
            format!(r#"{}"{}""#, &caps[1], version)
        });

        if replaced != result {
            result = replaced.into_owned();
            changed = true;
        }
    }

    (result, changed)
}
