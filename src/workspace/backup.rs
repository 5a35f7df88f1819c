//! Backup and rollback of the manifest set
//!
//! Lifecycle: a backup is created immediately before the first mutating
//! write of an update run, consumed (restored, then deleted) by rollback on
//! failure, and cleared after a confirmed-successful run. Rollback fails
//! loudly when a backup file is missing; a partial restore must never look
//! like success.

use super::{WorkspaceStore, BACKUP_DIR, DEPENDENCIES_CONFIG_PATH};
use crate::domain::DependencyConfig;
use crate::error::WorkspaceError;
use std::path::PathBuf;

/// Filesystem-safe backup filename for a workspace path
fn backup_file_name(workspace: &str) -> String {
    format!("{}_package.json", workspace.replace('/', "_"))
}

impl WorkspaceStore {
    /// True if a backup directory from this or an earlier run exists
    pub fn has_backup(&self) -> bool {
        self.path(BACKUP_DIR).is_dir()
    }

    /// Snapshots the canonical configuration and every workspace manifest
    /// into the backup directory
    pub fn create_backup(&self, config: &DependencyConfig) -> Result<(), WorkspaceError> {
        let backup_dir = self.path(BACKUP_DIR);
        std::fs::create_dir_all(&backup_dir)
            .map_err(|e| WorkspaceError::write_error(backup_dir.clone(), e))?;

        self.write_json(PathBuf::from(BACKUP_DIR).join("dependencies.json"), config)?;

        for workspace in self.workspaces()? {
            let manifest = self.path(&workspace).join("package.json");
            let target = backup_dir.join(backup_file_name(&workspace));
            std::fs::copy(&manifest, &target)
                .map_err(|e| WorkspaceError::write_error(target, e))?;
        }

        Ok(())
    }

    /// Restores the canonical configuration and every workspace manifest
    /// from the backup directory, then deletes the backup.
    ///
    /// A missing backup file is an error: restoring only some manifests is
    /// worse than reporting the gap.
    pub fn rollback(&self) -> Result<(), WorkspaceError> {
        let backup_dir = self.path(BACKUP_DIR);

        let config: DependencyConfig =
            self.read_json(PathBuf::from(BACKUP_DIR).join("dependencies.json"))?;
        self.write_json(DEPENDENCIES_CONFIG_PATH, &config)?;

        for workspace in self.workspaces()? {
            let source = backup_dir.join(backup_file_name(&workspace));
            let manifest = self.path(&workspace).join("package.json");
            std::fs::copy(&source, &manifest).map_err(|e| WorkspaceError::BackupMissing {
                path: source.clone(),
                source: e,
            })?;
        }

        self.clear_backup()
    }

    /// Deletes the backup directory
    pub fn clear_backup(&self) -> Result<(), WorkspaceError> {
        let backup_dir = self.path(BACKUP_DIR);
        std::fs::remove_dir_all(&backup_dir)
            .map_err(|e| WorkspaceError::write_error(backup_dir, e))
    }
}
