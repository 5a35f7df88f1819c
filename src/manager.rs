//! Version manager orchestrator
//!
//! Drives one invocation end to end: load configuration, scan workspaces
//! against the canonical versions, register new packages, collect
//! interactive update confirmations, apply approved updates everywhere,
//! install, verify, and roll back on any failure.
//!
//! All collaborators are injected (registry, prompter, command runner), so
//! the whole flow runs against fakes in tests.

use crate::classify::{consolidate_packages, is_internal_package, Categorizer};
use crate::domain::{
    DependencyConfig, ScanReport, UndefinedPackage, UpdateConfig, VersionMismatch,
    WorkspaceManifest,
};
use crate::error::{AppError, ConfigError};
use crate::output;
use crate::prompt::{confirm, parse_selection, Prompter};
use crate::registry::RegistryClient;
use crate::safety::{install_command_display, run_install, run_safety_checks, CommandRunner};
use crate::version::{compare_versions, VersionResolver};
use crate::workspace::{apply_updates_to_manifest, WorkspaceStore, DEPENDENCIES_CONFIG_PATH};
use colored::Colorize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of a successful update run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Applied package -> version map; empty when nothing was approved
    pub updates: BTreeMap<String, String>,
    /// Explanatory message for no-op runs
    pub message: Option<String>,
}

/// Orchestrator over one CLI invocation.
///
/// Constructed fully initialized: both configuration artifacts are loaded
/// before any operation can run, and configuration-mutating operations
/// reload them before continuing.
pub struct VersionManager {
    store: WorkspaceStore,
    registry: Arc<dyn RegistryClient>,
    prompter: Box<dyn Prompter>,
    runner: Box<dyn CommandRunner>,
    dependencies: DependencyConfig,
    update_config: UpdateConfig,
    categorizer: Categorizer,
}

impl VersionManager {
    /// Loads both configuration files and builds the services bound to them.
    ///
    /// A missing or malformed configuration file is fatal here; nothing else
    /// runs against a partially-initialized manager.
    pub fn initialize(
        root: impl Into<PathBuf>,
        registry: Arc<dyn RegistryClient>,
        prompter: Box<dyn Prompter>,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self, AppError> {
        let store = WorkspaceStore::new(root);
        let dependencies: DependencyConfig = store.read_json(DEPENDENCIES_CONFIG_PATH)?;
        let update_config: UpdateConfig = store.read_json(crate::workspace::UPDATE_CONFIG_PATH)?;
        let categorizer = Categorizer::from_config(&update_config)?;

        Ok(Self {
            store,
            registry,
            prompter,
            runner,
            dependencies,
            update_config,
            categorizer,
        })
    }

    /// Re-reads configuration from disk after a mutating scan or rollback
    fn reload(&mut self) -> Result<(), AppError> {
        self.dependencies = self.store.read_json(DEPENDENCIES_CONFIG_PATH)?;
        self.update_config = self.store.read_json(crate::workspace::UPDATE_CONFIG_PATH)?;
        self.categorizer = Categorizer::from_config(&self.update_config)?;
        Ok(())
    }

    /// Fresh resolver bound to the registry and the default policy
    fn resolver(&self) -> VersionResolver {
        VersionResolver::new(Arc::clone(&self.registry))
    }

    /// The loaded canonical configuration
    pub fn dependencies(&self) -> &DependencyConfig {
        &self.dependencies
    }

    /// Canonical version of a registered package
    fn current_version(&self, package: &str) -> Result<String, ConfigError> {
        self.dependencies
            .current_version(package)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::PackageNotRegistered {
                name: package.to_string(),
            })
    }

    /// Scans every workspace against the canonical configuration.
    ///
    /// Unregistered packages are consolidated, categorized, and offered for
    /// registration first. Declining returns them in the report with no
    /// mismatches computed: mismatches against a configuration the user
    /// refused to extend would be noise. Accepting persists the merged
    /// configuration and reloads it before the mismatch pass.
    pub async fn check_version_mismatches(&mut self) -> Result<ScanReport, AppError> {
        let workspaces = self.store.workspaces()?;

        let mut undefined: Vec<UndefinedPackage> = Vec::new();
        for workspace in &workspaces {
            let manifest: WorkspaceManifest = self
                .store
                .read_json(Path::new(workspace).join("package.json"))?;

            for (name, version) in manifest.merged_dependencies() {
                if is_internal_package(&name) {
                    continue;
                }
                if !self.dependencies.contains_package(&name) {
                    undefined.push(UndefinedPackage::new(name, version, workspace.clone()));
                }
            }
        }

        if !undefined.is_empty() {
            let resolver = self.resolver();
            let consolidated = consolidate_packages(&undefined, &resolver).await;
            let grouped = self.categorizer.categorize_all(&consolidated);
            output::print_categorized_packages(&grouped);

            let should_add = confirm(
                &*self.prompter,
                "Register these packages in the dependency configuration?",
            )?;
            if !should_add {
                return Ok(ScanReport {
                    mismatches: Vec::new(),
                    has_newer_versions: false,
                    undefined_packages: consolidated,
                });
            }

            let mut merged = self.dependencies.clone();
            for (category, packages) in &grouped {
                for package in packages {
                    merged.register(category, &package.name, &package.version);
                }
            }
            self.store.write_json(DEPENDENCIES_CONFIG_PATH, &merged)?;
            self.reload()?;
        }

        let mut mismatches = Vec::new();
        let mut has_newer_versions = false;
        for workspace in &workspaces {
            let manifest: WorkspaceManifest = self
                .store
                .read_json(Path::new(workspace).join("package.json"))?;

            for packages in self.dependencies.categories.values() {
                for (package, expected) in packages {
                    for declared in [
                        manifest.dependencies.get(package),
                        manifest.dev_dependencies.get(package),
                    ]
                    .into_iter()
                    .flatten()
                    {
                        if declared != expected {
                            let is_newer =
                                compare_versions(declared, expected) == Ordering::Greater;
                            has_newer_versions |= is_newer;
                            mismatches.push(VersionMismatch {
                                workspace: workspace.clone(),
                                package: package.clone(),
                                expected: expected.clone(),
                                actual: declared.clone(),
                                is_newer,
                            });
                        }
                    }
                }
            }
        }

        Ok(ScanReport {
            mismatches,
            has_newer_versions,
            undefined_packages: Vec::new(),
        })
    }

    /// Runs one update cycle for a named group, an explicit selection, or
    /// every registered package.
    ///
    /// Confirmations are collected before anything is written; a run where
    /// nothing is approved touches no file. Once approved updates exist, a
    /// policy-gated backup is taken, the canonical configuration and every
    /// affected manifest are rewritten, dependencies are reinstalled, and
    /// safety checks run. Any failure past the backup point restores the
    /// pre-update state before the error is returned.
    pub async fn update_versions(
        &mut self,
        group: Option<&str>,
        selected: Option<&[String]>,
    ) -> Result<UpdateReport, AppError> {
        let targets: Vec<String> = if let Some(selected) = selected {
            selected.to_vec()
        } else if let Some(name) = group {
            self.update_config
                .update_groups
                .get(name)
                .ok_or_else(|| ConfigError::UnknownGroup {
                    name: name.to_string(),
                })?
                .packages
                .clone()
        } else {
            self.dependencies.all_packages()
        };

        let updates = self.collect_approved_updates(&targets).await?;
        if updates.is_empty() {
            return Ok(UpdateReport {
                updates,
                message: Some("No packages to update.".to_string()),
            });
        }

        println!();
        println!("{} {} package(s)...", "Updating".bold(), updates.len());

        let backup_enabled = self.update_config.safety_checks.backup_before_update;
        if backup_enabled {
            self.store.create_backup(&self.dependencies)?;
        }

        match self.apply_approved_updates(&updates).await {
            Ok(()) => {
                if backup_enabled {
                    if let Err(e) = self.store.clear_backup() {
                        eprintln!(
                            "{} could not remove the backup directory: {}",
                            "warning:".yellow().bold(),
                            e
                        );
                    }
                }
                output::print_update_summary(&updates);
                Ok(UpdateReport {
                    updates,
                    message: None,
                })
            }
            Err(e) => {
                if backup_enabled {
                    match self.store.rollback() {
                        Ok(()) => {
                            eprintln!("{}", "Changes rolled back.".yellow());
                            if let Err(reload_err) = self.reload() {
                                eprintln!(
                                    "{} could not reload configuration after rollback: {}",
                                    "warning:".yellow().bold(),
                                    reload_err
                                );
                            }
                        }
                        Err(rollback_err) => {
                            eprintln!(
                                "{} rollback failed: {}",
                                "error:".red().bold(),
                                rollback_err
                            );
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// Walks the target list interactively and returns the approved updates.
    ///
    /// Per-package lookup failures are warnings, not batch failures: the
    /// package is skipped and the loop continues.
    async fn collect_approved_updates(
        &self,
        targets: &[String],
    ) -> Result<BTreeMap<String, String>, AppError> {
        println!();
        println!("{}", "Checking for package updates:".bold());

        let total = targets.len();
        let mut updates = BTreeMap::new();

        for (i, package) in targets.iter().enumerate() {
            println!();
            println!("{} ({}/{}):", package.bold(), i + 1, total);

            let current = match self.current_version(package) {
                Ok(version) => version,
                Err(e) => {
                    eprintln!("  {} {}", "warning:".yellow().bold(), e);
                    continue;
                }
            };

            let latest = match self.registry.latest_version(package).await {
                Ok(version) => version,
                Err(e) => {
                    eprintln!(
                        "  {} could not fetch the latest version of {}: {}",
                        "warning:".yellow().bold(),
                        package,
                        e
                    );
                    continue;
                }
            };

            println!("  current: {}", current);
            println!("  latest:  {}", latest);

            if compare_versions(&current, &latest) == Ordering::Equal {
                println!("  {}", "already up to date".green());
                continue;
            }

            if let Ok(versions) = self.registry.available_versions(package).await {
                if let Some(info) = versions.iter().find(|v| v.version == latest) {
                    println!("  released: {}", info.released_at.format("%Y-%m-%d"));
                }
            }

            let question = format!("  Update {} from {} to {}?", package, current, latest);
            if confirm(&*self.prompter, &question)? {
                updates.insert(package.clone(), latest);
                println!("  {} update confirmed", "✓".green());
            } else {
                println!("  {}", "skipped".dimmed());
            }
        }

        Ok(updates)
    }

    /// Applies approved updates: canonical configuration first, then every
    /// affected workspace manifest, then install and safety checks.
    ///
    /// The canonical write precedes the manifest writes, and install/verify
    /// always run after all manifest writes; a half-updated cross-file state
    /// is never the terminal state of a successful run.
    async fn apply_approved_updates(
        &mut self,
        updates: &BTreeMap<String, String>,
    ) -> Result<(), AppError> {
        let resolver = self.resolver();

        let mut merged = self.dependencies.clone();
        for packages in merged.categories.values_mut() {
            let names: Vec<String> = packages.keys().cloned().collect();
            for name in names {
                if let Some(new_version) = updates.get(&name) {
                    let fixed = resolver.normalize_to_fixed_version(new_version, &name).await?;
                    packages.insert(name, fixed);
                }
            }
        }
        self.store.write_json(DEPENDENCIES_CONFIG_PATH, &merged)?;
        self.dependencies = merged;

        for workspace in self.store.workspaces()? {
            let manifest_path = Path::new(&workspace).join("package.json");
            let content = self.store.read_string(&manifest_path)?;
            let (rewritten, changed) = apply_updates_to_manifest(&content, updates);
            if changed {
                self.store.write_string(&manifest_path, &rewritten)?;
                println!("  {} {}/package.json", "updated".green(), workspace);
            }
        }

        println!();
        println!("{}", "Installing dependencies...".bold());
        if !run_install(&*self.runner, self.store.root()) {
            return Err(AppError::InstallFailed {
                command: install_command_display(),
            });
        }

        if !run_safety_checks(
            &self.update_config.safety_checks,
            &*self.runner,
            self.store.root(),
        ) {
            return Err(AppError::SafetyChecksFailed);
        }

        Ok(())
    }

    /// Numbered package-selection prompt over the distinct mismatched
    /// packages, marking those whose workspace version is newer
    pub fn select_packages_for_update(
        &self,
        mismatches: &[VersionMismatch],
    ) -> std::io::Result<Vec<String>> {
        let mut choices: Vec<&VersionMismatch> = Vec::new();
        for mismatch in mismatches {
            if !choices.iter().any(|c| c.package == mismatch.package) {
                choices.push(mismatch);
            }
        }

        println!();
        println!(
            "{}",
            "Select packages to update (space-separated numbers):".bold()
        );
        for (i, choice) in choices.iter().enumerate() {
            let marker = if choice.is_newer {
                format!(" {}", "[update recommended]".green())
            } else {
                String::new()
            };
            println!(
                "  {}. {} ({} {} {}){}",
                i + 1,
                choice.package,
                choice.expected,
                "→".dimmed(),
                choice.actual,
                marker
            );
        }

        let answer = self.prompter.ask("Selection:")?;
        Ok(parse_selection(&answer, choices.len())
            .into_iter()
            .map(|i| choices[i].package.clone())
            .collect())
    }
}
