//! CLI argument parsing module for depsync

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Workspace dependency version manager
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depsync",
    version,
    about = "Workspace dependency version manager"
)]
pub struct CliArgs {
    /// Monorepo root directory (default: current directory)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Disable spinner output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Scan workspaces for version mismatches and unregistered packages
    Check,

    /// Update packages in a named group, or every registered package
    Update {
        /// Update group name from the update configuration
        group: Option<String>,
    },

    /// Scan, then hand-pick mismatched packages to update
    #[command(name = "update:selected")]
    UpdateSelected,
}
