//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: issues with the canonical or update-policy configuration
//! - WorkspaceError: filesystem operations on manifests and backups
//! - RegistryError: npm registry communication
//! - ResolveError: policy-driven version resolution

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workspace filesystem errors
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Version resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Prompt/terminal I/O failure
    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    /// The dependency install command exited non-zero
    #[error("install command failed: {command}")]
    InstallFailed { command: String },

    /// One or more safety checks exited non-zero
    #[error("safety checks failed")]
    SafetyChecksFailed,
}

/// Errors related to configuration files and their contents
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Named update group does not exist in the update configuration
    #[error("update group '{name}' not found")]
    UnknownGroup { name: String },

    /// Package is not registered in the canonical configuration
    #[error("package '{name}' not found in the dependency configuration")]
    PackageNotRegistered { name: String },

    /// A category rule pattern failed to compile
    #[error("invalid category pattern '{pattern}' in rule '{rule}': {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },
}

/// Errors related to filesystem operations under the workspace root
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A backup file expected during rollback is missing or unreadable
    #[error("backup missing for {path}: {source}")]
    BackupMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root manifest declares no workspace patterns
    #[error("no workspace patterns declared in {path}")]
    NoWorkspacePatterns { path: PathBuf },
}

/// Errors related to npm registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in the registry
    #[error("package '{package}' not found in the npm registry")]
    PackageNotFound { package: String },

    /// Network request failed
    #[error("failed to fetch '{package}' from the npm registry: {message}")]
    NetworkError { package: String, message: String },

    /// Rate limit exceeded
    #[error("npm registry rate limit exceeded while fetching '{package}'")]
    RateLimitExceeded { package: String },

    /// Timeout
    #[error("timeout while fetching '{package}' from the npm registry")]
    Timeout { package: String },

    /// Response body did not match the expected shape
    #[error("invalid registry response for '{package}': {message}")]
    InvalidResponse { package: String, message: String },

    /// The packument carries no `latest` dist-tag
    #[error("no latest version published for '{package}'")]
    MissingLatest { package: String },
}

/// Errors produced by policy-driven version resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Every candidate was eliminated by the stability policy or range checks
    #[error("no compatible version found for '{package}'")]
    NoCompatibleVersion { package: String },

    /// A version string could not be interpreted
    #[error("invalid version '{version}' for '{package}': {message}")]
    InvalidVersion {
        package: String,
        version: String,
        message: String,
    },

    /// Underlying registry failure
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl WorkspaceError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkspaceError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkspaceError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WorkspaceError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(package: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(package: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            message: message.into(),
        }
    }
}
