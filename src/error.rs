// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for eopkg3p
#[derive(Error, Debug)]
pub enum Error {
    /// A requested package is not part of the local repository
    #[error("Repo item '{0}' not found!")]
    PackageNotFound(String),

    /// A pspec file does not follow the expected schema
    #[error("Malformed pspec file at {}: {reason}", path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    /// A pspec release attribute is not a release number
    #[error(
        "Invalid release '{value}' while parsing the pspec file at {}. \
         Please report this issue, with a copy of this file.",
        path.display()
    )]
    InvalidReleaseFormat { path: PathBuf, value: String },

    /// The package manager reported a release that is not a release number
    #[error("Invalid installed release '{value}' reported for package '{package}'")]
    InvalidInstalledRelease { package: String, value: String },

    /// Cloning or pulling the local repository failed
    #[error("Failed to sync local repository: {0}")]
    RepositorySyncFailed(String),

    /// A build succeeded but left nothing in its output directory
    #[error("Build produced no package in {}", .0.display())]
    BuildProducedNoArtifact(PathBuf),

    /// An external tool exited unsuccessfully
    #[error("`{tool}` failed with exit code {}", exit_code_label(code))]
    ExternalToolFailed { tool: String, code: Option<i32> },

    /// An external tool could not be started
    #[error("Failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A required executable is missing from PATH
    #[error("`{0}` executable not found. Please make sure you have `{0}` installed on your system.")]
    ToolNotFound(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors while walking the repository tree
    #[error("Failed to scan repository: {0}")]
    Walk(#[from] walkdir::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Result type alias using eopkg3p's Error type
pub type Result<T> = std::result::Result<T, Error>;
