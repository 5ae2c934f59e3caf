// src/repository/mod.rs

//! Local mirror of the third-party package repository
//!
//! This module provides functionality for:
//! - Cloning and pulling the upstream git repository
//! - Indexing the pspec files it contains

pub mod index;

pub use index::{AvailableIndex, scan};

use crate::error::{Error, Result};
use crate::exec::{Runner, ToolCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A git checkout of the package-definition repository
pub struct Mirror<'a> {
    runner: &'a dyn Runner,
    git: PathBuf,
    url: String,
    dir: PathBuf,
}

impl<'a> Mirror<'a> {
    pub fn new(
        runner: &'a dyn Runner,
        git: impl AsRef<Path>,
        url: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            git: git.as_ref().to_path_buf(),
            url: url.into(),
            dir: dir.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the mirror directory exists and has any content
    pub fn is_present(&self) -> bool {
        fs::read_dir(&self.dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Clone the repository if absent, otherwise pull the latest revision
    ///
    /// A failed clone or pull leaves the directory as git left it.
    pub fn ensure_fresh(&self) -> Result<()> {
        let command = if self.dir.exists() {
            info!("Pulling {} in {}", self.url, self.dir.display());
            ToolCommand::new(&self.git)
                .arg("pull")
                .current_dir(&self.dir)
        } else {
            info!("Cloning {} into {}", self.url, self.dir.display());
            ToolCommand::new(&self.git)
                .arg("clone")
                .arg(&self.url)
                .arg(&self.dir)
        };

        self.runner
            .run(&command)
            .map_err(|e| Error::RepositorySyncFailed(e.to_string()))
    }

    /// Make sure a usable mirror exists, cloning it when it does not
    ///
    /// An existing but empty directory is removed first so git can clone
    /// into it. Returns `true` when a clone was performed.
    pub fn bootstrap(&self) -> Result<bool> {
        if self.is_present() {
            return Ok(false);
        }

        warn!("Local repo not found at {}", self.dir.display());
        if self.dir.is_dir() {
            fs::remove_dir(&self.dir)?;
        }
        self.ensure_fresh()?;
        Ok(true)
    }
}
