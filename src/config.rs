// src/config.rs

//! Runtime configuration
//!
//! All filesystem locations and external executables used by eopkg3p are
//! resolved once at startup and passed explicitly to each component.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upstream repository holding the third-party package definitions
pub const DEFAULT_REPO_URL: &str = "https://github.com/getsolus/3rd-party.git";

/// File name of a package definition document
pub const PSPEC_FILENAME: &str = "pspec.xml";

/// Directory name under the user cache directory
const CACHE_DIR_NAME: &str = "eopkg3p";

/// Locations used by a single invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote git URL of the package-definition repository
    pub repo_url: String,
    /// Root of everything eopkg3p writes to disk
    pub cache_dir: PathBuf,
    /// Local mirror of `repo_url`
    pub repo_dir: PathBuf,
    /// Parent of the per-package build output directories
    pub build_dir: PathBuf,
    /// Name of the per-package definition file
    pub metadata_filename: String,
}

impl Config {
    /// Build a configuration rooted at `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>, repo_url: impl Into<String>) -> Self {
        let cache_dir = cache_dir.into();
        Self {
            repo_url: repo_url.into(),
            repo_dir: cache_dir.join("3rd-party"),
            build_dir: cache_dir.join("builds"),
            cache_dir,
            metadata_filename: PSPEC_FILENAME.to_string(),
        }
    }

    /// Resolve the configuration from optional overrides, falling back to
    /// the user cache directory and the upstream repository URL
    pub fn resolve(cache_dir: Option<PathBuf>, repo_url: Option<String>) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };
        let repo_url = repo_url.unwrap_or_else(|| DEFAULT_REPO_URL.to_string());

        Ok(Self::new(cache_dir, repo_url))
    }

    /// Create the cache and build directories if they are missing
    ///
    /// Directories are never removed automatically; see `delete_cache`.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.cache_dir, &self.build_dir] {
            if !dir.exists() {
                debug!("Creating directory: {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Remove the whole cache directory, including the mirror and builds
    pub fn delete_cache(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .ok_or_else(|| {
            Error::ConfigError(
                "Could not determine the user cache directory; pass --cache-dir".to_string(),
            )
        })
}

/// Absolute paths of the external executables eopkg3p drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub eopkg: PathBuf,
    pub git: PathBuf,
    pub pkexec: PathBuf,
}

impl Tools {
    /// Locate `eopkg`, `git` and `pkexec` on PATH
    pub fn locate() -> Result<Self> {
        Ok(Self {
            eopkg: find_executable("eopkg")?,
            git: find_executable("git")?,
            pkexec: find_executable("pkexec")?,
        })
    }

    /// Use explicit paths, without checking that they exist
    pub fn from_paths(
        eopkg: impl AsRef<Path>,
        git: impl AsRef<Path>,
        pkexec: impl AsRef<Path>,
    ) -> Self {
        Self {
            eopkg: eopkg.as_ref().to_path_buf(),
            git: git.as_ref().to_path_buf(),
            pkexec: pkexec.as_ref().to_path_buf(),
        }
    }
}

fn find_executable(name: &str) -> Result<PathBuf> {
    let path = which::which(name).map_err(|_| Error::ToolNotFound(name.to_string()))?;
    debug!("Found {} at {}", name, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_layout() {
        let config = Config::new("/tmp/cache", DEFAULT_REPO_URL);

        assert_eq!(config.repo_dir, PathBuf::from("/tmp/cache/3rd-party"));
        assert_eq!(config.build_dir, PathBuf::from("/tmp/cache/builds"));
        assert_eq!(config.metadata_filename, "pspec.xml");
    }

    #[test]
    fn test_resolve_with_overrides() {
        let config = Config::resolve(
            Some(PathBuf::from("/srv/eopkg3p")),
            Some("https://example.com/repo.git".to_string()),
        )
        .unwrap();

        assert_eq!(config.cache_dir, PathBuf::from("/srv/eopkg3p"));
        assert_eq!(config.repo_url, "https://example.com/repo.git");
    }

    #[test]
    fn test_resolve_defaults_repo_url() {
        let config = Config::resolve(Some(PathBuf::from("/srv/eopkg3p")), None).unwrap();
        assert_eq!(config.repo_url, DEFAULT_REPO_URL);
    }

    #[test]
    fn test_ensure_dirs_and_delete_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::new(temp_dir.path().join("cache"), DEFAULT_REPO_URL);

        config.ensure_dirs().unwrap();
        assert!(config.cache_dir.is_dir());
        assert!(config.build_dir.is_dir());
        // The mirror is created by git, not by us
        assert!(!config.repo_dir.exists());

        // Idempotent
        config.ensure_dirs().unwrap();

        config.delete_cache().unwrap();
        assert!(!config.cache_dir.exists());

        // Deleting a missing cache is not an error
        config.delete_cache().unwrap();
    }

    #[test]
    fn test_missing_tool() {
        let result = find_executable("eopkg3p-definitely-not-installed");
        assert!(matches!(result, Err(Error::ToolNotFound(name)) if name == "eopkg3p-definitely-not-installed"));
    }
}
