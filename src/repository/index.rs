// src/repository/index.rs

//! Index of the packages available in the local repository

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Package name to pspec path, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableIndex {
    packages: BTreeMap<String, PathBuf>,
}

impl AvailableIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package, returning the pspec it replaced
    pub fn insert(&mut self, name: impl Into<String>, pspec: impl Into<PathBuf>) -> Option<PathBuf> {
        self.packages.insert(name.into(), pspec.into())
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.packages.get(name).map(PathBuf::as_path)
    }

    /// Like `get`, but a missing package is `Error::PackageNotFound`
    pub fn lookup(&self, name: &str) -> Result<&Path> {
        self.get(name)
            .ok_or_else(|| Error::PackageNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.packages
            .iter()
            .map(|(name, pspec)| (name.as_str(), pspec.as_path()))
    }
}

impl FromIterator<(String, PathBuf)> for AvailableIndex {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AvailableIndex {
    type Item = (String, PathBuf);
    type IntoIter = btree_map::IntoIter<String, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

/// Scan `root` for `filename` files, naming each package after the
/// directory that contains its file
///
/// Traversal is sorted by file name, so when two directories share a name the
/// file visited last in that order wins. The `.git` directory is skipped.
pub fn scan(root: &Path, filename: &str) -> Result<AvailableIndex> {
    debug!("Scanning {} for {} files", root.display(), filename);

    let mut index = AvailableIndex::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git");

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != filename {
            continue;
        }

        let path = entry.into_path();
        let Some(name) = package_name(&path) else {
            warn!("Ignoring {}: no package directory", path.display());
            continue;
        };

        if let Some(previous) = index.insert(name.clone(), path.clone()) {
            warn!(
                "Package '{}' defined twice; using {} over {}",
                name,
                path.display(),
                previous.display()
            );
        }
    }

    debug!("Found {} available packages", index.len());
    Ok(index)
}

fn package_name(pspec: &Path) -> Option<String> {
    pspec
        .parent()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
