// src/resolver.rs

//! Reconcile available packages with installed ones
//!
//! Nothing here is cached: callers build the `AvailableIndex` and pass an
//! `InstalledSource` that queries eopkg afresh on every call.

use crate::error::Result;
use crate::packages::{InstalledSource, read_release};
use crate::repository::AvailableIndex;
use tracing::debug;

/// Available packages that are currently installed
///
/// Installed packages missing from `available` come from another origin
/// and are ignored.
pub fn filter_installed(
    available: &AvailableIndex,
    source: &dyn InstalledSource,
) -> Result<AvailableIndex> {
    let mut installed = AvailableIndex::new();
    for package in source.query_installed()? {
        let package = package?;
        if let Some(pspec) = available.get(&package.name) {
            installed.insert(package.name, pspec);
        }
    }
    Ok(installed)
}

/// Installed packages whose available release is strictly newer
pub fn filter_outdated(
    available: &AvailableIndex,
    source: &dyn InstalledSource,
) -> Result<AvailableIndex> {
    let mut outdated = AvailableIndex::new();
    for package in source.query_installed()? {
        let package = package?;
        let Some(pspec) = available.get(&package.name) else {
            continue;
        };

        let latest = read_release(pspec)?;
        if latest > package.release {
            debug!(
                "{} is outdated: installed {}, available {}",
                package.name, package.release, latest
            );
            outdated.insert(package.name, pspec);
        }
    }
    Ok(outdated)
}

/// Look up requested package names, failing on the first unknown one
pub fn resolve_names<I, S>(requested: I, available: &AvailableIndex) -> Result<AvailableIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut resolved = AvailableIndex::new();
    for name in requested {
        let name = name.as_ref().trim();
        let pspec = available.lookup(name)?;
        resolved.insert(name, pspec);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::packages::InstalledPackage;
    use crate::packages::traits::MockInstalledSource;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_pspec(root: &Path, name: &str, release: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pspec.xml");
        fs::write(
            &path,
            format!(
                r#"<PISI><Source><Description>{name}</Description></Source><History><Update release="{release}"/></History></PISI>"#
            ),
        )
        .unwrap();
        path
    }

    fn installed(packages: &[(&str, u64)]) -> MockInstalledSource {
        let packages: Vec<InstalledPackage> = packages
            .iter()
            .map(|(name, release)| InstalledPackage::new(*name, *release))
            .collect();

        let mut source = MockInstalledSource::new();
        source
            .expect_query_installed()
            .returning(move || Ok(Box::new(packages.clone().into_iter().map(Ok::<_, Error>))));
        source
    }

    fn foo_index(release: &str) -> (TempDir, AvailableIndex) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut index = AvailableIndex::new();
        index.insert("foo", write_pspec(temp_dir.path(), "foo", release));
        (temp_dir, index)
    }

    #[test]
    fn test_same_release_is_not_outdated() {
        let (_temp, available) = foo_index("5");
        let source = installed(&[("foo", 5)]);

        assert!(filter_outdated(&available, &source).unwrap().is_empty());
    }

    #[test]
    fn test_older_installed_release_is_outdated() {
        let (_temp, available) = foo_index("5");
        let source = installed(&[("foo", 4)]);

        let outdated = filter_outdated(&available, &source).unwrap();
        assert_eq!(outdated, available);
    }

    #[test]
    fn test_newer_installed_release_is_not_outdated() {
        let (_temp, available) = foo_index("5");
        let source = installed(&[("foo", 6)]);

        assert!(filter_outdated(&available, &source).unwrap().is_empty());
    }

    #[test]
    fn test_untracked_installed_package_is_ignored() {
        let (_temp, available) = foo_index("5");
        let source = installed(&[("bar", 1)]);

        assert!(filter_installed(&available, &source).unwrap().is_empty());
        assert!(filter_outdated(&available, &source).unwrap().is_empty());
    }

    #[test]
    fn test_filter_installed_is_subset_of_available() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut available = AvailableIndex::new();
        for name in ["foo", "bar", "baz"] {
            available.insert(name, write_pspec(temp_dir.path(), name, "3"));
        }
        let source = installed(&[("bar", 3), ("qux", 1), ("foo", 1)]);

        let result = filter_installed(&available, &source).unwrap();

        assert_eq!(result.names().collect::<Vec<_>>(), vec!["bar", "foo"]);
        for (name, pspec) in result.iter() {
            assert_eq!(available.get(name), Some(pspec));
        }

        let outdated = filter_outdated(&available, &source).unwrap();
        assert_eq!(outdated.names().collect::<Vec<_>>(), vec!["foo"]);
        assert!(outdated.names().all(|name| result.contains(name)));
    }

    #[test]
    fn test_filters_are_repeatable() {
        let (_temp, available) = foo_index("5");
        let source = installed(&[("foo", 4)]);

        assert_eq!(
            filter_installed(&available, &source).unwrap(),
            filter_installed(&available, &source).unwrap()
        );
        assert_eq!(
            filter_outdated(&available, &source).unwrap(),
            filter_outdated(&available, &source).unwrap()
        );
    }

    #[test]
    fn test_filter_outdated_propagates_bad_release() {
        let (_temp, available) = foo_index("five");
        let source = installed(&[("foo", 4)]);

        assert!(matches!(
            filter_outdated(&available, &source),
            Err(Error::InvalidReleaseFormat { .. })
        ));
    }

    #[test]
    fn test_query_errors_propagate() {
        let (_temp, available) = foo_index("5");
        let mut source = MockInstalledSource::new();
        source.expect_query_installed().returning(|| {
            Ok(Box::new(std::iter::once(Err::<InstalledPackage, _>(
                Error::InvalidInstalledRelease {
                    package: "foo".to_string(),
                    value: "x".to_string(),
                },
            ))))
        });

        assert!(filter_installed(&available, &source).is_err());
    }

    #[test]
    fn test_resolve_names() {
        let (_temp, available) = foo_index("5");

        let empty: [&str; 0] = [];
        assert!(resolve_names(empty, &available).unwrap().is_empty());

        let resolved = resolve_names([" foo "], &available).unwrap();
        assert_eq!(resolved, available);
    }

    #[test]
    fn test_resolve_names_fails_on_first_missing() {
        let (_temp, available) = foo_index("5");

        let result = resolve_names(["foo", "missing", "other"], &available);
        assert!(matches!(result, Err(Error::PackageNotFound(name)) if name == "missing"));

        let result = resolve_names(["other", "foo", "missing"], &available);
        assert!(matches!(result, Err(Error::PackageNotFound(name)) if name == "other"));
    }
}
