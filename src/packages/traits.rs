// src/packages/traits.rs

//! Common types shared by the metadata reader and the installed query

use crate::error::Result;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A package build revision
///
/// Both pspec files and `eopkg li` report releases as plain integers, so a
/// single integer ordering applies to both sides of every comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Release(u64);

impl Release {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for Release {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Release {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A third-party package reported as installed by the package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub release: Release,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, release: impl Into<Release>) -> Self {
        Self {
            name: name.into(),
            release: release.into(),
        }
    }
}

/// Single-pass stream of installed packages
pub type InstalledStream = Box<dyn Iterator<Item = Result<InstalledPackage>>>;

/// Source of installed third-party packages
#[cfg_attr(test, mockall::automock)]
pub trait InstalledSource {
    /// Query the currently installed packages that did not come from the
    /// system's default repository
    ///
    /// Each call performs a fresh query; the returned stream must be
    /// consumed before the next call.
    fn query_installed(&self) -> Result<InstalledStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_parsing() {
        assert_eq!("5".parse::<Release>().unwrap(), Release::new(5));
        assert_eq!(" 12 ".parse::<Release>().unwrap(), Release::new(12));
        assert!("5a".parse::<Release>().is_err());
        assert!("".parse::<Release>().is_err());
        assert!("-1".parse::<Release>().is_err());
    }

    #[test]
    fn test_release_ordering_is_numeric() {
        // "10" sorts before "9" as text but not as a release
        let nine: Release = "9".parse().unwrap();
        let ten: Release = "10".parse().unwrap();
        assert!(ten > nine);
    }
}
