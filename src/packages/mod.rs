// src/packages/mod.rs

//! Package metadata and installed-package queries
//!
//! - `pspec`: reads description and release from pspec.xml files
//! - `installed`: lists installed third-party packages through eopkg

pub mod installed;
pub mod pspec;
pub mod traits;

pub use installed::EopkgQuery;
pub use pspec::{read_description, read_release};
pub use traits::{InstalledPackage, InstalledSource, InstalledStream, Release};
