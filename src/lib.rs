// src/lib.rs

//! eopkg3p
//!
//! Build and install packages from the Solus third-party repository.
//!
//! # Architecture
//!
//! - Mirror: a git clone of the upstream pspec repository, refreshed on demand
//! - Index: package name to pspec.xml path, rebuilt by scanning the mirror
//! - Installed query: third-party packages as reported by `eopkg li`
//! - Resolver: installed / outdated / requested subsets of the index
//! - Builder: `pkexec eopkg bi` and `pkexec eopkg it`
//!
//! Nothing is cached between invocations; every command scans and queries afresh.

pub mod builder;
pub mod config;
mod error;
pub mod exec;
pub mod output;
pub mod packages;
pub mod repository;
pub mod resolver;

pub use error::{Error, Result};
