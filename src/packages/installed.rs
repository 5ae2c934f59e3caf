// src/packages/installed.rs

//! Query installed third-party packages from eopkg
//!
//! `eopkg li -iN` lists installed packages whose origin is not the default
//! repository as a pipe-delimited table with one header line:
//!
//! ```text
//! Name                |Version     |Distribution|Release|...
//! google-chrome-stable|120.0.6099  |Solus       |112    |...
//! ```

use super::traits::{InstalledPackage, InstalledSource, InstalledStream, Release};
use crate::error::{Error, Result};
use crate::exec::{Runner, ToolCommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field holding the package name
const NAME_FIELD: usize = 0;

/// Field holding the installed release
const RELEASE_FIELD: usize = 3;

/// Installed-package query backed by the `eopkg` binary
pub struct EopkgQuery<'a> {
    runner: &'a dyn Runner,
    eopkg: PathBuf,
}

impl<'a> EopkgQuery<'a> {
    pub fn new(runner: &'a dyn Runner, eopkg: impl AsRef<Path>) -> Self {
        Self {
            runner,
            eopkg: eopkg.as_ref().to_path_buf(),
        }
    }

    fn list_command(&self) -> ToolCommand {
        ToolCommand::new(&self.eopkg).args(["li", "-iN"])
    }
}

impl InstalledSource for EopkgQuery<'_> {
    fn query_installed(&self) -> Result<InstalledStream> {
        let lines = self.runner.stream_lines(&self.list_command())?;
        Ok(Box::new(parse_listing(lines)))
    }
}

/// Parse listing lines, skipping the header
///
/// Lines with too few fields are skipped: eopkg occasionally prints notices
/// and blank lines into the table, and those are not packages. This also
/// hides a truncated or reformatted table, which is accepted.
pub fn parse_listing<I>(lines: I) -> impl Iterator<Item = Result<InstalledPackage>>
where
    I: Iterator<Item = Result<String>>,
{
    let mut header_seen = false;
    lines.filter_map(move |line| match line {
        Ok(_) if !header_seen => {
            header_seen = true;
            None
        }
        Ok(line) => parse_line(&line).transpose(),
        Err(e) => Some(Err(e)),
    })
}

/// Parse one table row; `Ok(None)` for a row that is not a package
fn parse_line(line: &str) -> Result<Option<InstalledPackage>> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() <= RELEASE_FIELD {
        debug!("Skipping short eopkg listing line: {:?}", line);
        return Ok(None);
    }

    let name = fields[NAME_FIELD].trim();
    let value = fields[RELEASE_FIELD].trim();
    let release: Release = value.parse().map_err(|_| Error::InvalidInstalledRelease {
        package: name.to_string(),
        value: value.to_string(),
    })?;

    Ok(Some(InstalledPackage::new(name, release)))
}
