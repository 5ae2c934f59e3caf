// src/builder.rs

//! Build and install packages with eopkg
//!
//! Building runs `eopkg bi` on a pspec file and installing runs `eopkg it`
//! on the resulting `.eopkg` file, both through `pkexec`. These prompt the
//! user for authorization, so a failure is never retried.

use crate::config::Tools;
use crate::error::{Error, Result};
use crate::exec::{Runner, ToolCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Drives eopkg build/install/remove subcommands
pub struct PackageBuilder<'a> {
    runner: &'a dyn Runner,
    tools: &'a Tools,
    build_dir: PathBuf,
}

impl<'a> PackageBuilder<'a> {
    pub fn new(runner: &'a dyn Runner, tools: &'a Tools, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            tools,
            build_dir: build_dir.into(),
        }
    }

    /// Output directory used for the package defined by `pspec`
    pub fn output_dir(&self, pspec: &Path) -> Result<PathBuf> {
        let name = pspec
            .parent()
            .and_then(Path::file_name)
            .ok_or_else(|| Error::MalformedMetadata {
                path: pspec.to_path_buf(),
                reason: "pspec file is not inside a package directory".to_string(),
            })?;
        Ok(self.build_dir.join(name))
    }

    /// Build the package defined by `pspec`, returning the produced artifact
    ///
    /// The package's output directory is always emptied first so a stale
    /// artifact from an earlier build is never picked up.
    pub fn build(&self, pspec: &Path) -> Result<PathBuf> {
        let dest = self.output_dir(pspec)?;
        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        fs::create_dir_all(&dest)?;

        info!("Building {} into {}", pspec.display(), dest.display());
        let command = ToolCommand::elevated(&self.tools.pkexec, &self.tools.eopkg)
            .args(["bi", "--ignore-safety"])
            .arg(pspec)
            .arg("-O")
            .arg(&dest);
        self.runner.run(&command)?;

        find_artifact(&dest)
    }

    /// Install a built `.eopkg` file
    pub fn install(&self, artifact: &Path) -> Result<()> {
        info!("Installing {}", artifact.display());
        let command = ToolCommand::elevated(&self.tools.pkexec, &self.tools.eopkg)
            .arg("it")
            .arg(artifact);
        self.runner.run(&command)
    }

    /// Build then install; the first failure stops the batch
    pub fn build_and_install<'p, I>(&self, pspecs: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let mut installed = Vec::new();
        for pspec in pspecs {
            let artifact = self.build(pspec)?;
            self.install(&artifact)?;
            installed.push(artifact);
        }
        Ok(installed)
    }

    /// Remove installed packages by name
    pub fn remove<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        info!("Removing {} package(s)", names.len());
        let command = ToolCommand::elevated(&self.tools.pkexec, &self.tools.eopkg)
            .arg("rm")
            .args(names.iter().map(|name| -> &str { name.as_ref() }));
        self.runner.run(&command)
    }
}

/// The file a successful build left in `dest`
fn find_artifact(dest: &Path) -> Result<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dest)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    if files.len() > 1 {
        warn!(
            "Build left {} files in {}; using {}",
            files.len(),
            dest.display(),
            files[0].display()
        );
    }

    files
        .into_iter()
        .next()
        .ok_or_else(|| Error::BuildProducedNoArtifact(dest.to_path_buf()))
}
