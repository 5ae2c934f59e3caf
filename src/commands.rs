// src/commands.rs
//! Command handlers for the eopkg3p CLI

use anyhow::Result;
use eopkg3p::builder::PackageBuilder;
use eopkg3p::config::{Config, Tools};
use eopkg3p::exec::SystemRunner;
use eopkg3p::output::{self, PackageRow};
use eopkg3p::packages::{EopkgQuery, read_description};
use eopkg3p::repository::{self, AvailableIndex, Mirror};
use eopkg3p::resolver::{filter_installed, filter_outdated, resolve_names};
use std::io;
use tracing::info;

/// Everything a command needs, resolved once in `main`
pub struct Context {
    pub config: Config,
    pub tools: Tools,
    pub runner: SystemRunner,
    pub color: bool,
}

impl Context {
    /// Create the cache directories and locate the external tools
    pub fn new(config: Config) -> Result<Self> {
        config.ensure_dirs()?;
        Ok(Self {
            tools: Tools::locate()?,
            config,
            runner: SystemRunner,
            color: output::use_color(),
        })
    }

    /// Like `new`, for commands that read the local repository
    pub fn with_mirror(config: Config) -> Result<Self> {
        let ctx = Self::new(config)?;
        cmd_bootstrap(&ctx)?;
        Ok(ctx)
    }

    fn mirror(&self) -> Mirror<'_> {
        Mirror::new(
            &self.runner,
            &self.tools.git,
            self.config.repo_url.clone(),
            &self.config.repo_dir,
        )
    }

    fn query(&self) -> EopkgQuery<'_> {
        EopkgQuery::new(&self.runner, &self.tools.eopkg)
    }

    fn builder(&self) -> PackageBuilder<'_> {
        PackageBuilder::new(&self.runner, &self.tools, &self.config.build_dir)
    }

    fn available(&self) -> Result<AvailableIndex> {
        Ok(repository::scan(
            &self.config.repo_dir,
            &self.config.metadata_filename,
        )?)
    }

    fn confirm(&self, yes: bool) -> Result<bool> {
        if yes {
            return Ok(true);
        }
        Ok(output::confirm(
            "Continue?",
            &mut io::stdin().lock(),
            &mut io::stdout(),
        )?)
    }
}

/// Clone the mirror when it is missing or empty
pub fn cmd_bootstrap(ctx: &Context) -> Result<()> {
    let mirror = ctx.mirror();
    if !mirror.is_present() {
        println!("{}", output::error("Local repo not found!", ctx.color));
        mirror.bootstrap()?;
    }
    Ok(())
}

pub fn cmd_update_repo(ctx: &Context) -> Result<()> {
    let mirror = ctx.mirror();
    println!("Updating repository: {}...", mirror.url());
    mirror.ensure_fresh()?;
    Ok(())
}

pub fn cmd_install(ctx: &Context, packages: &[String], reinstall: bool, yes: bool) -> Result<()> {
    if packages.is_empty() {
        println!("Nothing to do...");
        return Ok(());
    }

    let available = ctx.available()?;
    let mut to_install = resolve_names(packages, &available)?;

    if !reinstall {
        let installed = filter_installed(&available, &ctx.query())?;
        let already: Vec<String> = to_install
            .names()
            .filter(|name| installed.contains(name))
            .map(str::to_string)
            .collect();

        if !already.is_empty() {
            println!(
                "{}",
                output::warning(
                    "The following package(s) are already installed and are not going to be installed again:",
                    ctx.color
                )
            );
            for name in &already {
                println!("{}", name);
            }
            to_install = to_install
                .into_iter()
                .filter(|(name, _)| !already.contains(name))
                .collect();
        }
    }

    if to_install.is_empty() {
        println!("Nothing to do...");
        return Ok(());
    }

    println!("The following packages are going to be installed:");
    for name in to_install.names() {
        println!("{}", output::highlight(name, ctx.color));
    }

    if !ctx.confirm(yes)? {
        return Ok(());
    }

    let artifacts = ctx
        .builder()
        .build_and_install(to_install.iter().map(|(_, pspec)| pspec))?;
    info!("Installed {} package(s)", artifacts.len());
    Ok(())
}

pub fn cmd_remove(ctx: &Context, packages: &[String]) -> Result<()> {
    ctx.builder().remove(packages)?;
    Ok(())
}

pub fn cmd_list_available(ctx: &Context, json: bool) -> Result<()> {
    let available = ctx.available()?;
    let installed = filter_installed(&available, &ctx.query())?;
    let rows = rows(&available, &installed)?;
    print_rows(ctx, &rows, json)
}

pub fn cmd_list_installed(ctx: &Context, json: bool) -> Result<()> {
    let available = ctx.available()?;
    let installed = filter_installed(&available, &ctx.query())?;
    if installed.is_empty() && !json {
        println!("No third-party packages installed.");
        return Ok(());
    }
    let rows = rows(&installed, &installed)?;
    print_rows(ctx, &rows, json)
}

pub fn cmd_delete_cache(config: &Config) -> Result<()> {
    println!("Deleting all caches ({})...", config.cache_dir.display());
    config.delete_cache()?;
    println!("Done!");
    Ok(())
}

pub fn cmd_upgrade(ctx: &Context, packages: &[String], yes: bool) -> Result<()> {
    cmd_update_repo(ctx)?;

    let available = ctx.available()?;
    let candidates = if packages.is_empty() {
        available
    } else {
        resolve_names(packages, &available)?
    };

    let outdated = filter_outdated(&candidates, &ctx.query())?;
    if outdated.is_empty() {
        println!("No packages to upgrade.");
        return Ok(());
    }

    println!("The following packages are going to be upgraded:");
    for name in outdated.names() {
        println!("{}", output::highlight(name, ctx.color));
    }

    if !ctx.confirm(yes)? {
        return Ok(());
    }

    let artifacts = ctx
        .builder()
        .build_and_install(outdated.iter().map(|(_, pspec)| pspec))?;
    info!("Upgraded {} package(s)", artifacts.len());
    Ok(())
}

fn rows(packages: &AvailableIndex, installed: &AvailableIndex) -> Result<Vec<PackageRow>> {
    packages
        .iter()
        .map(|(name, pspec)| {
            Ok(PackageRow {
                name: name.to_string(),
                description: read_description(pspec)?,
                installed: installed.contains(name),
                pspec: pspec.to_path_buf(),
            })
        })
        .collect()
}

fn print_rows(ctx: &Context, rows: &[PackageRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print!(
            "{}",
            output::render_rows(rows, output::terminal_width(), ctx.color)
        );
    }
    Ok(())
}
