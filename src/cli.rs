// src/cli.rs
//! CLI definitions for eopkg3p
//!
//! Every subcommand has a two-letter alias (`ur`, `it`, `rm`, `la`, `li`,
//! `dc`, `up`). The handlers live in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eopkg3p")]
#[command(author, version, about = "Build and install packages from the Solus 3rd-party repository", long_about = None)]
pub struct Cli {
    /// Print the cache directory and exit
    #[arg(long)]
    pub cache: bool,

    /// Directory holding the repository mirror and build output
    #[arg(long, env = "EOPKG3P_CACHE_DIR", global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Git URL of the package-definition repository
    #[arg(long, env = "EOPKG3P_REPO_URL", global = true, value_name = "URL")]
    pub repo_url: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// (ur) Update the local repository
    #[command(visible_alias = "ur")]
    UpdateRepo,

    /// (it) Install packages
    #[command(visible_alias = "it")]
    Install {
        /// Package names
        packages: Vec<String>,

        /// Build and install even if already installed
        #[arg(long)]
        reinstall: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// (rm) Alias for `eopkg rm`
    #[command(visible_alias = "rm")]
    Remove {
        /// Package names
        packages: Vec<String>,
    },

    /// (la) List all packages available in the local repository
    #[command(visible_alias = "la")]
    ListAvailable {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// (li) List all 3rd party packages that are currently installed
    #[command(visible_alias = "li")]
    ListInstalled {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// (dc) Delete cache files
    #[command(visible_alias = "dc")]
    DeleteCache,

    /// (up) Upgrade 3rd party packages
    #[command(visible_alias = "up")]
    Upgrade {
        /// Package names (upgrades everything outdated if omitted)
        packages: Vec<String>,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}
