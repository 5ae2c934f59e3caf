// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use commands::Context;
use eopkg3p::config::Config;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging; stdout is reserved for listings
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::resolve(cli.cache_dir.clone(), cli.repo_url.clone())?;
    debug!("Using configuration: {:?}", config);

    if cli.cache {
        println!("{}", config.cache_dir.display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "eopkg3p", &mut std::io::stdout());
            Ok(())
        }
        Commands::DeleteCache => commands::cmd_delete_cache(&config),
        Commands::Remove { packages } => commands::cmd_remove(&Context::new(config)?, &packages),
        Commands::UpdateRepo => commands::cmd_update_repo(&Context::with_mirror(config)?),
        Commands::Install {
            packages,
            reinstall,
            yes,
        } => commands::cmd_install(&Context::with_mirror(config)?, &packages, reinstall, yes),
        Commands::ListAvailable { json } => {
            commands::cmd_list_available(&Context::with_mirror(config)?, json)
        }
        Commands::ListInstalled { json } => {
            commands::cmd_list_installed(&Context::with_mirror(config)?, json)
        }
        Commands::Upgrade { packages, yes } => {
            commands::cmd_upgrade(&Context::with_mirror(config)?, &packages, yes)
        }
    }
}
