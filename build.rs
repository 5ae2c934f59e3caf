// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn packages_arg(help: &'static str) -> Arg {
    Arg::new("packages")
        .num_args(0..)
        .value_name("PACKAGES")
        .help(help)
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .short('y')
        .long("yes")
        .action(ArgAction::SetTrue)
        .help("Don't ask for confirmation")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn build_cli() -> Command {
    Command::new("eopkg3p")
        .version(env!("CARGO_PKG_VERSION"))
        .author("eopkg3p Contributors")
        .about("Build and install packages from the Solus 3rd-party repository")
        .subcommand_required(false)
        .arg(
            Arg::new("cache")
                .long("cache")
                .action(ArgAction::SetTrue)
                .help("Print the cache directory and exit"),
        )
        .arg(
            Arg::new("cache_dir")
                .long("cache-dir")
                .value_name("DIR")
                .help("Directory holding the repository mirror and build output [env: EOPKG3P_CACHE_DIR]"),
        )
        .arg(
            Arg::new("repo_url")
                .long("repo-url")
                .value_name("URL")
                .help("Git URL of the package-definition repository [env: EOPKG3P_REPO_URL]"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show debug logging"),
        )
        .subcommand(
            Command::new("update-repo")
                .visible_alias("ur")
                .about("Update the local repository"),
        )
        .subcommand(
            Command::new("install")
                .visible_alias("it")
                .about("Install packages")
                .arg(packages_arg("Package names"))
                .arg(
                    Arg::new("reinstall")
                        .long("reinstall")
                        .action(ArgAction::SetTrue)
                        .help("Build and install even if already installed"),
                )
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("remove")
                .visible_alias("rm")
                .about("Alias for `eopkg rm`")
                .arg(packages_arg("Package names")),
        )
        .subcommand(
            Command::new("list-available")
                .visible_alias("la")
                .about("List all packages available in the local repository")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("list-installed")
                .visible_alias("li")
                .about("List all 3rd party packages that are currently installed")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("delete-cache")
                .visible_alias("dc")
                .about("Delete cache files"),
        )
        .subcommand(
            Command::new("upgrade")
                .visible_alias("up")
                .about("Upgrade 3rd party packages")
                .arg(packages_arg("Package names (upgrades everything outdated if omitted)"))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Target shell")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("eopkg3p.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
