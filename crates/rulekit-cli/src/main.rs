//! rulekit CLI
//!
//! Installs shared rule documents into a project for Cursor and Copilot.

mod cli;
mod commands;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = rulekit_core::logging::init(cli.verbose) {
        eprintln!("{} logging unavailable: {e}", "warning:".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.package_dir.as_deref()),
        None => {
            println!("{} rule installer", "rulekit".green().bold());
            println!();
            println!("Run {} for available commands.", "rulekit --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, package_dir: Option<&Path>) -> Result<()> {
    match cmd {
        Commands::Install { names, options } => {
            commands::run_install(package_dir, &names, &options)
        }
        Commands::InstallAll { options } => commands::run_install_all(package_dir, &options),
        Commands::Remove { names, options } => commands::run_remove(package_dir, &names, &options),
        Commands::Transform { name, target, json } => {
            commands::run_transform(package_dir, &name, &target, json)
        }
        Commands::List { json } => commands::run_list(package_dir, json),
        Commands::Targets { json } => commands::run_targets(json),
    }
}
