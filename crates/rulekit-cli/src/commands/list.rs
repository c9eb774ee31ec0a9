//! List commands for packages and targets

use std::path::Path;

use colored::Colorize;
use rulekit_core::{Installer, list_packages, resolve_package_dir};
use rulekit_transform::Transformer;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
struct TargetInfo {
    target: String,
    output_dir: String,
    extension: String,
    /// Whether output is rewritten rather than referenced
    rewrites: bool,
}

/// Run the list command
pub fn run_list(package_dir: Option<&Path>, json: bool) -> Result<()> {
    let package_dir = resolve_package_dir(package_dir)?;
    let packages = list_packages(&package_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    println!("{} {}", "Packages in".bold(), package_dir.display());
    println!();
    for package in &packages {
        println!("  {}", package.green());
    }
    println!();
    println!(
        "{} {} packages available. Use {} to install one.",
        "Total:".dimmed(),
        packages.len(),
        "rulekit install <name>".cyan()
    );
    Ok(())
}

/// Run the targets command
pub fn run_targets(json: bool) -> Result<()> {
    let targets = target_infos()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    println!("{}", "Available Targets".bold());
    println!();
    for info in &targets {
        let mode = if info.rewrites { "rewritten" } else { "referenced" };
        println!(
            "  {:<16} {}/*{} ({})",
            info.target.green(),
            info.output_dir,
            info.extension,
            mode.dimmed()
        );
    }
    Ok(())
}

fn target_infos() -> Result<Vec<TargetInfo>> {
    let installer = Installer::with_builtins();
    let registry = installer
        .registry()
        .ok_or(rulekit_core::Error::NoRegistry)?;

    let mut infos = Vec::with_capacity(registry.len());
    for name in registry.list() {
        let transformer = registry.get(name).map_err(rulekit_core::Error::from)?;
        infos.push(TargetInfo {
            target: transformer.target().to_string(),
            output_dir: transformer.output_dir().to_string(),
            extension: transformer.extension().to_string(),
            rewrites: transformer.materializes(),
        });
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_sorted_and_described() {
        let infos = target_infos().unwrap();
        let names: Vec<_> = infos.iter().map(|i| i.target.as_str()).collect();
        assert_eq!(names, vec!["copilot-instr", "copilot-prompt", "cursor"]);

        let cursor = &infos[2];
        assert_eq!(cursor.output_dir, ".cursor/rules");
        assert!(!cursor.rewrites);
    }

    #[test]
    fn list_targets_runs() {
        assert!(run_targets(false).is_ok());
    }
}
