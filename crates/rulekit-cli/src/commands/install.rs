//! Install and install-all commands

use std::path::Path;

use colored::Colorize;
use rulekit_core::{InstallReport, InstallRequest, Installer, Severity, resolve_package_dir};

use crate::cli::InstallArgs;
use crate::error::{CliError, Result};

/// Run the install command
pub fn run_install(package_dir: Option<&Path>, names: &[String], args: &InstallArgs) -> Result<()> {
    let request = build_request(package_dir, args)?;
    let installer = Installer::with_builtins();

    let mut report = InstallReport::default();
    for name in names {
        report.merge(installer.install(name, &request)?);
    }
    finish(&report, args.json)
}

/// Run the install-all command
pub fn run_install_all(package_dir: Option<&Path>, args: &InstallArgs) -> Result<()> {
    let request = build_request(package_dir, args)?;
    let report = Installer::with_builtins().install_all(&request)?;
    if !args.json && report.packages.is_empty() {
        println!(
            "{} no packages in {}",
            "note:".dimmed(),
            request.package_dir.display()
        );
    }
    finish(&report, args.json)
}

pub(crate) fn build_request(package_dir: Option<&Path>, args: &InstallArgs) -> Result<InstallRequest> {
    let package_dir = resolve_package_dir(package_dir)?;
    let workdir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    Ok(InstallRequest::new(package_dir, workdir)
        .with_target(&args.target)
        .with_excludes(args.excludes.iter().cloned())
        .with_all_targets(args.all_targets)
        .with_no_flatten(args.no_flatten))
}

fn finish(report: &InstallReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }

    let failed = report.errors().count();
    if failed > 0 {
        return Err(CliError::PartialFailure { failed });
    }
    Ok(())
}

fn print_report(report: &InstallReport) {
    for result in &report.results {
        println!(
            "{} {} -> {} ({})",
            "installed".green().bold(),
            result.name.bold(),
            result.output_dir.cyan(),
            result.strategy
        );
    }

    for file in &report.files {
        for note in &file.notes {
            eprintln!(
                "{} {}: {}",
                "note:".dimmed(),
                file.destination.display(),
                note
            );
        }
    }

    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Warning => "warning:".yellow().bold(),
            Severity::Error => "error:".red().bold(),
        };
        eprintln!(
            "{} {} [{}]: {}",
            label,
            issue.source.display(),
            issue.target,
            issue.message
        );
    }

    let skipped = report.files.iter().filter(|f| f.skipped).count();
    println!(
        "{} {} written, {} unchanged, {} failed",
        "Total:".dimmed(),
        report.files.len() - skipped,
        skipped,
        report.errors().count()
    );
}
