//! Remove command

use std::path::Path;

use colored::Colorize;
use rulekit_core::{Installer, RemoveReport};

use super::install::build_request;
use crate::cli::InstallArgs;
use crate::error::Result;

/// Run the remove command
pub fn run_remove(package_dir: Option<&Path>, names: &[String], args: &InstallArgs) -> Result<()> {
    let request = build_request(package_dir, args)?;
    let installer = Installer::with_builtins();

    let mut reports = Vec::with_capacity(names.len());
    for name in names {
        reports.push(installer.remove(name, &request)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }
    Ok(())
}

fn print_reports(reports: &[RemoveReport]) {
    for report in reports {
        for path in &report.removed {
            println!(
                "{} {} {}",
                "removed".yellow().bold(),
                report.name.bold(),
                path.display().to_string().cyan()
            );
        }
    }
}
