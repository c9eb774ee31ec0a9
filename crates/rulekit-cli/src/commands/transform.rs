//! Transform preview command

use std::path::Path;

use colored::Colorize;
use rulekit_core::{InstallRequest, Installer, resolve_package_dir};

use crate::error::{CliError, Result};

/// Run the transform command: render without writing
pub fn run_transform(package_dir: Option<&Path>, name: &str, target: &str, json: bool) -> Result<()> {
    let package_dir = resolve_package_dir(package_dir)?;
    let request = InstallRequest::new(package_dir, std::env::current_dir()?).with_target(target);
    let items = Installer::with_builtins().preview(name, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            println!("{} {}", "==>".cyan().bold(), item.output_path.bold());
            if let Some(output) = &item.output {
                println!("{output}");
            }
            if let Some(warning) = &item.warning {
                eprintln!("{} {}: {}", "warning:".yellow().bold(), item.source.display(), warning);
            }
            if let Some(error) = &item.error {
                eprintln!("{} {}: {}", "error:".red().bold(), item.source.display(), error);
            }
            println!();
        }
    }

    let failed = items.iter().filter(|i| i.error.is_some()).count();
    if failed > 0 {
        return Err(CliError::PartialFailure { failed });
    }
    Ok(())
}
