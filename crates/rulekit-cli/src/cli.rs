//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rulekit_core::DEFAULT_TARGET;

/// rulekit - Install shared AI-assistant rule documents into a project
#[derive(Parser, Debug)]
#[command(name = "rulekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Shared package directory (default: $CURSOR_RULES_PACKAGE_DIR, then ~/.cursor/rules)
    #[arg(long, global = true)]
    pub package_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install rule documents or packages into a project
    ///
    /// Each name is a package directory or a rule document (with or without
    /// the .mdc extension) inside the package directory.
    ///
    /// Examples:
    ///   rulekit install frontend
    ///   rulekit install style -t copilot-instr
    ///   rulekit install frontend --all-targets -x 'drafts'
    Install {
        /// Documents or packages to install
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        options: InstallArgs,
    },

    /// Install every package in the package directory
    InstallAll {
        #[command(flatten)]
        options: InstallArgs,
    },

    /// Remove what installing documents or packages placed in a project
    ///
    /// Examples:
    ///   rulekit remove style
    ///   rulekit remove frontend -t copilot-instr
    Remove {
        /// Documents or packages to remove
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        options: InstallArgs,
    },

    /// Show what a document or package becomes for a target, without writing
    Transform {
        /// Document or package to render
        name: String,

        /// Output target
        #[arg(short, long, default_value = DEFAULT_TARGET)]
        target: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List packages available in the package directory
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List output targets
    Targets {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by the install commands
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Project directory to install into (default: current directory)
    #[arg(short, long)]
    pub workdir: Option<PathBuf>,

    /// Output target
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Install every target the package manifest declares
    #[arg(long)]
    pub all_targets: bool,

    /// Glob of package-relative paths to skip (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub excludes: Vec<String>,

    /// Keep package subdirectories in the output
    #[arg(long)]
    pub no_flatten: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}
