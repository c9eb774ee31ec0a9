//! Install engine
//!
//! - [`strategy`]: which placement mechanism was used
//! - [`linker`]: the external directory-linking tool seam
//! - [`resolver`]: ordered placement attempts over the atomic write primitive
//! - [`orchestrator`]: documents and packages, targets, excludes, reporting

mod linker;
mod orchestrator;
mod resolver;
mod strategy;

pub use linker::{DirectoryLinker, GnuStow};
pub use orchestrator::{
    DEFAULT_TARGET, FileIssue, InstallReport, InstallRequest, InstallResult, InstalledFile,
    Installer, Severity, list_packages,
};
pub use resolver::{Payload, Placement, StrategyResolver};
pub use strategy::InstallStrategy;
