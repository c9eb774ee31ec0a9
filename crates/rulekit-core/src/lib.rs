//! Install orchestration for rulekit
//!
//! Installs rule documents from a shared package directory into a project,
//! rewriting metadata for the requested target and choosing how each file
//! lands at its destination:
//!
//! - **Strategy resolution**: stow, then symlink, then copy, driven by an
//!   injected [`InstallConfig`]
//! - **Manifests**: per-package targets, excludes and per-target overrides
//! - **Installer**: single documents and packages, multi-target fan-out,
//!   per-file error reporting, and removal of what an install placed
//!
//! # Architecture
//!
//! ```text
//!                  rulekit-cli
//!                       |
//!                  rulekit-core
//!                       |
//!      +----------------+-----------------+
//!      |                |                 |
//! rulekit-fs     rulekit-content   rulekit-transform
//! ```

pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod manifest;
pub mod preview;
pub mod remove;

pub use config::{InstallConfig, resolve_package_dir};
pub use error::{Error, ErrorCode, LinkError, Result};
pub use install::{
    DEFAULT_TARGET, DirectoryLinker, FileIssue, GnuStow, InstallReport, InstallRequest,
    InstallResult, InstallStrategy, InstalledFile, Installer, Payload, Placement, Severity,
    StrategyResolver, list_packages,
};
pub use manifest::{IGNORE_FILE, MANIFEST_FILE, Manifest, Override};
pub use preview::PreviewItem;
pub use remove::RemoveReport;
