use std::path::Path;
use std::sync::Arc;

use rulekit_fs::io::{self, LinkOutcome, WriteOutcome};
use rulekit_fs::NormalizedPath;
use tracing::{debug, warn};

use super::linker::{DirectoryLinker, GnuStow};
use super::strategy::InstallStrategy;
use crate::config::InstallConfig;
use crate::error::Result;

/// Bytes the copy step writes at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Full rewritten document. Never linked; rewritten only when the bytes
    /// differ from what is on disk.
    Materialized(Vec<u8>),
    /// Reference stub for the source. Links are tried first; a real file
    /// already at the destination is kept as is.
    Reference(Vec<u8>),
}

/// Outcome of one placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub strategy: InstallStrategy,
    /// Whether the destination changed.
    pub written: bool,
    /// Why earlier strategies were skipped.
    pub notes: Vec<String>,
}

impl Placement {
    fn new(strategy: InstallStrategy, written: bool, notes: Vec<String>) -> Self {
        Self {
            strategy,
            written,
            notes,
        }
    }
}

/// Places files at their destination: stow, then symlink, then copy.
#[derive(Debug, Clone)]
pub struct StrategyResolver {
    config: InstallConfig,
    linker: Arc<dyn DirectoryLinker>,
}

impl StrategyResolver {
    /// Resolver using GNU stow as the directory linker.
    pub fn new(config: InstallConfig) -> Self {
        Self::with_linker(config, Arc::new(GnuStow::new()))
    }

    pub fn with_linker(config: InstallConfig, linker: Arc<dyn DirectoryLinker>) -> Self {
        Self { config, linker }
    }

    pub fn config(&self) -> InstallConfig {
        self.config
    }

    /// Place `payload` for `src` at `dest`.
    ///
    /// `package_root` and `unit` are handed to the directory linker, which
    /// links into the destination's parent directory.
    pub fn place(
        &self,
        package_root: &Path,
        src: &Path,
        dest: &NormalizedPath,
        unit: &str,
        payload: Payload,
    ) -> Result<Placement> {
        match payload {
            Payload::Materialized(content) => {
                let outcome = io::write_if_changed(dest, &content)?;
                Ok(Placement::new(
                    InstallStrategy::Copy,
                    outcome == WriteOutcome::Written,
                    Vec::new(),
                ))
            }
            Payload::Reference(stub) => {
                self.place_reference(package_root, src, dest, unit, move || Ok(stub))
            }
        }
    }

    /// Place a reference to `src` at `dest`, rendering the stub only if the
    /// copy step has to write one.
    pub fn place_reference<F>(
        &self,
        package_root: &Path,
        src: &Path,
        dest: &NormalizedPath,
        unit: &str,
        stub: F,
    ) -> Result<Placement>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let mut notes = Vec::new();

        if self.config.prefer_stow {
            match self.try_stow(package_root, dest, unit) {
                Ok(()) => return Ok(Placement::new(InstallStrategy::Stow, true, notes)),
                Err(note) => {
                    warn!(dest = %dest, "{note}; falling back");
                    notes.push(note);
                }
            }
        }

        if self.config.links_enabled() {
            match io::symlink_atomic(src, dest) {
                Ok(outcome) => {
                    debug!(dest = %dest, ?outcome, "placed symlink");
                    return Ok(Placement::new(
                        InstallStrategy::Symlink,
                        outcome != LinkOutcome::Unchanged,
                        notes,
                    ));
                }
                Err(e) => {
                    warn!(dest = %dest, error = %e, "symlink failed; falling back to copy");
                    notes.push(format!("symlink failed: {e}"));
                }
            }
        }

        if dest.exists() && !dest.is_symlink() {
            debug!(dest = %dest, "destination exists, keeping it");
            return Ok(Placement::new(InstallStrategy::Copy, false, notes));
        }
        io::write_atomic(dest, &stub()?)?;
        Ok(Placement::new(InstallStrategy::Copy, true, notes))
    }

    /// Run the directory linker, returning a note on any failure.
    fn try_stow(
        &self,
        package_root: &Path,
        dest: &NormalizedPath,
        unit: &str,
    ) -> std::result::Result<(), String> {
        let name = self.linker.name().to_string();
        if !self.linker.is_available() {
            return Err(format!("{name} requested but not available"));
        }

        let target_root = dest
            .parent()
            .map(|p| p.to_native())
            .ok_or_else(|| format!("{name}: destination {dest} has no parent"))?;
        std::fs::create_dir_all(&target_root)
            .map_err(|e| format!("{name}: cannot create {}: {e}", target_root.display()))?;

        self.linker
            .try_link(package_root, &target_root, unit)
            .map_err(|e| e.to_string())?;

        if dest.exists() {
            Ok(())
        } else {
            Err(format!("{name} succeeded but {dest} was not created"))
        }
    }
}
