use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::LinkError;

/// External tool that links a unit from a source root into a target root.
pub trait DirectoryLinker: Debug + Send + Sync {
    /// Tool name for notes and logs.
    fn name(&self) -> &str;

    /// Whether the tool can be run at all.
    fn is_available(&self) -> bool;

    /// Link `unit` from `source_root` into `target_root`.
    fn try_link(&self, source_root: &Path, target_root: &Path, unit: &str)
    -> Result<(), LinkError>;
}

/// GNU stow found on `PATH`.
#[derive(Debug, Clone)]
pub struct GnuStow {
    program: String,
}

impl Default for GnuStow {
    fn default() -> Self {
        Self {
            program: "stow".to_string(),
        }
    }
}

impl GnuStow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf, LinkError> {
        which::which(&self.program).map_err(|_| LinkError::Unavailable {
            program: self.program.clone(),
        })
    }
}

impl DirectoryLinker for GnuStow {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    fn try_link(
        &self,
        source_root: &Path,
        target_root: &Path,
        unit: &str,
    ) -> Result<(), LinkError> {
        let program = self.locate()?;
        debug!(
            program = %program.display(),
            source_root = %source_root.display(),
            target_root = %target_root.display(),
            unit,
            "running stow"
        );

        let output = Command::new(&program)
            .arg("-v")
            .arg("-d")
            .arg(source_root)
            .arg("-t")
            .arg(target_root)
            .arg(unit)
            .output()
            .map_err(|source| LinkError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let mut text = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if text.is_empty() {
                text = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            Err(LinkError::Failed {
                program: self.program.clone(),
                status: output.status.code(),
                output: text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_unavailable() {
        let stow = GnuStow::with_program("rulekit-no-such-linker-binary");
        assert!(!stow.is_available());
        let err = stow
            .try_link(Path::new("/src"), Path::new("/dst"), "unit")
            .unwrap_err();
        assert!(matches!(err, LinkError::Unavailable { .. }));
    }
}
