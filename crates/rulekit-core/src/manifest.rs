//! Package manifest and ignore file
//!
//! A package may carry `cursor-rules-manifest.yaml` declaring the targets it
//! supports, files to exclude, and per-target default overrides. It may also
//! carry `.cursor-rules-ignore` with one exclude glob per line. Both are
//! optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rulekit_transform::TargetDefaults;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "cursor-rules-manifest.yaml";
pub const IGNORE_FILE: &str = ".cursor-rules-ignore";

/// Parsed `cursor-rules-manifest.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,

    /// Targets installed by `--all-targets`
    #[serde(default)]
    pub targets: Vec<String>,

    /// Per-target defaults keyed by target identifier
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, Override>,

    /// Globs matched against package-relative paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Target-specific defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tools: Option<Vec<String>>,

    /// Parsed and exposed; not applied to output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_refs: Vec<String>,
}

impl Override {
    pub fn to_defaults(&self) -> TargetDefaults {
        TargetDefaults {
            default_mode: self.default_mode.clone(),
            default_tools: self.default_tools.clone(),
        }
    }
}

impl Manifest {
    /// Parse manifest YAML. An empty document is an empty manifest.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the manifest of the package at `package_path`.
    ///
    /// Returns `Ok(None)` when the package has no manifest.
    pub fn load(package_path: &Path) -> Result<Option<Self>> {
        let path = package_path.join(MANIFEST_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Manifest {
                    path,
                    message: e.to_string(),
                });
            }
        };
        let manifest = Self::parse(&content).map_err(|e| Error::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), targets = manifest.targets.len(), "loaded manifest");
        Ok(Some(manifest))
    }

    pub fn has_target(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t == target)
    }

    pub fn override_for(&self, target: &str) -> Option<&Override> {
        self.overrides.get(target)
    }
}

/// Parse ignore file content: one pattern per line, blank lines and `#`
/// comments skipped.
pub fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Read the ignore file of the package at `package_path`, if any.
pub fn load_ignore_patterns(package_path: &Path) -> Result<Vec<String>> {
    let path = package_path.join(IGNORE_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(parse_ignore_patterns(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(Error::Io(e)),
    }
}
