//! Removing installed rule documents
//!
//! The inverse of an install: deletes the stub, symlink or rewritten file a
//! document or package left in each target's output directory.

use std::path::PathBuf;

use rulekit_fs::{NormalizedPath, io, validate_package_name};
use rulekit_transform::{SOURCE_EXTENSION, Transformer};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::install::{InstallRequest, Installer};

/// What a remove deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    pub name: String,
    pub removed: Vec<PathBuf>,
}

impl Installer {
    /// Remove what installing `name` with `request` would place.
    ///
    /// A package still present in `request.package_dir` is expanded to its
    /// files the same way install does. Otherwise `name` is taken as a single
    /// document, so outputs can be removed after the source is gone.
    /// Returns `NotFound` when nothing was installed.
    pub fn remove(&self, name: &str, request: &InstallRequest) -> Result<RemoveReport> {
        validate_package_name(name)?;
        let workdir = NormalizedPath::new(&request.workdir);

        let outputs = if request.package_dir.join(name).is_dir() {
            let plan = self.plan(name, request)?;
            let mut outputs = Vec::with_capacity(plan.files.len() * plan.transformers.len());
            for transformer in &plan.transformers {
                let out_dir = workdir.join(transformer.output_dir());
                for file in &plan.files {
                    outputs.push(out_dir.join(&transformer.output_name(file.rel.as_str())));
                }
            }
            outputs
        } else {
            let registry = self.registry().ok_or(Error::NoRegistry)?;
            let transformer = registry.get(&request.target)?;
            let file_name = if name.ends_with(SOURCE_EXTENSION) {
                name.to_string()
            } else {
                format!("{name}{SOURCE_EXTENSION}")
            };
            let rel = NormalizedPath::new(&file_name);
            let rel = match (request.no_flatten, rel.file_name()) {
                (false, Some(base)) => NormalizedPath::new(base),
                _ => rel,
            };
            let out_dir = workdir.join(transformer.output_dir());
            vec![out_dir.join(&transformer.output_name(rel.as_str()))]
        };

        let mut removed = Vec::new();
        for output in &outputs {
            if io::remove_file(output)? {
                removed.push(output.to_native());
            } else {
                debug!(path = %output, "nothing to remove");
            }
        }

        if removed.is_empty() {
            return Err(Error::NotFound {
                name: name.to_string(),
                path: outputs
                    .first()
                    .map(NormalizedPath::to_native)
                    .unwrap_or_else(|| workdir.to_native()),
            });
        }

        info!(package = name, files = removed.len(), "removed");
        Ok(RemoveReport {
            name: name.to_string(),
            removed,
        })
    }
}
