//! Dry-run transformation
//!
//! Renders what an install would write without touching the project.

use std::path::PathBuf;

use rulekit_content::{marshal, split};
use rulekit_fs::{NormalizedPath, io};
use rulekit_transform::Transformer;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::install::{InstallRequest, Installer};

/// One rendered source document for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewItem {
    pub source: PathBuf,
    pub target: String,
    /// Destination relative to the project directory
    pub output_path: String,
    /// Rendered document; absent when rendering failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Installer {
    /// Render every file `install` would place for `name`.
    ///
    /// Planning errors (unknown name or target, bad excludes) are returned;
    /// per-file failures are reported on their item.
    pub fn preview(&self, name: &str, request: &InstallRequest) -> Result<Vec<PreviewItem>> {
        let plan = self.plan(name, request)?;
        let mut items = Vec::with_capacity(plan.files.len() * plan.transformers.len());

        for transformer in &plan.transformers {
            let out_dir = NormalizedPath::new(transformer.output_dir());
            for file in &plan.files {
                let output_path = out_dir.join(&transformer.output_name(file.rel.as_str()));
                let mut item = PreviewItem {
                    source: file.path.clone(),
                    target: transformer.target().to_string(),
                    output_path: output_path.as_str().to_string(),
                    output: None,
                    warning: None,
                    error: None,
                };
                match render(transformer.as_ref(), &NormalizedPath::new(&file.path)) {
                    Ok((output, warning)) => {
                        item.output = Some(output);
                        item.warning = warning;
                    }
                    Err(e) => item.error = Some(e.to_string()),
                }
                items.push(item);
            }
        }
        Ok(items)
    }
}

fn render(transformer: &dyn Transformer, source: &NormalizedPath) -> Result<(String, Option<String>)> {
    let data = io::read_bytes(source)?;
    let (metadata, body) = split(&data)?;
    let (metadata, body) = transformer.transform(&metadata, &body)?;
    let warning = transformer
        .validate(&metadata)
        .err()
        .map(|e| Error::from(e).to_string());
    let bytes = marshal(&metadata, &body)?;
    Ok((String::from_utf8_lossy(&bytes).into_owned(), warning))
}
