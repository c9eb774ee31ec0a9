use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use rulekit_content::{Metadata, marshal, split};
use rulekit_fs::{NormalizedPath, io, validate_package_name};
use rulekit_transform::{SOURCE_EXTENSION, Transformer, TransformerRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::linker::{DirectoryLinker, GnuStow};
use super::resolver::{Payload, StrategyResolver};
use super::strategy::InstallStrategy;
use crate::config::InstallConfig;
use crate::error::{Error, ErrorCode, Result};
use crate::manifest::{self, Manifest};

/// Target used when a request names none.
pub const DEFAULT_TARGET: &str = "cursor";

const EXCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Where and how to install. The document or package name is passed
/// separately so one request serves `install` and `install_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub package_dir: PathBuf,
    pub workdir: PathBuf,
    /// Extra globs matched against package-relative paths
    pub excludes: Vec<String>,
    /// Keep package subdirectories in the output instead of flattening
    pub no_flatten: bool,
    pub target: String,
    /// Install every target the package manifest declares
    pub all_targets: bool,
}

impl InstallRequest {
    pub fn new(package_dir: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
            workdir: workdir.into(),
            excludes: Vec::new(),
            no_flatten: false,
            target: DEFAULT_TARGET.to_string(),
            all_targets: false,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_all_targets(mut self, all_targets: bool) -> Self {
        self.all_targets = all_targets;
        self
    }

    pub fn with_no_flatten(mut self, no_flatten: bool) -> Self {
        self.no_flatten = no_flatten;
        self
    }
}

/// One (document or package, target) outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub name: String,
    pub target: String,
    pub output_dir: String,
    pub strategy: InstallStrategy,
}

/// One placed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub target: String,
    pub strategy: InstallStrategy,
    /// Destination already up to date; nothing written
    pub skipped: bool,
    /// Why stronger strategies were not used
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// File placed, but its metadata fails the target's validation
    Warning,
    /// File not placed
    Error,
}

/// A per-file problem within an install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIssue {
    pub source: PathBuf,
    pub target: String,
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
}

impl FileIssue {
    fn new(source: &Path, target: &str, severity: Severity, error: &Error) -> Self {
        Self {
            source: source.to_path_buf(),
            target: target.to_string(),
            severity,
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Everything an install did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Packages visited by `install_all`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
    pub results: Vec<InstallResult>,
    pub files: Vec<InstalledFile>,
    pub issues: Vec<FileIssue>,
}

impl InstallReport {
    pub fn errors(&self) -> impl Iterator<Item = &FileIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FileIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Append another report, e.g. for several names in one command.
    pub fn merge(&mut self, other: InstallReport) {
        self.packages.extend(other.packages);
        self.results.extend(other.results);
        self.files.extend(other.files);
        self.issues.extend(other.issues);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Package,
    Document,
}

/// A source document and its output path relative to the target's
/// output directory, still carrying the source extension.
#[derive(Debug, Clone)]
pub(crate) struct SourceFile {
    pub path: PathBuf,
    pub rel: NormalizedPath,
}

/// Everything resolved before the first file is touched.
#[derive(Debug)]
pub(crate) struct Plan {
    pub name: String,
    pub kind: SourceKind,
    /// Directory the linker links from
    pub link_root: PathBuf,
    /// Unit the linker links
    pub unit: String,
    pub transformers: Vec<Arc<dyn Transformer>>,
    pub files: Vec<SourceFile>,
}

/// Installs rule documents and packages into a project.
#[derive(Debug, Clone)]
pub struct Installer {
    registry: Option<Arc<TransformerRegistry>>,
    config: Option<InstallConfig>,
    linker: Arc<dyn DirectoryLinker>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            registry: None,
            config: None,
            linker: Arc::new(GnuStow::new()),
        }
    }
}

impl Installer {
    /// An installer with no transformers; installs fail until a registry is
    /// attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// An installer with the built-in targets.
    pub fn with_builtins() -> Self {
        Self::new().with_registry(TransformerRegistry::with_builtins())
    }

    pub fn with_registry(mut self, registry: TransformerRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Fix placement switches instead of reading the environment per install.
    pub fn with_config(mut self, config: InstallConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_linker(mut self, linker: Arc<dyn DirectoryLinker>) -> Self {
        self.linker = linker;
        self
    }

    pub fn registry(&self) -> Option<&TransformerRegistry> {
        self.registry.as_deref()
    }

    /// Install the document or package `name` from `request.package_dir`.
    ///
    /// Package files that fail are recorded as error issues and the rest
    /// continue; a single document's failure is returned as the error.
    /// Validation failures are recorded as warnings and never block a write.
    pub fn install(&self, name: &str, request: &InstallRequest) -> Result<InstallReport> {
        let plan = self.plan(name, request)?;
        let config = self.config.unwrap_or_else(InstallConfig::from_env);
        let resolver = StrategyResolver::with_linker(config, Arc::clone(&self.linker));
        let workdir = NormalizedPath::new(&request.workdir);

        let mut report = InstallReport::default();
        for transformer in &plan.transformers {
            let target = transformer.target();
            let out_dir = workdir.join(transformer.output_dir());
            let mut strategy = InstallStrategy::Unknown;

            for file in &plan.files {
                let dest = out_dir.join(&transformer.output_name(file.rel.as_str()));
                match install_file(&resolver, &plan, transformer.as_ref(), file, &dest) {
                    Ok((installed, warning)) => {
                        strategy = strategy.max(installed.strategy);
                        report.files.push(installed);
                        report.issues.extend(warning);
                    }
                    Err(e) if plan.kind == SourceKind::Package => {
                        warn!(source = %file.path.display(), target_id = target, error = %e, "file not installed");
                        report
                            .issues
                            .push(FileIssue::new(&file.path, target, Severity::Error, &e));
                    }
                    Err(e) => return Err(e),
                }
            }

            info!(package = %plan.name, target_id = target, %strategy, files = plan.files.len(), "installed");
            report.results.push(InstallResult {
                name: plan.name.clone(),
                target: target.to_string(),
                output_dir: transformer.output_dir().to_string(),
                strategy,
            });
        }
        Ok(report)
    }

    /// Install every package in `request.package_dir`.
    pub fn install_all(&self, request: &InstallRequest) -> Result<InstallReport> {
        let packages = list_packages(&request.package_dir)?;
        let mut report = InstallReport::default();
        for package in packages {
            let installed = self.install(&package, request)?;
            report.merge(installed);
            report.packages.push(package);
        }
        Ok(report)
    }

    /// Resolve name, targets, overrides, excludes and files.
    pub(crate) fn plan(&self, name: &str, request: &InstallRequest) -> Result<Plan> {
        validate_package_name(name)?;
        let registry = self.registry.as_ref().ok_or(Error::NoRegistry)?;
        ensure_directory_if_present(&request.package_dir)?;

        let package_path = request.package_dir.join(name);
        let kind = if package_path.is_dir() {
            SourceKind::Package
        } else {
            SourceKind::Document
        };

        let manifest = match kind {
            SourceKind::Package => load_manifest_lenient(&package_path),
            SourceKind::Document => None,
        };

        let targets: Vec<String> = match &manifest {
            Some(m) if request.all_targets && !m.targets.is_empty() => m.targets.clone(),
            _ => vec![request.target.clone()],
        };
        let mut transformers = Vec::with_capacity(targets.len());
        for target in &targets {
            let transformer = registry.get(target)?;
            let transformer = match manifest.as_ref().and_then(|m| m.override_for(target)) {
                Some(over) => transformer.with_defaults(&over.to_defaults()),
                None => transformer,
            };
            transformers.push(transformer);
        }

        let caller_excludes = compile_excludes(&request.excludes)?;

        let (unit, files) = match kind {
            SourceKind::Package => {
                let mut excludes = caller_excludes;
                let mut extra = manifest
                    .as_ref()
                    .map(|m| m.exclude.clone())
                    .unwrap_or_default();
                match manifest::load_ignore_patterns(&package_path) {
                    Ok(patterns) => extra.extend(patterns),
                    Err(e) => warn!(package = name, error = %e, "ignore file unreadable"),
                }
                excludes.extend(compile_excludes_lenient(&extra));
                let files = collect_package_files(&package_path, &excludes, request.no_flatten)?;
                (name.to_string(), files)
            }
            SourceKind::Document => {
                let (unit, file) = resolve_document(name, &request.package_dir, request.no_flatten)?;
                (unit, vec![file])
            }
        };

        debug!(package = name, ?kind, targets = ?targets, files = files.len(), "install plan");
        Ok(Plan {
            name: name.to_string(),
            kind,
            link_root: request.package_dir.clone(),
            unit,
            transformers,
            files,
        })
    }
}

/// Install one file for one target.
fn install_file(
    resolver: &StrategyResolver,
    plan: &Plan,
    transformer: &dyn Transformer,
    file: &SourceFile,
    dest: &NormalizedPath,
) -> Result<(InstalledFile, Option<FileIssue>)> {
    let target = transformer.target();
    let installed = |strategy, skipped, notes| InstalledFile {
        source: file.path.clone(),
        destination: dest.to_native(),
        target: target.to_string(),
        strategy,
        skipped,
        notes,
    };

    // A reference stub already in place is not re-read or rewritten.
    if !transformer.materializes()
        && !resolver.config().links_enabled()
        && dest.exists()
        && !dest.is_symlink()
    {
        debug!(dest = %dest, "stub already present");
        return Ok((installed(InstallStrategy::Copy, true, Vec::new()), None));
    }

    let source = NormalizedPath::new(&file.path);
    let render = || -> Result<(Metadata, String, Option<FileIssue>)> {
        let data = io::read_bytes(&source)?;
        let (metadata, body) = split(&data)?;
        let (metadata, body) = transformer.transform(&metadata, &body)?;
        let warning = transformer.validate(&metadata).err().map(|e| {
            let e = Error::from(e);
            warn!(source = %file.path.display(), target_id = target, error = %e, "validation failed");
            FileIssue::new(&file.path, target, Severity::Warning, &e)
        });
        Ok((metadata, body, warning))
    };

    let mut warning = None;
    let placement = if transformer.materializes() {
        let (metadata, body, issue) = render()?;
        warning = issue;
        let content = marshal(&metadata, &body)?;
        resolver.place(
            &plan.link_root,
            &file.path,
            dest,
            &plan.unit,
            Payload::Materialized(content),
        )?
    } else {
        // Links point at the source as is; it is only parsed for a stub.
        let canonical = source.canonicalize()?;
        let stub_body = format!("@file {}", canonical.display());
        resolver.place_reference(&plan.link_root, &canonical, dest, &plan.unit, || {
            let (metadata, _, issue) = render()?;
            warning = issue;
            Ok(marshal(&metadata, &stub_body)?)
        })?
    };

    debug!(dest = %dest, strategy = %placement.strategy, written = placement.written, "placed");
    Ok((
        installed(placement.strategy, !placement.written, placement.notes),
        warning,
    ))
}

/// List installable packages: non-hidden subdirectories holding at least
/// one rule document directly, sorted by name.
pub fn list_packages(package_dir: &Path) -> Result<Vec<String>> {
    ensure_directory_if_present(package_dir)?;
    let entries = fs::read_dir(package_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                name: "package directory".to_string(),
                path: package_dir.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    let mut packages = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        if has_rule_documents(&entry.path()) {
            packages.push(name);
        }
    }
    packages.sort();
    Ok(packages)
}

fn has_rule_documents(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|entries| {
        entries.filter_map(|e| e.ok()).any(|e| {
            e.path().is_file() && e.file_name().to_string_lossy().ends_with(SOURCE_EXTENSION)
        })
    })
}

fn ensure_directory_if_present(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => Err(Error::NotADirectory {
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

fn load_manifest_lenient(package_path: &Path) -> Option<Manifest> {
    match Manifest::load(package_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!(error = %e, "ignoring manifest");
            None
        }
    }
}

/// Compile caller-supplied excludes; a malformed one is an error.
fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidExclude {
                pattern: p.to_string(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

/// Compile package-declared excludes, skipping malformed ones.
fn compile_excludes_lenient(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = p, reason = e.msg, "skipping malformed exclude pattern");
                None
            }
        })
        .collect()
}

/// A path is excluded when a pattern matches it or its containing directory.
fn is_excluded(rel: &NormalizedPath, excludes: &[Pattern]) -> bool {
    let dir = rel.parent().unwrap_or_else(|| NormalizedPath::new("."));
    excludes.iter().any(|pattern| {
        pattern.matches_with(rel.as_str(), EXCLUDE_MATCH)
            || pattern.matches_with(dir.as_str(), EXCLUDE_MATCH)
    })
}

fn collect_package_files(
    package_path: &Path,
    excludes: &[Pattern],
    no_flatten: bool,
) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(package_path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir()
            || !entry.path().is_file()
            || !entry.file_name().to_string_lossy().ends_with(SOURCE_EXTENSION)
        {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(package_path) else {
            continue;
        };
        let rel = NormalizedPath::new(rel);
        if is_excluded(&rel, excludes) {
            debug!(path = %rel, "excluded");
            continue;
        }

        let out_rel = if no_flatten {
            rel
        } else {
            match rel.file_name() {
                Some(base) => NormalizedPath::new(base),
                None => continue,
            }
        };
        files.push(SourceFile {
            path: entry.path().to_path_buf(),
            rel: out_rel,
        });
    }
    Ok(files)
}

/// Locate a single document, adding the source extension when missing.
/// Returns the linker unit and the file.
fn resolve_document(name: &str, package_dir: &Path, no_flatten: bool) -> Result<(String, SourceFile)> {
    let file_name = if name.ends_with(SOURCE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{SOURCE_EXTENSION}")
    };
    let path = package_dir.join(&file_name);
    if !path.is_file() {
        return Err(Error::NotFound {
            name: name.to_string(),
            path,
        });
    }

    let rel = NormalizedPath::new(&file_name);
    let rel = match (no_flatten, rel.file_name()) {
        (false, Some(base)) => NormalizedPath::new(base),
        _ => rel,
    };
    let unit = name.strip_suffix(SOURCE_EXTENSION).unwrap_or(name).to_string();
    Ok((unit, SourceFile { path, rel }))
}
