use crate::cli::ReportFormat;
use crate::config::{load_config, load_config_from, MigrationConfig};
use crate::errors::Diagnostic;
use crate::io::{self, output, walker};
use crate::transform::transform;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, info, warn};

pub struct RewriteConfig {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub output: Option<PathBuf>,
    pub in_place: bool,
    pub format: ReportFormat,
}

/// Where rewritten units go
#[derive(Debug, Clone, PartialEq)]
enum Destination {
    ReportOnly,
    InPlace,
    /// Mirror of the input roots under this directory
    Directory(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the file could not be read, parsed or written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            written: None,
            diagnostics: Vec::new(),
            error: Some(format!("{:#}", error)),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some() || self.diagnostics.iter().any(Diagnostic::is_fatal)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}

pub fn rewrite_trees(config: RewriteConfig) -> Result<RunReport> {
    let migration = match &config.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let destination = match (&config.output, config.in_place) {
        (Some(dir), _) => Destination::Directory(dir.clone()),
        (None, true) => Destination::InPlace,
        (None, false) => Destination::ReportOnly,
    };

    let files = walker::find_tree_files(&config.paths, &config.exclude)?;
    info!(files = files.len(), "Rewriting syntax trees");

    let report = RunReport {
        files: files
            .par_iter()
            .map(|path| rewrite_file(path, &config.paths, &migration, &destination))
            .collect(),
    };

    info!(
        changed = report.changed_count(),
        diagnostics = report.diagnostic_count(),
        failures = report.failure_count(),
        "Rewrite finished"
    );
    let mut writer = output::create_writer(config.format);
    writer.write_report(&report)?;
    Ok(report)
}

fn rewrite_file(
    path: &Path,
    roots: &[PathBuf],
    config: &MigrationConfig,
    destination: &Destination,
) -> FileReport {
    match try_rewrite_file(path, roots, config, destination) {
        Ok(report) => report,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to rewrite file");
            FileReport::failed(path, &e)
        }
    }
}

fn try_rewrite_file(
    path: &Path,
    roots: &[PathBuf],
    config: &MigrationConfig,
    destination: &Destination,
) -> Result<FileReport> {
    let _span = debug_span!("rewrite_file", path = %path.display()).entered();
    let unit = io::read_unit(path)?;
    let result = transform(&unit, config);

    let target = match destination {
        Destination::ReportOnly => None,
        Destination::InPlace if result.changed => Some(path.to_path_buf()),
        Destination::InPlace => None,
        Destination::Directory(dir) => Some(dir.join(relative_to_roots(path, roots))),
    };
    if let Some(target) = &target {
        io::write_unit(target, &result.unit)?;
        debug!(path = %path.display(), target = %target.display(), "Wrote unit");
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        changed: result.changed,
        written: target,
        diagnostics: result.diagnostics,
        error: None,
    })
}

/// Path of `file` below the directory root it was found under
fn relative_to_roots(file: &Path, roots: &[PathBuf]) -> PathBuf {
    roots
        .iter()
        .filter(|root| root.is_dir())
        .find_map(|root| file.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| file.to_path_buf())
}
