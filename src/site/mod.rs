//! Static export: render every notebook twice and link them from an index.
//!
//! ```text
//!  notebooks/**/*.py
//!        │  discover
//!        ▼
//!   NotebookArtifact ──► ExportTool (app) ──► <out>/<stem>_app.html
//!        │           └─► ExportTool (edit) ─► <out>/<stem>_notebook.html
//!        ▼
//!   <out>/index.html
//! ```
//!
//! Failures are isolated per (notebook, mode): every combination is
//! attempted and the index always lists every discovered notebook.

pub mod index;
pub mod tool;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use index::{render_index, write_index, IndexWriteError};
pub use tool::{ExportError, ExportMode, ExportTool, MarimoExporter};

/// Extension of notebook source files.
pub const NOTEBOOK_EXTENSION: &str = "py";

// ---------------------------------------------------------------------------
// NotebookArtifact
// ---------------------------------------------------------------------------

/// One source notebook and the pair of pages generated from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookArtifact {
    /// Notebook source file, as discovered.
    pub source: PathBuf,
    /// Output path relative to the site root, without extension.
    stem: PathBuf,
}

impl NotebookArtifact {
    pub fn new(source: PathBuf, stem: PathBuf) -> Self {
        NotebookArtifact { source, stem }
    }

    /// Path of the page for `mode`, relative to the site root.
    pub fn relative_output(&self, mode: ExportMode) -> PathBuf {
        let mut name = self
            .stem
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(mode.suffix());
        self.stem.with_file_name(name)
    }

    pub fn output_path(&self, output_dir: &Path, mode: ExportMode) -> PathBuf {
        output_dir.join(self.relative_output(mode))
    }

    /// Link to the page for `mode` from the index, always `/`-separated.
    pub fn href(&self, mode: ExportMode) -> String {
        self.relative_output(mode)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Human-readable name: `dfrc_analysis` becomes `Dfrc Analysis`.
    pub fn title(&self) -> String {
        let name = self
            .stem
            .file_name()
            .map(|n| n.to_string_lossy().replace('_', " "))
            .unwrap_or_default();
        title_case(&name)
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Every notebook under `source_dir`, recursively, sorted by path.
///
/// Artifact stems keep the source directory's own name as their first
/// component, so `notebooks/a.py` is published as `notebooks/a_app.html`.
pub fn discover(source_dir: &Path) -> io::Result<Vec<NotebookArtifact>> {
    let mut sources = collect_notebooks(source_dir, list_dir)?;
    sources.sort();

    let root = source_dir
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_default();

    Ok(sources
        .into_iter()
        .map(|source| {
            let relative = source.strip_prefix(source_dir).unwrap_or(&source);
            let stem = root.join(relative).with_extension("");
            NotebookArtifact::new(source, stem)
        })
        .collect())
}

/// Entries of `dir` as `(path, is_dir)`. Symlinks are reported as
/// non-directories so the walk never descends through them.
fn list_dir(dir: &Path) -> io::Result<Vec<(PathBuf, bool)>> {
    fs::read_dir(dir)?
        .map(|entry| {
            let entry = entry?;
            Ok((entry.path(), entry.file_type()?.is_dir()))
        })
        .collect()
}

/// Notebook files below `root`. Only a failure to list `root` itself is an
/// error; unreadable subdirectories are logged and skipped.
fn collect_notebooks<F>(root: &Path, list: F) -> io::Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> io::Result<Vec<(PathBuf, bool)>>,
{
    let mut found = Vec::new();
    let mut pending = list(root)?;
    while let Some((path, is_dir)) = pending.pop() {
        if is_dir {
            match list(&path) {
                Ok(entries) => pending.extend(entries),
                Err(e) => log::warn!("skipping unreadable directory {}: {e}", path.display()),
            }
        } else if path.extension().is_some_and(|e| e == NOTEBOOK_EXTENSION) {
            found.push(path);
        }
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// One (notebook, mode) export that did not produce its page.
#[derive(Debug)]
pub struct ExportFailure {
    pub source: PathBuf,
    pub mode: ExportMode,
    pub error: ExportError,
}

/// Outcome of [`export_all`].
#[derive(Debug, Default)]
pub struct ExportReport {
    pub artifacts: Vec<NotebookArtifact>,
    /// Number of export tool invocations attempted.
    pub attempted: usize,
    pub failures: Vec<ExportFailure>,
    /// Location of the written index page.
    pub index: Option<PathBuf>,
    pub index_error: Option<IndexWriteError>,
}

impl ExportReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    /// Every export succeeded and the index was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.index_error.is_none()
    }
}

/// Export every notebook under `source_dir` in both modes into `output_dir`
/// and write `output_dir/index.html`.
///
/// Best effort: a failed export is logged and recorded in the report but
/// never stops the remaining ones. A missing or empty `source_dir` is
/// logged and yields an empty report without touching `output_dir`.
pub fn export_all(source_dir: &Path, output_dir: &Path, tool: &dyn ExportTool) -> ExportReport {
    let mut report = ExportReport::default();

    if !source_dir.is_dir() {
        log::warn!("notebook directory not found: {}", source_dir.display());
        return report;
    }
    let artifacts = match discover(source_dir) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            log::error!("failed to scan {}: {e}", source_dir.display());
            return report;
        }
    };
    if artifacts.is_empty() {
        log::warn!("no notebooks found in {}", source_dir.display());
        return report;
    }

    for artifact in &artifacts {
        for mode in ExportMode::ALL {
            report.attempted += 1;
            if let Err(error) = export_one(tool, artifact, mode, output_dir) {
                log::error!("error exporting {}: {error}", artifact.source.display());
                report.failures.push(ExportFailure {
                    source: artifact.source.clone(),
                    mode,
                    error,
                });
            }
        }
    }

    match write_index(&artifacts, output_dir) {
        Ok(path) => report.index = Some(path),
        Err(e) => {
            log::error!("{e}");
            report.index_error = Some(e);
        }
    }

    report.artifacts = artifacts;
    report
}

fn export_one(
    tool: &dyn ExportTool,
    artifact: &NotebookArtifact,
    mode: ExportMode,
    output_dir: &Path,
) -> Result<(), ExportError> {
    let output = artifact.output_path(output_dir, mode);
    log::info!(
        "exporting {} to {} as {mode}",
        artifact.source.display(),
        output.display()
    );

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| ExportError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    tool.run(&artifact.source, mode, &output)
}
