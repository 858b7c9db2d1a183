//! Static site export: every notebook in both modes, plus the index page.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use dfrc_explorer::site::{export_all, ExportError, ExportMode, ExportTool};

// =============================================================================
// Test Helpers
// =============================================================================

/// Records every invocation and writes a stub page, failing where told to.
#[derive(Default)]
struct RecordingTool {
    calls: Mutex<Vec<(PathBuf, ExportMode, PathBuf)>>,
    fail_on: Option<(&'static str, ExportMode)>,
}

impl RecordingTool {
    fn failing_on(file_name: &'static str, mode: ExportMode) -> Self {
        Self {
            fail_on: Some((file_name, mode)),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(PathBuf, ExportMode, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExportTool for RecordingTool {
    fn run(&self, source: &Path, mode: ExportMode, output: &Path) -> Result<(), ExportError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), mode, output.to_path_buf()));

        if let Some((name, failing_mode)) = self.fail_on {
            if source.file_name().is_some_and(|n| n == name) && mode == failing_mode {
                return Err(ExportError::Failed {
                    path: source.to_path_buf(),
                    mode,
                    code: Some(1),
                    stderr: "boom".to_string(),
                });
            }
        }
        fs::write(output, format!("<html>{}</html>", source.display())).unwrap();
        Ok(())
    }
}

/// A project directory containing `notebooks/` with the given files.
fn project(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let notebooks = dir.path().join("notebooks");
    fs::create_dir_all(&notebooks).unwrap();
    for file in files {
        let path = notebooks.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "import marimo\n").unwrap();
    }
    dir
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn exports_every_notebook_in_both_modes() {
    let dir = project(&["a.py", "b.py"]);
    let site = dir.path().join("_site");
    let tool = RecordingTool::default();

    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    let calls = tool.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(report.attempted, 4);
    assert!(report.is_complete());

    let outputs: Vec<_> = calls.iter().map(|(_, mode, out)| (*mode, out.clone())).collect();
    assert_eq!(
        outputs,
        [
            (ExportMode::App, site.join("notebooks/a_app.html")),
            (ExportMode::Notebook, site.join("notebooks/a_notebook.html")),
            (ExportMode::App, site.join("notebooks/b_app.html")),
            (ExportMode::Notebook, site.join("notebooks/b_notebook.html")),
        ]
    );
    assert!(site.join("notebooks/b_notebook.html").is_file());
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let dir = project(&["a.py", "b.py"]);
    let site = dir.path().join("_site");
    let tool = RecordingTool::failing_on("a.py", ExportMode::App);

    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    assert_eq!(tool.calls().len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].mode, ExportMode::App);
    assert_eq!(report.succeeded(), 3);
    assert!(!report.is_complete());

    // The index still links every notebook, including the failed page.
    let index = fs::read_to_string(site.join("index.html")).unwrap();
    assert_eq!(index.matches("<h3").count(), 2);
    assert_eq!(index.matches("<a href=").count(), 4);
    for href in [
        "notebooks/a_app.html",
        "notebooks/a_notebook.html",
        "notebooks/b_app.html",
        "notebooks/b_notebook.html",
    ] {
        assert!(index.contains(&format!("href=\"{href}\"")), "missing {href}");
    }
    assert_eq!(report.index.as_deref(), Some(site.join("index.html").as_path()));
}

#[test]
fn nested_notebooks_create_output_directories() {
    let dir = project(&["deep/er/dfrc_analysis.py"]);
    let site = dir.path().join("out/site");
    let tool = RecordingTool::default();

    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    assert!(report.is_complete());
    assert!(site.join("notebooks/deep/er/dfrc_analysis_app.html").is_file());
    let index = fs::read_to_string(site.join("index.html")).unwrap();
    assert!(index.contains("Open Dfrc Analysis Notebook"));
}

#[test]
fn missing_source_directory_does_nothing() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("_site");
    let tool = RecordingTool::default();

    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    assert!(tool.calls().is_empty());
    assert_eq!(report.attempted, 0);
    assert!(report.index.is_none());
    assert!(!site.exists());
}

#[test]
fn empty_source_directory_does_nothing() {
    let dir = project(&[]);
    fs::write(dir.path().join("notebooks/notes.txt"), "not a notebook").unwrap();
    let site = dir.path().join("_site");
    let tool = RecordingTool::default();

    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    assert!(tool.calls().is_empty());
    assert!(report.artifacts.is_empty());
    assert!(!site.join("index.html").exists());
}

#[test]
fn rerunning_overwrites_previous_pages() {
    let dir = project(&["a.py"]);
    let site = dir.path().join("_site");
    let tool = RecordingTool::default();

    export_all(&dir.path().join("notebooks"), &site, &tool);
    fs::write(site.join("notebooks/a_app.html"), "stale").unwrap();
    let report = export_all(&dir.path().join("notebooks"), &site, &tool);

    assert!(report.is_complete());
    let page = fs::read_to_string(site.join("notebooks/a_app.html")).unwrap();
    assert_ne!(page, "stale");
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    let dir = project(&["a.py"]);
    let notebooks = dir.path().join("notebooks");
    std::os::unix::fs::symlink(&notebooks, notebooks.join("loop")).unwrap();
    let site = dir.path().join("_site");
    let tool = RecordingTool::default();

    let report = export_all(&notebooks, &site, &tool);

    assert_eq!(tool.calls().len(), 2);
    assert_eq!(report.artifacts.len(), 1);
    let index = fs::read_to_string(site.join("index.html")).unwrap();
    assert_eq!(index.matches("<h3").count(), 1);
}
