use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Answers fed to the exporter's stdin so it overwrites existing output
/// without waiting on an interactive prompt.
const OVERWRITE_ANSWERS: &[u8] = b"Y\ny\n";

/// The two presentations every notebook is exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// Read-only, code hidden, cells run on load.
    App,
    /// Editable, source visible.
    Notebook,
}

impl ExportMode {
    pub const ALL: [ExportMode; 2] = [ExportMode::App, ExportMode::Notebook];

    /// Replaces the notebook's extension in the output file name.
    pub fn suffix(self) -> &'static str {
        match self {
            ExportMode::App => "_app.html",
            ExportMode::Notebook => "_notebook.html",
        }
    }

    /// Exporter flags selecting this presentation.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            ExportMode::App => &["--mode", "run", "--no-show-code"],
            ExportMode::Notebook => &["--mode", "edit"],
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::App => write!(f, "app"),
            ExportMode::Notebook => write!(f, "notebook"),
        }
    }
}

/// Failure of one (notebook, mode) export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{mode} export of {path} exited with {}: {stderr}", exit_label(.code))]
    Failed {
        path: PathBuf,
        mode: ExportMode,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Something able to render one notebook into one HTML presentation.
pub trait ExportTool {
    fn run(&self, source: &Path, mode: ExportMode, output: &Path) -> Result<(), ExportError>;
}

/// Runs `marimo export html-wasm` as a child process.
#[derive(Debug, Clone)]
pub struct MarimoExporter {
    program: OsString,
}

impl Default for MarimoExporter {
    fn default() -> Self {
        Self {
            program: OsString::from("marimo"),
        }
    }
}

impl MarimoExporter {
    /// Use a different executable, e.g. `uvx marimo` wrapped in a script.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, source: &Path, mode: ExportMode, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["export", "html-wasm"])
            .args(mode.args())
            .arg(source)
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ExportTool for MarimoExporter {
    fn run(&self, source: &Path, mode: ExportMode, output: &Path) -> Result<(), ExportError> {
        let program = self.program.to_string_lossy().into_owned();
        let mut child = self
            .command(source, mode, output)
            .spawn()
            .map_err(|source| ExportError::Launch {
                program: program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // The exporter may exit without reading its input.
            if let Err(e) = stdin.write_all(OVERWRITE_ANSWERS) {
                log::debug!("{program} did not take stdin: {e}");
            }
        }

        let result = child
            .wait_with_output()
            .map_err(|source| ExportError::Launch { program, source })?;

        if !result.status.success() {
            return Err(ExportError::Failed {
                path: source.to_path_buf(),
                mode,
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&result.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("{}", stdout.trim());
        }
        Ok(())
    }
}
