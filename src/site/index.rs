use std::path::{Path, PathBuf};

use maud::{html, Markup, DOCTYPE};

use super::{ExportMode, NotebookArtifact};

/// The index page could not be written.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {path}: {source}")]
pub struct IndexWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

const TAILWIND_CSS: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
const LINK_CLASS: &str = "px-3 py-1 bg-gray-100 hover:bg-gray-200 rounded";

fn card(artifact: &NotebookArtifact) -> Markup {
    let title = artifact.title();
    html! {
        div class="p-4 border border-gray-200 rounded" {
            h3 class="text-lg font-semibold mb-2" { (title) }
            div class="flex gap-2" {
                a href=(artifact.href(ExportMode::App)) class=(LINK_CLASS) {
                    "Open " (title) " App"
                }
                a href=(artifact.href(ExportMode::Notebook)) class=(LINK_CLASS) {
                    "Open " (title) " Notebook"
                }
            }
        }
    }
}

/// Render the index page: one card per artifact with links to both
/// presentations. Links are not checked against the filesystem.
pub fn render_index(artifacts: &[NotebookArtifact]) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "DFRC Analysis" }
                link href=(TAILWIND_CSS) rel="stylesheet";
            }
            body class="font-sans max-w-2xl mx-auto p-8 leading-relaxed" {
                div class="mb-8" {
                    h1 class="text-3xl font-bold" { "Double Fischer Random Chess Analysis" }
                }
                div class="grid gap-4" {
                    @for artifact in artifacts {
                        (card(artifact))
                    }
                }
            }
        }
    }
    .into_string()
}

/// Write `output_dir/index.html`, creating `output_dir` if needed.
pub fn write_index(
    artifacts: &[NotebookArtifact],
    output_dir: &Path,
) -> Result<PathBuf, IndexWriteError> {
    let path = output_dir.join("index.html");
    log::info!("generating {}", path.display());

    let wrap = |source| IndexWriteError {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(output_dir).map_err(wrap)?;
    std::fs::write(&path, render_index(artifacts)).map_err(wrap)?;
    Ok(path)
}
