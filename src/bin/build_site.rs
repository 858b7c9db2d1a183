use std::path::{Path, PathBuf};

use clap::Parser;

use dfrc_explorer::site::{export_all, ExportReport, ExportTool, MarimoExporter};

/// Directory the notebooks are discovered in, relative to the working directory.
const NOTEBOOKS_DIR: &str = "notebooks";

/// Export the analysis notebooks to standalone HTML and build an index page.
#[derive(Parser)]
#[command(name = "build-site", version)]
struct Cli {
    /// Output directory for built files
    #[arg(long, default_value = "_site")]
    output_dir: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Failures are reported but do not change the exit status.
    run(&cli, Path::new(NOTEBOOKS_DIR), &MarimoExporter::default());
}

/// Export `source_dir` into the configured output directory and log a summary.
fn run(cli: &Cli, source_dir: &Path, tool: &dyn ExportTool) -> ExportReport {
    let report = export_all(source_dir, &cli.output_dir, tool);

    if report.artifacts.is_empty() {
        return report;
    }

    if report.is_complete() {
        log::info!(
            "exported {} notebooks ({} pages) to {}",
            report.artifacts.len(),
            report.succeeded(),
            cli.output_dir.display()
        );
    } else {
        log::warn!(
            "{} of {} exports failed{}",
            report.failures.len(),
            report.attempted,
            if report.index_error.is_some() {
                "; index.html was not written"
            } else {
                ""
            }
        );
        for failure in &report.failures {
            log::warn!("  {} ({})", failure.source.display(), failure.mode);
        }
    }
    report
}
