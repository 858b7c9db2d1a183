mod app;
mod state;
mod ui;

use app::DfrcExplorerApp;
use clap::Parser;
use eframe::egui;

/// Browse Double Fischer Random Chess analysis results.
#[derive(Parser)]
#[command(name = "dfrc-explorer", version)]
struct Cli {
    /// Parquet file path or http(s) URL of the analysis results
    #[arg(default_value = "public/analysis_results.parquet")]
    location: String,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DFRC Explorer – Double Fischer Random Chess Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(DfrcExplorerApp::with_location(&cli.location)))),
    )
}
