use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DfrcExplorerApp {
    pub state: AppState,
}

impl DfrcExplorerApp {
    /// Start with the dataset at `location` loaded, or an error in the
    /// status line if it could not be read.
    pub fn with_location(location: &str) -> Self {
        let mut app = Self::default();
        app.state.load(location);
        app
    }
}

impl eframe::App for DfrcExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Right side panel: selected position ----
        egui::SidePanel::right("link_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::link_panel(ui, &self.state);
            });

        // ---- Central panel: positions table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::positions_table(ui, &mut self.state);
        });
    }
}
