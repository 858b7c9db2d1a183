use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – analysis link for the selected position
// ---------------------------------------------------------------------------

/// Render the panel showing the selected position and its analysis link.
pub fn link_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Position");
    ui.separator();

    let link = state.link();
    if state.selection.is_empty() {
        ui.label(RichText::new("No row selected, showing the standard position.").italics());
        ui.add_space(4.0);
    }

    egui::Grid::new("position_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("DFRC ID");
            ui.label(&link.dfrc_id);
            ui.end_row();

            ui.strong("White");
            ui.monospace(link.white.to_uppercase());
            ui.end_row();

            ui.strong("Black");
            ui.monospace(link.black.to_lowercase());
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.hyperlink_to("Open Lichess Analysis Board", &link.url);

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("Copy URL").clicked() {
            ui.ctx().copy_text(link.url.clone());
        }
        if ui.small_button("Copy embed URL").clicked() {
            ui.ctx().copy_text(link.embed_url());
        }
        if ui.small_button("Copy link as Markdown").clicked() {
            ui.ctx().copy_text(link.markdown());
        }
    });

    if let Some(json) = state.selected_row_json() {
        if ui.small_button("Copy row as JSON").clicked() {
            ui.ctx().copy_text(json);
        }
    }

    ui.add_space(12.0);
    glossary(ui);
}

fn glossary(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("Glossary").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let entries = [
                ("white/black ID", "The Chess960 IDs"),
                (
                    "DFRC ID",
                    "Unique ID that corresponds to Chess960 IDs for mirrored positions",
                ),
                (
                    "sharpness score",
                    "1 means the position has a forcing line, 0 that there are plenty of good moves for both sides",
                ),
                (
                    "playability score",
                    "A combination of the centipawn loss and the sharpness score",
                ),
            ];
            for (term, meaning) in entries {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong(format!("{term}:"));
                    ui.label(meaning);
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.location.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                if let Some(location) = state.location.clone() {
                    state.load(&location);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("URL");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.url_input)
                .hint_text("https://…/analysis_results.parquet")
                .desired_width(280.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Load").clicked() || submitted) && !state.url_input.trim().is_empty() {
            let url = state.url_input.trim().to_string();
            state.load(&url);
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} positions loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open analysis results")
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path.display().to_string());
    }
}
