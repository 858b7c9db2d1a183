use eframe::egui::{self, Align, Layout, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Positions table (central panel)
// ---------------------------------------------------------------------------

/// Render the searchable, sortable, single-selection positions table.
pub fn positions_table(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to browse positions  (File → Open…)");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Double Fischer Random Chess Analysis");
        ui.label(format!(
            "A list of all the {} currently analyzed DFRC positions.",
            dataset.len()
        ));
    });
    ui.add_space(4.0);

    let mut search_changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search");
        search_changed = ui.text_edit_singleline(&mut state.search).changed();
    });
    if search_changed {
        state.refresh_view();
    }
    ui.separator();

    // Clicks are collected here and applied once the table has been drawn.
    let mut sort_clicked: Option<String> = None;
    let mut row_clicked: Option<usize> = None;

    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = dataset.columns();
    let visible = &state.visible_indices;
    let selected = state.selection.index();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .sense(Sense::click())
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        let arrow = match &state.sort {
                            Some(s) if s.column == col.name && s.ascending => " ⬆",
                            Some(s) if s.column == col.name => " ⬇",
                            _ => "",
                        };
                        let label = RichText::new(format!("{}{arrow}", col.name)).strong();
                        if ui.button(label).clicked() {
                            sort_clicked = Some(col.name.clone());
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let idx = visible[row.index()];
                    row.set_selected(selected == Some(idx));
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.values[idx].to_string());
                        });
                    }
                    if row.response().clicked() {
                        row_clicked = Some(idx);
                    }
                });
            });
    });

    if let Some(column) = sort_clicked {
        state.toggle_sort(&column);
    }
    if let Some(idx) = row_clicked {
        state.toggle_selection(idx);
    }
}
