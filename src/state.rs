use std::collections::BTreeMap;

use anyhow::{Context, Result};

use dfrc_explorer::data::filter::{filtered_indices, sort_indices};
use dfrc_explorer::data::{self, Dataset};
use dfrc_explorer::link::{format_link, AnalysisLink};
use dfrc_explorer::selection::Selection;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Column and direction the table is ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub column: String,
    pub ascending: bool,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until something loads successfully).
    pub dataset: Option<Dataset>,

    /// Where the current dataset came from.
    pub location: Option<String>,

    /// Contents of the URL field in the top bar.
    pub url_input: String,

    /// Table search text.
    pub search: String,

    /// Active sort, if the user clicked a header.
    pub sort: Option<SortOrder>,

    /// Dataset row indices shown in the table, in display order (cached).
    pub visible_indices: Vec<usize>,

    /// The row picked in the table.
    pub selection: Selection,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load from a path or URL, reporting failures in the status line.
    pub fn load(&mut self, location: &str) {
        match read_dataset(location) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} positions with columns {:?}",
                    dataset.len(),
                    dataset.column_names()
                );
                self.set_dataset(dataset, location);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset; search, sort and selection start over.
    pub fn set_dataset(&mut self, dataset: Dataset, location: &str) {
        let missing = dataset.missing_required_columns();
        if !missing.is_empty() {
            log::warn!("{location} lacks columns {missing:?}; links use defaults");
        }

        self.dataset = Some(dataset);
        self.location = Some(location.to_string());
        self.search.clear();
        self.sort = None;
        self.selection.clear();
        self.status_message = None;
        self.refresh_view();
    }

    /// Recompute `visible_indices` after search or sort change.
    pub fn refresh_view(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible_indices.clear();
            return;
        };
        let mut indices = filtered_indices(ds, &self.search);
        if let Some(sort) = &self.sort {
            sort_indices(ds, &mut indices, &sort.column, sort.ascending);
        }
        self.visible_indices = indices;
    }

    /// Header click: sort ascending, then descending, then unsorted.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some(s) if s.column == column && s.ascending => Some(SortOrder {
                column: s.column,
                ascending: false,
            }),
            Some(s) if s.column == column => None,
            _ => Some(SortOrder {
                column: column.to_string(),
                ascending: true,
            }),
        };
        self.refresh_view();
    }

    /// Select a dataset row; clicking the selected row again clears it.
    pub fn toggle_selection(&mut self, row: usize) {
        if self.selection.index() == Some(row) {
            self.selection.clear();
        } else {
            self.selection.select(row);
        }
    }

    /// Link for the current selection, or for the standard position.
    pub fn link(&self) -> AnalysisLink {
        let row = self
            .dataset
            .as_ref()
            .and_then(|ds| self.selection.row(ds));
        format_link(row)
    }

    /// The selected row as a JSON object, for the clipboard.
    pub fn selected_row_json(&self) -> Option<String> {
        let row = self.selection.row(self.dataset.as_ref()?)?;
        let cells: BTreeMap<_, _> = row.cells().collect();
        serde_json::to_string_pretty(&cells).ok()
    }
}

fn read_dataset(location: &str) -> Result<Dataset> {
    let location = location.trim();
    data::load(location).with_context(|| format!("loading {location}"))
}
