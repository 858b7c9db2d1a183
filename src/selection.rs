use crate::data::{Dataset, Row};

/// The row currently picked in the table, if any.
///
/// Owned by the display layer and handed to the link formatter explicitly.
/// Stores a dataset row index, so it survives re-sorting and searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    row: Option<usize>,
}

impl Selection {
    pub fn select(&mut self, row: usize) {
        self.row = Some(row);
    }

    pub fn clear(&mut self) {
        self.row = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.row
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_none()
    }

    /// Resolve against `dataset`; an index past the end resolves to `None`.
    pub fn row<'a>(&self, dataset: &'a Dataset) -> Option<Row<'a>> {
        self.row.and_then(|i| dataset.row(i))
    }
}
