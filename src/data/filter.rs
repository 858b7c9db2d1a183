use super::model::Dataset;

// ---------------------------------------------------------------------------
// Search: which rows contain the query text
// ---------------------------------------------------------------------------

/// Return indices of rows where any cell's display text contains `query`,
/// ignoring case. A blank query keeps every row.
pub fn filtered_indices(dataset: &Dataset, query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..dataset.len()).collect();
    }

    (0..dataset.len())
        .filter(|&i| {
            dataset.columns().iter().any(|col| {
                col.values[i]
                    .to_string()
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sort: reorder a view by one column
// ---------------------------------------------------------------------------

/// Stable-sort `indices` by the values of `column`.
///
/// An unknown column leaves the order untouched.
pub fn sort_indices(dataset: &Dataset, indices: &mut [usize], column: &str, ascending: bool) {
    let Some(col) = dataset.column(column) else {
        return;
    };
    indices.sort_by(|&a, &b| {
        let ord = col.values[a].cmp(&col.values[b]);
        if ascending { ord } else { ord.reverse() }
    });
}

/// Row indices of the whole dataset ordered by `column`.
pub fn sorted_indices(dataset: &Dataset, column: &str, ascending: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    sort_indices(dataset, &mut indices, column, ascending);
    indices
}
