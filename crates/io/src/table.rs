// Shared header/row cleanup for every loader

use vatcheck_recon::model::{Cell, Dataset};

/// Assemble a Dataset from a header row and typed rows.
///
/// Blank headers become `Unnamed: {index}`; rows with no non-empty cell are dropped.
pub(crate) fn build_dataset<I>(headers: Vec<String>, rows: I) -> Dataset
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let headers: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let trimmed = h.trim();
            if trimmed.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                h
            }
        })
        .collect();

    let mut dataset = Dataset::new(headers);
    let mut dropped = 0usize;

    for row in rows {
        if row.iter().all(Cell::is_empty) {
            dropped += 1;
            continue;
        }
        dataset.push_row(row);
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} blank row(s)");
    }

    dataset
}
