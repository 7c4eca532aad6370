//! Top-K value frequencies for categorical columns.

use std::collections::HashMap;

use crate::{
    column::{collect_columns, ColumnValues},
    dataset::ArrowDataset,
    error::Result,
};

/// Computes the top-K most frequent values per categorical column.
///
/// Boolean columns count as categorical. Ties at the K-th position are
/// broken by first-encountered order in the column. Columns without
/// categorical content are omitted rather than mapped to empty lists.
///
/// # Errors
///
/// Returns an error only if the underlying Arrow data cannot be read.
pub fn top_categories(
    dataset: &ArrowDataset,
    k: usize,
) -> Result<HashMap<String, Vec<(String, usize)>>> {
    let columns = collect_columns(dataset)?;
    let mut result = HashMap::new();

    for (name, values) in columns {
        let cells: Vec<Option<String>> = match values {
            ColumnValues::Categorical(v) => v,
            ColumnValues::Boolean(v) => v
                .into_iter()
                .map(|x| x.map(|b| b.to_string()))
                .collect(),
            ColumnValues::Numeric(_) => continue,
        };

        let top = count_top_values(&cells, k);
        if !top.is_empty() {
            result.insert(name, top);
        }
    }

    Ok(result)
}

fn count_top_values(cells: &[Option<String>], k: usize) -> Vec<(String, usize)> {
    // value -> (count, first occurrence index) for the tie-break
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, cell) in cells.iter().enumerate() {
        if let Some(value) = cell {
            let entry = counts.entry(value.as_str()).or_insert((0, index));
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(k);

    ranked
        .into_iter()
        .map(|(value, count, _)| (value.to_string(), count))
        .collect()
}
