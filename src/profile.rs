//! Per-column and dataset-level profiling.
//!
//! [`profile_columns`] and [`profile_dataset`] compute the derived
//! statistics every downstream check consumes: type tags, missing and
//! distinct counts, zero counts, duplicate rows and memory footprint.
//! Both are pure functions of the dataset.

// Statistical computation and ratio accounting
#![allow(clippy::cast_precision_loss)]

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    column::{collect_columns, ColumnType, ColumnValues},
    dataset::ArrowDataset,
    error::{Error, Result},
};

/// Derived statistics for a single column.
///
/// Computed once per report invocation and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Inferred semantic type.
    pub column_type: ColumnType,
    /// Total cell count (equals the dataset row count).
    pub total_count: usize,
    /// Null/missing cell count.
    pub missing_count: usize,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
    /// Count of cells equal to exactly zero; numeric columns only.
    pub zero_count: Option<usize>,
    /// Whether the name contains the substring "id" (case-insensitive).
    pub id_like: bool,
}

impl ColumnProfile {
    /// Number of non-missing cells.
    pub fn non_missing_count(&self) -> usize {
        self.total_count - self.missing_count
    }

    /// Share of missing cells (0 when the column has no cells).
    pub fn missing_share(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.missing_count as f64 / self.total_count as f64
        }
    }

    /// Distinct values over non-missing cells.
    ///
    /// `None` when every cell is missing, where the ratio is undefined.
    pub fn distinct_ratio(&self) -> Option<f64> {
        let non_missing = self.non_missing_count();
        if non_missing == 0 {
            None
        } else {
            Some(self.distinct_count as f64 / non_missing as f64)
        }
    }

    /// Share of zero cells over the total count; numeric columns only.
    pub fn zero_share(&self) -> Option<f64> {
        let zeros = self.zero_count?;
        if self.total_count == 0 {
            None
        } else {
            Some(zeros as f64 / self.total_count as f64)
        }
    }
}

/// Dataset-level statistics derived in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Rows identical across all columns (beyond their first occurrence).
    pub duplicate_row_count: usize,
    /// Estimated in-memory footprint of the Arrow buffers, in bytes.
    pub memory_bytes: usize,
}

/// Computes one [`ColumnProfile`] per column, in dataset column order.
///
/// # Errors
///
/// Returns [`Error::EmptySchema`] if the dataset has zero columns.
pub fn profile_columns(dataset: &ArrowDataset) -> Result<Vec<ColumnProfile>> {
    if dataset.num_columns() == 0 {
        return Err(Error::EmptySchema);
    }

    let columns = collect_columns(dataset)?;
    let mut profiles = Vec::with_capacity(columns.len());

    for (name, values) in &columns {
        profiles.push(profile_column(name, values));
    }

    Ok(profiles)
}

/// Computes the [`DatasetProfile`]: row/column counts, duplicate rows
/// and memory footprint.
///
/// # Errors
///
/// Returns [`Error::EmptySchema`] if the dataset has zero columns.
pub fn profile_dataset(dataset: &ArrowDataset) -> Result<DatasetProfile> {
    if dataset.num_columns() == 0 {
        return Err(Error::EmptySchema);
    }

    let columns = collect_columns(dataset)?;
    let duplicate_row_count = count_duplicate_rows(&columns, dataset.len());

    let memory_bytes = dataset
        .batches()
        .iter()
        .map(|b| b.get_array_memory_size())
        .sum();

    Ok(DatasetProfile {
        row_count: dataset.len(),
        column_count: dataset.num_columns(),
        duplicate_row_count,
        memory_bytes,
    })
}

fn profile_column(name: &str, values: &ColumnValues) -> ColumnProfile {
    let total_count = values.len();
    let missing_count = values.missing_count();
    let distinct_count = distinct_count(values);

    let zero_count = match values {
        ColumnValues::Numeric(v) => {
            Some(v.iter().flatten().filter(|x| **x == 0.0).count())
        }
        _ => None,
    };

    ColumnProfile {
        name: name.to_string(),
        column_type: values.column_type(),
        total_count,
        missing_count,
        distinct_count,
        zero_count,
        id_like: name.to_lowercase().contains("id"),
    }
}

fn distinct_count(values: &ColumnValues) -> usize {
    match values {
        ColumnValues::Numeric(v) => v
            .iter()
            .flatten()
            .map(|x| float_key(*x))
            .collect::<HashSet<u64>>()
            .len(),
        ColumnValues::Categorical(v) => v.iter().flatten().collect::<HashSet<&String>>().len(),
        ColumnValues::Boolean(v) => v.iter().flatten().collect::<HashSet<&bool>>().len(),
    }
}

// Bit-pattern identity, with -0.0 folded into 0.0.
fn float_key(x: f64) -> u64 {
    if x == 0.0 {
        0f64.to_bits()
    } else {
        x.to_bits()
    }
}

fn count_duplicate_rows(columns: &[(String, ColumnValues)], row_count: usize) -> usize {
    if columns.is_empty() || row_count == 0 {
        return 0;
    }

    let mut row_set: HashSet<String> = HashSet::new();
    let mut duplicates = 0;

    for i in 0..row_count {
        let row_key: String = columns
            .iter()
            .map(|(_, values)| values.row_key(i))
            .collect::<Vec<_>>()
            .join("|");

        if !row_set.insert(row_key) {
            duplicates += 1;
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Float64Array, Int32Array, RecordBatch, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;

    fn make_dataset(
        names: Vec<Option<&str>>,
        values: Vec<Option<i32>>,
        scores: Vec<Option<f64>>,
    ) -> ArrowDataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("value", DataType::Int32, true),
            Field::new("score", DataType::Float64, true),
        ]));

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(names)),
                Arc::new(Int32Array::from(values)),
                Arc::new(Float64Array::from(scores)),
            ],
        )
        .expect("batch");

        ArrowDataset::from_batch(batch).expect("dataset")
    }

    #[test]
    fn test_profiles_in_column_order() {
        let dataset = make_dataset(
            vec![Some("a"), Some("b")],
            vec![Some(1), Some(2)],
            vec![Some(0.5), Some(1.5)],
        );

        let profiles = profile_columns(&dataset).expect("profiles");
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "value", "score"]);
    }

    #[test]
    fn test_missing_and_distinct_counts() {
        let dataset = make_dataset(
            vec![Some("a"), Some("a"), None, Some("b")],
            vec![Some(1), Some(1), Some(1), Some(1)],
            vec![Some(0.0), None, None, Some(2.0)],
        );

        let profiles = profile_columns(&dataset).expect("profiles");

        assert_eq!(profiles[0].missing_count, 1);
        assert_eq!(profiles[0].distinct_count, 2);
        assert_eq!(profiles[0].non_missing_count(), 3);

        assert_eq!(profiles[1].missing_count, 0);
        assert_eq!(profiles[1].distinct_count, 1);

        assert_eq!(profiles[2].missing_count, 2);
        assert!((profiles[2].missing_share() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_count_numeric_only() {
        let dataset = make_dataset(
            vec![Some("a"), Some("b")],
            vec![Some(0), Some(3)],
            vec![Some(0.0), Some(0.0)],
        );

        let profiles = profile_columns(&dataset).expect("profiles");

        assert_eq!(profiles[0].zero_count, None);
        assert_eq!(profiles[1].zero_count, Some(1));
        assert_eq!(profiles[2].zero_count, Some(2));
        assert!((profiles[2].zero_share().expect("share") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_id_like_name_match() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("user_id", DataType::Int32, false),
            Field::new("ID", DataType::Int32, false),
            Field::new("name", DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(Int32Array::from(vec![1, 2])),
            ],
        )
        .expect("batch");
        let dataset = ArrowDataset::from_batch(batch).expect("dataset");

        let profiles = profile_columns(&dataset).expect("profiles");
        assert!(profiles[0].id_like);
        assert!(profiles[1].id_like);
        assert!(!profiles[2].id_like);
    }

    #[test]
    fn test_distinct_ratio_undefined_for_all_missing() {
        let dataset = make_dataset(
            vec![None, None],
            vec![Some(1), Some(2)],
            vec![Some(1.0), Some(2.0)],
        );

        let profiles = profile_columns(&dataset).expect("profiles");
        assert_eq!(profiles[0].distinct_count, 0);
        assert!(profiles[0].distinct_ratio().is_none());
        assert!((profiles[1].distinct_ratio().expect("ratio") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dataset_profile_counts() {
        let dataset = make_dataset(
            vec![Some("a"), Some("a"), Some("b")],
            vec![Some(1), Some(1), Some(2)],
            vec![Some(0.5), Some(0.5), Some(1.5)],
        );

        let profile = profile_dataset(&dataset).expect("profile");
        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.column_count, 3);
        assert_eq!(profile.duplicate_row_count, 1);
        assert!(profile.memory_bytes > 0);
    }

    #[test]
    fn test_no_duplicate_rows() {
        let dataset = make_dataset(
            vec![Some("a"), Some("b")],
            vec![Some(1), Some(1)],
            vec![Some(0.5), Some(0.5)],
        );

        let profile = profile_dataset(&dataset).expect("profile");
        assert_eq!(profile.duplicate_row_count, 0);
    }

    #[test]
    fn test_missing_cells_compare_equal_in_rows() {
        let dataset = make_dataset(
            vec![None, None],
            vec![Some(1), Some(1)],
            vec![None, None],
        );

        let profile = profile_dataset(&dataset).expect("profile");
        assert_eq!(profile.duplicate_row_count, 1);
    }

    #[test]
    fn test_empty_schema_rejected() {
        use arrow::array::RecordBatchOptions;

        let schema = Arc::new(Schema::empty());
        let options = RecordBatchOptions::new().with_row_count(Some(3));
        let batch =
            RecordBatch::try_new_with_options(schema, vec![], &options).expect("batch");
        let dataset = ArrowDataset::from_batch(batch).expect("dataset");

        assert!(matches!(profile_columns(&dataset), Err(Error::EmptySchema)));
        assert!(matches!(profile_dataset(&dataset), Err(Error::EmptySchema)));
    }

    #[test]
    fn test_zero_row_dataset_profiles_cleanly() {
        let dataset = make_dataset(vec![], vec![], vec![]);

        let profiles = profile_columns(&dataset).expect("profiles");
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[0].total_count, 0);
        assert!((profiles[0].missing_share()).abs() < 1e-9);

        let profile = profile_dataset(&dataset).expect("profile");
        assert_eq!(profile.row_count, 0);
        assert_eq!(profile.duplicate_row_count, 0);
    }
}
