//! Pairwise Pearson correlation over numeric columns.
//!
//! Degenerate cells (zero variance, fewer than two paired
//! observations) are represented as `None` so a report can always be
//! produced; they are never an error.

// Statistical computation requires casts and float arithmetic
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::suboptimal_flops)]

use serde::Serialize;

use crate::{
    column::{collect_columns, ColumnValues},
    dataset::ArrowDataset,
    error::Result,
};

/// Symmetric correlation matrix over the dataset's numeric columns.
///
/// Cells are `Some(r)` for a defined Pearson coefficient and `None`
/// where the coefficient is undefined. Empty when the dataset has
/// fewer than two numeric columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// An empty matrix (fewer than two numeric columns).
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Numeric column names covered by the matrix, in dataset order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True when the matrix covers no column pairs.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Correlation between two columns by name.
    ///
    /// Outer `None` means the pair is not in the matrix; inner `None`
    /// means the coefficient is undefined (zero variance).
    pub fn get(&self, a: &str, b: &str) -> Option<Option<f64>> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.cells[i][j])
    }
}

/// Computes the Pearson correlation matrix over all numeric columns,
/// using pairwise-complete observations.
///
/// Returns an empty matrix when fewer than two numeric columns exist.
///
/// # Errors
///
/// Returns an error only if the underlying Arrow data cannot be read.
pub fn correlation_matrix(dataset: &ArrowDataset) -> Result<CorrelationMatrix> {
    let columns = collect_columns(dataset)?;

    let numeric: Vec<(String, Vec<Option<f64>>)> = columns
        .into_iter()
        .filter_map(|(name, values)| match values {
            ColumnValues::Numeric(v) => Some((name, v)),
            _ => None,
        })
        .collect();

    if numeric.len() < 2 {
        return Ok(CorrelationMatrix::empty());
    }

    let n = numeric.len();
    let mut cells = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pearson(&numeric[i].1, &numeric[j].1);
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        cells,
    })
}

/// Pearson coefficient over rows where both cells are present and
/// finite. `None` with fewer than two such rows or zero variance.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Float64Array, RecordBatch, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;

    fn numeric_dataset(columns: Vec<(&str, Vec<Option<f64>>)>) -> ArrowDataset {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, true))
            .collect();
        let arrays: Vec<arrow::array::ArrayRef> = columns
            .into_iter()
            .map(|(_, values)| Arc::new(Float64Array::from(values)) as arrow::array::ArrayRef)
            .collect();

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("batch");
        ArrowDataset::from_batch(batch).expect("dataset")
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let dataset = numeric_dataset(vec![
            ("a", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            ("b", vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");
        let r = matrix.get("a", "b").expect("pair").expect("defined");
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let dataset = numeric_dataset(vec![
            ("a", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ("b", vec![Some(3.0), Some(2.0), Some(1.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");
        let r = matrix.get("a", "b").expect("pair").expect("defined");
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let dataset = numeric_dataset(vec![
            ("a", vec![Some(1.0), Some(5.0), Some(2.0), Some(9.0)]),
            ("b", vec![Some(4.0), Some(1.0), Some(7.0), Some(3.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");

        let ab = matrix.get("a", "b").expect("pair");
        let ba = matrix.get("b", "a").expect("pair");
        assert_eq!(ab, ba);

        for name in ["a", "b"] {
            let diag = matrix.get(name, name).expect("pair").expect("defined");
            assert!((diag - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_variance_column_undefined() {
        let dataset = numeric_dataset(vec![
            ("flat", vec![Some(5.0), Some(5.0), Some(5.0)]),
            ("varied", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");
        assert_eq!(matrix.get("flat", "varied"), Some(None));
        assert_eq!(matrix.get("flat", "flat"), Some(None));
    }

    #[test]
    fn test_fewer_than_two_numeric_columns_empty() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("score", DataType::Float64, true),
            Field::new("label", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), Some(2.0)])),
                Arc::new(StringArray::from(vec![Some("x"), Some("y")])),
            ],
        )
        .expect("batch");
        let dataset = ArrowDataset::from_batch(batch).expect("dataset");

        let matrix = correlation_matrix(&dataset).expect("matrix");
        assert!(matrix.is_empty());
        assert_eq!(matrix.get("score", "score"), None);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        // Rows with a missing cell on either side are dropped pairwise.
        let dataset = numeric_dataset(vec![
            ("a", vec![Some(1.0), None, Some(3.0), Some(4.0)]),
            ("b", vec![Some(2.0), Some(9.0), None, Some(8.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");
        // Only rows 0 and 3 are complete: (1,2) and (4,8) -> r = 1.
        let r = matrix.get("a", "b").expect("pair").expect("defined");
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_categorical_columns_excluded() {
        let dataset = numeric_dataset(vec![
            ("a", vec![Some(1.0), Some(2.0)]),
            ("b", vec![Some(2.0), Some(1.0)]),
        ]);

        let matrix = correlation_matrix(&dataset).expect("matrix");
        assert_eq!(matrix.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(matrix.get("missing_column", "a"), None);
    }
}
