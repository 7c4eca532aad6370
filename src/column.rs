//! Typed column variants extracted from Arrow arrays.
//!
//! Column semantics are decided once, here, and every downstream
//! computation dispatches on the resulting [`ColumnType`] tag instead of
//! re-inspecting Arrow data types.

// Statistical extraction requires precision-loss casts
#![allow(clippy::cast_precision_loss)]

use std::fmt;

use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray},
    compute::cast,
    datatypes::DataType,
    util::display::array_value_to_string,
};
use serde::Serialize;

use crate::{
    dataset::ArrowDataset,
    error::{Error, Result},
};

/// Inferred semantic type of a column.
///
/// A Utf8 column whose non-null values all parse as numbers is treated
/// as numeric. Booleans are kept as their own tag; flag checks treat
/// them as categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Numbers (integer, float, or fully number-like text).
    Numeric,
    /// Free text or labels.
    Categorical,
    /// True/false values.
    Boolean,
}

impl ColumnType {
    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Boolean => "boolean",
        }
    }

    /// Check whether this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Check whether this type participates in categorical checks.
    ///
    /// Booleans count as categorical for flag and summary purposes.
    pub fn is_categorical_like(&self) -> bool {
        matches!(self, Self::Categorical | Self::Boolean)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Materialized cell values of one column, tagged by semantic type.
#[derive(Debug, Clone)]
pub(crate) enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnValues {
    pub(crate) fn column_type(&self) -> ColumnType {
        match self {
            Self::Numeric(_) => ColumnType::Numeric,
            Self::Categorical(_) => ColumnType::Categorical,
            Self::Boolean(_) => ColumnType::Boolean,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
            Self::Boolean(v) => v.len(),
        }
    }

    pub(crate) fn missing_count(&self) -> usize {
        match self {
            Self::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Cell rendered as a row-key fragment; missing cells become "NULL".
    pub(crate) fn row_key(&self, index: usize) -> String {
        match self {
            Self::Numeric(v) => v
                .get(index)
                .copied()
                .flatten()
                .map_or_else(|| "NULL".to_string(), |x| format!("{}", x)),
            Self::Categorical(v) => v
                .get(index)
                .and_then(|x| x.clone())
                .unwrap_or_else(|| "NULL".to_string()),
            Self::Boolean(v) => v
                .get(index)
                .copied()
                .flatten()
                .map_or_else(|| "NULL".to_string(), |x| format!("{}", x)),
        }
    }
}

/// Extracts every column of the dataset into typed cell vectors,
/// in schema order. One pass over all batches per column.
pub(crate) fn collect_columns(dataset: &ArrowDataset) -> Result<Vec<(String, ColumnValues)>> {
    let schema = dataset.schema();
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (idx, field) in schema.fields().iter().enumerate() {
        let values = collect_column(dataset, idx, field.data_type())?;
        columns.push((field.name().clone(), values));
    }

    Ok(columns)
}

fn collect_column(dataset: &ArrowDataset, idx: usize, dtype: &DataType) -> Result<ColumnValues> {
    match dtype {
        DataType::Boolean => collect_booleans(dataset, idx),
        t if t.is_numeric() => collect_numerics(dataset, idx),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = collect_strings(dataset, idx)?;
            Ok(promote_if_numeric(strings))
        }
        _ => {
            let strings = collect_rendered(dataset, idx)?;
            Ok(ColumnValues::Categorical(strings))
        }
    }
}

fn collect_booleans(dataset: &ArrowDataset, idx: usize) -> Result<ColumnValues> {
    let mut values = Vec::with_capacity(dataset.len());
    for batch in dataset.batches() {
        let array = batch.column(idx);
        let bools = array
            .as_any()
            .downcast_ref::<BooleanArray>()
            .ok_or_else(|| Error::schema_mismatch("expected Boolean array"))?;
        for i in 0..bools.len() {
            if bools.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(bools.value(i)));
            }
        }
    }
    Ok(ColumnValues::Boolean(values))
}

fn collect_numerics(dataset: &ArrowDataset, idx: usize) -> Result<ColumnValues> {
    let mut values = Vec::with_capacity(dataset.len());
    for batch in dataset.batches() {
        let array: ArrayRef = cast(batch.column(idx), &DataType::Float64)?;
        let floats = array
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| Error::schema_mismatch("cast to Float64 produced wrong array"))?;
        for i in 0..floats.len() {
            if floats.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(floats.value(i)));
            }
        }
    }
    Ok(ColumnValues::Numeric(values))
}

fn collect_strings(dataset: &ArrowDataset, idx: usize) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(dataset.len());
    for batch in dataset.batches() {
        let array: ArrayRef = cast(batch.column(idx), &DataType::Utf8)?;
        let strings = array
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| Error::schema_mismatch("cast to Utf8 produced wrong array"))?;
        for i in 0..strings.len() {
            if strings.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(strings.value(i).to_string()));
            }
        }
    }
    Ok(values)
}

/// Fallback for types with no dedicated path (dates, structs, ...);
/// rendered cell text is treated as categorical.
fn collect_rendered(dataset: &ArrowDataset, idx: usize) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(dataset.len());
    for batch in dataset.batches() {
        let array = batch.column(idx);
        for i in 0..array.len() {
            if array.is_null(i) {
                values.push(None);
            } else {
                values.push(Some(array_value_to_string(array, i)?));
            }
        }
    }
    Ok(values)
}

/// Promotes a text column to numeric when every non-missing value
/// parses as a number. All-missing columns stay categorical.
fn promote_if_numeric(strings: Vec<Option<String>>) -> ColumnValues {
    let mut parsed = Vec::with_capacity(strings.len());
    let mut any_present = false;

    for value in &strings {
        match value {
            None => parsed.push(None),
            Some(s) => match s.trim().parse::<f64>() {
                Ok(x) => {
                    any_present = true;
                    parsed.push(Some(x));
                }
                Err(_) => return ColumnValues::Categorical(strings),
            },
        }
    }

    if any_present {
        ColumnValues::Numeric(parsed)
    } else {
        ColumnValues::Categorical(strings)
    }
}
