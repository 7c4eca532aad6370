//! Quality-flag detection engine.
//!
//! Turns column and dataset profiles into a fixed set of boolean
//! hygiene signals, each carrying the columns that triggered it.
//! The engine is pure and holds its thresholds fixed; only the
//! report-level missing-share threshold is caller-configurable.

use serde::Serialize;

use crate::{
    error::{Error, Result},
    profile::{ColumnProfile, DatasetProfile},
};

/// The fixed, enumerated set of quality flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityFlag {
    /// Any column has missing values.
    MissingValues,
    /// The dataset contains duplicate rows.
    Duplicates,
    /// Any column has more than half of its cells missing.
    HighMissingRateColumns,
    /// Any column holds a single distinct value.
    ConstantColumns,
    /// Any categorical column is mostly distinct values.
    HighCardinalityCategoricals,
    /// Any identifier-named column contains duplicate values.
    SuspiciousIdDuplicates,
    /// Any numeric column is dominated by zeros.
    ManyZeroValues,
}

impl QualityFlag {
    /// All flags, in their reporting order.
    pub const ALL: [Self; 7] = [
        Self::MissingValues,
        Self::Duplicates,
        Self::HighMissingRateColumns,
        Self::ConstantColumns,
        Self::HighCardinalityCategoricals,
        Self::SuspiciousIdDuplicates,
        Self::ManyZeroValues,
    ];

    /// Stable flag name used in report output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingValues => "has_missing_values",
            Self::Duplicates => "has_duplicates",
            Self::HighMissingRateColumns => "has_high_missing_rate_columns",
            Self::ConstantColumns => "has_constant_columns",
            Self::HighCardinalityCategoricals => "has_high_cardinality_categoricals",
            Self::SuspiciousIdDuplicates => "has_suspicious_id_duplicates",
            Self::ManyZeroValues => "has_many_zero_values",
        }
    }
}

/// Fixed detection thresholds.
///
/// These reproduce the reference heuristics exactly and are not a
/// configuration surface: the engine always uses [`Default`] values.
#[derive(Debug, Clone)]
pub struct FlagThresholds {
    /// Missing share above which a column counts as high-missing (0.5).
    pub max_missing_share: f64,
    /// Distinct/non-missing ratio above which a categorical column
    /// counts as high-cardinality (0.5).
    pub max_cardinality_ratio: f64,
    /// Zero share above which a numeric column counts as zero-heavy (0.3).
    pub max_zero_share: f64,
}

impl Default for FlagThresholds {
    fn default() -> Self {
        Self {
            max_missing_share: 0.5,
            max_cardinality_ratio: 0.5,
            max_zero_share: 0.3,
        }
    }
}

/// The outcome of quality-flag detection.
///
/// Immutable once produced. Each flag is either raised with its
/// triggering columns (or, for duplicates, the duplicate row count), or
/// not raised with an empty detail.
#[derive(Debug, Clone, Serialize)]
pub struct QualityFlagSet {
    missing_value_columns: Vec<String>,
    duplicate_row_count: usize,
    high_missing_rate_columns: Vec<String>,
    constant_columns: Vec<String>,
    high_cardinality_columns: Vec<String>,
    suspicious_id_columns: Vec<String>,
    zero_heavy_columns: Vec<String>,
}

impl QualityFlagSet {
    /// Whether the given flag is raised.
    pub fn is_raised(&self, flag: QualityFlag) -> bool {
        match flag {
            QualityFlag::MissingValues => !self.missing_value_columns.is_empty(),
            QualityFlag::Duplicates => self.duplicate_row_count > 0,
            QualityFlag::HighMissingRateColumns => !self.high_missing_rate_columns.is_empty(),
            QualityFlag::ConstantColumns => !self.constant_columns.is_empty(),
            QualityFlag::HighCardinalityCategoricals => {
                !self.high_cardinality_columns.is_empty()
            }
            QualityFlag::SuspiciousIdDuplicates => !self.suspicious_id_columns.is_empty(),
            QualityFlag::ManyZeroValues => !self.zero_heavy_columns.is_empty(),
        }
    }

    /// Columns that triggered the given flag.
    ///
    /// Empty for [`QualityFlag::Duplicates`], whose detail is
    /// [`duplicate_row_count`](Self::duplicate_row_count).
    pub fn triggering_columns(&self, flag: QualityFlag) -> &[String] {
        match flag {
            QualityFlag::MissingValues => &self.missing_value_columns,
            QualityFlag::Duplicates => &[],
            QualityFlag::HighMissingRateColumns => &self.high_missing_rate_columns,
            QualityFlag::ConstantColumns => &self.constant_columns,
            QualityFlag::HighCardinalityCategoricals => &self.high_cardinality_columns,
            QualityFlag::SuspiciousIdDuplicates => &self.suspicious_id_columns,
            QualityFlag::ManyZeroValues => &self.zero_heavy_columns,
        }
    }

    /// Number of duplicate rows recorded for [`QualityFlag::Duplicates`].
    pub fn duplicate_row_count(&self) -> usize {
        self.duplicate_row_count
    }

    /// Flags that are raised, in reporting order.
    pub fn raised(&self) -> Vec<QualityFlag> {
        QualityFlag::ALL
            .into_iter()
            .filter(|f| self.is_raised(*f))
            .collect()
    }

    /// Whether any flag is raised.
    pub fn any_raised(&self) -> bool {
        QualityFlag::ALL.iter().any(|f| self.is_raised(*f))
    }

    /// Flag name to boolean value, over the full enumerated set.
    pub fn as_map(&self) -> std::collections::BTreeMap<&'static str, bool> {
        QualityFlag::ALL
            .into_iter()
            .map(|f| (f.name(), self.is_raised(f)))
            .collect()
    }
}

/// Computes the [`QualityFlagSet`] from a dataset profile and its
/// column profiles.
///
/// Columns with zero non-missing values never trigger the constant or
/// high-cardinality checks (their ratios are undefined).
///
/// # Errors
///
/// Returns [`Error::ProfileMismatch`] when the profile list length does
/// not match the dataset's declared column count.
pub fn compute_quality_flags(
    dataset: &DatasetProfile,
    columns: &[ColumnProfile],
) -> Result<QualityFlagSet> {
    if columns.len() != dataset.column_count {
        return Err(Error::ProfileMismatch {
            expected: dataset.column_count,
            actual: columns.len(),
        });
    }

    let thresholds = FlagThresholds::default();

    let mut missing_value_columns = Vec::new();
    let mut high_missing_rate_columns = Vec::new();
    let mut constant_columns = Vec::new();
    let mut high_cardinality_columns = Vec::new();
    let mut suspicious_id_columns = Vec::new();
    let mut zero_heavy_columns = Vec::new();

    for column in columns {
        if column.missing_count > 0 {
            missing_value_columns.push(column.name.clone());
        }

        if column.missing_share() > thresholds.max_missing_share {
            high_missing_rate_columns.push(column.name.clone());
        }

        // All-missing columns have distinct_count 0 and are skipped here.
        if column.distinct_count == 1 {
            constant_columns.push(column.name.clone());
        }

        if column.column_type.is_categorical_like() {
            if let Some(ratio) = column.distinct_ratio() {
                if ratio > thresholds.max_cardinality_ratio {
                    high_cardinality_columns.push(column.name.clone());
                }
            }
        }

        if column.id_like && column.distinct_count < dataset.row_count {
            suspicious_id_columns.push(column.name.clone());
        }

        if let Some(share) = column.zero_share() {
            if share > thresholds.max_zero_share {
                zero_heavy_columns.push(column.name.clone());
            }
        }
    }

    Ok(QualityFlagSet {
        missing_value_columns,
        duplicate_row_count: dataset.duplicate_row_count,
        high_missing_rate_columns,
        constant_columns,
        high_cardinality_columns,
        suspicious_id_columns,
        zero_heavy_columns,
    })
}
