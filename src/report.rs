//! Report assembly.
//!
//! [`assemble_report`] is the final aggregation point: it runs the
//! profiler, flag engine, summarizer and correlation computer and
//! composes their outputs into one [`Report`] value, the uniform
//! contract renderers (tables, plots, CLI) consume.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    correlation::{correlation_matrix, CorrelationMatrix},
    dataset::ArrowDataset,
    error::{Error, Result},
    flags::{compute_quality_flags, QualityFlagSet},
    profile::{profile_columns, profile_dataset, ColumnProfile, DatasetProfile},
    summary::top_categories,
};

/// Report assembly configuration.
///
/// Only the report-level knobs are configurable; the flag engine's
/// detection thresholds are fixed.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Number of top category values per categorical column (default: 10).
    pub top_k_categories: usize,
    /// Missing share at or above which a column is listed as
    /// problematic (default: 0.1).
    pub min_missing_share: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k_categories: 10,
            min_missing_share: 0.1,
        }
    }
}

impl ReportConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of top category values to report.
    #[must_use]
    pub fn with_top_k_categories(mut self, k: usize) -> Self {
        self.top_k_categories = k;
        self
    }

    /// Sets the problematic-column missing-share threshold.
    #[must_use]
    pub fn with_min_missing_share(mut self, share: f64) -> Self {
        self.min_missing_share = share;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_missing_share) {
            return Err(Error::invalid_config(format!(
                "min_missing_share must lie in [0, 1], got {}",
                self.min_missing_share
            )));
        }
        Ok(())
    }
}

/// One row of the missing-value table.
#[derive(Debug, Clone, Serialize)]
pub struct MissingValueRow {
    /// Column name.
    pub column: String,
    /// Number of missing cells.
    pub missing_count: usize,
    /// Missing cells over total cells.
    pub missing_share: f64,
}

/// The assembled report bundle.
///
/// Owns every derived table; no reference to the source dataset is
/// retained past assembly.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Dataset-level statistics.
    pub dataset: DatasetProfile,
    /// Per-column statistics, in dataset column order.
    pub columns: Vec<ColumnProfile>,
    /// Quality flags with their triggering details.
    pub flags: QualityFlagSet,
    /// Columns with missing cells, sorted by missing share descending.
    pub missing: Vec<MissingValueRow>,
    /// Pearson correlations over numeric columns.
    pub correlations: CorrelationMatrix,
    /// Top category values per categorical column.
    pub top_categories: HashMap<String, Vec<(String, usize)>>,
    /// Columns whose missing share reaches the configured threshold.
    pub problematic_columns: Vec<String>,
}

impl Report {
    /// Serializes the report to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Assembles the full report for a dataset.
///
/// # Errors
///
/// Returns [`Error::EmptySchema`] for a dataset with zero columns,
/// [`Error::EmptyDataset`] for one with zero rows, and
/// [`Error::InvalidConfig`] for an out-of-range configuration.
pub fn assemble_report(dataset: &ArrowDataset, config: &ReportConfig) -> Result<Report> {
    config.validate()?;

    if dataset.num_columns() == 0 {
        return Err(Error::EmptySchema);
    }
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let columns = profile_columns(dataset)?;
    let dataset_profile = profile_dataset(dataset)?;
    let flags = compute_quality_flags(&dataset_profile, &columns)?;
    let correlations = correlation_matrix(dataset)?;
    let categories = top_categories(dataset, config.top_k_categories)?;

    let mut missing: Vec<MissingValueRow> = columns
        .iter()
        .filter(|p| p.missing_count > 0)
        .map(|p| MissingValueRow {
            column: p.name.clone(),
            missing_count: p.missing_count,
            missing_share: p.missing_share(),
        })
        .collect();
    // Stable sort keeps column order among equal shares
    missing.sort_by(|a, b| {
        b.missing_share
            .partial_cmp(&a.missing_share)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let problematic_columns: Vec<String> = columns
        .iter()
        .filter(|p| p.missing_share() >= config.min_missing_share)
        .map(|p| p.name.clone())
        .collect();

    Ok(Report {
        dataset: dataset_profile,
        columns,
        flags,
        missing,
        correlations,
        top_categories: categories,
        problematic_columns,
    })
}
