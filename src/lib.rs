//! perfilar - Dataset Profiling and Quality Flags in Pure Rust
//!
//! An exploratory-data-analysis core: profile a tabular dataset, detect
//! data-hygiene problems as a fixed set of boolean quality flags, and
//! assemble a reproducible report bundle (missingness, duplication,
//! correlation structure, categorical distribution).
//!
//! # Design Principles
//!
//! 1. **Pure functions** - every operation is a stateless pass over an
//!    in-memory dataset; safe to invoke repeatedly or in parallel
//! 2. **Pure Rust** - no Python, no FFI
//! 3. **Zero-copy ingestion** - Arrow `RecordBatch` throughout
//! 4. **Degenerate cases are values** - undefined correlations and
//!    empty summaries are typed sentinels, not errors
//!
//! # Quick Start
//!
//! ```
//! use perfilar::{assemble_report, ArrowDataset, ReportConfig};
//!
//! let csv = "user_id,plan,score\n1,free,0.0\n2,free,2.5\n3,pro,0.0\n";
//! let dataset = ArrowDataset::from_csv_str(csv).unwrap();
//!
//! let report = assemble_report(&dataset, &ReportConfig::default()).unwrap();
//! for (flag, raised) in report.flags.as_map() {
//!     println!("{}: {}", flag, raised);
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::unreadable_literal
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

pub mod column;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod flags;
pub mod profile;
pub mod report;
pub mod summary;

// Re-exports for convenience
pub use column::ColumnType;
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use dataset::{ArrowDataset, CsvOptions};
pub use error::{Error, Result};
pub use flags::{compute_quality_flags, FlagThresholds, QualityFlag, QualityFlagSet};
pub use profile::{profile_columns, profile_dataset, ColumnProfile, DatasetProfile};
pub use report::{assemble_report, MissingValueRow, Report, ReportConfig};
pub use summary::top_categories;
