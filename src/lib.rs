//! Ward-level statistics for a municipal digital profile.
//!
//! Turns flat `(ward, category, value)` rows into the summaries behind the
//! public report pages: category totals, per-ward breakdowns, top-N views
//! with an "other" bucket, formatted percentages and chart-ready data.
//! Every core function is pure and recomputed from the current rows.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod datasets;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod observation;
pub mod output;
pub mod registry;
pub mod report;
pub mod topn;
pub mod types;

pub use aggregate::{aggregate_by_category, aggregate_by_ward, DenominatorScope};
pub use chart::{to_bar_data, to_pie_data};
pub use datasets::{DatasetKind, DatasetSpec, MeasureKind};
pub use error::{ProfileError, Result};
pub use filter::{filter_rows, RowFilter};
pub use format::{localize_digits, ratio, to_percentage, Locale};
pub use observation::{Measure, Observation};
pub use registry::CategoryRegistry;
pub use report::{build_report, DatasetReport, ReportOptions};
pub use topn::reduce_top_n;
