// Observation rows and the numeric measure they carry.
//
// Rows arrive from the data-access layer with every field potentially
// missing. `sanitize_rows` is the single place that turns them into typed
// `Observation`s, so everything downstream can assume clean values.
use crate::chart::WARD_KEY;
use crate::format::{format_int, format_number};
use serde::Serialize;
use std::fmt::Debug;

/// Numeric type a dataset is measured in.
///
/// Count datasets (population, households) use `u64` and sum as integers.
/// Production and revenue datasets use `f64` and are never rounded before
/// display.
pub trait Measure: Copy + Debug + Default + PartialOrd + Serialize {
    /// Parse a raw cell, tolerating whitespace and thousands separators.
    fn parse_cell(s: &str) -> Option<Self>;

    fn to_f64(self) -> f64;

    /// Whether the value may appear in a dataset (finite and non-negative).
    fn is_valid(self) -> bool;

    /// Human-readable rendering with grouping separators.
    fn display(self) -> String;

    /// Sum of two values. Counts saturate at `u64::MAX` instead of wrapping.
    fn accumulate(self, other: Self) -> Self;

    /// Sum of a sequence of values, via `accumulate`.
    fn total<I: IntoIterator<Item = Self>>(values: I) -> Self {
        values.into_iter().fold(Self::default(), Self::accumulate)
    }
}

/// Strip separators and reject text so values like `"1,234"` parse but
/// `"n/a"` doesn't.
fn clean_numeric(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(s.replace(',', ""))
}

impl Measure for u64 {
    fn parse_cell(s: &str) -> Option<Self> {
        clean_numeric(s)?.parse::<u64>().ok()
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn is_valid(self) -> bool {
        true
    }

    fn display(self) -> String {
        format_int(self)
    }

    fn accumulate(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl Measure for f64 {
    fn parse_cell(s: &str) -> Option<Self> {
        clean_numeric(s)?.parse::<f64>().ok()
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn is_valid(self) -> bool {
        self.is_finite() && self >= 0.0
    }

    fn display(self) -> String {
        format_number(self, 2)
    }

    fn accumulate(self, other: Self) -> Self {
        self + other
    }
}

/// One recorded `(ward, category, value)` data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation<V> {
    pub id: Option<String>,
    pub ward_number: u32,
    pub category: String,
    pub value: V,
    pub secondary_value: Option<V>,
}

impl<V: Measure> Observation<V> {
    pub fn new(ward_number: u32, category: impl Into<String>, value: V) -> Self {
        Self {
            id: None,
            ward_number,
            category: category.into(),
            value,
            secondary_value: None,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, secondary: V) -> Self {
        self.secondary_value = Some(secondary);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A row exactly as fetched, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialObservation<V> {
    pub id: Option<String>,
    pub ward_number: Option<u32>,
    pub category: Option<String>,
    pub value: Option<V>,
    pub secondary_value: Option<V>,
}

/// Split raw rows into usable observations and a count of rows that had to
/// be dropped (missing ward, category or value, or a negative value).
/// The code `ward` is reserved for the bar chart's ward column and counts
/// as malformed too.
///
/// One bad row never aborts the batch.
pub fn sanitize_rows<V: Measure>(rows: Vec<PartialObservation<V>>) -> (Vec<Observation<V>>, usize) {
    let mut skipped = 0usize;
    let mut clean = Vec::with_capacity(rows.len());

    for row in rows {
        let ward_number = match row.ward_number {
            Some(w) if w > 0 => w,
            _ => { skipped += 1; continue; }
        };
        let category = match row.category.map(|c| c.trim().to_string()) {
            Some(c) if !c.is_empty() && c != WARD_KEY => c,
            _ => { skipped += 1; continue; }
        };
        let value = match row.value {
            Some(v) if v.is_valid() => v,
            _ => { skipped += 1; continue; }
        };
        // An unusable secondary value is dropped rather than the whole row.
        let secondary_value = row.secondary_value.filter(|v| v.is_valid());

        clean.push(Observation {
            id: row.id,
            ward_number,
            category,
            value,
            secondary_value,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed row(s) during sanitizing");
    }
    (clean, skipped)
}

/// Entry-time uniqueness check: the existing row for `(ward, category)`, if
/// any. Call before creating a new observation.
pub fn find_duplicate<'a, V>(
    rows: &'a [Observation<V>],
    ward_number: u32,
    category: &str,
) -> Option<&'a Observation<V>> {
    rows.iter()
        .find(|r| r.ward_number == ward_number && r.category == category)
}
