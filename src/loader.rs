use crate::datasets::{DatasetSpec, ID_FIELD, WARD_FIELD};
use crate::error::{ProfileError, Result};
use crate::observation::{sanitize_rows, Measure, Observation, PartialObservation};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows dropped for a missing ward, category or value, or unreadable CSV.
    pub skipped_rows: usize,
    /// Rows repeating a `(ward, category)` pair already loaded.
    pub duplicate_rows: usize,
}

pub fn load_and_clean<V: Measure>(path: &Path, spec: &DatasetSpec) -> Result<(Vec<Observation<V>>, LoadReport)> {
    let file = File::open(path)?;
    log::info!("Loading {} dataset from {}", spec.kind, path.display());
    load_from_reader(file, spec)
}

/// Read observations for `spec` from CSV with a header row. Columns are
/// located by name, so extra columns and any column order are accepted.
pub fn load_from_reader<V: Measure, R: Read>(reader: R, spec: &DatasetSpec) -> Result<(Vec<Observation<V>>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let ward_idx = require_column(&headers, WARD_FIELD, spec)?;
    let category_idx = require_column(&headers, spec.category_field, spec)?;
    let value_idx = require_column(&headers, spec.value_field, spec)?;
    let secondary_idx = spec.secondary_field.and_then(|f| find_column(&headers, f));
    let id_idx = find_column(&headers, ID_FIELD);

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut prelim: Vec<PartialObservation<V>> = Vec::new();

    for result in rdr.records() {
        total_rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Row {total_rows}: CSV parse error: {e}");
                parse_errors += 1;
                continue;
            }
        };

        prelim.push(PartialObservation {
            id: id_idx
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            ward_number: record.get(ward_idx).and_then(|s| s.parse::<u32>().ok()),
            category: record.get(category_idx).map(str::to_string),
            value: record.get(value_idx).and_then(V::parse_cell),
            secondary_value: secondary_idx
                .and_then(|i| record.get(i))
                .and_then(V::parse_cell),
        });
    }

    let (clean, skipped) = sanitize_rows(prelim);

    // First row wins for each (ward, category).
    let mut seen: HashSet<(u32, String)> = HashSet::with_capacity(clean.len());
    let mut rows: Vec<Observation<V>> = Vec::with_capacity(clean.len());
    let mut duplicate_rows = 0usize;
    for r in clean {
        if !seen.insert((r.ward_number, r.category.clone())) {
            log::warn!(
                "Duplicate row for ward {} category {} ignored (value {:?})",
                r.ward_number,
                r.category,
                r.value
            );
            duplicate_rows += 1;
            continue;
        }
        rows.push(r);
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: rows.len(),
        skipped_rows: skipped + parse_errors,
        duplicate_rows,
    };
    log::info!(
        "Loaded {} of {} rows ({} skipped, {} duplicates)",
        report.loaded_rows,
        report.total_rows,
        report.skipped_rows,
        report.duplicate_rows
    );
    Ok((rows, report))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &StringRecord, name: &str, spec: &DatasetSpec) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| ProfileError::MissingColumn {
        column: name.to_string(),
        dataset: spec.kind.to_string(),
    })
}
