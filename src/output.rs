use crate::error::Result;
use crate::observation::Measure;
use crate::report::{build_json_ld, summary_table, ward_table, DatasetReport};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Serialize `rows` to a CSV file, one header row taken from the first
/// row's field names.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON, replacing any existing file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print a titled console preview of a report table.
pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{title}");
    if let Some(n) = note {
        println!("({n})");
    }
    println!();
    preview_table_rows(rows, max_rows);
}

/// Print at most `max_rows` rows as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_preview(rows, max_rows));
}

/// Markdown rendering of the first `max_rows` rows, with a trailing line
/// counting the rows left out.
fn render_preview<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let shown: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if shown.is_empty() {
        return "(no rows)".to_string();
    }
    let hidden = rows.len() - shown.len();
    let mut out = Table::new(shown).with(Style::markdown()).to_string();
    if hidden > 0 {
        out.push_str(&format!("\n... {hidden} more row(s)"));
    }
    out
}

/// Write the summary and ward tables as CSV, and the chart data and JSON-LD
/// as JSON, into `out_dir`. Returns the paths written.
pub fn write_report_files<V: Measure>(
    report: &DatasetReport<V>,
    out_dir: &Path,
    generated_on: NaiveDate,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let stem = report.dataset.to_string();

    let summary_path = out_dir.join(format!("{stem}_summary.csv"));
    write_csv(&summary_path, &summary_table(report))?;

    let wards_path = out_dir.join(format!("{stem}_wards.csv"));
    write_csv(&wards_path, &ward_table(report))?;

    let charts_path = out_dir.join(format!("{stem}_charts.json"));
    write_json(&charts_path, report)?;

    let json_ld_path = out_dir.join(format!("{stem}_jsonld.json"));
    write_json(&json_ld_path, &build_json_ld(report, generated_on))?;

    let written = vec![summary_path, wards_path, charts_path, json_ld_path];
    log::info!("Wrote {} report files to {}", written.len(), out_dir.display());
    Ok(written)
}
