//! Report assembly.
//!
//! [`build_report`] runs the whole pipeline once over one filtered row set:
//! aggregation, top-N reduction, chart adapters, tables and prose. Tables
//! and charts are derived from the same summaries, so they never disagree.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::num::NonZeroUsize;

use crate::aggregate::{aggregate_by_category, aggregate_by_ward, summary_total, DenominatorScope};
use crate::chart::{to_bar_data, to_pie_data, BarChart, PieSlice};
use crate::datasets::{DatasetKind, DatasetSpec};
use crate::filter::{filter_rows, RowFilter};
use crate::format::{localize_digits, ratio, to_percentage, Locale};
use crate::observation::{Measure, Observation};
use crate::registry::CategoryRegistry;
use crate::topn::{reduce_top_n, reduce_wards_top_n};
use crate::types::{CategorySummary, SummaryTableRow, TopNView, WardSummary, WardTableRow};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub top_n: NonZeroUsize,
    pub locale: Locale,
    pub filter: RowFilter,
}

impl ReportOptions {
    pub fn for_dataset(spec: &DatasetSpec) -> Self {
        Self {
            top_n: spec.default_top_n(),
            locale: Locale::default(),
            filter: RowFilter::default(),
        }
    }
}

/// Top-N view and pie slices for a single ward.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardChart<V> {
    pub ward_number: u32,
    pub top_n: TopNView<V>,
    pub pie: Vec<PieSlice<V>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReport<V> {
    pub dataset: DatasetKind,
    pub title: String,
    pub value_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_label: Option<String>,
    pub locale: Locale,
    pub ward_filter: String,
    pub category_filter: String,
    pub total: V,
    pub overall: Vec<CategorySummary<V>>,
    pub wards: Vec<WardSummary<V>>,
    pub top_n: TopNView<V>,
    pub pie: Vec<PieSlice<V>>,
    pub ward_charts: Vec<WardChart<V>>,
    pub bar: BarChart<V>,
    /// How many of the leading category per one of the runner-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_two_ratio: Option<String>,
    pub narrative: Vec<String>,
}

impl<V: Measure> DatasetReport<V> {
    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }
}

pub fn build_report<V: Measure>(
    rows: &[Observation<V>],
    spec: &DatasetSpec,
    registry: &CategoryRegistry,
    options: &ReportOptions,
) -> DatasetReport<V> {
    let locale = options.locale;
    let rows = filter_rows(rows, &options.filter);

    let overall = aggregate_by_category(&rows, registry, locale, DenominatorScope::Global);
    let wards = aggregate_by_ward(&rows, registry, locale);
    let total = summary_total(&overall);

    let top_n = reduce_top_n(&overall, options.top_n, locale);
    let pie = to_pie_data(&top_n, registry);
    let ward_charts = reduce_wards_top_n(&wards, options.top_n, locale)
        .into_iter()
        .map(|(ward_number, view)| WardChart {
            ward_number,
            pie: to_pie_data(&view, registry),
            top_n: view,
        })
        .collect();
    let bar = to_bar_data(&wards, registry, locale);

    let top_two_ratio = match overall.as_slice() {
        [first, second, ..] => Some(localize_digits(
            &ratio(first.total.to_f64(), second.total.to_f64(), locale),
            locale,
        )),
        _ => None,
    };
    let narrative = narrative(spec, &overall, &wards, total, locale);

    log::info!(
        "Built {} report: {} categories across {} wards",
        spec.kind,
        overall.len(),
        wards.len()
    );

    DatasetReport {
        dataset: spec.kind,
        title: spec.title.to_string(),
        value_label: spec.value_label.to_string(),
        secondary_label: spec.secondary_label.map(str::to_string),
        locale,
        ward_filter: options.filter.ward.to_string(),
        category_filter: options.filter.category.to_string(),
        total,
        overall,
        wards,
        top_n,
        pie,
        ward_charts,
        bar,
        top_two_ratio,
        narrative,
    }
}

fn pct_text(value: f64, denominator: f64, locale: Locale) -> String {
    localize_digits(&format!("{}%", to_percentage(value, denominator, 2)), locale)
}

/// Prose paragraphs for the public page.
fn narrative<V: Measure>(
    spec: &DatasetSpec,
    overall: &[CategorySummary<V>],
    wards: &[WardSummary<V>],
    total: V,
    locale: Locale,
) -> Vec<String> {
    let l = |s: String| localize_digits(&s, locale);
    let measure = spec.value_label.to_lowercase();
    let denom = total.to_f64();

    let Some(first) = overall.first() else {
        return vec!["No data available.".to_string()];
    };

    let mut out = vec![l(format!(
        "{}: a total {} of {} is recorded across {} ward(s).",
        spec.title,
        measure,
        total.display(),
        wards.len()
    ))];
    out.push(format!(
        "{} is the largest category with {} ({}).",
        first.label,
        l(first.total.display()),
        pct_text(first.total.to_f64(), denom, locale)
    ));
    if let Some(second) = overall.get(1) {
        out.push(format!(
            "{} follows with {} ({}).",
            second.label,
            l(second.total.display()),
            pct_text(second.total.to_f64(), denom, locale)
        ));
        out.push(format!(
            "For every {} in {}, there are {} in {}.",
            l("1".to_string()),
            second.label,
            l(ratio(first.total.to_f64(), second.total.to_f64(), locale)),
            first.label
        ));
    }
    let largest_ward = wards.iter().fold(None::<&WardSummary<V>>, |best, w| match best {
        Some(b) if b.total >= w.total => Some(b),
        _ => Some(w),
    });
    if let Some(w) = largest_ward {
        out.push(l(format!(
            "Ward {} has the highest {} with {}.",
            w.ward_number,
            measure,
            w.total.display()
        )));
    }
    out
}

/// Overall table, one row per category, with percentages against the
/// report total.
pub fn summary_table<V: Measure>(report: &DatasetReport<V>) -> Vec<SummaryTableRow> {
    let l = |s: String| localize_digits(&s, report.locale);
    let denom = report.total.to_f64();
    report
        .overall
        .iter()
        .enumerate()
        .map(|(idx, c)| SummaryTableRow {
            rank: idx + 1,
            category: c.label.clone(),
            value: l(c.total.display()),
            secondary: c.secondary_total.map_or_else(|| "-".to_string(), |s| l(s.display())),
            percentage: l(to_percentage(c.total.to_f64(), denom, 2)),
        })
        .collect()
}

/// Per-ward table with ward-local shares.
pub fn ward_table<V: Measure>(report: &DatasetReport<V>) -> Vec<WardTableRow> {
    let l = |s: String| localize_digits(&s, report.locale);
    report
        .wards
        .iter()
        .flat_map(|w| {
            w.by_category.iter().map(move |c| WardTableRow {
                ward: l(w.ward_number.to_string()),
                category: c.label.clone(),
                value: l(c.total.display()),
                ward_share: l(to_percentage(c.total.to_f64(), w.total.to_f64(), 2)),
                ward_total: l(w.total.display()),
            })
        })
        .collect()
}

/// schema.org `Dataset` description for search engines.
pub fn build_json_ld<V: Measure>(report: &DatasetReport<V>, generated_on: NaiveDate) -> Value {
    let variables: Vec<Value> = report
        .overall
        .iter()
        .map(|c| {
            json!({
                "@type": "PropertyValue",
                "name": c.label,
                "value": c.total,
                "unitText": report.value_label,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Dataset",
        "name": report.title,
        "description": report.narrative.join(" "),
        "inLanguage": report.locale.to_string(),
        "variableMeasured": variables,
        "dateModified": generated_on.format("%Y-%m-%d").to_string(),
    })
}
