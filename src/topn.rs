// Top-N reduction for chart display.
//
// The overall chart and every per-ward chart go through `reduce_top_n`, so
// "top languages overall" and "top languages in ward 3" are cut the same
// way.
use crate::aggregate::summary_total;
use crate::format::{other_label, percentage, Locale};
use crate::observation::Measure;
use crate::types::{CategorySummary, TopNEntry, TopNView, WardSummary};
use std::num::NonZeroUsize;

/// Id used for the synthesized bucket in chart data.
pub const OTHER_ID: &str = "other";

/// Whether a category code names the "other" bucket itself, as the built-in
/// registries' `OTHER` code does.
pub fn is_other_code(code: &str) -> bool {
    code.eq_ignore_ascii_case(OTHER_ID)
}

/// Keep the first `n` categories of an already-sorted summary and fold the
/// rest into one "other" entry. A category coded `OTHER` always lands in
/// that entry, so a view never carries two "Other" slices. Values are
/// carried exactly; nothing is rounded here.
pub fn reduce_top_n<V: Measure>(
    summary: &[CategorySummary<V>],
    n: NonZeroUsize,
    locale: Locale,
) -> TopNView<V> {
    let total = summary_total(summary);
    let denominator = total.to_f64();
    let (named, registered_other): (Vec<&CategorySummary<V>>, Vec<&CategorySummary<V>>) =
        summary.iter().partition(|c| !is_other_code(&c.category));
    let cut = n.get().min(named.len());

    let entries = named[..cut]
        .iter()
        .map(|c| TopNEntry {
            category: c.category.clone(),
            label: c.label.clone(),
            value: c.total,
            percentage: percentage(c.total.to_f64(), denominator),
        })
        .collect();

    let rest = &named[cut..];
    let other = if rest.is_empty() && registered_other.is_empty() {
        None
    } else {
        let value = V::total(rest.iter().chain(&registered_other).map(|c| c.total));
        Some(TopNEntry {
            category: OTHER_ID.to_string(),
            label: other_label(locale).to_string(),
            value,
            percentage: percentage(value.to_f64(), denominator),
        })
    };

    TopNView { entries, other, total }
}

/// Per-ward views, in the order the wards were given.
pub fn reduce_wards_top_n<V: Measure>(
    wards: &[WardSummary<V>],
    n: NonZeroUsize,
    locale: Locale,
) -> Vec<(u32, TopNView<V>)> {
    wards
        .iter()
        .map(|w| (w.ward_number, reduce_top_n(&w.by_category, n, locale)))
        .collect()
}
