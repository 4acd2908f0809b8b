// Row aggregation: category totals, ward totals and percentage shares.
//
// Ordering rule used everywhere a list of categories is produced:
// total descending, then registry declaration order, then (for codes the
// registry doesn't know) code ascending. The rule is total over distinct
// codes, so the output never depends on hash-map iteration order.
use crate::format::{percentage, Locale};
use crate::observation::{Measure, Observation};
use crate::registry::CategoryRegistry;
use crate::types::{CategorySummary, WardSummary};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Which total a percentage is taken against.
///
/// There is no default: every call site states the scope it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenominatorScope {
    /// All rows, against the sum of all rows.
    Global,
    /// Only the rows of one ward, against that ward's sum.
    Ward(u32),
}

impl DenominatorScope {
    fn includes<V>(self, row: &Observation<V>) -> bool {
        match self {
            Self::Global => true,
            Self::Ward(w) => row.ward_number == w,
        }
    }
}

pub fn grand_total<V: Measure>(rows: &[Observation<V>]) -> V {
    V::total(rows.iter().map(|r| r.value))
}

/// Sum of the category totals in a summary.
pub fn summary_total<V: Measure>(summary: &[CategorySummary<V>]) -> V {
    V::total(summary.iter().map(|c| c.total))
}

/// Tie-break between two category codes with equal totals.
pub fn category_order(registry: &CategoryRegistry, a: &str, b: &str) -> Ordering {
    match (registry.order_of(a), registry.order_of(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Totals per category for the rows inside `scope`, sorted for display.
pub fn aggregate_by_category<V: Measure>(
    rows: &[Observation<V>],
    registry: &CategoryRegistry,
    locale: Locale,
    scope: DenominatorScope,
) -> Vec<CategorySummary<V>> {
    summarize(rows.iter().filter(|r| scope.includes(*r)), registry, locale)
}

/// One summary per ward, ascending by ward number. Each ward's categories
/// carry ward-local percentages.
pub fn aggregate_by_ward<V: Measure>(
    rows: &[Observation<V>],
    registry: &CategoryRegistry,
    locale: Locale,
) -> Vec<WardSummary<V>> {
    let mut by_ward: BTreeMap<u32, Vec<&Observation<V>>> = BTreeMap::new();
    for r in rows {
        by_ward.entry(r.ward_number).or_default().push(r);
    }

    by_ward
        .into_iter()
        .map(|(ward_number, ward_rows)| {
            let by_category = summarize(ward_rows, registry, locale);
            let total = summary_total(&by_category);
            WardSummary { ward_number, by_category, total }
        })
        .collect()
}

fn summarize<'a, V, I>(rows: I, registry: &CategoryRegistry, locale: Locale) -> Vec<CategorySummary<V>>
where
    V: Measure + 'a,
    I: IntoIterator<Item = &'a Observation<V>>,
{
    #[derive(Default)]
    struct Acc<V> {
        total: V,
        secondary: Option<V>,
    }

    let mut map: HashMap<&str, Acc<V>> = HashMap::new();
    for r in rows {
        let e = map.entry(r.category.as_str()).or_default();
        e.total = e.total.accumulate(r.value);
        if let Some(s) = r.secondary_value {
            e.secondary = Some(e.secondary.unwrap_or_default().accumulate(s));
        }
    }

    let denominator = V::total(map.values().map(|a| a.total));
    let denominator = denominator.to_f64();

    let mut summaries: Vec<CategorySummary<V>> = map
        .into_iter()
        .map(|(code, acc)| CategorySummary {
            category: code.to_string(),
            label: registry.label(code, locale),
            total: acc.total,
            secondary_total: acc.secondary,
            percentage: percentage(acc.total.to_f64(), denominator),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| category_order(registry, &a.category, &b.category))
    });
    summaries
}
