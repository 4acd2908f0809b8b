//! Chart data adapters.
//!
//! Reshape aggregated summaries into the structures pie and bar chart
//! primitives consume, attaching registry colors. Colors for unregistered
//! categories come from [`fallback_color`](crate::registry::fallback_color),
//! so re-rendering the same data never changes them.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::aggregate::category_order;
use crate::format::Locale;
use crate::observation::Measure;
use crate::registry::{CategoryRegistry, OTHER_COLOR};
use crate::topn::{is_other_code, OTHER_ID};
use crate::types::{TopNView, WardSummary};

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice<V> {
    pub id: String,
    pub label: String,
    pub value: V,
    pub color: String,
    pub percentage: f64,
}

/// Series metadata for a bar chart: one key per category column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarKey {
    pub id: String,
    pub label: String,
    pub color: String,
}

/// Key of the ward column in a serialized `BarRow`. No category may use it.
pub const WARD_KEY: &str = "ward";

/// One ward's bar. Serializes flat: `{"ward": 1, "NEPALI": 100, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow<V> {
    pub ward: u32,
    #[serde(flatten)]
    pub values: BTreeMap<String, V>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart<V> {
    pub keys: Vec<BarKey>,
    pub rows: Vec<BarRow<V>>,
}

pub fn to_pie_data<V: Measure>(view: &TopNView<V>, registry: &CategoryRegistry) -> Vec<PieSlice<V>> {
    view.iter_all()
        .map(|e| {
            let color = if e.category == OTHER_ID {
                registry
                    .entries()
                    .iter()
                    .find(|c| is_other_code(&c.code))
                    .map_or_else(|| OTHER_COLOR.to_string(), |c| c.color.clone())
            } else {
                registry.color(&e.category)
            };
            PieSlice {
                id: e.category.clone(),
                label: e.label.clone(),
                value: e.value,
                color,
                percentage: e.percentage,
            }
        })
        .collect()
}

/// One row per ward with a column for every category seen in any ward.
/// Categories a ward has no data for are filled with zero so every row has
/// the same keys. A category coded `ward` would shadow the ward column and
/// is left out.
pub fn to_bar_data<V: Measure>(
    wards: &[WardSummary<V>],
    registry: &CategoryRegistry,
    locale: Locale,
) -> BarChart<V> {
    let mut totals: HashMap<&str, V> = HashMap::new();
    for w in wards {
        for c in &w.by_category {
            if c.category == WARD_KEY {
                log::warn!("Ward {}: category code '{WARD_KEY}' is reserved, left out of bar data", w.ward_number);
                continue;
            }
            let t = totals.entry(c.category.as_str()).or_default();
            *t = t.accumulate(c.total);
        }
    }

    let mut codes: Vec<(&str, V)> = totals.into_iter().collect();
    codes.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| category_order(registry, a.0, b.0))
    });

    let keys: Vec<BarKey> = codes
        .iter()
        .map(|(code, _)| BarKey {
            id: (*code).to_string(),
            label: registry.label(code, locale),
            color: registry.color(code),
        })
        .collect();

    let rows = wards
        .iter()
        .map(|w| {
            let mut values: BTreeMap<String, V> =
                keys.iter().map(|k| (k.id.clone(), V::default())).collect();
            for c in w.by_category.iter().filter(|c| c.category != WARD_KEY) {
                values.insert(c.category.clone(), c.total);
            }
            BarRow { ward: w.ward_number, values }
        })
        .collect();

    BarChart { keys, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_by_ward;
    use crate::observation::Observation;
    use crate::registry::CategoryEntry;
    use crate::topn::reduce_top_n;
    use crate::types::CategorySummary;
    use std::num::NonZeroUsize;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::new([
            CategoryEntry::new("NEPALI", "Nepali", "नेपाली", "#1F77B4"),
            CategoryEntry::new("MAITHILI", "Maithili", "मैथिली", "#FF7F0E"),
        ])
    }

    fn rows() -> Vec<Observation<u64>> {
        vec![
            Observation::new(1, "NEPALI", 100),
            Observation::new(1, "MAITHILI", 50),
            Observation::new(2, "NEPALI", 30),
            Observation::new(2, "KLINGON", 5),
        ]
    }

    fn summary(items: &[(&str, u64)]) -> Vec<CategorySummary<u64>> {
        items
            .iter()
            .map(|(c, v)| CategorySummary {
                category: c.to_string(),
                label: c.to_string(),
                total: *v,
                secondary_total: None,
                percentage: 0.0,
            })
            .collect()
    }

    #[test]
    fn pie_uses_registry_and_fallback_colors() {
        let view = reduce_top_n(&summary(&[("NEPALI", 10), ("KLINGON", 5), ("MAITHILI", 1)]), NonZeroUsize::new(2).unwrap(), Locale::En);
        let pie = to_pie_data(&view, &registry());
        assert_eq!(pie.len(), 3);
        assert_eq!(pie[0].color, "#1F77B4");
        assert!(pie[1].color.starts_with("hsl("));
        assert_eq!(pie[2].id, OTHER_ID);
        assert_eq!(pie[2].color, OTHER_COLOR);
        assert_eq!(pie[2].value, 1);
    }

    #[test]
    fn pie_colors_are_stable_across_renders() {
        let view = reduce_top_n(&summary(&[("KLINGON", 5)]), NonZeroUsize::MIN, Locale::En);
        assert_eq!(to_pie_data(&view, &registry()), to_pie_data(&view, &registry()));
    }

    #[test]
    fn bar_rows_share_the_same_keys() {
        let wards = aggregate_by_ward(&rows(), &registry(), Locale::En);
        let chart = to_bar_data(&wards, &registry(), Locale::En);
        let ids: Vec<&str> = chart.keys.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["NEPALI", "MAITHILI", "KLINGON"]);
        assert_eq!(chart.rows.len(), 2);
        for row in &chart.rows {
            assert_eq!(row.values.len(), 3);
        }
        assert_eq!(chart.rows[0].values["KLINGON"], 0);
        assert_eq!(chart.rows[1].values["MAITHILI"], 0);
        assert_eq!(chart.rows[1].values["NEPALI"], 30);
    }

    #[test]
    fn bar_row_serializes_flat() {
        let wards = aggregate_by_ward(&rows()[..2], &registry(), Locale::En);
        let chart = to_bar_data(&wards, &registry(), Locale::En);
        let json = serde_json::to_value(&chart.rows[0]).unwrap();
        assert_eq!(json, serde_json::json!({"ward": 1, "NEPALI": 100, "MAITHILI": 50}));
    }

    #[test]
    fn reserved_ward_code_never_shadows_the_ward_column() {
        let rows = vec![
            Observation::new(1, "NEPALI", 100),
            Observation::new(1, "MAITHILI", 50),
            Observation::new(1, WARD_KEY, 9),
        ];
        let wards = aggregate_by_ward(&rows, &registry(), Locale::En);
        let chart = to_bar_data(&wards, &registry(), Locale::En);
        assert!(chart.keys.iter().all(|k| k.id != WARD_KEY));
        let json = serde_json::to_value(&chart.rows[0]).unwrap();
        assert_eq!(json, serde_json::json!({"ward": 1, "NEPALI": 100, "MAITHILI": 50}));
    }

    #[test]
    fn registered_other_color_is_used_for_the_bucket() {
        let mut entries = registry().entries().to_vec();
        entries.push(CategoryEntry::new("OTHER", "Other", "अन्य", "#123456"));
        let registry = CategoryRegistry::new(entries);
        let view = reduce_top_n(&summary(&[("NEPALI", 10), ("OTHER", 4), ("MAITHILI", 1)]), NonZeroUsize::MIN, Locale::En);
        let pie = to_pie_data(&view, &registry);
        assert_eq!(pie.len(), 2);
        assert_eq!(pie[1].id, OTHER_ID);
        assert_eq!(pie[1].value, 5);
        assert_eq!(pie[1].color, "#123456");
    }

    #[test]
    fn empty_wards_give_empty_chart() {
        let chart = to_bar_data::<u64>(&[], &registry(), Locale::En);
        assert!(chart.keys.is_empty());
        assert!(chart.rows.is_empty());
    }
}
