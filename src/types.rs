use serde::Serialize;
use tabled::Tabled;

/// Total for one category across the rows it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary<V> {
    pub category: String,
    pub label: String,
    pub total: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_total: Option<V>,
    /// Share of the denominator chosen when aggregating, unrounded.
    pub percentage: f64,
}

/// One ward's totals broken down by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardSummary<V> {
    pub ward_number: u32,
    pub by_category: Vec<CategorySummary<V>>,
    pub total: V,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNEntry<V> {
    pub category: String,
    pub label: String,
    pub value: V,
    pub percentage: f64,
}

/// The largest N categories plus, if anything is left, an "other" bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopNView<V> {
    pub entries: Vec<TopNEntry<V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<TopNEntry<V>>,
    pub total: V,
}

impl<V> TopNView<V> {
    /// Entries followed by the other bucket, in display order.
    pub fn iter_all(&self) -> impl Iterator<Item = &TopNEntry<V>> {
        self.entries.iter().chain(self.other.iter())
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SummaryTableRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Secondary")]
    #[tabled(rename = "Secondary")]
    pub secondary: String,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct WardTableRow {
    #[serde(rename = "Ward")]
    #[tabled(rename = "Ward")]
    pub ward: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "WardShare")]
    #[tabled(rename = "WardShare")]
    pub ward_share: String,
    #[serde(rename = "WardTotal")]
    #[tabled(rename = "WardTotal")]
    pub ward_total: String,
}
