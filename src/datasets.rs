//! Built-in datasets: field-accessor configuration and category registries.
//!
//! Each dataset is described by a [`DatasetSpec`] telling the loader which
//! columns hold the category and value, and which numeric type the values
//! sum as. Registries are built once on first use.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::ProfileError;
use crate::registry::{CategoryEntry, CategoryRegistry};

/// Column holding the ward number in every dataset.
pub const WARD_FIELD: &str = "wardNumber";
/// Optional row id column.
pub const ID_FIELD: &str = "id";

const PALETTE: [&str; 12] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B",
    "#E377C2", "#7F7F7F", "#BCBD22", "#17BECF", "#393B79", "#637939",
];

/// Whether values sum as integers or decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    Count,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    Language,
    Religion,
    IncomeSource,
    TimeSpent,
    AgeGroup,
    Spice,
}

impl DatasetKind {
    pub const ALL: [Self; 6] = [
        Self::Language,
        Self::Religion,
        Self::IncomeSource,
        Self::TimeSpent,
        Self::AgeGroup,
        Self::Spice,
    ];

    pub fn spec(self) -> &'static DatasetSpec {
        match self {
            Self::Language => &LANGUAGE,
            Self::Religion => &RELIGION,
            Self::IncomeSource => &INCOME_SOURCE,
            Self::TimeSpent => &TIME_SPENT,
            Self::AgeGroup => &AGE_GROUP,
            Self::Spice => &SPICE,
        }
    }

    pub fn registry(self) -> &'static CategoryRegistry {
        match self {
            Self::Language => &LANGUAGE_REGISTRY,
            Self::Religion => &RELIGION_REGISTRY,
            Self::IncomeSource => &INCOME_SOURCE_REGISTRY,
            Self::TimeSpent => &TIME_SPENT_REGISTRY,
            Self::AgeGroup => &AGE_GROUP_REGISTRY,
            Self::Spice => &SPICE_REGISTRY,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Language => write!(f, "language"),
            Self::Religion => write!(f, "religion"),
            Self::IncomeSource => write!(f, "income-source"),
            Self::TimeSpent => write!(f, "time-spent"),
            Self::AgeGroup => write!(f, "age-group"),
            Self::Spice => write!(f, "spice"),
        }
    }
}

impl FromStr for DatasetKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.to_string() == wanted)
            .ok_or_else(|| ProfileError::UnknownDataset(s.to_string()))
    }
}

/// Field-accessor configuration for one dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    pub kind: DatasetKind,
    pub title: &'static str,
    pub category_field: &'static str,
    pub value_field: &'static str,
    pub secondary_field: Option<&'static str>,
    /// Column heading for the value in tables, e.g. "Population".
    pub value_label: &'static str,
    pub secondary_label: Option<&'static str>,
    pub measure: MeasureKind,
    default_top_n: usize,
}

impl DatasetSpec {
    /// Number of categories shown before the rest fold into "other".
    pub fn default_top_n(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.default_top_n).unwrap_or(NonZeroUsize::MIN)
    }
}

fn entries(items: &[(&str, &str, &str)]) -> CategoryRegistry {
    CategoryRegistry::new(
        items
            .iter()
            .enumerate()
            .map(|(i, (code, en, ne))| CategoryEntry::new(code, en, ne, PALETTE[i % PALETTE.len()])),
    )
}

static LANGUAGE: DatasetSpec = DatasetSpec {
    kind: DatasetKind::Language,
    title: "Population by Mother Tongue",
    category_field: "languageType",
    value_field: "population",
    secondary_field: None,
    value_label: "Population",
    secondary_label: None,
    measure: MeasureKind::Count,
    default_top_n: 6,
};

static RELIGION: DatasetSpec = DatasetSpec {
    kind: DatasetKind::Religion,
    title: "Population by Religion",
    category_field: "religionType",
    value_field: "population",
    secondary_field: None,
    value_label: "Population",
    secondary_label: None,
    measure: MeasureKind::Count,
    default_top_n: 5,
};

static INCOME_SOURCE: DatasetSpec = DatasetSpec {
    kind: DatasetKind::IncomeSource,
    title: "Households by Main Income Source",
    category_field: "incomeSource",
    value_field: "households",
    secondary_field: None,
    value_label: "Households",
    secondary_label: None,
    measure: MeasureKind::Count,
    default_top_n: 7,
};

static TIME_SPENT: DatasetSpec = DatasetSpec {
    kind: DatasetKind::TimeSpent,
    title: "Population by Time Spent on Household Chores",
    category_field: "timeSpent",
    value_field: "population",
    secondary_field: None,
    value_label: "Population",
    secondary_label: None,
    measure: MeasureKind::Count,
    default_top_n: 5,
};

static AGE_GROUP: DatasetSpec = DatasetSpec {
    kind: DatasetKind::AgeGroup,
    title: "Population by Age Group",
    category_field: "ageGroup",
    value_field: "population",
    secondary_field: None,
    value_label: "Population",
    secondary_label: None,
    measure: MeasureKind::Count,
    default_top_n: 10,
};

static SPICE: DatasetSpec = DatasetSpec {
    kind: DatasetKind::Spice,
    title: "Spice Production and Sales",
    category_field: "spiceType",
    value_field: "productionInTonnes",
    secondary_field: Some("salesInTonnes"),
    value_label: "Production (t)",
    secondary_label: Some("Sales (t)"),
    measure: MeasureKind::Decimal,
    default_top_n: 6,
};

static LANGUAGE_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("NEPALI", "Nepali", "नेपाली"),
        ("MAITHILI", "Maithili", "मैथिली"),
        ("BHOJPURI", "Bhojpuri", "भोजपुरी"),
        ("THARU", "Tharu", "थारु"),
        ("TAMANG", "Tamang", "तामाङ"),
        ("NEWAR", "Newar", "नेवार"),
        ("MAGAR", "Magar", "मगर"),
        ("RAI", "Rai", "राई"),
        ("LIMBU", "Limbu", "लिम्बु"),
        ("GURUNG", "Gurung", "गुरुङ"),
        ("SHERPA", "Sherpa", "शेर्पा"),
        ("OTHER", "Other", "अन्य"),
    ])
});

static RELIGION_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("HINDU", "Hindu", "हिन्दु"),
        ("BUDDHIST", "Buddhist", "बौद्ध"),
        ("KIRANT", "Kirant", "किरात"),
        ("CHRISTIAN", "Christian", "क्रिश्चियन"),
        ("ISLAM", "Islam", "इस्लाम"),
        ("NATURE", "Nature", "प्रकृति"),
        ("BON", "Bon", "बोन"),
        ("JAIN", "Jain", "जैन"),
        ("BAHAI", "Bahai", "बहाई"),
        ("SIKH", "Sikh", "सिख"),
        ("OTHER", "Other", "अन्य"),
    ])
});

static INCOME_SOURCE_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("AGRICULTURE", "Agriculture", "कृषि"),
        ("BUSINESS", "Business", "व्यापार"),
        ("JOB", "Job", "जागिर"),
        ("LABOUR", "Labour", "ज्याला मजदुरी"),
        ("FOREIGN_EMPLOYMENT", "Foreign Employment", "वैदेशिक रोजगार"),
        ("INDUSTRY", "Industry", "उद्योग"),
        ("OTHER", "Other", "अन्य"),
    ])
});

static TIME_SPENT_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("LESS_THAN_1_HOUR", "Less than 1 hour", "१ घण्टाभन्दा कम"),
        ("HOURS_1_TO_3", "1 to 3 hours", "१ देखि ३ घण्टा"),
        ("HOURS_4_TO_6", "4 to 6 hours", "४ देखि ६ घण्टा"),
        ("HOURS_7_TO_9", "7 to 9 hours", "७ देखि ९ घण्टा"),
        ("HOURS_10_TO_12", "10 to 12 hours", "१० देखि १२ घण्टा"),
        ("MORE_THAN_12_HOURS", "More than 12 hours", "१२ घण्टाभन्दा बढी"),
    ])
});

static AGE_GROUP_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("AGE_0_4", "0-4 years", "०-४ वर्ष"),
        ("AGE_5_9", "5-9 years", "५-९ वर्ष"),
        ("AGE_10_14", "10-14 years", "१०-१४ वर्ष"),
        ("AGE_15_19", "15-19 years", "१५-१९ वर्ष"),
        ("AGE_20_24", "20-24 years", "२०-२४ वर्ष"),
        ("AGE_25_29", "25-29 years", "२५-२९ वर्ष"),
        ("AGE_30_34", "30-34 years", "३०-३४ वर्ष"),
        ("AGE_35_39", "35-39 years", "३५-३९ वर्ष"),
        ("AGE_40_44", "40-44 years", "४०-४४ वर्ष"),
        ("AGE_45_49", "45-49 years", "४५-४९ वर्ष"),
        ("AGE_50_54", "50-54 years", "५०-५४ वर्ष"),
        ("AGE_55_59", "55-59 years", "५५-५९ वर्ष"),
        ("AGE_60_64", "60-64 years", "६०-६४ वर्ष"),
        ("AGE_65_69", "65-69 years", "६५-६९ वर्ष"),
        ("AGE_70_74", "70-74 years", "७०-७४ वर्ष"),
        ("AGE_75_AND_ABOVE", "75 years and above", "७५ वर्ष र माथि"),
    ])
});

static SPICE_REGISTRY: Lazy<CategoryRegistry> = Lazy::new(|| {
    entries(&[
        ("GARLIC", "Garlic", "लसुन"),
        ("TURMERIC", "Turmeric", "बेसार"),
        ("CHILLY_PEPPER", "Chilly Pepper", "खुर्सानी"),
        ("GINGER", "Ginger", "अदुवा"),
        ("CORIANDER", "Coriander", "धनिया"),
        ("SICHUAN_PEPPER", "Sichuan Pepper", "टिमुर"),
        ("BLACK_PEPPER", "Black Pepper", "मरिच"),
        ("CINNAMOMUM_TAMALA", "Bay Leaf", "तेजपात"),
        ("CUMIN", "Cumin", "जीरा"),
        ("FENUGREEK", "Fenugreek", "मेथी"),
        ("OTHER", "Other", "अन्य"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Locale;

    #[test]
    fn dataset_names_round_trip_through_display() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.to_string().parse::<DatasetKind>().ok(), Some(kind));
        }
        assert!("weather".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn every_dataset_has_a_registry() {
        for kind in DatasetKind::ALL {
            assert!(!kind.registry().is_empty(), "{kind} registry is empty");
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn spice_is_measured_in_decimals() {
        let spec = DatasetKind::Spice.spec();
        assert_eq!(spec.measure, MeasureKind::Decimal);
        assert_eq!(spec.secondary_field, Some("salesInTonnes"));
        assert_eq!(DatasetKind::Language.spec().measure, MeasureKind::Count);
    }

    #[test]
    fn registered_colors_are_distinct_within_palette() {
        let r = DatasetKind::Religion.registry();
        assert_ne!(r.color("HINDU"), r.color("BUDDHIST"));
        assert_eq!(r.label("HINDU", Locale::Ne), "हिन्दु");
    }

    #[test]
    fn default_top_n_matches_dataset() {
        assert_eq!(DatasetKind::Religion.spec().default_top_n().get(), 5);
        assert_eq!(DatasetKind::AgeGroup.spec().default_top_n().get(), 10);
    }
}
