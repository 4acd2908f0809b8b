// Ward / category selection shared by every table and chart on a page.
//
// Selectors are explicit values passed in by the view layer; nothing here
// holds selection state.
use crate::error::ProfileError;
use crate::observation::Observation;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted by both selectors for "no filtering".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WardSelection {
    #[default]
    All,
    Ward(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    All,
    Category(String),
}

impl FromStr for WardSelection {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        match s.parse::<u32>() {
            Ok(w) if w > 0 => Ok(Self::Ward(w)),
            _ => Err(ProfileError::InvalidSelection {
                value: s.to_string(),
                message: "ward must be a positive integer or 'all'".to_string(),
            }),
        }
    }
}

impl FromStr for CategorySelection {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            Ok(Self::Category(s.to_string()))
        }
    }
}

impl fmt::Display for WardSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL}"),
            Self::Ward(w) => write!(f, "{w}"),
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL}"),
            Self::Category(c) => write!(f, "{c}"),
        }
    }
}

/// A ward and a category selection applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub ward: WardSelection,
    pub category: CategorySelection,
}

impl RowFilter {
    pub fn ward(ward_number: u32) -> Self {
        Self { ward: WardSelection::Ward(ward_number), ..Self::default() }
    }

    pub fn category(code: impl Into<String>) -> Self {
        Self { category: CategorySelection::Category(code.into()), ..Self::default() }
    }

    pub fn is_all(&self) -> bool {
        self.ward == WardSelection::All && self.category == CategorySelection::All
    }

    pub fn matches<V>(&self, row: &Observation<V>) -> bool {
        let ward_ok = match self.ward {
            WardSelection::All => true,
            WardSelection::Ward(w) => row.ward_number == w,
        };
        let category_ok = match &self.category {
            CategorySelection::All => true,
            CategorySelection::Category(c) => &row.category == c,
        };
        ward_ok && category_ok
    }

    /// Filter equivalent to applying `self` and then `other`. Returns `None`
    /// when the two pin different wards or categories, since nothing can
    /// match both.
    pub fn and(&self, other: &Self) -> Option<Self> {
        let ward = match (self.ward, other.ward) {
            (WardSelection::All, w) | (w, WardSelection::All) => w,
            (WardSelection::Ward(a), WardSelection::Ward(b)) if a == b => WardSelection::Ward(a),
            _ => return None,
        };
        let category = match (&self.category, &other.category) {
            (CategorySelection::All, c) | (c, CategorySelection::All) => c.clone(),
            (CategorySelection::Category(a), CategorySelection::Category(b)) if a == b => {
                CategorySelection::Category(a.clone())
            }
            _ => return None,
        };
        Some(Self { ward, category })
    }
}

pub fn filter_rows<V: Clone>(rows: &[Observation<V>], filter: &RowFilter) -> Vec<Observation<V>> {
    if filter.is_all() {
        return rows.to_vec();
    }
    let out: Vec<Observation<V>> = rows.iter().filter(|r| filter.matches(*r)).cloned().collect();
    log::debug!(
        "Filter ward={} category={} kept {} of {} rows",
        filter.ward,
        filter.category,
        out.len(),
        rows.len()
    );
    out
}

/// Distinct ward numbers present, ascending.
pub fn available_wards<V>(rows: &[Observation<V>]) -> Vec<u32> {
    rows.iter().map(|r| r.ward_number).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Distinct category codes present, ascending.
pub fn available_categories<V>(rows: &[Observation<V>]) -> Vec<String> {
    rows.iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
