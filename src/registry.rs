//! Category registry: display labels and colors per category code.
//!
//! A registry is plain configuration handed in by the caller. The
//! aggregation code has no knowledge of any particular dataset's
//! categories; it only asks the registry for a label, a color and a
//! declaration index to break ties.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::format::Locale;

/// Color for the synthesized "other" bucket.
pub const OTHER_COLOR: &str = "#9CA3AF";

/// Display metadata for one category code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ne: Option<String>,
    pub color: String,
}

impl CategoryEntry {
    pub fn new(code: &str, label: &str, label_ne: &str, color: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
            label_ne: Some(label_ne.to_string()),
            color: color.to_string(),
        }
    }
}

/// Ordered set of category entries with lookup by code.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    entries: Vec<CategoryEntry>,
    index: HashMap<String, usize>,
}

/// On-disk shape of a registry override.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "category")]
    categories: Vec<CategoryEntry>,
}

impl CategoryRegistry {
    /// Build a registry. A code declared twice keeps its first position but
    /// takes the later label and color.
    pub fn new(entries: impl IntoIterator<Item = CategoryEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            match registry.index.get(&entry.code) {
                Some(&pos) => registry.entries[pos] = entry,
                None => {
                    registry.index.insert(entry.code.clone(), registry.entries.len());
                    registry.entries.push(entry);
                }
            }
        }
        registry
    }

    /// Parse a TOML registry made of `[[category]]` tables.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(s)?;
        Ok(Self::new(file.categories))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&s)?;
        log::info!(
            "Loaded {} categories from registry file {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn get(&self, code: &str) -> Option<&CategoryEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declaration index of `code`, or `None` if it isn't registered.
    pub fn order_of(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Localized label. Unregistered codes are shown as-is.
    pub fn label(&self, code: &str, locale: Locale) -> String {
        match self.get(code) {
            Some(entry) => match (locale, &entry.label_ne) {
                (Locale::Ne, Some(ne)) => ne.clone(),
                _ => entry.label.clone(),
            },
            None => code.to_string(),
        }
    }

    /// Registered color, or a stable generated one for unknown codes.
    pub fn color(&self, code: &str) -> String {
        match self.get(code) {
            Some(entry) => entry.color.clone(),
            None => {
                let color = fallback_color(code);
                log::debug!("No registered color for category '{code}', using {color}");
                color
            }
        }
    }
}

/// Deterministic color for a code missing from the registry: FNV-1a over
/// the code's bytes picks the hue, so a given code renders the same color
/// on every pass.
pub fn fallback_color(code: &str) -> String {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let hash = code
        .bytes()
        .fold(FNV_OFFSET, |h, b| (h ^ u32::from(b)).wrapping_mul(FNV_PRIME));
    format!("hsl({}, 65%, 55%)", hash % 360)
}
