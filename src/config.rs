//! Command-line configuration.

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::datasets::DatasetKind;
use crate::error::Result;
use crate::filter::{CategorySelection, RowFilter, WardSelection};
use crate::format::Locale;
use crate::registry::CategoryRegistry;
use crate::report::ReportOptions;

#[derive(Debug, Clone, Parser)]
#[command(name = "ward-profile", about = "Ward-level statistics reports for a municipal profile")]
pub struct Cli {
    /// CSV file with one row per ward and category
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = DatasetKind::Language)]
    pub dataset: DatasetKind,

    /// Ward number, or "all"
    #[arg(long, default_value = "all")]
    pub ward: WardSelection,

    /// Category code, or "all"
    #[arg(long, default_value = "all")]
    pub category: CategorySelection,

    /// Categories shown before the rest fold into "other" (dataset default if unset)
    #[arg(long)]
    pub top_n: Option<NonZeroUsize>,

    #[arg(long, value_enum, default_value_t = Locale::En)]
    pub locale: Locale,

    #[arg(long, default_value = "reports")]
    pub out_dir: PathBuf,

    /// TOML file replacing the dataset's built-in category registry
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Load and generate once, without the interactive menu
    #[arg(long)]
    pub batch: bool,

    /// Table rows printed to the console per report
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,
}

impl Cli {
    pub fn filter(&self) -> RowFilter {
        RowFilter {
            ward: self.ward,
            category: self.category.clone(),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        let spec = self.dataset.spec();
        ReportOptions {
            top_n: self.top_n.unwrap_or_else(|| spec.default_top_n()),
            locale: self.locale,
            filter: self.filter(),
        }
    }

    /// The override registry if one was given, else the built-in one.
    pub fn load_registry(&self) -> Result<CategoryRegistry> {
        match &self.registry {
            Some(path) => CategoryRegistry::from_toml_file(path),
            None => Ok(self.dataset.registry().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let cli = Cli::try_parse_from(["ward-profile", "--input", "rows.csv"]).unwrap();
        assert_eq!(cli.dataset, DatasetKind::Language);
        assert!(cli.filter().is_all());
        assert_eq!(cli.report_options().top_n.get(), 6);
        assert_eq!(cli.locale, Locale::En);
        assert!(!cli.batch);
    }

    #[test]
    fn parses_selections() {
        let cli = Cli::try_parse_from([
            "ward-profile", "-i", "rows.csv", "-d", "income-source", "--ward", "3",
            "--category", "AGRICULTURE", "--top-n", "4", "--locale", "ne", "--batch",
        ])
        .unwrap();
        assert_eq!(cli.dataset, DatasetKind::IncomeSource);
        assert_eq!(cli.filter(), RowFilter {
            ward: WardSelection::Ward(3),
            category: CategorySelection::Category("AGRICULTURE".into()),
        });
        let options = cli.report_options();
        assert_eq!(options.top_n.get(), 4);
        assert_eq!(options.locale, Locale::Ne);
    }

    #[test]
    fn rejects_zero_top_n_and_bad_ward() {
        assert!(Cli::try_parse_from(["ward-profile", "-i", "x.csv", "--top-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["ward-profile", "-i", "x.csv", "--ward", "zero"]).is_err());
    }

    #[test]
    fn builtin_registry_without_override() {
        let cli = Cli::try_parse_from(["ward-profile", "-i", "x.csv", "-d", "spice"]).unwrap();
        let registry = cli.load_registry().unwrap();
        assert!(registry.contains("GINGER"));
    }
}
