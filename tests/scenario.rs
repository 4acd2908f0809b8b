use std::num::NonZeroUsize;

use ward_profile::aggregate::{aggregate_by_category, aggregate_by_ward, DenominatorScope};
use ward_profile::chart::{to_bar_data, to_pie_data};
use ward_profile::datasets::DatasetKind;
use ward_profile::filter::{filter_rows, RowFilter};
use ward_profile::format::{to_percentage, Locale};
use ward_profile::loader::load_from_reader;
use ward_profile::observation::Observation;
use ward_profile::registry::CategoryRegistry;
use ward_profile::report::{build_report, ReportOptions};
use ward_profile::topn::reduce_top_n;

fn language() -> &'static CategoryRegistry {
    DatasetKind::Language.registry()
}

fn scenario_rows() -> Vec<Observation<u64>> {
    vec![
        Observation::new(1, "NEPALI", 100),
        Observation::new(1, "MAITHILI", 50),
        Observation::new(2, "NEPALI", 30),
    ]
}

fn survey_rows() -> Vec<Observation<u64>> {
    let codes = ["NEPALI", "MAITHILI", "BHOJPURI", "THARU", "TAMANG", "NEWAR", "MAGAR", "RAI"];
    let mut rows = Vec::new();
    for ward in 1..=9u32 {
        for (i, code) in codes.iter().enumerate() {
            let value = u64::from(ward) * 37 % 101 + (i as u64) * 13 % 29;
            if (ward as usize + i) % 4 != 0 {
                rows.push(Observation::new(ward, *code, value));
            }
        }
    }
    rows
}

#[test]
fn concrete_scenario() {
    let rows = scenario_rows();

    let global = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global);
    assert_eq!(global.len(), 2);
    assert_eq!((global[0].category.as_str(), global[0].total), ("NEPALI", 130));
    assert_eq!((global[1].category.as_str(), global[1].total), ("MAITHILI", 50));
    assert_eq!(to_percentage(130.0, 180.0, 2), "72.22");
    assert_eq!(to_percentage(50.0, 180.0, 2), "27.78");

    let wards = aggregate_by_ward(&rows, language(), Locale::En);
    let ward1 = &wards[0];
    assert_eq!(ward1.ward_number, 1);
    assert_eq!(ward1.total, 150);
    assert_eq!(to_percentage(ward1.by_category[0].total as f64, ward1.total as f64, 2), "66.67");
    assert_eq!(to_percentage(ward1.by_category[1].total as f64, ward1.total as f64, 2), "33.33");

    let view = reduce_top_n(&global, NonZeroUsize::MIN, Locale::En);
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].category, "NEPALI");
    assert_eq!(view.entries[0].value, 130);
    assert_eq!(view.other.as_ref().map(|o| o.value), Some(50));
}

#[test]
fn percentages_sum_to_one_hundred() {
    let rows = survey_rows();
    let global = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global);
    let total: u64 = global.iter().map(|c| c.total).sum();
    let sum: f64 = global
        .iter()
        .map(|c| to_percentage(c.total as f64, total as f64, 2).parse::<f64>().unwrap())
        .sum();
    assert!((sum - 100.0).abs() <= 0.01 * global.len() as f64, "sum was {sum}");
}

#[test]
fn top_n_conserves_values() {
    let rows = survey_rows();
    let global = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global);
    let total: u64 = global.iter().map(|c| c.total).sum();
    for n in 1..=10 {
        let view = reduce_top_n(&global, NonZeroUsize::new(n).unwrap(), Locale::En);
        let sum: u64 = view.entries.iter().map(|e| e.value).sum::<u64>()
            + view.other.as_ref().map_or(0, |o| o.value);
        assert_eq!(sum, total);
        assert_eq!(view.other.is_some(), global.len() > n);
    }
}

#[test]
fn ward_and_category_totals_agree() {
    let rows = survey_rows();
    let global = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global);
    let wards = aggregate_by_ward(&rows, language(), Locale::En);
    let by_category: u64 = global.iter().map(|c| c.total).sum();
    let by_ward: u64 = wards.iter().map(|w| w.total).sum();
    assert_eq!(by_category, by_ward);
    for w in &wards {
        let scoped = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Ward(w.ward_number));
        assert_eq!(scoped, w.by_category);
    }
}

#[test]
fn empty_input_is_safe() {
    let rows: Vec<Observation<u64>> = Vec::new();
    assert!(aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global).is_empty());
    assert!(aggregate_by_ward(&rows, language(), Locale::En).is_empty());
    assert_eq!(to_percentage(0.0, 0.0, 2), "0.00");
    let options = ReportOptions::for_dataset(DatasetKind::Language.spec());
    let report = build_report(&rows, DatasetKind::Language.spec(), language(), &options);
    assert_eq!(report.total, 0);
    assert!(report.pie.is_empty());
}

#[test]
fn filter_is_idempotent() {
    let rows = survey_rows();
    let f = RowFilter::ward(3);
    let once = filter_rows(&rows, &f);
    assert_eq!(filter_rows(&once, &f), once);
    assert!(once.iter().all(|r| r.ward_number == 3));
}

#[test]
fn unknown_category_falls_back() {
    let mut rows = scenario_rows();
    rows.push(Observation::new(2, "KLINGON", 7));
    let global = aggregate_by_category(&rows, language(), Locale::En, DenominatorScope::Global);
    let klingon = global.iter().find(|c| c.category == "KLINGON").unwrap();
    assert_eq!(klingon.label, "KLINGON");

    let view = reduce_top_n(&global, NonZeroUsize::new(5).unwrap(), Locale::En);
    let pie = to_pie_data(&view, language());
    let slice = pie.iter().find(|s| s.id == "KLINGON").unwrap();
    assert!(!slice.color.is_empty());
    assert_eq!(pie, to_pie_data(&view, language()));

    let bar = to_bar_data(&aggregate_by_ward(&rows, language(), Locale::En), language(), Locale::En);
    assert!(bar.keys.iter().any(|k| k.id == "KLINGON" && !k.color.is_empty()));
}

#[test]
fn csv_to_report_pipeline() {
    let csv = "wardNumber,religionType,population\n\
               1,HINDU,400\n\
               1,BUDDHIST,100\n\
               2,HINDU,250\n\
               2,KIRANT,,\n\
               2,CHRISTIAN,50\n";
    let kind = DatasetKind::Religion;
    let (rows, load) = load_from_reader::<u64, _>(csv.as_bytes(), kind.spec()).unwrap();
    assert_eq!(load.skipped_rows, 1);

    let options = ReportOptions {
        top_n: NonZeroUsize::new(2).unwrap(),
        ..ReportOptions::for_dataset(kind.spec())
    };
    let report = build_report(&rows, kind.spec(), kind.registry(), &options);
    assert_eq!(report.total, 800);
    assert_eq!(report.top_n.entries[0].label, "Hindu");
    assert_eq!(report.top_n.other.as_ref().map(|o| o.value), Some(50));
    assert_eq!(report.ward_charts.len(), 2);
    assert_eq!(report.bar.keys.len(), 3);
}

#[test]
fn huge_counts_saturate_instead_of_panicking() {
    let csv = "wardNumber,languageType,population\n\
               1,NEPALI,18446744073709551615\n\
               2,NEPALI,1\n\
               2,MAITHILI,5\n";
    let kind = DatasetKind::Language;
    let (rows, load) = load_from_reader::<u64, _>(csv.as_bytes(), kind.spec()).unwrap();
    assert_eq!(load.loaded_rows, 3);

    let report = build_report(&rows, kind.spec(), kind.registry(), &ReportOptions::for_dataset(kind.spec()));
    assert_eq!(report.total, u64::MAX);
    assert_eq!(report.overall[0].total, u64::MAX);
    assert_eq!(report.bar.rows.len(), 2);
    assert_eq!(report.bar.rows[1].values["NEPALI"], 1);
}
