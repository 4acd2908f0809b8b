// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the dataset CSV, printing diagnostics.
// - Option [2] builds the report, previews its tables and writes the
//   CSV/JSON outputs.
// - Option [3] changes the ward filter used by the next report.
// With `--batch`, options 1 and 2 run once and the program exits.
use clap::Parser;
use once_cell::sync::Lazy;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::{Mutex, MutexGuard, PoisonError};
use ward_profile::config::Cli;
use ward_profile::datasets::MeasureKind;
use ward_profile::filter::{available_wards, WardSelection};
use ward_profile::format::format_int;
use ward_profile::loader::{self, LoadReport};
use ward_profile::observation::{Measure, Observation};
use ward_profile::output;
use ward_profile::report::{build_report, summary_table, ward_table, ReportOptions};
use ward_profile::CategoryRegistry;

// Rows are loaded once and can be reported on repeatedly in one run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    rows: Option<LoadedRows>,
    ward: WardSelection,
}

#[derive(Clone)]
enum LoadedRows {
    Count(Vec<Observation<u64>>),
    Decimal(Vec<Observation<f64>>),
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads one trimmed line, or `None` once input is closed or unreadable.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            log::error!("Failed to read input: {e}");
            None
        }
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N` or
/// input ended.
fn prompt_back_to_menu<R: BufRead>(input: &mut R) -> bool {
    loop {
        let Some(answer) = read_line(input, "Back to Report Selection (Y/N): ") else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    if report.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped due to missing ward, category or value.",
            format_int(report.skipped_rows)
        );
    }
    if report.duplicate_rows > 0 {
        println!(
            "Note: {} duplicate ward/category rows ignored.",
            format_int(report.duplicate_rows)
        );
    }
    println!();
}

/// Option [1]: load the CSV named on the command line into `APP_STATE`.
fn handle_load(cli: &Cli) -> ward_profile::Result<()> {
    let spec = cli.dataset.spec();
    let rows = match spec.measure {
        MeasureKind::Count => {
            let (rows, report) = loader::load_and_clean::<u64>(&cli.input, spec)?;
            print_load_report(&report);
            LoadedRows::Count(rows)
        }
        MeasureKind::Decimal => {
            let (rows, report) = loader::load_and_clean::<f64>(&cli.input, spec)?;
            print_load_report(&report);
            LoadedRows::Decimal(rows)
        }
    };
    state().rows = Some(rows);
    Ok(())
}

fn generate<V: Measure>(
    rows: &[Observation<V>],
    cli: &Cli,
    registry: &CategoryRegistry,
    options: &ReportOptions,
) -> ward_profile::Result<()> {
    let spec = cli.dataset.spec();
    let report = build_report(rows, spec, registry, options);

    println!("Generating reports...\n");
    if report.is_empty() {
        println!("No data available for ward {}.\n", options.filter.ward);
        return Ok(());
    }

    output::preview_table(
        spec.title,
        Some(&format!("Top {} shown in charts", options.top_n)),
        &summary_table(&report),
        cli.preview_rows,
    );
    output::preview_table("By Ward", None, &ward_table(&report), cli.preview_rows);
    for line in &report.narrative {
        println!("{line}");
    }
    println!();

    let today = chrono::Local::now().date_naive();
    let written = output::write_report_files(&report, &cli.out_dir, today)?;
    for path in written {
        println!("(Exported {})", path.display());
    }
    println!();
    Ok(())
}

/// Option [2]: build and write the report for the loaded rows.
fn handle_generate_reports(cli: &Cli) -> ward_profile::Result<()> {
    let (rows, ward) = {
        let st = state();
        (st.rows.clone(), st.ward)
    };
    let Some(rows) = rows else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };

    let registry = cli.load_registry()?;
    let mut options = cli.report_options();
    options.filter.ward = ward;

    match rows {
        LoadedRows::Count(rows) => generate(&rows, cli, &registry, &options),
        LoadedRows::Decimal(rows) => generate(&rows, cli, &registry, &options),
    }
}

/// Option [3]: pick the ward for the next report.
fn handle_change_ward<R: BufRead>(input: &mut R) {
    let wards = match &state().rows {
        Some(LoadedRows::Count(rows)) => available_wards(rows),
        Some(LoadedRows::Decimal(rows)) => available_wards(rows),
        None => Vec::new(),
    };
    if !wards.is_empty() {
        let list: Vec<String> = wards.iter().map(u32::to_string).collect();
        println!("Wards with data: {}", list.join(", "));
    }
    let Some(answer) = read_line(input, "Ward number (or 'all'): ") else {
        return;
    };
    match answer.parse::<WardSelection>() {
        Ok(ward) => {
            state().ward = ward;
            println!("Ward filter set to {ward}.\n");
        }
        Err(e) => println!("{e}\n"),
    }
}

fn run_batch(cli: &Cli) -> ward_profile::Result<()> {
    handle_load(cli)?;
    handle_generate_reports(cli)
}

fn run_menu<R: BufRead>(cli: &Cli, input: &mut R) {
    loop {
        println!("Select Option:");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Change Ward Filter\n");
        let Some(choice) = read_line(input, "Enter choice: ") else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = handle_load(cli) {
                    eprintln!("Failed to load file: {e}\n");
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(cli) {
                    eprintln!("Report error: {e}\n");
                }
                if !prompt_back_to_menu(input) {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_change_ward(input),
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();
    state().ward = cli.ward;

    if cli.batch {
        if let Err(e) = run_batch(&cli) {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    } else {
        run_menu(&cli, &mut io::stdin().lock());
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_trims_and_stops_at_end_of_input() {
        let mut input = Cursor::new("  2 \n");
        assert_eq!(read_line(&mut input, "").as_deref(), Some("2"));
        assert_eq!(read_line(&mut input, ""), None);
        assert_eq!(read_line(&mut input, ""), None);
    }

    #[test]
    fn back_to_menu_answers() {
        assert!(prompt_back_to_menu(&mut Cursor::new("maybe\ny\n")));
        assert!(!prompt_back_to_menu(&mut Cursor::new("N\n")));
        assert!(!prompt_back_to_menu(&mut Cursor::new("x\n")));
        assert!(!prompt_back_to_menu(&mut Cursor::new("")));
    }

    #[test]
    fn menu_exits_when_input_closes() {
        let cli = Cli::try_parse_from(["ward-profile", "-i", "missing.csv"]).unwrap();
        run_menu(&cli, &mut Cursor::new("9\n3\n"));
        run_menu(&cli, &mut Cursor::new(""));
    }
}
