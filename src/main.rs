// Console front end for the survey report.
//
// [1] loads the export once and prints a tally of kept and dropped rows.
// [2] writes the report CSVs and summary.json, previewing each report.
// The export path comes from SURVEY_CSV_PATH or the first argument.
use std::io::{self, Write};
use survey_report::dataset::SurveyStore;
use survey_report::{output, reports, util, SurveyConfig};
use serde::Serialize;
use tabled::Tabled;
use tracing::{error, info};

fn setup_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("survey_report=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(store: &SurveyStore) {
    if store.is_loaded() {
        println!(
            "Dataset already loaded ({} records).\n",
            util::format_int(store.data().len())
        );
        return;
    }
    match store.try_load() {
        Ok(records) => {
            let report = store.load_report();
            println!(
                "Processing survey... ({} rows read, {} valid records)",
                util::format_int(report.total_rows),
                util::format_int(records.len())
            );
            if report.dropped_rows() > 0 {
                println!(
                    "Note: {} rows skipped (missing ID: {}, missing segment: {}, no valid rating: {}, unreadable: {}).",
                    util::format_int(report.dropped_rows()),
                    util::format_int(report.missing_id),
                    util::format_int(report.missing_segment),
                    util::format_int(report.no_valid_metric),
                    util::format_int(report.parse_errors)
                );
            }
            println!();
        }
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn export<T>(title: &str, file: &str, rows: &[T], preview: usize)
where
    T: Tabled + Serialize + Clone,
{
    if let Err(e) = output::write_csv(file, rows) {
        eprintln!("Write error: {}", e);
    }
    println!("{}\n", title);
    output::preview_table_rows(rows, preview);
    println!("(Full table exported to {})\n", file);
}

fn handle_generate_reports(store: &SurveyStore) {
    if !store.is_loaded() {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    }

    println!("Generating reports...\n");

    let kpis = reports::kpi_report(&store.kpi_data());
    export("KPIs by Segment", "report_kpis.csv", &kpis, 6);

    let cities = reports::city_report(&store.city_data());
    export("Cities vs Global Average", "report_cities.csv", &cities, 5);

    let agencies = reports::agency_report(&store.agency_data());
    export("Agencies vs Global Average", "report_agencies.csv", &agencies, 5);

    let suggestions = reports::suggestion_report(&store.suggestion_data());
    export("Suggestion Categories", "report_suggestions.csv", &suggestions, 6);

    let executives = reports::executive_report(&store.executive_participation());
    export("Executive Participation", "report_executives.csv", &executives, 10);

    println!("Personas vs Empresarial\n");
    output::preview_table_rows(&reports::segment_gap_report(&store.segment_comparison()), 4);

    let summary = reports::generate_summary(store);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    info!(respondents = summary.total_respondents, "reports generated");
    println!("Summary Stats (summary.json):");
    let headline = reports::summary_headline(&summary);
    println!("{}\n", headline);
}

fn main() {
    setup_logging();

    let config = match SurveyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let config = match std::env::args().nth(1) {
        Some(path) => config.with_csv_path(path),
        None => config,
    };
    let store = SurveyStore::new(config);

    loop {
        println!("Survey Report ({})", store.config().csv_path);
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            println!();
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&store),
            "2" => {
                println!();
                handle_generate_reports(&store);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
