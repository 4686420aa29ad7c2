use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use cmms_migrate::rules::FieldRules;
use cmms_migrate::run_migration;
use cmms_migrate::session::Session;
use cmms_migrate::table::Table;

#[derive(Parser)]
#[command(name = "cmms-migrate")]
#[command(about = "Migrate legacy CMMS spreadsheet data: synonym field mapping, validation and cleaning")]
struct Args {
    /// Field rules file: .json, or a delimited sheet with
    /// Field Name/Type/Required/Synonyms columns
    rules: PathBuf,

    /// Legacy data file (CSV)
    input: PathBuf,

    /// Where to write the cleaned data
    #[arg(short, long, default_value = "cleaned_cmms_data.csv")]
    output: PathBuf,

    /// Where to write the validation report (.json for machine-readable);
    /// printed to stdout if omitted
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable the fuzzy header fallback with this Jaro-Winkler threshold (0.0-1.0)
    #[arg(long)]
    fuzzy_threshold: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut rules = match args.rules.extension().and_then(|e| e.to_str()) {
        Some("json") => FieldRules::from_json(&args.rules)?,
        _ => FieldRules::from_sheet(&args.rules)?,
    };
    if let Some(threshold) = args.fuzzy_threshold {
        rules.fuzzy_threshold = Some(threshold);
    }

    let table = Table::read_csv(&args.input)?;
    info!("Loaded {} rows, {} columns from {}", table.height(), table.headers.len(), args.input.display());

    let session = Session::local();
    let (cleaned, report) = run_migration(&session, &table, &rules)?;

    cleaned.write_csv(&args.output)?;
    info!("Wrote cleaned data to {}", args.output.display());

    match &args.report {
        Some(path) if path.extension().and_then(|e| e.to_str()) == Some("json") => {
            std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
            info!("Wrote report to {}", path.display());
        }
        Some(path) => {
            std::fs::write(path, report.summary())?;
            info!("Wrote report to {}", path.display());
        }
        None => {
            println!("\n=== Validation Report ===");
            println!("{}", report.summary());
        }
    }

    Ok(())
}
