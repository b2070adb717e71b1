use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use renta_core::storage::ResultStore;
use renta_data::SalaryCsvLoader;
use renta_store_sqlite::SqliteStore;
use tracing_subscriber::EnvFilter;

/// Import salary rows from a CSV file into the saved results.
///
/// The CSV file needs the columns:
/// - first_name
/// - last_name
/// - gross_salary
///
/// Each row is run through the renta calculator and appended to the saved
/// results, exactly as if it had been entered in the form.
#[derive(Parser, Debug)]
#[command(name = "renta-import")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing salary rows
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database path (created if missing) or `:memory:`
    #[arg(short, long, default_value = "renta.db")]
    database: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    let store = SqliteStore::new(&args.database)
        .await
        .with_context(|| format!("Failed to open database: {}", args.database))?;
    store
        .run_migrations()
        .await
        .context("Failed to run migrations")?;

    let mut results = ResultStore::new(store);
    let existing = results
        .load_all()
        .await
        .context("Failed to read saved results")?
        .len();
    println!("Found {} saved results.", existing);

    println!("Importing salaries from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let rows = SalaryCsvLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} rows from CSV", rows.len());

    let inserted = SalaryCsvLoader::load(&mut results, &rows)
        .await
        .context("Failed to save imported results")?;

    println!(
        "Successfully imported {} results ({} total).",
        inserted,
        results.records().len()
    );

    Ok(())
}
