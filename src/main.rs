// src/main.rs
mod edgar;
mod storage;
mod utils;
mod xbrl;

use std::path::PathBuf;

use clap::Parser;
use edgar::client;
use edgar::models::{FilingInfo, XbrlDocumentSet};
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the SEC financial statement extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company
    #[arg(short, long)]
    ticker: String,

    /// Filing form type to process (10-K or 10-Q)
    #[arg(short, long, default_value = "10-K")]
    form: String,

    /// Start year for the filings (optional)
    #[arg(long)]
    start_year: Option<u32>,

    /// End year for the filings (optional)
    #[arg(long)]
    end_year: Option<u32>,

    /// Specific SEC accession number (optional, restricts to one filing)
    #[arg(short, long)]
    accession_number: Option<String>,

    /// Output directory for extracted statement tables
    #[arg(short, long, default_value = "./output")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    if args.form != "10-K" && args.form != "10-Q" {
        return Err(AppError::Config(format!(
            "Unsupported form type '{}' (expected 10-K or 10-Q)",
            args.form
        )));
    }

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Find filings for the ticker
    tracing::info!("Finding {} filings for ticker: {}", args.form, args.ticker);
    let mut filings =
        client::find_filings(&args.ticker, &args.form, args.start_year, args.end_year).await?;

    if let Some(accession) = &args.accession_number {
        filings.retain(|f| &f.accession_number == accession);
        if filings.is_empty() {
            return Err(AppError::Config(format!(
                "Accession number {} not found among {} filings for {}",
                accession, args.form, args.ticker
            )));
        }
    }

    tracing::info!("Found {} {} filings", filings.len(), args.form);

    if filings.is_empty() {
        return Err(AppError::Config(format!(
            "No {} filings found for ticker {} in the specified date range",
            args.form, args.ticker
        )));
    }

    // 5. Process each filing
    let mut success_count = 0;
    let mut failure_count = 0;

    for filing in filings {
        tracing::info!(
            "Processing filing for year: {:?} ({})",
            filing.year,
            filing.accession_number
        );

        match process_filing(&filing, &storage).await {
            Ok(path) => {
                tracing::info!("Saved statement tables to: {}", path.display());
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to process filing {}: {}", filing.accession_number, e);
                failure_count += 1;
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract statements from {} filings",
            failure_count
        )));
    }

    Ok(())
}

/// Resolves one filing's XBRL documents, runs the extraction, and persists
/// the resulting tables. The extraction is atomic: either a complete set of
/// tables comes back or the filing is counted as a failure.
async fn process_filing(
    filing: &FilingInfo,
    storage: &StorageManager,
) -> Result<PathBuf, AppError> {
    let index = client::get_filing_index(filing).await?;
    let docs = XbrlDocumentSet::resolve(filing, &index)?;
    tracing::info!("Resolved instance document: {}", docs.instance_url);

    let financials = xbrl::extract_statements(&docs).await?;
    tracing::info!(
        "Extracted {} statement tables and {} audit rows",
        financials.statements.len(),
        financials.all_facts.rows.len()
    );

    let path = storage.save_statements(filing, &financials)?;
    match storage.save_metadata(filing, &financials) {
        Ok(meta_path) => tracing::info!("Saved metadata to: {}", meta_path.display()),
        Err(e) => tracing::error!("Failed to save metadata: {}", e),
    }

    Ok(path)
}
