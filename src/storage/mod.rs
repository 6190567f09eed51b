// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::edgar::models::FilingInfo;
use crate::utils::error::StorageError;
use crate::xbrl::FinancialStatements;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory structure: /base_dir/TICKER/YEAR/
    fn target_dir(&self, filing: &FilingInfo) -> Result<PathBuf, StorageError> {
        let target_dir = self
            .base_dir
            .join(filing.ticker.to_uppercase())
            .join(Self::year_label(filing));

        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }

        Ok(target_dir)
    }

    fn year_label(filing: &FilingInfo) -> String {
        filing
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn file_stem(filing: &FilingInfo) -> String {
        format!(
            "{}_{}_{}",
            filing.ticker.to_uppercase(),
            Self::year_label(filing),
            filing.form_type
        )
    }

    /// Saves the assembled statement tables as pretty-printed JSON.
    pub fn save_statements(
        &self,
        filing: &FilingInfo,
        financials: &FinancialStatements,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.target_dir(filing)?;
        let file_path = target_dir.join(format!("{}_statements.json", Self::file_stem(filing)));

        let body = serde_json::to_string_pretty(financials)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, body).map_err(StorageError::IoError)?;

        tracing::info!("Saved statement tables to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_metadata(
        &self,
        filing: &FilingInfo,
        financials: &FinancialStatements,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.target_dir(filing)?;
        let file_path = target_dir.join(format!("{}_statements_meta.json", Self::file_stem(filing)));

        let statement_names: Vec<&str> = financials
            .statements
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        let metadata = serde_json::json!({
            "ticker": filing.ticker,
            "company_name": filing.company_name,
            "cik": filing.cik,
            "accession_number": filing.accession_number,
            "form_type": filing.form_type,
            "filing_date": filing.filing_date,
            "statements": statement_names,
            "statement_count": financials.statements.len(),
            "all_facts_rows": financials.all_facts.rows.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
