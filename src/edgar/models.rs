// src/edgar/models.rs
#![allow(dead_code, non_snake_case)]
use serde::{Deserialize, Serialize};

use crate::utils::error::EdgarError;

/// Subset of the EDGAR company submission index we actually consume.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    pub cik: String,
    pub name: String,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented filing lists, one entry per filing at the same index.
#[derive(Debug, Deserialize)]
pub struct FilingsList {
    pub accessionNumber: Vec<String>,
    pub filingDate: Vec<String>,
    pub form: Vec<String>,
    pub primaryDocument: Vec<String>,
}

/// Accession directory listing from `index.json`.
/// Example: https://www.sec.gov/Archives/edgar/data/320193/000032019324000123/index.json
#[derive(Debug, Deserialize)]
pub struct FilingIndex {
    pub directory: IndexDirectory,
}

#[derive(Debug, Deserialize)]
pub struct IndexDirectory {
    pub item: Vec<IndexItem>,
}

#[derive(Debug, Deserialize)]
pub struct IndexItem {
    pub name: String,
}

/// Simple struct representing a specific filing we want to process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: String,
    pub primary_doc: String,
    pub year: Option<u32>, // Fiscal year of the report
}

impl FilingInfo {
    /// Base URL of the accession's archive directory.
    pub fn archive_base_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}",
            self.cik, acc_no_dashes
        )
    }

    /// URL of the machine-readable directory listing for this accession.
    pub fn index_json_url(&self) -> String {
        format!("{}/index.json", self.archive_base_url())
    }

    /// URL of a named document inside the accession directory.
    pub fn doc_url(&self, name: &str) -> String {
        format!("{}/{}", self.archive_base_url(), name)
    }
}

/// The three source documents of one extraction run, resolved from the
/// accession directory listing. The instance document is mandatory; the two
/// linkbases are optional and their absence degrades the run.
#[derive(Debug, Clone)]
pub struct XbrlDocumentSet {
    pub instance_url: String,
    pub presentation_url: Option<String>,
    pub calculation_url: Option<String>,
}

impl XbrlDocumentSet {
    /// Selects the XBRL documents from a filing's directory listing.
    ///
    /// The instance document is the `.xml` file carrying the `_htm` marker
    /// (EDGAR's naming for an instance extracted from an HTML-origin filing).
    /// Linkbases are matched by their `_pre.xml` / `_cal.xml` suffixes.
    pub fn resolve(filing: &FilingInfo, index: &FilingIndex) -> Result<Self, EdgarError> {
        let mut instance = None;
        let mut presentation = None;
        let mut calculation = None;

        for item in &index.directory.item {
            let name = item.name.as_str();
            if name.ends_with(".xml") && name.contains("_htm") && instance.is_none() {
                instance = Some(name.to_string());
            } else if name.ends_with("_pre.xml") && presentation.is_none() {
                presentation = Some(name.to_string());
            } else if name.ends_with("_cal.xml") && calculation.is_none() {
                calculation = Some(name.to_string());
            }
        }

        let instance = instance.ok_or_else(|| {
            EdgarError::FilingDocNotFound(format!(
                "no XBRL instance document in accession {}",
                filing.accession_number
            ))
        })?;

        Ok(Self {
            instance_url: filing.doc_url(&instance),
            presentation_url: presentation.map(|n| filing.doc_url(&n)),
            calculation_url: calculation.map(|n| filing.doc_url(&n)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing() -> FilingInfo {
        FilingInfo {
            accession_number: "0000320193-24-000123".to_string(),
            filing_date: "2024-11-01".to_string(),
            form_type: "10-K".to_string(),
            ticker: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            cik: "0000320193".to_string(),
            primary_doc: "aapl-20240928.htm".to_string(),
            year: Some(2024),
        }
    }

    fn index_of(names: &[&str]) -> FilingIndex {
        FilingIndex {
            directory: IndexDirectory {
                item: names
                    .iter()
                    .map(|n| IndexItem { name: n.to_string() })
                    .collect(),
            },
        }
    }

    #[test]
    fn resolves_instance_and_linkbases() {
        let index = index_of(&[
            "aapl-20240928.htm",
            "aapl-20240928_htm.xml",
            "aapl-20240928_pre.xml",
            "aapl-20240928_cal.xml",
            "aapl-20240928_lab.xml",
            "FilingSummary.xml",
        ]);

        let docs = XbrlDocumentSet::resolve(&filing(), &index).unwrap();
        assert!(docs.instance_url.ends_with("/aapl-20240928_htm.xml"));
        assert!(docs
            .presentation_url
            .as_deref()
            .unwrap()
            .ends_with("/aapl-20240928_pre.xml"));
        assert!(docs
            .calculation_url
            .as_deref()
            .unwrap()
            .ends_with("/aapl-20240928_cal.xml"));
        assert!(docs.instance_url.contains("/000032019324000123/"));
    }

    #[test]
    fn missing_linkbases_are_optional() {
        let index = index_of(&["aapl-20240928_htm.xml"]);
        let docs = XbrlDocumentSet::resolve(&filing(), &index).unwrap();
        assert!(docs.presentation_url.is_none());
        assert!(docs.calculation_url.is_none());
    }

    #[test]
    fn missing_instance_is_an_error() {
        let index = index_of(&["aapl-20240928_pre.xml", "aapl-20240928_cal.xml"]);
        assert!(XbrlDocumentSet::resolve(&filing(), &index).is_err());
    }
}
