// src/xbrl/mod.rs
//
// Structured-financial-statement extraction engine. Given a filing's
// resolved document set, fetches and parses the instance document
// concurrently with the two linkbases, then joins facts against the merged
// per-statement concept ordering into dated tables.

pub mod calculation;
pub mod concept;
pub mod context;
pub mod facts;
pub mod instance;
pub mod presentation;
pub mod roles;
pub mod statement;

pub use roles::Statement;
pub use statement::{FinancialStatements, StatementTable};

use crate::edgar::client;
use crate::edgar::models::XbrlDocumentSet;
use crate::utils::error::XbrlError;
use presentation::StatementConcepts;

/// Runs one full extraction for a filing.
///
/// The three source documents are independently fetchable and their parsing
/// is side-effect-free, so each arm fetches and parses on its own; the join
/// point blocks until all arms settle. The instance arm is mandatory and its
/// failure fails the whole call with no partial result. The linkbase arms
/// are optional and degrade to an empty concept map.
pub async fn extract_statements(docs: &XbrlDocumentSet) -> Result<FinancialStatements, XbrlError> {
    let (instance, presentation, calculation) = tokio::join!(
        fetch_instance(&docs.instance_url),
        fetch_linkbase(
            docs.presentation_url.as_deref(),
            "presentation",
            presentation::parse_presentation,
        ),
        fetch_linkbase(
            docs.calculation_url.as_deref(),
            "calculation",
            calculation::parse_calculation,
        ),
    );

    let instance = instance?;
    let merged = calculation::merge_concept_orders(presentation, calculation);
    Ok(statement::assemble_statements(&instance, &merged))
}

async fn fetch_instance(url: &str) -> Result<instance::InstanceData, XbrlError> {
    let body = client::download_filing_doc(url)
        .await
        .map_err(XbrlError::InstanceFetch)?;
    instance::parse_instance(&body)
}

/// Fetches and parses one optional linkbase. Every failure mode here is a
/// degradation, never an abort: the run continues on whatever the other
/// source contributes.
async fn fetch_linkbase(
    url: Option<&str>,
    which: &str,
    parse: fn(&str) -> Result<StatementConcepts, roxmltree::Error>,
) -> StatementConcepts {
    let Some(url) = url else {
        tracing::info!("Filing has no {} linkbase", which);
        return StatementConcepts::new();
    };

    match client::download_filing_doc(url).await {
        Ok(body) => match parse(&body) {
            Ok(concepts) => concepts,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {} linkbase ({}), continuing without it",
                    which,
                    err
                );
                StatementConcepts::new()
            }
        },
        Err(err) => {
            tracing::warn!(
                "Failed to fetch {} linkbase ({}), continuing without it",
                which,
                err
            );
            StatementConcepts::new()
        }
    }
}

/// Pure composition over already-fetched document texts. This is the same
/// pipeline `extract_statements` runs after its fetches, separated so the
/// engine is testable without a network.
pub fn extract_from_documents(
    instance_xml: &str,
    presentation_xml: Option<&str>,
    calculation_xml: Option<&str>,
) -> Result<FinancialStatements, XbrlError> {
    let instance = instance::parse_instance(instance_xml)?;

    let presentation = match presentation_xml.map(presentation::parse_presentation) {
        Some(Ok(concepts)) => concepts,
        Some(Err(err)) => {
            tracing::warn!("Failed to parse presentation linkbase ({}), continuing", err);
            StatementConcepts::new()
        }
        None => StatementConcepts::new(),
    };

    let calculation = match calculation_xml.map(calculation::parse_calculation) {
        Some(Ok(concepts)) => concepts,
        Some(Err(err)) => {
            tracing::warn!("Failed to parse calculation linkbase ({}), continuing", err);
            StatementConcepts::new()
        }
        None => StatementConcepts::new(),
    };

    let merged = calculation::merge_concept_orders(presentation, calculation);
    Ok(statement::assemble_statements(&instance, &merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const INSTANCE: &str = r#"<?xml version="1.0"?>
        <xbrl xmlns="http://www.xbrl.org/2003/instance"
              xmlns:us-gaap="http://fasb.org/us-gaap/2024"
              xmlns:xbrldi="http://xbrl.org/2006/xbrldi">
          <context id="c1">
            <entity><identifier scheme="http://www.sec.gov/CIK">0000320193</identifier></entity>
            <period><instant>2024-12-31</instant></period>
          </context>
          <context id="c2">
            <entity>
              <identifier scheme="http://www.sec.gov/CIK">0000320193</identifier>
              <segment>
                <xbrldi:explicitMember dimension="srt:StatementGeographicalAxis">srt:AmericasMember</xbrldi:explicitMember>
              </segment>
            </entity>
            <period><instant>2024-12-31</instant></period>
          </context>
          <context id="d1">
            <entity><identifier scheme="http://www.sec.gov/CIK">0000320193</identifier></entity>
            <period><startDate>2024-01-01</startDate><endDate>2024-12-31</endDate></period>
          </context>
          <us-gaap:Assets contextRef="c1" unitRef="usd">1000</us-gaap:Assets>
          <us-gaap:Assets contextRef="c2" unitRef="usd">400</us-gaap:Assets>
          <us-gaap:Liabilities contextRef="c1" unitRef="usd">600</us-gaap:Liabilities>
          <us-gaap:Revenues contextRef="d1" unitRef="usd">5000</us-gaap:Revenues>
          <us-gaap:CommitmentsAndContingencies contextRef="c1" unitRef="usd">—</us-gaap:CommitmentsAndContingencies>
        </xbrl>"#;

    const PRESENTATION: &str = r#"<?xml version="1.0"?>
        <linkbase xmlns="http://www.xbrl.org/2003/linkbase"
                  xmlns:xlink="http://www.w3.org/1999/xlink">
          <presentationLink xlink:role="http://x.com/role/ConsolidatedBalanceSheets">
            <loc xlink:label="root" xlink:href="s.xsd#us-gaap_StatementOfFinancialPositionAbstract"/>
            <loc xlink:label="assets" xlink:href="s.xsd#us-gaap_Assets"/>
            <loc xlink:label="liabilities" xlink:href="s.xsd#us-gaap_Liabilities"/>
            <presentationArc xlink:from="root" xlink:to="assets" order="1"/>
            <presentationArc xlink:from="root" xlink:to="liabilities" order="2"/>
          </presentationLink>
          <presentationLink xlink:role="http://x.com/role/StatementsOfCashFlowsParenthetical">
            <loc xlink:label="root" xlink:href="s.xsd#us-gaap_SupplementalCashFlowInformationAbstract"/>
            <loc xlink:label="paid" xlink:href="s.xsd#us-gaap_IncomeTaxesPaidNet"/>
            <presentationArc xlink:from="root" xlink:to="paid" order="1"/>
          </presentationLink>
        </linkbase>"#;

    const CALCULATION: &str = r#"<?xml version="1.0"?>
        <linkbase xmlns="http://www.xbrl.org/2003/linkbase"
                  xmlns:xlink="http://www.w3.org/1999/xlink">
          <calculationLink xlink:role="http://x.com/role/ConsolidatedBalanceSheets">
            <loc xlink:label="assets" xlink:href="s.xsd#us-gaap_Assets"/>
            <loc xlink:label="ap" xlink:href="s.xsd#us-gaap_AccountsPayableCurrent"/>
            <calculationArc xlink:from="assets" xlink:to="ap" order="1" weight="1"/>
          </calculationLink>
        </linkbase>"#;

    fn dec_31() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    #[test]
    fn end_to_end_excludes_segmented_facts_from_the_balance_sheet() {
        let result =
            extract_from_documents(INSTANCE, Some(PRESENTATION), Some(CALCULATION)).unwrap();

        let table = result.statement("Balance Sheet").unwrap();
        // c2 is segmented by geography; its 400 must not surface or sum.
        assert_eq!(table.cell("Assets", dec_31()), Some(1000.0));
        assert_eq!(table.cell("Liabilities", dec_31()), Some(600.0));
    }

    #[test]
    fn end_to_end_row_order_is_presentation_then_calculation() {
        let result =
            extract_from_documents(INSTANCE, Some(PRESENTATION), Some(CALCULATION)).unwrap();

        let table = result.statement("Balance Sheet").unwrap();
        let concepts: Vec<&str> = table.rows.iter().map(|r| r.concept.as_str()).collect();
        // The abstract root and the calculation-only AccountsPayableCurrent
        // have no facts and are omitted; presentation rows come first.
        assert_eq!(concepts, vec!["Assets", "Liabilities"]);
    }

    #[test]
    fn end_to_end_parenthetical_role_is_not_a_statement() {
        let result =
            extract_from_documents(INSTANCE, Some(PRESENTATION), Some(CALCULATION)).unwrap();
        assert!(result.statement("Cash Flow").is_none());
    }

    #[test]
    fn end_to_end_dash_value_yields_no_cell() {
        let result = extract_from_documents(INSTANCE, Some(PRESENTATION), None).unwrap();
        assert_eq!(
            result.all_facts.cell("CommitmentsAndContingencies", dec_31()),
            None
        );
    }

    #[test]
    fn missing_linkbases_degrade_to_the_audit_view_only() {
        let result = extract_from_documents(INSTANCE, None, None).unwrap();
        assert!(result.statements.is_empty());
        assert_eq!(result.all_facts.cell("Assets", dec_31()), Some(1000.0));
        assert_eq!(result.all_facts.cell("Revenues", dec_31()), Some(5000.0));
    }

    #[test]
    fn malformed_linkbase_degrades_instead_of_failing() {
        let result = extract_from_documents(INSTANCE, Some("<not-xml"), None).unwrap();
        assert!(result.statements.is_empty());
        assert!(!result.all_facts.rows.is_empty());
    }

    #[test]
    fn unparsable_instance_fails_the_whole_run() {
        let result = extract_from_documents("no xbrl here at all", Some(PRESENTATION), None);
        assert!(result.is_err());
    }

    #[test]
    fn absent_linkbase_url_contributes_nothing() {
        let concepts = tokio_test::block_on(fetch_linkbase(
            None,
            "presentation",
            presentation::parse_presentation,
        ));
        assert!(concepts.is_empty());
    }
}
