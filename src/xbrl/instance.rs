// src/xbrl/instance.rs
//
// Instance-document front door. The strict XML pass handles both the plain
// fact-per-element dialect and well-formed inline XBRL; inline filings are
// frequently not well-formed XML (undeclared entities, stray markup), so a
// failed strict parse falls back to a lenient HTML pass over the same text.

use scraper::Html;

use crate::utils::error::XbrlError;
use crate::xbrl::context::{self, ContextMap};
use crate::xbrl::facts::{self, Fact};

/// Parsed products of one instance document: the context map and the raw
/// fact list, both immutable after the parse.
#[derive(Debug)]
pub struct InstanceData {
    pub contexts: ContextMap,
    pub facts: Vec<Fact>,
}

/// Parses an instance document, trying strict XML first.
///
/// A document that fails the strict parse and yields nothing under the
/// lenient pass either is not an XBRL instance at all or is damaged beyond
/// recovery; that is the fatal case.
pub fn parse_instance(content: &str) -> Result<InstanceData, XbrlError> {
    match roxmltree::Document::parse(content) {
        Ok(doc) => {
            let contexts = context::collect_strict(&doc);
            let facts = facts::collect_strict(&doc, &contexts);
            tracing::debug!(
                "Strict parse: {} contexts, {} facts",
                contexts.len(),
                facts.len()
            );
            Ok(InstanceData { contexts, facts })
        }
        Err(err) => {
            tracing::warn!(
                "Instance is not well-formed XML ({}), retrying with lenient HTML parse",
                err
            );
            let html = Html::parse_document(content);
            let contexts = context::collect_lenient(&html);
            let facts = facts::collect_lenient(&html, &contexts);
            if contexts.is_empty() && facts.is_empty() {
                return Err(XbrlError::InstanceParse(err.to_string()));
            }
            tracing::debug!(
                "Lenient parse: {} contexts, {} facts",
                contexts.len(),
                facts.len()
            );
            Ok(InstanceData { contexts, facts })
        }
    }
}

/// Concatenated text of a node's entire subtree.
pub(crate) fn xml_text(node: roxmltree::Node) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(text) = descendant.text() {
                out.push_str(text);
            }
        }
    }
    out
}

/// Local part of an HTML tag name that may carry a foreign prefix,
/// e.g. `ix:nonfraction` -> `nonfraction`.
pub(crate) fn html_local_name(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}
