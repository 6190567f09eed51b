// src/xbrl/facts.rs
//
// Fact Extractor: walks the instance document and emits typed numeric facts
// bound to a context. Two dialects are supported: elements namespaced
// directly by the reporting taxonomy (concept = element name), and inline
// XBRL `nonFraction` elements carrying the concept in a `name` attribute.
// Any per-element failure skips that element and continues; resilience to
// filer-specific tagging quirks beats failing the run on one bad element.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::xbrl::concept::{resolve_concept, ConceptRef};
use crate::xbrl::context::ContextMap;
use crate::xbrl::instance::{html_local_name, xml_text};

/// One reported numeric data point, pre-join with its context.
#[derive(Debug, Clone)]
pub struct Fact {
    pub concept: String,
    pub context_id: String,
    pub value: f64,
}

// Thousands separators, currency symbols, and (non-breaking) whitespace are
// formatting noise around the numeral.
static NUMERIC_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,$€£¥\s]").expect("valid regex"));

/// Normalizes a raw numeric text into a value.
///
/// Returns `None` for non-values ("—", "–", "-", empty) and unparsable text;
/// a non-value is never stored as zero. Zero is reserved for the explicit
/// `fixed-zero` format marker, which short-circuits before scale/sign logic.
/// Parenthesized text denotes a negative in the inline dialect; `scale` is a
/// power-of-ten multiplier; `sign="-"` forces the value negative regardless
/// of the parsed sign.
pub(crate) fn parse_numeric_value(
    raw: &str,
    scale: Option<&str>,
    sign: Option<&str>,
    format: Option<&str>,
) -> Option<f64> {
    if format.is_some_and(|f| f.ends_with("fixed-zero")) {
        return Some(0.0);
    }

    let mut text = NUMERIC_NOISE_RE.replace_all(raw, "").into_owned();

    let mut parenthesized = false;
    if text.len() >= 2 && text.starts_with('(') && text.ends_with(')') {
        parenthesized = true;
        text = text[1..text.len() - 1].to_string();
    }

    if matches!(text.as_str(), "" | "-" | "—" | "–") {
        return None;
    }

    let mut value: f64 = text.parse().ok()?;
    if parenthesized {
        value = -value.abs();
    }

    if let Some(scale) = scale.and_then(|s| s.trim().parse::<i32>().ok()) {
        value *= 10f64.powi(scale);
    }

    if sign == Some("-") {
        value = -value.abs();
    }

    Some(value)
}

/// Collects facts from a well-formed XML instance tree. Candidates whose
/// `contextRef` is absent or unresolvable against the context map are
/// skipped.
pub(crate) fn collect_strict(doc: &roxmltree::Document, contexts: &ContextMap) -> Vec<Fact> {
    let mut facts = Vec::new();

    for node in doc.root_element().descendants() {
        if !node.is_element() {
            continue;
        }

        let inline = node
            .tag_name()
            .namespace()
            .is_some_and(|ns| ns.contains("inlineXBRL"));

        if inline {
            // Only nonFraction carries a numeric fact; nonNumeric text
            // blocks and the inline plumbing elements are not facts here.
            if node.tag_name().name() != "nonFraction" {
                continue;
            }
            let Some(context_id) = node.attribute("contextRef") else {
                continue;
            };
            if !contexts.contains_key(context_id) {
                tracing::trace!("Skipping fact with unresolvable context '{}'", context_id);
                continue;
            }
            let Some(name) = node.attribute("name") else {
                continue;
            };
            let concept = resolve_concept(ConceptRef::Qualified(name));
            if let Some(value) = parse_numeric_value(
                &xml_text(node),
                node.attribute("scale"),
                node.attribute("sign"),
                node.attribute("format"),
            ) {
                facts.push(Fact {
                    concept,
                    context_id: context_id.to_string(),
                    value,
                });
            }
        } else {
            // Plain dialect: any taxonomy-namespaced element bound to a
            // context is a fact candidate.
            let Some(context_id) = node.attribute("contextRef") else {
                continue;
            };
            if !contexts.contains_key(context_id) {
                tracing::trace!("Skipping fact with unresolvable context '{}'", context_id);
                continue;
            }
            let concept = resolve_concept(ConceptRef::Qualified(node.tag_name().name()));
            if let Some(value) = parse_numeric_value(
                &xml_text(node),
                node.attribute("scale"),
                node.attribute("sign"),
                node.attribute("format"),
            ) {
                facts.push(Fact {
                    concept,
                    context_id: context_id.to_string(),
                    value,
                });
            }
        }
    }

    facts
}

/// Collects inline facts from the lenient HTML tree. Tag names are folded to
/// lowercase by the HTML parser, so only the inline dialect is recoverable
/// here: the concept's casing survives in the `name` attribute value, not in
/// a tag name.
pub(crate) fn collect_lenient(html: &Html, contexts: &ContextMap) -> Vec<Fact> {
    let mut facts = Vec::new();

    for node in html.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if html_local_name(element.value().name()) != "nonfraction" {
            continue;
        }
        let Some(context_id) = element.value().attr("contextref") else {
            continue;
        };
        if !contexts.contains_key(context_id) {
            continue;
        }
        let Some(name) = element.value().attr("name") else {
            continue;
        };
        let concept = resolve_concept(ConceptRef::Qualified(name));
        let text = element.text().collect::<String>();
        if let Some(value) = parse_numeric_value(
            &text,
            element.value().attr("scale"),
            element.value().attr("sign"),
            element.value().attr("format"),
        ) {
            facts.push(Fact {
                concept,
                context_id: context_id.to_string(),
                value,
            });
        }
    }

    facts
}
