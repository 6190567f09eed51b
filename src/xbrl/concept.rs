// src/xbrl/concept.rs
//
// Concept names arrive in two encodings: fact elements carry `prefix:Concept`
// (the inline `name` attribute, or a namespaced tag), while linkbase locators
// reference the same concept as an href fragment `prefix_Concept`. Both are
// resolved here so every consumer sees one canonical spelling.

use once_cell::sync::Lazy;
use regex::Regex;

/// A concept reference in one of its two source encodings.
#[derive(Debug, Clone, Copy)]
pub enum ConceptRef<'a> {
    /// `prefix:Concept` — inline fact `name` attributes and element tag names.
    Qualified(&'a str),
    /// A locator `xlink:href` whose fragment is `prefix_Concept`,
    /// e.g. `aapl-20240928.xsd#us-gaap_Assets`.
    LocatorHref(&'a str),
}

/// Resolves a concept reference to its canonical name: the text after the
/// last separator of the encoding, with any namespace prefix stripped.
pub fn resolve_concept(concept_ref: ConceptRef) -> String {
    match concept_ref {
        ConceptRef::Qualified(name) => {
            let name = name.trim();
            match name.rsplit_once(':') {
                Some((_, local)) => local.to_string(),
                None => name.to_string(),
            }
        }
        ConceptRef::LocatorHref(href) => {
            let fragment = match href.rsplit_once('#') {
                Some((_, fragment)) => fragment,
                None => href,
            };
            let fragment = fragment.trim();
            match fragment.rsplit_once('_') {
                Some((_, local)) => local.to_string(),
                None => fragment.to_string(),
            }
        }
    }
}

static CAPITAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turns a CamelCase concept name into a human-readable row label,
/// e.g. `NetIncomeLoss` -> "Net Income Loss".
pub fn humanize_concept(concept: &str) -> String {
    if concept.is_empty() {
        return "Unknown".to_string();
    }

    let spaced = CAPITAL_RE.replace_all(concept, " $1");
    WHITESPACE_RE
        .replace_all(spaced.trim(), " ")
        .into_owned()
}
