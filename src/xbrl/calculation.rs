// src/xbrl/calculation.rs
//
// Calculation Linkbase Merger: the calculation linkbase encodes numeric
// rollups, not display order, so it is read only as a secondary source of
// concepts. Some filers omit a line item from the display hierarchy but
// still include it in the arithmetic rollup; it must still surface as a row.

use crate::xbrl::concept::{resolve_concept, ConceptRef};
use crate::xbrl::presentation::{xlink_attr, StatementConcepts};
use crate::xbrl::roles::classify_role;

/// Parses a calculation linkbase into per-statement concept sets, kept in
/// declaration order.
pub fn parse_calculation(content: &str) -> Result<StatementConcepts, roxmltree::Error> {
    let doc = roxmltree::Document::parse(content)?;
    let mut out = StatementConcepts::new();

    for link in doc
        .root_element()
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "calculationLink")
    {
        let Some(role) = xlink_attr(link, "role") else {
            continue;
        };
        let Some(statement) = classify_role(role) else {
            continue;
        };

        let concepts = out.entry(statement).or_default();
        for loc in link
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "loc")
        {
            let Some(href) = xlink_attr(loc, "href") else {
                continue;
            };
            let concept = resolve_concept(ConceptRef::LocatorHref(href));
            if !concept.is_empty() && !concepts.contains(&concept) {
                concepts.push(concept);
            }
        }
    }

    out.retain(|_, concepts| !concepts.is_empty());
    Ok(out)
}

/// Merges the two concept sources: presentation order is preserved, and any
/// calculation concept not already present is appended after it in
/// declaration order. A statement only the calculation linkbase knows about
/// keeps its calculation ordering alone.
pub fn merge_concept_orders(
    presentation: StatementConcepts,
    calculation: StatementConcepts,
) -> StatementConcepts {
    let mut merged = presentation;

    for (statement, concepts) in calculation {
        let rows = merged.entry(statement).or_default();
        for concept in concepts {
            if !rows.contains(&concept) {
                rows.push(concept);
            }
        }
    }

    merged
}
