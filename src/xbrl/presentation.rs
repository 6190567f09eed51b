// src/xbrl/presentation.rs
//
// Presentation Tree Builder: parses the presentation linkbase into a
// per-statement ordered concept list. Each classified role contributes its
// arc forest, flattened by pre-order depth-first traversal with roots in
// document order and children by arc order number.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::xbrl::concept::{resolve_concept, ConceptRef};
use crate::xbrl::roles::{classify_role, Statement};

/// Ordered concept lists keyed by statement.
pub type StatementConcepts = BTreeMap<Statement, Vec<String>>;

pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Reads an xlink attribute, tolerating linkbases that omit the namespace.
pub(crate) fn xlink_attr<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<&'a str> {
    node.attribute((XLINK_NS, name))
        .or_else(|| node.attribute(name))
}

/// One parent->child arc, annotated with its sibling order number and the
/// document sequence used to break order ties.
#[derive(Debug, Clone)]
struct ArcEdge {
    order: f64,
    seq: usize,
    child: String,
}

/// Parses a presentation linkbase document. Unclassified roles (disclosure
/// notes, parentheticals, policy blocks — the dominant share) are skipped
/// entirely; roles with no resolvable arcs contribute nothing.
pub fn parse_presentation(content: &str) -> Result<StatementConcepts, roxmltree::Error> {
    let doc = roxmltree::Document::parse(content)?;
    let mut out = StatementConcepts::new();

    for link in doc
        .root_element()
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "presentationLink")
    {
        let Some(role) = xlink_attr(link, "role") else {
            continue;
        };
        let Some(statement) = classify_role(role) else {
            continue;
        };

        let ordered = flatten_role(link);
        if ordered.is_empty() {
            tracing::debug!("Presentation role '{}' has no resolvable rows", role);
            continue;
        }

        // Several roles can classify to one statement; concatenate with
        // first-occurrence dedup.
        let rows = out.entry(statement).or_default();
        for concept in ordered {
            if !rows.contains(&concept) {
                rows.push(concept);
            }
        }
    }

    Ok(out)
}

/// Flattens one role block into its ordered concept list.
fn flatten_role(link: roxmltree::Node) -> Vec<String> {
    // Pass 1: locator declarations, label -> concept. First declaration wins
    // for a reused label; concept document order is kept for root ordering.
    let mut label_concepts: HashMap<&str, String> = HashMap::new();
    let mut declaration_order: Vec<String> = Vec::new();
    for loc in link
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "loc")
    {
        let (Some(label), Some(href)) = (xlink_attr(loc, "label"), xlink_attr(loc, "href")) else {
            continue;
        };
        let concept = resolve_concept(ConceptRef::LocatorHref(href));
        if concept.is_empty() {
            continue;
        }
        label_concepts.entry(label).or_insert_with(|| concept.clone());
        if !declaration_order.contains(&concept) {
            declaration_order.push(concept);
        }
    }

    // Pass 2: arcs. An arc referencing an undeclared label is skipped; that
    // is a recoverable filer defect, not a reason to drop the role.
    let mut children: HashMap<String, Vec<ArcEdge>> = HashMap::new();
    let mut has_incoming: HashSet<String> = HashSet::new();
    let mut seq = 0usize;
    for arc in link
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "presentationArc")
    {
        let (Some(from), Some(to)) = (xlink_attr(arc, "from"), xlink_attr(arc, "to")) else {
            continue;
        };
        let (Some(parent), Some(child)) = (label_concepts.get(from), label_concepts.get(to))
        else {
            tracing::trace!("Skipping arc with unresolvable label: {} -> {}", from, to);
            continue;
        };
        let order = arc
            .attribute("order")
            .and_then(|o| o.trim().parse::<f64>().ok())
            .unwrap_or(1.0);
        children.entry(parent.clone()).or_default().push(ArcEdge {
            order,
            seq,
            child: child.clone(),
        });
        has_incoming.insert(child.clone());
        seq += 1;
    }

    // Roots: arc sources with no role-local incoming arc, in document order.
    let roots: Vec<&String> = declaration_order
        .iter()
        .filter(|c| children.contains_key(*c) && !has_incoming.contains(*c))
        .collect();

    for edges in children.values_mut() {
        edges.sort_by(|a, b| {
            a.order
                .partial_cmp(&b.order)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
    }

    // Iterative pre-order traversal. The visited set both deduplicates a
    // concept reachable from two parents and breaks cyclic arcs in malformed
    // filings instead of recursing unboundedly.
    let mut rows = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    for root in roots {
        let mut stack = vec![root.clone()];
        while let Some(concept) = stack.pop() {
            if !visited.insert(concept.clone()) {
                continue;
            }
            if let Some(edges) = children.get(&concept) {
                for edge in edges.iter().rev() {
                    stack.push(edge.child.clone());
                }
            }
            rows.push(concept);
        }
    }

    rows
}
