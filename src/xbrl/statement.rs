// src/xbrl/statement.rs
//
// Statement Assembler: joins the extracted facts against the merged
// per-statement concept ordering and the distinct reporting dates into the
// output tables. Tables are built fresh per run and never mutated after
// construction; row order is significant and the renderer must preserve it.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::xbrl::concept::humanize_concept;
use crate::xbrl::instance::InstanceData;
use crate::xbrl::presentation::StatementConcepts;

/// Name of the consolidated audit/completeness table.
pub const ALL_FACTS_TABLE: &str = "All Facts";

/// One table row: a concept with one cell per date column. Absent cells are
/// `None` and must render blank, never as zero.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    pub concept: String,
    pub label: String,
    pub cells: Vec<Option<f64>>,
}

/// One assembled statement: rows in presentation-then-calculation order,
/// date columns descending (most recent first).
#[derive(Debug, Clone, Serialize)]
pub struct StatementTable {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    pub fn cell(&self, concept: &str, date: NaiveDate) -> Option<f64> {
        let column = self.dates.iter().position(|d| *d == date)?;
        let row = self.rows.iter().find(|r| r.concept == concept)?;
        row.cells[column]
    }
}

/// The complete result of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialStatements {
    pub statements: Vec<StatementTable>,
    pub all_facts: StatementTable,
}

impl FinancialStatements {
    pub fn statement(&self, name: &str) -> Option<&StatementTable> {
        self.statements.iter().find(|t| t.name == name)
    }
}

/// A fact joined with its context: dated, consolidated, ready to aggregate.
struct ResolvedFact {
    concept: String,
    date: NaiveDate,
    value: f64,
}

/// Joins facts against the context map. Facts bound to a segmented context
/// are dropped here: a per-geography or per-product breakdown alongside the
/// consolidated figure would corrupt a simple total.
fn resolve_facts(instance: &InstanceData) -> Vec<ResolvedFact> {
    let mut resolved = Vec::new();
    for fact in &instance.facts {
        let Some(context) = instance.contexts.get(&fact.context_id) else {
            continue;
        };
        if context.is_segmented() {
            continue;
        }
        resolved.push(ResolvedFact {
            concept: fact.concept.clone(),
            date: context.reporting_date(),
            value: fact.value,
        });
    }
    resolved
}

/// Builds one table from an ordered concept list and the facts feeding it.
/// Duplicate tags for the same concept/date are not uncommon; the first
/// value seen wins. Concepts with no facts are omitted, not zero-filled.
fn build_table(name: &str, concepts: &[String], facts: &[&ResolvedFact]) -> StatementTable {
    let mut cells: HashMap<(&str, NaiveDate), f64> = HashMap::new();
    let mut date_set: BTreeSet<NaiveDate> = BTreeSet::new();
    for fact in facts {
        date_set.insert(fact.date);
        cells.entry((fact.concept.as_str(), fact.date)).or_insert(fact.value);
    }

    let dates: Vec<NaiveDate> = date_set.into_iter().rev().collect();

    let rows = concepts
        .iter()
        .filter_map(|concept| {
            let row_cells: Vec<Option<f64>> = dates
                .iter()
                .map(|date| cells.get(&(concept.as_str(), *date)).copied())
                .collect();
            if row_cells.iter().all(Option::is_none) {
                return None;
            }
            Some(StatementRow {
                concept: concept.clone(),
                label: humanize_concept(concept),
                cells: row_cells,
            })
        })
        .collect();

    StatementTable {
        name: name.to_string(),
        dates,
        rows,
    }
}

/// Assembles every recognized statement with at least one matching fact,
/// plus the consolidated All Facts table over every resolved concept.
pub fn assemble_statements(
    instance: &InstanceData,
    orderings: &StatementConcepts,
) -> FinancialStatements {
    let resolved = resolve_facts(instance);

    let mut statements = Vec::new();
    for (statement, concepts) in orderings {
        let members: HashSet<&str> = concepts.iter().map(String::as_str).collect();
        let matching: Vec<&ResolvedFact> = resolved
            .iter()
            .filter(|f| members.contains(f.concept.as_str()))
            .collect();
        if matching.is_empty() {
            // A normal filing-quality artifact, distinct from a failed run.
            tracing::debug!("No matching facts for {}; omitting", statement);
            continue;
        }
        statements.push(build_table(statement.as_str(), concepts, &matching));
    }

    // Audit view: every resolved concept in first-seen order, unfiltered by
    // statement membership.
    let mut all_concepts: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for fact in &resolved {
        if seen.insert(fact.concept.as_str()) {
            all_concepts.push(fact.concept.clone());
        }
    }
    let everything: Vec<&ResolvedFact> = resolved.iter().collect();
    let all_facts = build_table(ALL_FACTS_TABLE, &all_concepts, &everything);

    FinancialStatements {
        statements,
        all_facts,
    }
}
