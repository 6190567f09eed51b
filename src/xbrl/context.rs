// src/xbrl/context.rs
//
// Context Resolver: builds the context-id map from the instance document.
// Contexts without a resolvable period are excluded from the map entirely;
// facts referencing them are later dropped for having no date. That is an
// expected condition given inconsistent filer tagging, not an error.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::collections::HashMap;

use crate::xbrl::instance::{html_local_name, xml_text};

/// One declared reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Instant(NaiveDate),
    Duration { start: NaiveDate, end: NaiveDate },
}

/// One reporting context from the instance document.
#[derive(Debug, Clone)]
pub struct Context {
    pub id: String,
    pub period: Period,
    /// (dimension, member) pairs declared under the entity's segment.
    pub dimensions: Vec<(String, String)>,
}

impl Context {
    /// A segmented context carries a dimensional breakdown (per-geography,
    /// per-product, ...). Its facts are recorded but excluded from statement
    /// assembly; they would corrupt a consolidated total.
    pub fn is_segmented(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// Statement columns are keyed by period end: an instant context reports
    /// as of its instant, a duration context as of its end date.
    pub fn reporting_date(&self) -> NaiveDate {
        match self.period {
            Period::Instant(date) => date,
            Period::Duration { end, .. } => end,
        }
    }
}

pub type ContextMap = HashMap<String, Context>;

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Collects contexts from a well-formed XML instance tree.
pub(crate) fn collect_strict(doc: &roxmltree::Document) -> ContextMap {
    let mut contexts = ContextMap::new();

    for node in doc.root_element().descendants() {
        if !node.is_element() || node.tag_name().name() != "context" {
            continue;
        }
        let Some(id) = node.attribute("id") else {
            continue;
        };
        match build_context_strict(id, node) {
            Some(context) => {
                contexts.insert(id.to_string(), context);
            }
            None => {
                tracing::debug!("Skipping context '{}' without a resolvable period", id);
            }
        }
    }

    contexts
}

fn build_context_strict(id: &str, node: roxmltree::Node) -> Option<Context> {
    let period_node = node
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "period")?;

    let mut instant = None;
    let mut start = None;
    let mut end = None;
    for child in period_node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "instant" => instant = parse_date(&xml_text(child)),
            "startDate" => start = parse_date(&xml_text(child)),
            "endDate" => end = parse_date(&xml_text(child)),
            _ => {}
        }
    }

    let period = match (instant, start, end) {
        (Some(date), _, _) => Period::Instant(date),
        (None, Some(start), Some(end)) => Period::Duration { start, end },
        _ => return None, // neither an instant nor a start/end pair
    };

    let mut dimensions = Vec::new();
    if let Some(segment) = node
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "segment")
    {
        for member in segment.descendants().filter(|n| n.is_element()) {
            match member.tag_name().name() {
                "explicitMember" | "typedMember" => {
                    let dimension = member.attribute("dimension").unwrap_or("").to_string();
                    dimensions.push((dimension, xml_text(member).trim().to_string()));
                }
                _ => {}
            }
        }
    }

    Some(Context {
        id: id.to_string(),
        period,
        dimensions,
    })
}

/// Collects contexts from the lenient HTML tree. The HTML parser folds
/// element and attribute names to lowercase, so matching is by lowercased
/// local name.
pub(crate) fn collect_lenient(html: &Html) -> ContextMap {
    let mut contexts = ContextMap::new();

    for node in html.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if html_local_name(element.value().name()) != "context" {
            continue;
        }
        let Some(id) = element.value().attr("id") else {
            continue;
        };
        match build_context_lenient(id, element) {
            Some(context) => {
                contexts.insert(id.to_string(), context);
            }
            None => {
                tracing::debug!("Skipping context '{}' without a resolvable period", id);
            }
        }
    }

    contexts
}

fn build_context_lenient(id: &str, element: ElementRef) -> Option<Context> {
    let mut instant = None;
    let mut start = None;
    let mut end = None;
    let mut dimensions = Vec::new();

    for node in element.descendants() {
        let Some(child) = ElementRef::wrap(node) else {
            continue;
        };
        match html_local_name(child.value().name()) {
            "instant" => instant = parse_date(&child.text().collect::<String>()),
            "startdate" => start = parse_date(&child.text().collect::<String>()),
            "enddate" => end = parse_date(&child.text().collect::<String>()),
            "segment" => {
                for member_node in child.descendants() {
                    let Some(member) = ElementRef::wrap(member_node) else {
                        continue;
                    };
                    match html_local_name(member.value().name()) {
                        "explicitmember" | "typedmember" => {
                            let dimension =
                                member.value().attr("dimension").unwrap_or("").to_string();
                            dimensions.push((
                                dimension,
                                member.text().collect::<String>().trim().to_string(),
                            ));
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    let period = match (instant, start, end) {
        (Some(date), _, _) => Period::Instant(date),
        (None, Some(start), Some(end)) => Period::Duration { start, end },
        _ => return None,
    };

    Some(Context {
        id: id.to_string(),
        period,
        dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE: &str = r#"<?xml version="1.0"?>
        <xbrl xmlns="http://www.xbrl.org/2003/instance"
              xmlns:xbrldi="http://xbrl.org/2006/xbrldi"
              xmlns:srt="http://fasb.org/srt/2024">
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
          <context id="c3">
            <entity><identifier scheme="http://www.sec.gov/CIK">0000320193</identifier></entity>
            <period><startDate>2024-01-01</startDate><endDate>2024-12-31</endDate></period>
          </context>
          <context id="broken">
            <entity><identifier scheme="http://www.sec.gov/CIK">0000320193</identifier></entity>
            <period></period>
          </context>
        </xbrl>"#;

    fn contexts() -> ContextMap {
        let doc = roxmltree::Document::parse(INSTANCE).unwrap();
        collect_strict(&doc)
    }

    #[test]
    fn resolves_instant_and_duration_periods() {
        let contexts = contexts();
        let c1 = &contexts["c1"];
        assert_eq!(c1.period, Period::Instant(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));

        let c3 = &contexts["c3"];
        assert_eq!(
            c3.reporting_date(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            "duration contexts report as of their end date"
        );
    }

    #[test]
    fn segment_members_mark_context_segmented() {
        let contexts = contexts();
        assert!(!contexts["c1"].is_segmented());
        let c2 = &contexts["c2"];
        assert!(c2.is_segmented());
        assert_eq!(c2.dimensions[0].0, "srt:StatementGeographicalAxis");
    }

    #[test]
    fn context_without_period_is_excluded() {
        let contexts = contexts();
        assert!(!contexts.contains_key("broken"));
        assert_eq!(contexts.len(), 3);
    }

    #[test]
    fn lenient_pass_resolves_contexts_from_html() {
        let html = Html::parse_document(
            r#"<html><body>
              <div style="display:none">
                <xbrli:context id="i1">
                  <xbrli:entity>
                    <xbrli:segment>
                      <xbrldi:explicitMember dimension="srt:StatementGeographicalAxis">srt:EuropeMember</xbrldi:explicitMember>
                    </xbrli:segment>
                  </xbrli:entity>
                  <xbrli:period><xbrli:instant>2024-09-28</xbrli:instant></xbrli:period>
                </xbrli:context>
                <xbrli:context id="i2">
                  <xbrli:period>
                    <xbrli:startDate>2023-10-01</xbrli:startDate>
                    <xbrli:endDate>2024-09-28</xbrli:endDate>
                  </xbrli:period>
                </xbrli:context>
              </div>
            </body></html>"#,
        );
        let contexts = collect_lenient(&html);
        assert_eq!(contexts.len(), 2);
        assert!(contexts["i1"].is_segmented());
        assert!(!contexts["i2"].is_segmented());
        assert_eq!(
            contexts["i2"].reporting_date(),
            NaiveDate::from_ymd_opt(2024, 9, 28).unwrap()
        );
    }
}
