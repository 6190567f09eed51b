// src/xbrl/roles.rs
//
// Classifies a linkbase role identifier (a URI-like path ending in a
// human-readable slug) into one of the five primary statements. Most roles in
// a real filing are disclosure notes or parentheticals and classify as none.

use serde::Serialize;
use std::fmt;

/// A canonical financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Statement {
    BalanceSheet,
    IncomeStatement,
    ComprehensiveIncome,
    CashFlow,
    StockholdersEquity,
}

impl Statement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statement::BalanceSheet => "Balance Sheet",
            Statement::IncomeStatement => "Income Statement",
            Statement::ComprehensiveIncome => "Comprehensive Income",
            Statement::CashFlow => "Cash Flow",
            Statement::StockholdersEquity => "Stockholders Equity",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule. A rule fires when an include keyword is present
/// in the normalized role and no exclude keyword is; if an include and an
/// exclude keyword both match, the rule is skipped so a later rule (or none)
/// can claim the role instead.
struct RoleRule {
    statement: Statement,
    include: &'static [&'static str],
    exclude: &'static [&'static str],
}

// Evaluated in priority order. Keyword choices worth noting: the Income
// Statement excludes encompass combined "...OperationsAndComprehensiveIncome"
// roles, which then land on Comprehensive Income; every rule excludes
// parenthetical roles, which are column footnotes rather than statements.
const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        statement: Statement::BalanceSheet,
        include: &[
            "balancesheet",
            "statementoffinancialposition",
            "statementsoffinancialposition",
            "financialcondition",
        ],
        exclude: &["parenthetical"],
    },
    RoleRule {
        statement: Statement::IncomeStatement,
        include: &[
            "incomestatement",
            "statementofincome",
            "statementsofincome",
            "statementofoperations",
            "statementsofoperations",
            "statementofearnings",
            "statementsofearnings",
            "resultsofoperations",
        ],
        exclude: &["comprehensiveincome", "comprehensiveloss", "parenthetical"],
    },
    RoleRule {
        statement: Statement::ComprehensiveIncome,
        include: &["comprehensiveincome", "comprehensiveloss"],
        exclude: &["parenthetical"],
    },
    RoleRule {
        statement: Statement::CashFlow,
        include: &["cashflow"],
        exclude: &["parenthetical"],
    },
    RoleRule {
        statement: Statement::StockholdersEquity,
        include: &[
            "stockholdersequity",
            "shareholdersequity",
            "stockholdersdeficit",
            "shareholdersdeficit",
            "changesinequity",
        ],
        exclude: &["parenthetical"],
    },
];

/// Classifies a role identifier string. Pure and deterministic: the
/// presentation and calculation passes must agree on every role to merge.
pub fn classify_role(role: &str) -> Option<Statement> {
    let normalized: String = role
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();

    for rule in ROLE_RULES {
        let include_hit = rule.include.iter().any(|k| normalized.contains(k));
        let exclude_hit = rule.exclude.iter().any(|k| normalized.contains(k));
        if include_hit && exclude_hit {
            continue;
        }
        if include_hit {
            return Some(rule.statement);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_primary_statements() {
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedBalanceSheets"),
            Some(Statement::BalanceSheet)
        );
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedStatementsOfOperations"),
            Some(Statement::IncomeStatement)
        );
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedStatementsOfComprehensiveIncome"),
            Some(Statement::ComprehensiveIncome)
        );
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedStatementsOfCashFlows"),
            Some(Statement::CashFlow)
        );
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedStatementsOfShareholdersEquity"),
            Some(Statement::StockholdersEquity)
        );
    }

    #[test]
    fn parenthetical_roles_are_not_statements() {
        // Contains the cash-flow include keyword but is a parenthetical.
        assert_eq!(
            classify_role("http://apple.com/role/StatementsOfCashFlowsParenthetical"),
            None
        );
        assert_eq!(
            classify_role("http://apple.com/role/ConsolidatedBalanceSheetsParenthetical"),
            None
        );
    }

    #[test]
    fn disclosure_roles_are_dropped() {
        assert_eq!(classify_role("http://apple.com/role/SegmentInformationAndGeographicData"), None);
        assert_eq!(classify_role("http://apple.com/role/SummaryOfSignificantAccountingPolicies"), None);
    }

    #[test]
    fn combined_operations_and_comprehensive_income_role() {
        // Include and exclude both hit the Income Statement rule, which is
        // therefore skipped; the Comprehensive Income rule claims the role.
        assert_eq!(
            classify_role("http://x.com/role/StatementsOfOperationsAndComprehensiveIncome"),
            Some(Statement::ComprehensiveIncome)
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let role = "http://apple.com/role/ConsolidatedStatementsOfCashFlows";
        let first = classify_role(role);
        for _ in 0..10 {
            assert_eq!(classify_role(role), first);
        }
    }

    #[test]
    fn normalization_ignores_case_spaces_and_hyphens() {
        assert_eq!(
            classify_role("http://x.com/role/Consolidated Balance-Sheets"),
            Some(Statement::BalanceSheet)
        );
    }
}
