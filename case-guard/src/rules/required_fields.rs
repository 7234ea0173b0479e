//! Required cell values: every step needs an action and an expected result.

use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "REQUIRED_FIELDS";

/// Fails non-blank rows whose `Action` or `Expected Results` is empty-like.
///
/// Each field is checked independently, so one row can produce two issues.
/// Does nothing unless both columns exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsValidator;

impl Validator for RequiredFieldsValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    fn validate(&self, table: &Table) -> Vec<Issue> {
        if !table.has_columns(&[columns::ACTION, columns::EXPECTED_RESULTS]) {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for row in table.rows().filter(|row| !row.is_blank()) {
            for column in [columns::ACTION, columns::EXPECTED_RESULTS] {
                if row.is_empty_like(column) {
                    issues.push(
                        Issue::new(RULE_ID, format!("{column} is empty"))
                            .at_row(row.excel_row())
                            .with_severity(Severity::Fail)
                            .with_field(column),
                    );
                }
            }
        }
        issues
    }

    fn description(&self) -> Option<&str> {
        Some("Checks that every step has an Action and Expected Results")
    }
}
