//! Formatting convention: expected results are full sentences.

use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "EXPECTED_RESULTS_PUNCTUATION";

/// Warns when a non-empty `Expected Results` does not end with a period.
///
/// Empty values are left to [`RequiredFieldsValidator`](super::RequiredFieldsValidator).
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationValidator;

impl Validator for PunctuationValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    fn validate(&self, table: &Table) -> Vec<Issue> {
        if !table.has_column(columns::EXPECTED_RESULTS) {
            return Vec::new();
        }

        table
            .rows()
            .filter(|row| !row.is_blank() && !row.is_empty_like(columns::EXPECTED_RESULTS))
            .filter(|row| !row.text(columns::EXPECTED_RESULTS).trim().ends_with('.'))
            .map(|row| {
                Issue::new(RULE_ID, "Expected Results should end with a period (.)")
                    .at_row(row.excel_row())
                    .with_severity(Severity::Warning)
                    .with_field(columns::EXPECTED_RESULTS)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_period() {
        let table = Table::builder(["Action", "Expected Results"])
            .row(["Click OK", "Dialog closes."])
            .row(["Click OK", "Dialog closes"])
            .row(["Click OK", "Dialog closes.   "])
            .row(["Click OK", ""])
            .row(["Click OK", "N/A"])
            .build()
            .unwrap();

        let issues = PunctuationValidator.validate(&table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].row, Some(3));
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].field.as_deref(), Some("Expected Results"));
    }
}
