//! Genericness heuristics for expected results.

use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "GENERIC_EXPECTED_RESULTS";

/// Expected results that say nothing about what the tester should observe.
pub const GENERIC_PHRASES: [&str; 14] = [
    "ok",
    "okay",
    "works",
    "work",
    "done",
    "completed",
    "complete",
    "success",
    "successful",
    "pass",
    "passed",
    "correct",
    "correctly",
    "as expected",
];

/// Normalized texts this short are flagged even when not a known phrase.
const MIN_LENGTH: usize = 3;

/// Warns about generic or very short `Expected Results`.
///
/// A value that matches a known generic phrase ("OK", "Works", "As
/// expected") is reported as too generic; otherwise a value of three
/// characters or fewer is reported as too short. Never both for one row.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::{Table, Validator};
/// use case_guard::rules::GenericTextValidator;
///
/// let table = Table::builder(["Action", "Expected Results"])
///     .row(["Click OK", "OK "])
///     .build()
///     .unwrap();
///
/// let issues = GenericTextValidator.validate(&table);
/// assert_eq!(issues[0].message, r#"Expected Results is too generic ("OK")"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTextValidator;

impl GenericTextValidator {
    fn check(text: &str) -> Option<String> {
        let original = text.trim();
        let normalized = original.to_lowercase();

        if GENERIC_PHRASES.contains(&normalized.as_str()) {
            return Some(format!("Expected Results is too generic (\"{original}\")"));
        }
        if normalized.chars().count() <= MIN_LENGTH {
            return Some(format!("Expected Results is too short (\"{original}\")"));
        }
        None
    }
}

impl Validator for GenericTextValidator {
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
            .filter_map(|row| {
                Self::check(&row.text(columns::EXPECTED_RESULTS)).map(|message| {
                    Issue::new(RULE_ID, message)
                        .at_row(row.excel_row())
                        .with_severity(Severity::Warning)
                        .with_field(columns::EXPECTED_RESULTS)
                })
            })
            .collect()
    }

    fn description(&self) -> Option<&str> {
        Some("Flags generic or very short Expected Results")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_phrase_takes_precedence() {
        assert_eq!(
            GenericTextValidator::check("OK "),
            Some("Expected Results is too generic (\"OK\")".to_string())
        );
        assert_eq!(
            GenericTextValidator::check("  As Expected"),
            Some("Expected Results is too generic (\"As Expected\")".to_string())
        );
    }

    #[test]
    fn test_short_text() {
        assert_eq!(
            GenericTextValidator::check("ok."),
            Some("Expected Results is too short (\"ok.\")".to_string())
        );
        assert_eq!(
            GenericTextValidator::check("Yes"),
            Some("Expected Results is too short (\"Yes\")".to_string())
        );
        assert_eq!(GenericTextValidator::check("Menu displays."), None);
    }

    #[test]
    fn test_validate_rows() {
        let table = Table::builder(["Action", "Expected Results"])
            .row(["Click OK", "Done"])
            .row(["Click OK", "Dialog closes."])
            .row(["Click OK", "-"])
            .row(["Click OK", "No"])
            .build()
            .unwrap();

        let issues = GenericTextValidator.validate(&table);
        let rows: Vec<_> = issues.iter().map(|issue| issue.row).collect();
        assert_eq!(rows, vec![Some(2), Some(5)]);
        assert!(issues[0].message.contains("too generic"));
        assert!(issues[1].message.contains("too short"));
    }
}
