//! Schema check: the columns every test-case sheet must have.

use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "MISSING_COLUMNS";

const REQUIRED: [&str; 2] = [columns::ACTION, columns::EXPECTED_RESULTS];

/// Fails the file when `Action` or `Expected Results` is missing.
///
/// Produces at most one file-level issue naming every missing column in
/// alphabetical order. The scanner stops after this validator when it
/// reports anything, since row-level rules are meaningless without these
/// columns.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::{Table, Validator};
/// use case_guard::rules::MissingColumnsValidator;
///
/// let table = Table::builder(["Step #"]).build().unwrap();
/// let issues = MissingColumnsValidator.validate(&table);
///
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].message, "Missing required columns: Action, Expected Results");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingColumnsValidator;

impl Validator for MissingColumnsValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    fn validate(&self, table: &Table) -> Vec<Issue> {
        let mut missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|column| !table.has_column(column))
            .collect();

        if missing.is_empty() {
            return Vec::new();
        }

        missing.sort_unstable();
        vec![Issue::new(
            RULE_ID,
            format!("Missing required columns: {}", missing.join(", ")),
        )
        .with_severity(Severity::Fail)]
    }

    fn description(&self) -> Option<&str> {
        Some("Checks that the Action and Expected Results columns exist")
    }
}
