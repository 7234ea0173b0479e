//! Accidental empty rows.

use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "BLANK_ROW";

/// Warns about every blank row.
///
/// Other rules skip blank rows silently; this one surfaces them without
/// failing the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankRowsValidator;

impl Validator for BlankRowsValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    fn validate(&self, table: &Table) -> Vec<Issue> {
        table
            .rows()
            .filter(|row| row.is_blank())
            .map(|row| {
                Issue::new(RULE_ID, "Blank row")
                    .at_row(row.excel_row())
                    .with_severity(Severity::Warning)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_rows_warned() {
        let table = Table::builder(["Action", "Expected Results"])
            .row(["Click OK", "Dialog closes."])
            .row(["", "none"])
            .row(["Click Close", "Window closes."])
            .row(["--", ""])
            .build()
            .unwrap();

        let issues = BlankRowsValidator.validate(&table);
        let rows: Vec<_> = issues.iter().map(|issue| issue.row).collect();

        assert_eq!(rows, vec![Some(3), Some(5)]);
        assert!(issues
            .iter()
            .all(|issue| issue.severity == Severity::Warning && issue.field.is_none()));
        assert_eq!(issues[0].message, "Blank row");
    }
}
