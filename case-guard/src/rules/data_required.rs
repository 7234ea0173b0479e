//! Conditional data requirement: some actions need input data.

use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};

/// Rule identifier.
pub const RULE_ID: &str = "DATA_REQUIRED";

/// Normalized action that must come with patient data.
const PATIENT_SEARCH_ACTION: &str = "search for patient using name or ssn";

/// Fails "search for patient" steps that have no `Data`.
///
/// Applies only to rows whose trimmed, lowercased `Action` is the patient
/// search step; for those rows the dependent `Data` column must not be
/// empty-like. Requires both `Action` and `Data` columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataRequiredValidator;

impl DataRequiredValidator {
    fn requires_data(action: &str) -> bool {
        action.trim().to_lowercase() == PATIENT_SEARCH_ACTION
    }
}

impl Validator for DataRequiredValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    fn validate(&self, table: &Table) -> Vec<Issue> {
        if !table.has_columns(&[columns::ACTION, columns::DATA]) {
            return Vec::new();
        }

        table
            .rows()
            .filter(|row| !row.is_blank())
            .filter(|row| Self::requires_data(&row.text(columns::ACTION)))
            .filter(|row| row.is_empty_like(columns::DATA))
            .map(|row| {
                Issue::new(
                    RULE_ID,
                    "Data is required for this Action (provide patient name or SSN)",
                )
                .at_row(row.excel_row())
                .with_severity(Severity::Fail)
                .with_field(columns::DATA)
            })
            .collect()
    }

    fn description(&self) -> Option<&str> {
        Some("Checks that patient search steps provide a name or SSN")
    }
}
