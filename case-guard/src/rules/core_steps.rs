//! Core-steps enforcement for standard test cases.
//!
//! Most test cases open with the same fixed sequence of steps. Anchor
//! actions at a few fixed positions fingerprint that sequence; once enough
//! anchors match, every leading step is compared with the template and
//! drift is reported as warnings.

use crate::config::CoreStepsConfig;
use crate::core::table::columns;
use crate::core::{Issue, Severity, Table, Validator};
use std::borrow::Cow;
use tracing::{debug, instrument};

/// Rule identifier.
pub const RULE_ID: &str = "CORE_STEPS";

/// Trims and collapses every whitespace run into a single space.
///
/// Punctuation and case are preserved.
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true if both texts are equal after [`normalize_spaces`].
pub fn steps_match(found: &str, expected: &str) -> bool {
    normalize_spaces(found) == normalize_spaces(expected)
}

/// Enforces the core-steps template on standard test cases.
///
/// Unlike the other row rules, step positions here are plain row positions:
/// blank rows count.
///
/// # Examples
///
/// ```rust
/// use case_guard::config::{AnchorStep, CoreStep, CoreStepsConfig};
/// use case_guard::core::{Table, Validator};
/// use case_guard::rules::CoreStepsValidator;
///
/// let config = CoreStepsConfig::default()
///     .with_anchors(vec![AnchorStep::new(1, "Open app"), AnchorStep::new(2, "Log in")])
///     .with_min_matches(2)
///     .with_steps_count(2)
///     .with_template(vec![
///         CoreStep::new("Open app", "App opens."),
///         CoreStep::new("Log in", "Home page displays."),
///     ]);
///
/// let table = Table::builder(["Action", "Expected Results"])
///     .row(["Open  app", "App opens."])
///     .row(["Log in", "Home displays."])
///     .build()
///     .unwrap();
///
/// let issues = CoreStepsValidator::new(config).validate(&table);
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].row, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreStepsValidator {
    config: CoreStepsConfig,
}

impl CoreStepsValidator {
    /// Creates the validator from its settings.
    pub fn new(config: CoreStepsConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &CoreStepsConfig {
        &self.config
    }

    /// Counts the anchors whose action matches the row at their position.
    ///
    /// Anchors with empty text and anchors beyond the last row never match.
    pub fn anchor_matches(&self, table: &Table) -> usize {
        self.config
            .anchors
            .iter()
            .filter(|anchor| !anchor.action.trim().is_empty())
            .filter(|anchor| {
                anchor
                    .position
                    .checked_sub(1)
                    .and_then(|index| table.row(index))
                    .is_some_and(|row| steps_match(&row.text(columns::ACTION), &anchor.action))
            })
            .count()
    }

    /// Returns true if the table is a standard case under these settings.
    pub fn is_standard_case(&self, table: &Table) -> bool {
        self.is_applicable(table) && self.anchor_matches(table) >= self.config.min_matches
    }

    fn is_applicable(&self, table: &Table) -> bool {
        self.config.enabled
            && table.has_columns(&[columns::ACTION, columns::EXPECTED_RESULTS])
            && table.row_count() >= self.config.max_anchor_position()
    }

    fn mismatch(step: usize, row: usize, label: &str, expected: &str, found: &str) -> Issue {
        let field = if label == "Action" {
            columns::ACTION
        } else {
            columns::EXPECTED_RESULTS
        };
        Issue::new(
            RULE_ID,
            format!("Core Step {step} {label} mismatch. Expected: \"{expected}\" | Found: \"{found}\"."),
        )
        .at_row(row)
        .with_severity(Severity::Warning)
        .with_field(field)
    }
}

impl Validator for CoreStepsValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    #[instrument(skip(self, table), fields(rows = table.row_count(), enabled = self.config.enabled))]
    fn validate(&self, table: &Table) -> Vec<Issue> {
        if !self.is_applicable(table) {
            return Vec::new();
        }

        let matches = self.anchor_matches(table);
        if matches < self.config.min_matches {
            debug!(
                anchor.matches = matches,
                anchor.required = self.config.min_matches,
                "Not a standard case, core steps not enforced"
            );
            return Vec::new();
        }

        let enforced = self
            .config
            .steps_count
            .min(self.config.template.len())
            .min(table.row_count());
        debug!(
            anchor.matches = matches,
            steps.enforced = enforced,
            "Standard case detected"
        );

        let mut issues = Vec::new();
        for (row, expected) in table.rows().zip(&self.config.template).take(enforced) {
            let step = row.index() + 1;
            let found_action: Cow<'_, str> = row.text(columns::ACTION);
            let found_expected: Cow<'_, str> = row.text(columns::EXPECTED_RESULTS);

            if !steps_match(&found_action, &expected.action) {
                issues.push(Self::mismatch(
                    step,
                    row.excel_row(),
                    "Action",
                    &expected.action,
                    &found_action,
                ));
            }
            if !steps_match(&found_expected, &expected.expected) {
                issues.push(Self::mismatch(
                    step,
                    row.excel_row(),
                    "Expected Results",
                    &expected.expected,
                    &found_expected,
                ));
            }
        }
        issues
    }

    fn description(&self) -> Option<&str> {
        Some("Checks that standard test cases start with the core-steps template")
    }
}
