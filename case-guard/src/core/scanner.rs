//! The scanner: runs every rule against a table in a fixed order.

use super::{strict_mode, Activation, Issue, RegisteredValidator, Severity, Table, Validator};
use crate::config::ScanConfig;
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use crate::rules::{
    BlankRowsValidator, CoreStepsValidator, DataRequiredValidator, GenericTextValidator,
    MissingColumnsValidator, PunctuationValidator, RequiredFieldsValidator,
    StepNumberingValidator, STEP_NUMBERING_COLUMNS,
};
use crate::sources::CsvSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Runs the validation pipeline over test-case tables.
///
/// The order is fixed: the schema check runs first and stops the scan when
/// it reports anything; then required fields, blank rows, data-required,
/// punctuation, generic text, core steps, and finally step numbering when
/// `Test Case ID` and `Step #` are both present. Issues are returned in that
/// execution order.
///
/// # Examples
///
/// ```rust
/// use case_guard::config::ScanConfig;
/// use case_guard::core::{Scanner, ScanStatus, Table};
///
/// let table = Table::builder(["Test Case ID", "Step #", "Action", "Expected Results"])
///     .row(["TC1", "1", "Open the app", "Login screen displays."])
///     .row(["TC1", "2", "Log in", "OK"])
///     .build()
///     .unwrap();
///
/// let result = Scanner::new(ScanConfig::default()).scan(&table);
/// assert_eq!(result.status(), ScanStatus::PassWithWarnings);
/// assert_eq!(result.strict().status(), ScanStatus::Fail);
/// ```
#[derive(Debug)]
pub struct Scanner {
    config: ScanConfig,
    schema: MissingColumnsValidator,
    validators: Vec<RegisteredValidator>,
    log_config: LogConfig,
}

impl Scanner {
    /// Creates a scanner with the built-in rule set.
    pub fn new(config: ScanConfig) -> Self {
        let validators = vec![
            RegisteredValidator::always(RequiredFieldsValidator),
            RegisteredValidator::always(BlankRowsValidator),
            RegisteredValidator::always(DataRequiredValidator),
            RegisteredValidator::always(PunctuationValidator),
            RegisteredValidator::always(GenericTextValidator),
            RegisteredValidator::always(CoreStepsValidator::new(config.core_steps.clone())),
            RegisteredValidator::when(
                StepNumberingValidator,
                Activation::requires_columns(STEP_NUMBERING_COLUMNS),
            ),
        ];

        Self {
            config,
            schema: MissingColumnsValidator,
            validators,
            log_config: LogConfig::default(),
        }
    }

    /// Sets the logging configuration.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// The configuration this scanner was built with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Names of the rules in execution order, schema check first.
    pub fn rule_names(&self) -> Vec<&str> {
        std::iter::once(self.schema.name())
            .chain(self.validators.iter().map(|v| v.validator().name()))
            .collect()
    }

    /// Scans a table.
    #[instrument(skip(self, table), fields(
        scan.rows = table.row_count(),
        scan.columns = table.columns().len()
    ))]
    pub fn scan(&self, table: &Table) -> ScanResult {
        info!(
            scan.rows = table.row_count(),
            scan.columns = table.columns().len(),
            scan.rules = self.validators.len() + 1,
            "Starting scan"
        );
        let start = Instant::now();

        let mut issues = self.schema.validate(table);
        if !issues.is_empty() {
            warn!(
                rule = self.schema.name(),
                issues = issues.len(),
                "Schema check failed, skipping remaining rules"
            );
            return ScanResult::new(table, issues);
        }

        for registered in &self.validators {
            let validator = registered.validator();
            if !registered.activation().is_active(table) {
                crate::log_rule!(
                    self.log_config,
                    rule = validator.name(),
                    activation = ?registered.activation(),
                    "Rule skipped, required columns absent"
                );
                continue;
            }

            let found = validator.validate(table);
            crate::log_rule!(
                self.log_config,
                rule = validator.name(),
                issues = found.len(),
                "Rule completed"
            );
            for issue in &found {
                crate::perf_debug!(
                    self.log_config,
                    rule = validator.name(),
                    row = ?issue.row,
                    message = %truncate_field(&issue.message, self.log_config.max_field_length),
                    "Issue found"
                );
            }
            issues.extend(found);
        }

        let result = ScanResult::new(table, issues);
        let summary = result.summary();
        info!(
            scan.fail = summary.fail,
            scan.warning = summary.warning,
            scan.info = summary.info,
            scan.status = %result.status(),
            scan.duration_ms = start.elapsed().as_millis() as u64,
            "Scan completed"
        );
        result
    }

    /// Loads a CSV source and scans it.
    ///
    /// A load failure is returned as an error and no rule runs.
    pub fn scan_source(&self, source: &CsvSource) -> Result<ScanResult> {
        crate::log_data_op!(
            self.log_config,
            source.path = %source.path().display(),
            "Loading test case file"
        );
        let table = source.load()?;
        Ok(self.scan(&table))
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Issue counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Number of `Fail` issues
    pub fail: usize,
    /// Number of `Warning` issues
    pub warning: usize,
    /// Number of `Info` issues
    pub info: usize,
}

impl IssueSummary {
    /// Counts the issues by severity.
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues
            .iter()
            .fold(Self::default(), |mut summary, issue| {
                match issue.severity {
                    Severity::Fail => summary.fail += 1,
                    Severity::Warning => summary.warning += 1,
                    Severity::Info => summary.info += 1,
                }
                summary
            })
    }

    /// Total number of issues.
    pub fn total(&self) -> usize {
        self.fail + self.warning + self.info
    }
}

/// Overall outcome of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// No issues at all
    Pass,
    /// Issues, none of them failures
    PassWithWarnings,
    /// At least one failure
    Fail,
}

impl ScanStatus {
    /// Returns true unless the scan failed.
    pub fn is_pass(&self) -> bool {
        !matches!(self, ScanStatus::Fail)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScanStatus::Pass => "PASS",
            ScanStatus::PassWithWarnings => "PASS (Warnings)",
            ScanStatus::Fail => "FAIL",
        };
        f.write_str(label)
    }
}

/// The outcome of scanning one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Number of data rows
    pub row_count: usize,
    /// Column names in header order
    pub columns: Vec<String>,
    /// Issues in rule execution order
    pub issues: Vec<Issue>,
}

impl ScanResult {
    fn new(table: &Table, issues: Vec<Issue>) -> Self {
        Self {
            row_count: table.row_count(),
            columns: table.columns().to_vec(),
            issues,
        }
    }

    /// Issue counts per severity.
    pub fn summary(&self) -> IssueSummary {
        IssueSummary::from_issues(&self.issues)
    }

    /// Overall status.
    pub fn status(&self) -> ScanStatus {
        let summary = self.summary();
        if summary.total() == 0 {
            ScanStatus::Pass
        } else if summary.fail > 0 {
            ScanStatus::Fail
        } else {
            ScanStatus::PassWithWarnings
        }
    }

    /// Returns true if any issue is a failure.
    pub fn has_failures(&self) -> bool {
        self.issues.iter().any(|issue| issue.severity == Severity::Fail)
    }

    /// Returns a copy with strict mode applied to every issue.
    pub fn strict(&self) -> Self {
        Self {
            row_count: self.row_count,
            columns: self.columns.clone(),
            issues: strict_mode(&self.issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreStepsConfig;
    use crate::rules::ids;

    fn rules(result: &ScanResult) -> Vec<&str> {
        result.issues.iter().map(|issue| issue.rule.as_str()).collect()
    }

    #[test]
    fn test_schema_failure_short_circuits() {
        let table = Table::builder(["Test Case ID", "Step #", "Action"])
            .row(["TC1", "1", ""])
            .row(["", "", ""])
            .build()
            .unwrap();

        let result = Scanner::default().scan(&table);
        assert_eq!(rules(&result), vec![ids::MISSING_COLUMNS]);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.columns, vec!["Test Case ID", "Step #", "Action"]);
        assert_eq!(result.status(), ScanStatus::Fail);
    }

    #[test]
    fn test_execution_order() {
        let table = Table::builder(["Test Case ID", "Step #", "Action", "Data", "Expected Results"])
            .row(["TC1", "1", "", "", "Done"])
            .row(["", "", "", "", ""])
            .row(["TC1", "3", "Search for patient using name or SSN", "", "Patient displays."])
            .build()
            .unwrap();

        let result = Scanner::default().scan(&table);
        assert_eq!(
            rules(&result),
            vec![
                ids::REQUIRED_FIELDS,
                ids::BLANK_ROW,
                ids::DATA_REQUIRED,
                ids::EXPECTED_RESULTS_PUNCTUATION,
                ids::GENERIC_EXPECTED_RESULTS,
                ids::STEP_NUMBERING,
            ]
        );
    }

    #[test]
    fn test_step_numbering_inactive_without_columns() {
        let table = Table::builder(["Action", "Expected Results"])
            .row(["Open", "Opens."])
            .build()
            .unwrap();

        let result = Scanner::default().scan(&table);
        assert!(result.issues.is_empty());
        assert_eq!(result.status(), ScanStatus::Pass);
    }

    #[test]
    fn test_summary_and_strict() {
        let table = Table::builder(["Action", "Expected Results"])
            .row(["Open", "Opens"])
            .row(["Close", "ok"])
            .build()
            .unwrap();

        let result = Scanner::default().scan(&table);
        assert_eq!(
            result.summary(),
            IssueSummary {
                fail: 0,
                warning: 3,
                info: 0
            }
        );
        assert_eq!(result.status(), ScanStatus::PassWithWarnings);
        assert!(!result.has_failures());

        let strict = result.strict();
        assert_eq!(strict.summary().fail, 3);
        assert_eq!(strict.issues.len(), result.issues.len());
        assert_eq!(result.summary().warning, 3);
    }

    #[test]
    fn test_core_steps_config_is_explicit() {
        let rows: Vec<[&str; 2]> = vec![
            ["Launch", "Window opens."],
            ["Select", "Login displays."],
            ["Enter PIN and hit Enter", "Notice displays."],
            ["Click OK button", "News displays."],
        ];
        let table = rows
            .iter()
            .fold(Table::builder(["Action", "Expected Results"]), |b, row| b.row(*row))
            .build()
            .unwrap();

        let core_steps = CoreStepsConfig::default().with_anchors(vec![
            crate::config::AnchorStep::new(3, "Enter PIN and hit Enter"),
            crate::config::AnchorStep::new(4, "Click OK button"),
        ]);
        let enabled = Scanner::new(ScanConfig::new().with_core_steps(core_steps.clone()));
        let disabled = Scanner::new(
            ScanConfig::new().with_core_steps(core_steps.with_enabled(false)),
        );

        let result = enabled.scan(&table);
        assert_eq!(rules(&result), vec![ids::CORE_STEPS; 6]);
        assert!(disabled.scan(&table).issues.is_empty());
    }

    #[test]
    fn test_rule_names() {
        let scanner = Scanner::default();
        let names = scanner.rule_names();
        assert_eq!(names.first(), Some(&ids::MISSING_COLUMNS));
        assert_eq!(names.last(), Some(&ids::STEP_NUMBERING));
        assert_eq!(names.len(), 8);
    }
}
