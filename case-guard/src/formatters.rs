//! Report formatting for scan results.
//!
//! A [`ScanReport`] wraps one [`ScanResult`] with the name of the scanned
//! file and a timestamp. Formatters turn reports into text: [`HumanFormatter`]
//! for the console, [`JsonFormatter`] for other tools.
//!
//! # Examples
//!
//! ```rust
//! use case_guard::core::{Scanner, Table};
//! use case_guard::formatters::{HumanFormatter, ReportFormatter, ScanReport};
//!
//! let table = Table::builder(["Action", "Expected Results"])
//!     .row(["Click Save", "Record is saved"])
//!     .build()
//!     .unwrap();
//! let report = ScanReport::new("login.csv", Scanner::default().scan(&table));
//!
//! let output = HumanFormatter::plain().format(&report).unwrap();
//! assert!(output.contains("Excel Row 2:"));
//! ```

use crate::core::{Issue, IssueSummary, ScanResult, ScanStatus, Severity};
use crate::prelude::*;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

const RULE: &str = "==============================";

/// Options shared by all formatters.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include individual issues
    pub include_issues: bool,
    /// Maximum number of issues to show; `None` shows all
    pub max_issues: Option<usize>,
    /// Colorize the status line and severity prefixes
    pub use_colors: bool,
    /// Include the report timestamp
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_issues: true,
            max_issues: None,
            use_colors: true,
            include_timestamps: false,
        }
    }
}

impl FormatterConfig {
    /// Status and counts only.
    pub fn minimal() -> Self {
        Self {
            include_issues: false,
            max_issues: Some(0),
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Plain text, capped issue list and a timestamp, for CI logs.
    pub fn ci() -> Self {
        Self {
            include_issues: true,
            max_issues: Some(50),
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include issues.
    pub fn with_issues(mut self, include: bool) -> Self {
        self.include_issues = include;
        self
    }

    /// Caps the number of issues shown.
    pub fn with_max_issues(mut self, max: usize) -> Self {
        self.max_issues = Some(max);
        self
    }

    /// Sets whether to use ANSI colours.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Sets whether to include the timestamp.
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    fn visible_issues(&self, total: usize) -> usize {
        if !self.include_issues {
            return 0;
        }
        self.max_issues.map_or(total, |max| max.min(total))
    }
}

/// One scanned file, ready to be formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Name of the scanned file
    pub source: String,
    /// Appended to the report title, e.g. `(FINAL CHECK)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_suffix: Option<String>,
    /// When the scan finished
    pub timestamp: DateTime<Utc>,
    /// The scan outcome
    pub result: ScanResult,
}

impl ScanReport {
    /// Creates a report stamped with the current time.
    pub fn new(source: impl Into<String>, result: ScanResult) -> Self {
        Self {
            source: source.into(),
            title_suffix: None,
            timestamp: Utc::now(),
            result,
        }
    }

    /// Sets the title suffix.
    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffix = Some(suffix.into());
        self
    }

    /// Marks this report as the strict-mode final check.
    pub fn final_check(self) -> Self {
        self.with_title_suffix("(FINAL CHECK)")
    }

    /// The report title.
    pub fn title(&self) -> String {
        match &self.title_suffix {
            Some(suffix) => format!("TEST CASE SCAN REPORT {suffix}"),
            None => "TEST CASE SCAN REPORT".to_string(),
        }
    }

    /// RFC 3339 timestamp.
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Turns a [`ScanReport`] into text.
///
/// # Examples
///
/// ```rust
/// use case_guard::formatters::{ReportFormatter, ScanReport};
///
/// struct StatusOnly;
///
/// impl ReportFormatter for StatusOnly {
///     fn format(&self, report: &ScanReport) -> case_guard::prelude::Result<String> {
///         Ok(format!("{}: {}", report.source, report.result.status()))
///     }
/// }
/// ```
pub trait ReportFormatter {
    /// Formats a report.
    fn format(&self, report: &ScanReport) -> Result<String>;

    /// Formats a report with explicit options.
    fn format_with_config(&self, report: &ScanReport, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Console report: header, status, severity breakdown and issues grouped by
/// Excel row.
///
/// ```text
/// Loading test case file: login.csv
///
/// Columns: Test Case ID | Step # | Action | Expected Results
/// Steps loaded: 3
///
/// ==============================
/// TEST CASE SCAN REPORT
/// ==============================
/// Steps scanned: 3
///
/// Status: FAIL ❌
/// Issues found: 2
/// Breakdown: FAIL=1, WARNING=1
///
/// Excel Row 3:
///   FAIL: Action is empty
///   WARNING: Expected Results should end with a period (.)
/// ```
///
/// Rows are listed in ascending order; file-level issues come last under
/// `Excel Row ?`.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter without colours.
    pub fn plain() -> Self {
        Self::with_config(FormatterConfig::default().with_colors(false))
    }

    /// Creates a formatter with the given options.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn paint(text: &str, colour: &str, config: &FormatterConfig) -> String {
        if config.use_colors {
            format!("\x1b[{colour}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn status_line(status: ScanStatus, config: &FormatterConfig) -> String {
        match status {
            ScanStatus::Pass => format!("{} ✅", Self::paint("PASS", "32", config)),
            ScanStatus::PassWithWarnings => {
                format!("{} ⚠️", Self::paint("PASS (Warnings)", "33", config))
            }
            ScanStatus::Fail => format!("{} ❌", Self::paint("FAIL", "31", config)),
        }
    }

    fn severity_label(severity: Severity, config: &FormatterConfig) -> String {
        let colour = match severity {
            Severity::Fail => "31",
            Severity::Warning => "33",
            Severity::Info => "34",
        };
        Self::paint(severity.as_str(), colour, config)
    }

    fn breakdown(summary: &IssueSummary) -> String {
        [
            (Severity::Fail, summary.fail),
            (Severity::Warning, summary.warning),
            (Severity::Info, summary.info),
        ]
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(severity, count)| format!("{}={count}", severity.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Groups issues by row; `None` (file-level) sorts after every row.
    fn group_by_row(issues: &[Issue]) -> BTreeMap<(bool, usize), Vec<&Issue>> {
        let mut groups: BTreeMap<(bool, usize), Vec<&Issue>> = BTreeMap::new();
        for issue in issues {
            let key = match issue.row {
                Some(row) => (false, row),
                None => (true, 0),
            };
            groups.entry(key).or_default().push(issue);
        }
        groups
    }

    fn render(report: &ScanReport, config: &FormatterConfig, out: &mut String) -> fmt::Result {
        let result = &report.result;
        let summary = result.summary();

        writeln!(out, "Loading test case file: {}", report.source)?;
        writeln!(out)?;
        let columns: Vec<&str> = result.columns.iter().map(|c| c.trim()).collect();
        writeln!(out, "Columns: {}", columns.join(" | "))?;
        writeln!(out, "Steps loaded: {}", result.row_count)?;
        writeln!(out)?;

        writeln!(out, "{RULE}")?;
        writeln!(out, "{}", report.title())?;
        writeln!(out, "{RULE}")?;
        if config.include_timestamps {
            writeln!(out, "Timestamp: {}", report.timestamp_rfc3339())?;
        }
        writeln!(out, "Steps scanned: {}", result.row_count)?;
        writeln!(out)?;

        writeln!(out, "Status: {}", Self::status_line(result.status(), config))?;
        writeln!(out, "Issues found: {}", summary.total())?;
        if summary.total() > 0 {
            writeln!(out, "Breakdown: {}", Self::breakdown(&summary))?;
        }
        writeln!(out)?;

        let mut remaining = config.visible_issues(result.issues.len());
        let hidden = result.issues.len() - remaining;
        for ((file_level, row), issues) in Self::group_by_row(&result.issues) {
            if remaining == 0 {
                break;
            }
            if file_level {
                writeln!(out, "Excel Row ?:")?;
            } else {
                writeln!(out, "Excel Row {row}:")?;
            }
            for issue in issues.iter().take(remaining) {
                writeln!(
                    out,
                    "  {}: {}",
                    Self::severity_label(issue.severity, config),
                    issue.message
                )?;
                remaining -= 1;
            }
            writeln!(out)?;
        }

        if config.include_issues && hidden > 0 {
            writeln!(out, "... and {hidden} more issues")?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &ScanReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        Self::render(report, config, &mut output)
            .map_err(|e| CaseGuardError::Internal(format!("Failed to render report: {e}")))?;
        Ok(output)
    }
}

/// Machine-readable report.
///
/// The output carries the source name, title, status, severity summary,
/// row count, columns and issues in execution order.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing formatter.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a formatter with the given options.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to pretty-print.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    status: ScanStatus,
    summary: IssueSummary,
    row_count: usize,
    columns: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a [Issue]>,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &ScanReport, config: &FormatterConfig) -> Result<String> {
        let result = &report.result;
        let visible = config.visible_issues(result.issues.len());
        let json = JsonReport {
            source: &report.source,
            title: report.title(),
            timestamp: config
                .include_timestamps
                .then(|| report.timestamp_rfc3339()),
            status: result.status(),
            summary: result.summary(),
            row_count: result.row_count,
            columns: &result.columns,
            issues: config.include_issues.then(|| &result.issues[..visible]),
        };

        let output = if self.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        output.map_err(|e| CaseGuardError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Issue;

    fn report(issues: Vec<Issue>) -> ScanReport {
        ScanReport::new(
            "login.csv",
            ScanResult {
                row_count: 3,
                columns: vec!["Action".to_string(), "Expected Results".to_string()],
                issues,
            },
        )
    }

    fn sample_issues() -> Vec<Issue> {
        vec![
            Issue::new("STEP_NUMBERING", "Missing Step # in Test Case ID TC1: 2").at_row(4),
            Issue::new("MISSING_COLUMNS", "Missing required columns: Step #"),
            Issue::new("REQUIRED_FIELDS", "Action is empty").at_row(3),
            Issue::new("BLANK_ROW", "Blank row")
                .at_row(4)
                .with_severity(Severity::Warning),
        ]
    }

    #[test]
    fn test_human_pass() {
        let output = HumanFormatter::plain().format(&report(Vec::new())).unwrap();
        assert!(output.starts_with("Loading test case file: login.csv\n\n"));
        assert!(output.contains("Columns: Action | Expected Results\n"));
        assert!(output.contains("Steps loaded: 3\n"));
        assert!(output.contains("Status: PASS ✅\n"));
        assert!(output.contains("Issues found: 0\n"));
        assert!(!output.contains("Breakdown"));
        assert!(!output.contains("Excel Row"));
    }

    #[test]
    fn test_human_groups_rows_then_file_level() {
        let output = HumanFormatter::plain().format(&report(sample_issues())).unwrap();

        assert!(output.contains("Status: FAIL ❌\n"));
        assert!(output.contains("Breakdown: FAIL=3, WARNING=1\n"));

        let row3 = output.find("Excel Row 3:").unwrap();
        let row4 = output.find("Excel Row 4:").unwrap();
        let file_level = output.find("Excel Row ?:").unwrap();
        assert!(row3 < row4 && row4 < file_level);
        assert!(output.contains(
            "Excel Row 4:\n  FAIL: Missing Step # in Test Case ID TC1: 2\n  WARNING: Blank row\n"
        ));
    }

    #[test]
    fn test_human_final_check_title_and_warnings_status() {
        let issues = vec![Issue::new("BLANK_ROW", "Blank row")
            .at_row(2)
            .with_severity(Severity::Warning)];
        let output = HumanFormatter::plain()
            .format(&report(issues).final_check())
            .unwrap();

        assert!(output.contains("TEST CASE SCAN REPORT (FINAL CHECK)\n"));
        assert!(output.contains("Status: PASS (Warnings) ⚠️\n"));
    }

    #[test]
    fn test_human_max_issues() {
        let config = FormatterConfig::default()
            .with_colors(false)
            .with_max_issues(2);
        let output = HumanFormatter::with_config(config)
            .format(&report(sample_issues()))
            .unwrap();

        assert!(output.contains("Excel Row 3:"));
        assert!(!output.contains("Excel Row ?:"));
        assert!(output.contains("... and 2 more issues"));
    }

    #[test]
    fn test_human_colors() {
        let output = HumanFormatter::new().format(&report(sample_issues())).unwrap();
        assert!(output.contains("\x1b[31mFAIL\x1b[0m"));
    }

    #[test]
    fn test_json_report() {
        let output = JsonFormatter::new().format(&report(sample_issues())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["source"], "login.csv");
        assert_eq!(value["status"], "fail");
        assert_eq!(value["summary"]["fail"], 3);
        assert_eq!(value["issues"].as_array().unwrap().len(), 4);
        assert_eq!(value["issues"][1]["rule"], "MISSING_COLUMNS");
        assert!(value["issues"][1].get("row").is_none());
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_json_minimal() {
        let output = JsonFormatter::with_config(FormatterConfig::minimal().with_timestamps(true))
            .with_pretty(false)
            .format(&report(sample_issues()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(value.get("issues").is_none());
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
