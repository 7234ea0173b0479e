//! The issue record produced by validators and the strict-mode transform.

use super::Severity;
use serde::{Deserialize, Serialize};

/// A single validation finding.
///
/// Issues are immutable values: validators create them, reporting and
/// strict mode consume them. Promotion to a stricter severity produces a new
/// issue rather than mutating the original.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::{Issue, Severity};
///
/// let issue = Issue::new("REQUIRED_FIELDS", "Action is empty")
///     .at_row(2)
///     .with_field("Action");
///
/// assert_eq!(issue.severity, Severity::Fail);
/// assert_eq!(issue.row, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Excel row number (`index + 2`); `None` for file-level issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Human-readable description of the problem
    pub message: String,
    /// Identifier of the rule that produced the issue
    pub rule: String,
    /// Severity; defaults to `Fail` when absent
    #[serde(default)]
    pub severity: Severity,
    /// Column the issue refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Issue {
    /// Creates a file-level `Fail` issue.
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        let issue = Self {
            row: None,
            message: message.into(),
            rule: rule.into(),
            severity: Severity::default(),
            field: None,
        };
        debug_assert!(!issue.rule.is_empty(), "issue rule must not be empty");
        debug_assert!(!issue.message.is_empty(), "issue message must not be empty");
        issue
    }

    /// Attaches an Excel row number.
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the column the issue refers to.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns true if the issue is not tied to a row.
    pub fn is_file_level(&self) -> bool {
        self.row.is_none()
    }

    /// Returns a copy of this issue with its strict-mode severity.
    pub fn promoted(&self) -> Self {
        Self {
            severity: self.severity.strict(),
            ..self.clone()
        }
    }
}

/// Applies strict mode to a sequence of issues.
///
/// Every `Warning` becomes a `Fail`; `Fail` and `Info` issues are carried
/// over unchanged. The output has the same length and order as the input,
/// and the input is left untouched.
pub fn strict_mode(issues: &[Issue]) -> Vec<Issue> {
    issues.iter().map(Issue::promoted).collect()
}
