//! Issue severity levels.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The severity of a validation issue.
///
/// Severities are ordered: `Fail > Warning > Info`.
///
/// - **Fail**: the test case must be fixed before sign-off (empty required
///   fields, broken step numbering, missing columns).
/// - **Warning**: a convention is not followed (punctuation, generic wording,
///   core-step template drift). Warnings become failures in strict mode.
/// - **Info**: observations that never block sign-off.
///
/// `Fail` is the default: an issue whose severity is absent or not
/// recognised is treated as a failure.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::Severity;
///
/// assert!(Severity::Fail > Severity::Warning);
/// assert_eq!(Severity::parse_lenient("warn"), Severity::Warning);
/// assert_eq!(Severity::parse_lenient("critical"), Severity::Fail);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational only
    Info = 0,
    /// Should be fixed; promoted to `Fail` in strict mode
    Warning = 1,
    /// Must be fixed
    #[default]
    Fail = 2,
}

impl Severity {
    /// Returns the string representation used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Fail => "FAIL",
        }
    }

    /// Parses a severity label, falling back to `Fail` for anything unknown.
    ///
    /// Accepts `FAIL`/`ERROR`, `WARNING`/`WARN` and `INFO` in any case,
    /// surrounded by any whitespace.
    pub fn parse_lenient(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// Checks if this severity is at least as severe as another.
    pub fn is_at_least(&self, other: Severity) -> bool {
        *self >= other
    }

    /// The severity this level takes in strict mode.
    pub fn strict(self) -> Self {
        match self {
            Severity::Warning => Severity::Fail,
            other => other,
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FAIL" | "ERROR" => Ok(Severity::Fail),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "INFO" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

// Unknown or null labels deserialize as `Fail`.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .map(|label| Severity::parse_lenient(&label))
            .unwrap_or_default())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Fail > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Fail.is_at_least(Severity::Fail));
        assert!(!Severity::Info.is_at_least(Severity::Warning));
    }

    #[test]
    fn test_severity_default_is_fail() {
        assert_eq!(Severity::default(), Severity::Fail);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Severity::parse_lenient(" error "), Severity::Fail);
        assert_eq!(Severity::parse_lenient("Warn"), Severity::Warning);
        assert_eq!(Severity::parse_lenient("WARNING"), Severity::Warning);
        assert_eq!(Severity::parse_lenient("info"), Severity::Info);
        assert_eq!(Severity::parse_lenient(""), Severity::Fail);
        assert_eq!(Severity::parse_lenient("notice"), Severity::Fail);
    }

    #[test]
    fn test_strict_promotion() {
        assert_eq!(Severity::Warning.strict(), Severity::Fail);
        assert_eq!(Severity::Fail.strict(), Severity::Fail);
        assert_eq!(Severity::Info.strict(), Severity::Info);
    }

    #[test]
    fn test_severity_serde() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");

        let severity: Severity = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(severity, Severity::Info);

        let severity: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(severity, Severity::Fail);

        let severity: Severity = serde_json::from_str("null").unwrap();
        assert_eq!(severity, Severity::Fail);
    }
}
