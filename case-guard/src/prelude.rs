//! Prelude for commonly used types and traits in case-guard.

pub use crate::config::{ConfigFile, CoreStepsConfig, ScanConfig};
pub use crate::core::{Issue, ScanResult, ScanStatus, Scanner, Severity, Table, Validator};
pub use crate::error::{CaseGuardError, ErrorContext, Result};
pub use crate::formatters::{FormatterConfig, ReportFormatter, ScanReport};
pub use crate::logging::LogConfig;
pub use crate::sources::CsvSource;
