//! Core types: the table model, issues, severities and the scanner.
//!
//! ## Overview
//!
//! - **[`Table`]**: an immutable, ordered set of rows keyed by column name
//! - **[`Validator`]**: one rule, `&Table -> Vec<Issue>`
//! - **[`Issue`]**: one finding, tagged with a [`Severity`]
//! - **[`Scanner`]**: runs the built-in rules in a fixed order and returns a
//!   [`ScanResult`]
//!
//! ## Architecture
//!
//! ```text
//! Scanner
//!     ├── MissingColumns        (short-circuits the scan)
//!     ├── RequiredFields
//!     ├── BlankRows
//!     ├── DataRequired
//!     ├── Punctuation
//!     ├── GenericText
//!     ├── CoreSteps             (configured by ScanConfig)
//!     └── StepNumbering         (only with Test Case ID and Step #)
//! ```

mod issue;
mod scanner;
mod severity;
pub mod table;
mod validator;

pub use issue::{strict_mode, Issue};
pub use scanner::{IssueSummary, ScanResult, ScanStatus, Scanner};
pub use severity::Severity;
pub use table::{CellValue, Row, Table, TableBuilder};
pub use validator::{Activation, BoxedValidator, RegisteredValidator, Validator};
