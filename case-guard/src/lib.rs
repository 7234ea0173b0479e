//! # case-guard: quality checks for manual test-case spreadsheets
//!
//! case-guard scans tables of manual QA test steps (one row per step, with
//! `Test Case ID`, `Step #`, `Action`, `Data` and `Expected Results`
//! columns) and reports what a reviewer would otherwise catch by hand:
//! empty required cells, broken step numbering, vague expected results,
//! and drift from the standard login sequence most cases start with.
//!
//! ## Quick Start
//!
//! ```rust
//! use case_guard::prelude::*;
//!
//! let table = Table::builder(["Test Case ID", "Step #", "Action", "Expected Results"])
//!     .row(["TC1", "1", "Open the app", "Login screen displays."])
//!     .row(["TC1", "1", "Log in", "Works"])
//!     .build()
//!     .unwrap();
//!
//! let scanner = Scanner::new(ScanConfig::default());
//! let result = scanner.scan(&table);
//!
//! for issue in &result.issues {
//!     println!("row {:?} {}: {}", issue.row, issue.severity, issue.message);
//! }
//! assert_eq!(result.status(), ScanStatus::Fail);
//! ```
//!
//! ## Rules and severities
//!
//! Every rule is a [`Validator`](core::Validator) reporting
//! [`Issue`](core::Issue)s. `FAIL` issues block sign-off; `WARNING` issues
//! flag conventions and become failures under
//! [`strict_mode`](core::strict_mode), which a final check applies before
//! sign-off. See [`rules`] for the catalog.
//!
//! Row numbers in issues are Excel row numbers: the first data row is row 2,
//! since row 1 holds the header.
//!
//! ## Architecture
//!
//! - **`core`**: the table model, issues, severities and the [`Scanner`](core::Scanner)
//! - **`rules`**: the built-in validators
//! - **`config`**: scan settings, loadable from JSON
//! - **`sources`**: CSV loading through Arrow
//! - **`formatters`**: console and JSON reports
//! - **`logging`**: `tracing` configuration

pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod rules;
pub mod sources;
