//! Built-in validation rules for test-case tables.
//!
//! Each rule implements the [`Validator`](crate::core::Validator) trait and
//! reports its findings under a fixed rule identifier.
//!
//! ## Rule Catalog
//!
//! | Rule | Identifier | Severity |
//! |------|------------|----------|
//! | [`MissingColumnsValidator`] | `MISSING_COLUMNS` | FAIL |
//! | [`RequiredFieldsValidator`] | `REQUIRED_FIELDS` | FAIL |
//! | [`BlankRowsValidator`] | `BLANK_ROW` | WARNING |
//! | [`DataRequiredValidator`] | `DATA_REQUIRED` | FAIL |
//! | [`PunctuationValidator`] | `EXPECTED_RESULTS_PUNCTUATION` | WARNING |
//! | [`GenericTextValidator`] | `GENERIC_EXPECTED_RESULTS` | WARNING |
//! | [`CoreStepsValidator`] | `CORE_STEPS` | WARNING |
//! | [`StepNumberingValidator`] | `STEP_NUMBERING` | FAIL |
//!
//! Every rule except the schema check treats a missing column as "does not
//! apply" and returns no issues.
//!
//! ## Usage
//!
//! Rules can run on their own, outside a [`Scanner`](crate::core::Scanner):
//!
//! ```rust
//! use case_guard::core::{Table, Validator};
//! use case_guard::rules::{GenericTextValidator, PunctuationValidator};
//!
//! let table = Table::builder(["Action", "Expected Results"])
//!     .row(["Click Save", "Works"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(PunctuationValidator.validate(&table).len(), 1);
//! assert_eq!(GenericTextValidator.validate(&table).len(), 1);
//! ```

mod blank_rows;
mod core_steps;
mod data_required;
mod generic_text;
mod missing_columns;
mod punctuation;
mod required_fields;
mod step_numbering;

pub use blank_rows::BlankRowsValidator;
pub use core_steps::{normalize_spaces, steps_match, CoreStepsValidator};
pub use data_required::DataRequiredValidator;
pub use generic_text::{GenericTextValidator, GENERIC_PHRASES};
pub use missing_columns::MissingColumnsValidator;
pub use punctuation::PunctuationValidator;
pub use required_fields::RequiredFieldsValidator;
pub use step_numbering::StepNumberingValidator;

/// Rule identifiers, as attached to [`Issue::rule`](crate::core::Issue::rule).
pub mod ids {
    pub use super::blank_rows::RULE_ID as BLANK_ROW;
    pub use super::core_steps::RULE_ID as CORE_STEPS;
    pub use super::data_required::RULE_ID as DATA_REQUIRED;
    pub use super::generic_text::RULE_ID as GENERIC_EXPECTED_RESULTS;
    pub use super::missing_columns::RULE_ID as MISSING_COLUMNS;
    pub use super::punctuation::RULE_ID as EXPECTED_RESULTS_PUNCTUATION;
    pub use super::required_fields::RULE_ID as REQUIRED_FIELDS;
    pub use super::step_numbering::RULE_ID as STEP_NUMBERING;
}

pub use step_numbering::REQUIRED_COLUMNS as STEP_NUMBERING_COLUMNS;
