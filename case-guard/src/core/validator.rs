//! The validator capability shared by all rules.

use super::{Issue, Table};
use std::fmt::Debug;

/// A validation rule that inspects a whole table.
///
/// Validators are stateless with respect to the table: they read it, never
/// modify it, and report every finding as an [`Issue`]. A validator whose
/// columns are absent returns no issues rather than failing.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::{Issue, Severity, Table, Validator};
///
/// #[derive(Debug)]
/// struct NoTodoActions;
///
/// impl Validator for NoTodoActions {
///     fn name(&self) -> &str {
///         "NO_TODO_ACTIONS"
///     }
///
///     fn validate(&self, table: &Table) -> Vec<Issue> {
///         table
///             .rows()
///             .filter(|row| row.text("Action").contains("TODO"))
///             .map(|row| {
///                 Issue::new(self.name(), "Action still contains TODO")
///                     .at_row(row.excel_row())
///                     .with_severity(Severity::Warning)
///             })
///             .collect()
///     }
/// }
/// ```
pub trait Validator: Debug + Send + Sync {
    /// Rule identifier attached to every issue this validator produces.
    fn name(&self) -> &str;

    /// Runs the rule against the table.
    fn validate(&self, table: &Table) -> Vec<Issue>;

    /// A description of what this validator checks.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A boxed validator for use in collections.
pub type BoxedValidator = Box<dyn Validator>;

/// When the scanner runs a registered validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Run on every table
    Always,
    /// Run only when the table has all of these columns
    RequiresColumns(Vec<String>),
}

impl Activation {
    /// Creates a column-subset activation.
    pub fn requires_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Activation::RequiresColumns(columns.into_iter().map(Into::into).collect())
    }

    /// Returns true if the validator should run against `table`.
    pub fn is_active(&self, table: &Table) -> bool {
        match self {
            Activation::Always => true,
            Activation::RequiresColumns(columns) => {
                columns.iter().all(|column| table.has_column(column))
            }
        }
    }
}

/// A validator paired with its activation predicate.
#[derive(Debug)]
pub struct RegisteredValidator {
    validator: BoxedValidator,
    activation: Activation,
}

impl RegisteredValidator {
    /// Registers a validator that always runs.
    pub fn always(validator: impl Validator + 'static) -> Self {
        Self {
            validator: Box::new(validator),
            activation: Activation::Always,
        }
    }

    /// Registers a validator with an explicit activation.
    pub fn when(validator: impl Validator + 'static, activation: Activation) -> Self {
        Self {
            validator: Box::new(validator),
            activation,
        }
    }

    /// The wrapped validator.
    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    /// The activation predicate.
    pub fn activation(&self) -> &Activation {
        &self.activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_requires_columns() {
        let table = Table::builder(["Test Case ID", "Action"]).build().unwrap();

        assert!(Activation::Always.is_active(&table));
        assert!(Activation::requires_columns(["Test Case ID"]).is_active(&table));
        assert!(!Activation::requires_columns(["Test Case ID", "Step #"]).is_active(&table));
    }
}
