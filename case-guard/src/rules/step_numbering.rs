//! Step-sequence integrity within each test case.

use crate::core::table::{columns, is_empty_like, to_int_step, Row};
use crate::core::{Issue, Severity, Table, Validator};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Rule identifier.
pub const RULE_ID: &str = "STEP_NUMBERING";

/// Columns this rule needs; the scanner registers it with this subset.
pub const REQUIRED_COLUMNS: [&str; 2] = [columns::TEST_CASE_ID, columns::STEP];

/// Runs of missing steps longer than this are written as `first-last`.
const MAX_LISTED_RUN: i64 = 3;

/// Validates `Step #` numbering per `Test Case ID`.
///
/// Rows are grouped by test case in first-appearance order, keeping row
/// order within each group. For every group it reports:
///
/// - empty or non-numeric step numbers, one issue per row;
/// - duplicated step numbers, one issue per affected row, in the order each
///   number first appears;
/// - gaps in `1..=max`, one issue on the group's first row listing them all
///   (long runs are written as `first-last`);
/// - the first decrease in row order, one issue on that row.
///
/// These checks are independent and can all fire for the same group.
/// Blank rows and rows without a test case id are ignored.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::{Table, Validator};
/// use case_guard::rules::StepNumberingValidator;
///
/// let table = Table::builder(["Test Case ID", "Step #", "Action", "Expected Results"])
///     .row(["TC1", "1", "Open", "Opens."])
///     .row(["TC1", "3", "Close", "Closes."])
///     .build()
///     .unwrap();
///
/// let issues = StepNumberingValidator.validate(&table);
/// assert_eq!(issues[0].message, "Missing Step # in Test Case ID TC1: 2");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StepNumberingValidator;

impl StepNumberingValidator {
    fn group_rows(table: &Table) -> Vec<(String, Vec<Row<'_>>)> {
        let mut groups: Vec<(String, Vec<Row<'_>>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in table
            .rows()
            .filter(|row| !row.is_blank() && !row.is_empty_like(columns::TEST_CASE_ID))
        {
            let id = row.text(columns::TEST_CASE_ID).trim().to_string();
            match positions.get(&id) {
                Some(&position) => groups[position].1.push(row),
                None => {
                    positions.insert(id.clone(), groups.len());
                    groups.push((id, vec![row]));
                }
            }
        }

        groups
    }

    fn check_group(id: &str, rows: &[Row<'_>], issues: &mut Vec<Issue>) {
        let issue = |row: usize, message: String| {
            Issue::new(RULE_ID, message)
                .at_row(row)
                .with_severity(Severity::Fail)
                .with_field(columns::STEP)
        };

        let mut steps_in_order: Vec<(usize, i64)> = Vec::with_capacity(rows.len());
        let mut first_seen: Vec<i64> = Vec::new();
        let mut step_rows: HashMap<i64, Vec<usize>> = HashMap::new();

        for row in rows {
            let excel_row = row.excel_row();
            let Some(raw) = row.get(columns::STEP) else {
                continue;
            };

            match to_int_step(raw) {
                Some(step) => {
                    steps_in_order.push((excel_row, step));
                    let step_at = step_rows.entry(step).or_default();
                    if step_at.is_empty() {
                        first_seen.push(step);
                    }
                    step_at.push(excel_row);
                }
                None if is_empty_like(raw) => issues.push(issue(
                    excel_row,
                    format!("Step # is empty (Test Case ID: {id})"),
                )),
                None => issues.push(issue(
                    excel_row,
                    format!(
                        "Step # is not a number: \"{}\" (Test Case ID: {id})",
                        raw.as_text().trim()
                    ),
                )),
            }
        }

        if first_seen.is_empty() {
            return;
        }

        for step in &first_seen {
            let duplicate_rows = &step_rows[step];
            if duplicate_rows.len() > 1 {
                for &row in duplicate_rows {
                    issues.push(issue(
                        row,
                        format!("Duplicate Step # {step} in Test Case ID {id}"),
                    ));
                }
            }
        }

        let mut present = first_seen;
        present.sort_unstable();
        let missing = missing_runs(&present);
        if let Some(first_row) = rows.first().filter(|_| !missing.is_empty()) {
            issues.push(issue(
                first_row.excel_row(),
                format!("Missing Step # in Test Case ID {id}: {}", missing.join(", ")),
            ));
        }

        if let Some(window) = steps_in_order
            .windows(2)
            .find(|window| window[1].1 < window[0].1)
        {
            issues.push(issue(
                window[1].0,
                format!("Step # is out of order in Test Case ID {id} (expected ascending order)"),
            ));
        }
    }
}

/// Describes the numbers of `1..=max` absent from `present` (sorted, unique).
///
/// Work is proportional to `present.len()`, whatever the step values are.
fn missing_runs(present: &[i64]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut next: i64 = 1;
    for &step in present.iter().filter(|&&step| step >= 1) {
        if step > next {
            let last = step - 1;
            if last - next < MAX_LISTED_RUN {
                runs.extend((next..=last).map(|missing| missing.to_string()));
            } else {
                runs.push(format!("{next}-{last}"));
            }
        }
        next = step.saturating_add(1);
    }
    runs
}

impl Validator for StepNumberingValidator {
    fn name(&self) -> &str {
        RULE_ID
    }

    #[instrument(skip(self, table), fields(rows = table.row_count()))]
    fn validate(&self, table: &Table) -> Vec<Issue> {
        if !table.has_columns(&REQUIRED_COLUMNS) {
            return Vec::new();
        }

        let groups = Self::group_rows(table);
        debug!(test_cases = groups.len(), "Checking step numbering");

        let mut issues = Vec::new();
        for (id, rows) in &groups {
            Self::check_group(id, rows, &mut issues);
        }
        issues
    }

    fn description(&self) -> Option<&str> {
        Some("Checks that steps are numbered 1..N without gaps, duplicates or reordering")
    }
}
