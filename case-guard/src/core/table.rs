//! In-memory test-case table and the row helpers shared by every rule.
//!
//! A [`Table`] is an ordered sequence of rows sharing one header. Row order
//! is significant: it defines step order within a test case, and row
//! position is what issues report as the "Excel row number"
//! (zero-based index + 2, row 1 being the header).

use crate::prelude::*;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Well-known column names of a test-case sheet.
pub mod columns {
    /// Identifier grouping the steps of one test case
    pub const TEST_CASE_ID: &str = "Test Case ID";
    /// 1-based step number within a test case
    pub const STEP: &str = "Step #";
    /// What the tester does
    pub const ACTION: &str = "Action";
    /// Input data for the step (alternative header)
    pub const INPUT_DATA: &str = "Input Data";
    /// Input data for the step
    pub const DATA: &str = "Data";
    /// What the tester should observe
    pub const EXPECTED_RESULTS: &str = "Expected Results";

    /// Columns that identify a row; a row is blank when all of them are empty.
    pub const IDENTITY: [&str; 6] = [TEST_CASE_ID, STEP, ACTION, INPUT_DATA, DATA, EXPECTED_RESULTS];
}

/// Placeholder tokens treated as "no value" (compared trimmed, lowercase).
const EMPTY_LIKE_TOKENS: [&str; 9] = ["", "-", "--", "n/a", "na", "none", "null", "nil", "empty"];

/// A raw cell value as produced by the table loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing value
    #[default]
    Empty,
    /// Text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number; NaN marks a missing value
    Float(f64),
    /// Boolean
    Boolean(bool),
}

impl CellValue {
    /// Returns true if the cell counts as empty (see [`is_empty_like`]).
    pub fn is_empty_like(&self) -> bool {
        is_empty_like(self)
    }

    /// Returns the cell as text; empty cells read as `""`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(text) => Cow::Borrowed(text.as_str()),
            CellValue::Empty => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Returns true for missing values, blank text, NaN and placeholder tokens
/// such as `"-"`, `"N/A"` or `"none"`.
pub fn is_empty_like(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => true,
        CellValue::Float(number) => number.is_nan(),
        CellValue::Text(text) => {
            let text = text.trim().to_lowercase();
            EMPTY_LIKE_TOKENS.contains(&text.as_str())
        }
        CellValue::Integer(_) | CellValue::Boolean(_) => false,
    }
}

/// Coerces a `Step #` cell to an integer.
///
/// Returns `None` for empty-like cells and for values that are not whole
/// numbers (`"2.5"`, `"abc"`, `inf`). Whole floats such as `3.0` are
/// accepted. Callers tell "empty" from "malformed" with [`is_empty_like`].
pub fn to_int_step(value: &CellValue) -> Option<i64> {
    if is_empty_like(value) {
        return None;
    }
    match value {
        CellValue::Integer(number) => Some(*number),
        CellValue::Float(number) => whole_number(*number),
        CellValue::Text(text) => text.trim().parse::<f64>().ok().and_then(whole_number),
        CellValue::Empty | CellValue::Boolean(_) => None,
    }
}

fn whole_number(number: f64) -> Option<i64> {
    const LIMIT: f64 = i64::MAX as f64;
    if number.is_finite() && number.fract() == 0.0 && number.abs() < LIMIT {
        Some(number as i64)
    } else {
        None
    }
}

/// Converts a zero-based row index into the Excel row number.
///
/// Row 1 holds the header, so the first data row is row 2.
pub fn excel_row_number(index: usize) -> usize {
    index + 2
}

/// Returns true if every identity column of the row is empty-like.
///
/// Absent columns count as empty.
pub fn is_blank_row(row: &Row<'_>) -> bool {
    columns::IDENTITY
        .iter()
        .all(|column| row.get(column).map_or(true, is_empty_like))
}

/// An immutable table of test-case rows.
///
/// # Examples
///
/// ```rust
/// use case_guard::core::Table;
///
/// let table = Table::builder(["Test Case ID", "Step #", "Action", "Expected Results"])
///     .row(["TC1", "1", "Open the app", "Login screen displays."])
///     .row(["TC1", "2", "Log in", "Home page displays."])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.row_count(), 2);
/// assert!(table.has_column("Action"));
/// assert_eq!(table.row(0).unwrap().excel_row(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates a table from a header and rows.
    ///
    /// Fails when the header is empty, a column name repeats, or a row's
    /// width does not match the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(CaseGuardError::data_source(
                "table",
                "No columns found in header",
            ));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), position).is_some() {
                return Err(CaseGuardError::data_source(
                    "table",
                    format!("Duplicate column '{name}' in header"),
                ));
            }
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(CaseGuardError::Parse(format!(
                "Row {} has {} cells but the header has {} columns",
                excel_row_number(index),
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            positions,
            rows,
        })
    }

    /// Starts building a table with the given header.
    pub fn builder<I, S>(columns: I) -> TableBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableBuilder {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from Arrow record batches sharing `schema`.
    ///
    /// Integer, float and boolean columns keep their type, text columns are
    /// read as text, and any other type is rendered with Arrow's display
    /// formatting. Nulls become [`CellValue::Empty`].
    pub fn from_record_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let mut rows = Vec::new();

        for batch in batches {
            if batch.num_columns() != columns.len() {
                return Err(CaseGuardError::Parse(format!(
                    "Record batch has {} columns but the schema has {}",
                    batch.num_columns(),
                    columns.len()
                )));
            }

            let mut batch_rows = vec![Vec::with_capacity(columns.len()); batch.num_rows()];
            for array in batch.columns() {
                for (row, cell) in batch_rows.iter_mut().zip(column_cells(array.as_ref())?) {
                    row.push(cell);
                }
            }
            rows.extend(batch_rows);
        }

        Self::new(columns, rows)
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the header contains `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Returns true if the header contains every column in `columns`.
    pub fn has_columns(&self, columns: &[&str]) -> bool {
        columns.iter().all(|column| self.has_column(column))
    }

    /// Returns the row at a zero-based index.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    /// Iterates rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    fn cell(&self, index: usize, column: &str) -> Option<&CellValue> {
        let position = *self.positions.get(column)?;
        self.rows.get(index)?.get(position)
    }
}

fn column_cells(array: &dyn Array) -> Result<Vec<CellValue>> {
    let cell = |row: usize, value: CellValue| {
        if array.is_null(row) {
            CellValue::Empty
        } else {
            value
        }
    };

    let cells = match array.data_type() {
        DataType::Null => vec![CellValue::Empty; array.len()],
        DataType::Int64 => {
            let values = array.as_primitive::<Int64Type>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Integer(values.value(row))))
                .collect()
        }
        DataType::Int32 => {
            let values = array.as_primitive::<Int32Type>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Integer(i64::from(values.value(row)))))
                .collect()
        }
        DataType::Float64 => {
            let values = array.as_primitive::<Float64Type>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Float(values.value(row))))
                .collect()
        }
        DataType::Float32 => {
            let values = array.as_primitive::<Float32Type>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Float(f64::from(values.value(row)))))
                .collect()
        }
        DataType::Boolean => {
            let values = array.as_boolean();
            (0..array.len())
                .map(|row| cell(row, CellValue::Boolean(values.value(row))))
                .collect()
        }
        DataType::Utf8 => {
            let values = array.as_string::<i32>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Text(values.value(row).to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let values = array.as_string::<i64>();
            (0..array.len())
                .map(|row| cell(row, CellValue::Text(values.value(row).to_string())))
                .collect()
        }
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array, &options)?;
            (0..array.len())
                .map(|row| cell(row, CellValue::Text(formatter.value(row).to_string())))
                .collect()
        }
    };

    Ok(cells)
}

/// Builder for [`Table`], mainly for callers that assemble rows in memory.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TableBuilder {
    /// Appends a row.
    pub fn row<I, V>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the table, validating its shape.
    pub fn build(self) -> Result<Table> {
        Table::new(self.columns, self.rows)
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// Zero-based position in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Excel row number of this row.
    pub fn excel_row(&self) -> usize {
        excel_row_number(self.index)
    }

    /// Returns the cell for `column`, or `None` if the column is absent.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table.cell(self.index, column)
    }

    /// Returns the cell text for `column`; absent or empty cells read as `""`.
    pub fn text(&self, column: &str) -> Cow<'a, str> {
        self.get(column)
            .map_or(Cow::Borrowed(""), |value| value.as_text())
    }

    /// Returns true if the column is absent or its cell is empty-like.
    pub fn is_empty_like(&self, column: &str) -> bool {
        self.get(column).map_or(true, is_empty_like)
    }

    /// Returns true if all identity columns are empty-like.
    pub fn is_blank(&self) -> bool {
        is_blank_row(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_is_empty_like_tokens() {
        for token in ["", "   ", "-", "--", "N/A", "na", "None", "NULL", "nil", " Empty "] {
            assert!(is_empty_like(&CellValue::from(token)), "{token:?}");
        }
        assert!(is_empty_like(&CellValue::Empty));
        assert!(is_empty_like(&CellValue::Float(f64::NAN)));

        assert!(!is_empty_like(&CellValue::from("0")));
        assert!(!is_empty_like(&CellValue::from("nothing")));
        assert!(!is_empty_like(&CellValue::Integer(0)));
        assert!(!is_empty_like(&CellValue::Float(0.0)));
        assert!(!is_empty_like(&CellValue::Boolean(false)));
    }

    #[test]
    fn test_to_int_step() {
        assert_eq!(to_int_step(&CellValue::Integer(4)), Some(4));
        assert_eq!(to_int_step(&CellValue::Float(3.0)), Some(3));
        assert_eq!(to_int_step(&CellValue::from(" 7 ")), Some(7));
        assert_eq!(to_int_step(&CellValue::from("5.0")), Some(5));

        assert_eq!(to_int_step(&CellValue::Float(2.5)), None);
        assert_eq!(to_int_step(&CellValue::from("2.5")), None);
        assert_eq!(to_int_step(&CellValue::from("abc")), None);
        assert_eq!(to_int_step(&CellValue::from("inf")), None);
        assert_eq!(to_int_step(&CellValue::Float(f64::NAN)), None);
        assert_eq!(to_int_step(&CellValue::from("n/a")), None);
        assert_eq!(to_int_step(&CellValue::Empty), None);
    }

    #[test]
    fn test_excel_row_number() {
        assert_eq!(excel_row_number(0), 2);
        assert_eq!(excel_row_number(9), 11);
    }

    #[test]
    fn test_blank_row_detection() {
        let table = Table::builder(["Test Case ID", "Step #", "Action", "Expected Results", "Notes"])
            .row(["", "-", "  ", "n/a", "ignored column has text"])
            .row(["TC1", "", "", "", ""])
            .build()
            .unwrap();

        assert!(table.row(0).unwrap().is_blank());
        assert!(!table.row(1).unwrap().is_blank());
    }

    #[test]
    fn test_blank_row_with_absent_columns() {
        let table = Table::builder(["Action"]).row([""]).build().unwrap();
        assert!(is_blank_row(&table.row(0).unwrap()));
    }

    #[test]
    fn test_row_access() {
        let table = Table::builder(["Action", "Expected Results"])
            .row([CellValue::from("Click OK"), CellValue::Empty])
            .build()
            .unwrap();

        let row = table.row(0).unwrap();
        assert_eq!(row.text("Action"), "Click OK");
        assert_eq!(row.text("Expected Results"), "");
        assert_eq!(row.text("Data"), "");
        assert!(row.get("Data").is_none());
        assert!(row.is_empty_like("Expected Results"));
        assert!(table.row(1).is_none());
    }

    #[test]
    fn test_table_shape_errors() {
        let err = Table::new(vec![], vec![]).unwrap_err();
        assert!(err.is_load_error());

        let err = Table::builder(["Action", "Action"]).build().unwrap_err();
        assert!(err.to_string().contains("Duplicate column 'Action'"));

        let err = Table::builder(["Action", "Expected Results"])
            .row(["only one"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Row 2 has 1 cells"));
    }

    #[test]
    fn test_from_record_batches() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Test Case ID", DataType::Utf8, true),
            Field::new("Step #", DataType::Int64, true),
            Field::new("Score", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("TC1"), None])) as ArrayRef,
                Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(2.5), Some(3.0)])) as ArrayRef,
            ],
        )
        .unwrap();

        let table = Table::from_record_batches(schema, &[batch]).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns(), ["Test Case ID", "Step #", "Score"]);

        let first = table.row(0).unwrap();
        assert_eq!(first.get("Step #"), Some(&CellValue::Integer(1)));
        assert_eq!(first.get("Score"), Some(&CellValue::Float(2.5)));

        let second = table.row(1).unwrap();
        assert_eq!(second.get("Test Case ID"), Some(&CellValue::Empty));
        assert_eq!(second.get("Step #"), Some(&CellValue::Empty));
    }
}
