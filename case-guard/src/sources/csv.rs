//! CSV test-case files.

use super::expand_globs;
use crate::core::Table;
use crate::prelude::*;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

const UTF8_BOM: char = '\u{feff}';

/// Options for reading CSV files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the first line holds column names
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Records read for type inference; `None` reads the whole file
    pub schema_infer_max_records: Option<usize>,
    /// Whether records with fewer fields than the header are padded with nulls
    pub truncated_rows: bool,
    /// Rows per decoded record batch
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            schema_infer_max_records: None,
            truncated_rows: true,
            batch_size: 1024,
        }
    }
}

/// A test-case table stored as a CSV file.
///
/// Column types are inferred over every record: integer, float and boolean
/// columns keep their type, everything else is read as text. Empty cells,
/// and trailing cells missing from a short record, become
/// [`CellValue::Empty`](crate::core::CellValue::Empty). A record with more
/// fields than the header is a load error.
///
/// # Examples
///
/// ```rust,no_run
/// use case_guard::sources::{CsvOptions, CsvSource};
///
/// # fn example() -> case_guard::prelude::Result<()> {
/// let table = CsvSource::new("cases/login.csv").load()?;
///
/// let options = CsvOptions {
///     delimiter: b';',
///     ..Default::default()
/// };
/// let table = CsvSource::with_options("cases/export.csv", options).load()?;
///
/// for source in CsvSource::from_globs(&["cases/*.csv".to_string()])? {
///     println!("{}: {} rows", source.name(), source.load()?.row_count());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a source with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a source with custom options.
    pub fn with_options(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Creates one source per file matched by the glob patterns.
    ///
    /// Fails when nothing matches.
    pub fn from_globs(patterns: &[String]) -> Result<Vec<Self>> {
        Self::from_globs_with_options(patterns, CsvOptions::default())
    }

    /// Like [`CsvSource::from_globs`], sharing one set of options.
    pub fn from_globs_with_options(patterns: &[String], options: CsvOptions) -> Result<Vec<Self>> {
        Ok(expand_globs(patterns)?
            .into_iter()
            .map(|path| Self::with_options(path, options.clone()))
            .collect())
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name, used as the report title.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// The read options.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Reads the whole file into a [`Table`].
    ///
    /// # Errors
    ///
    /// Returns a load error when the file cannot be opened, has no columns,
    /// has a duplicated column name, or has a record with more fields than
    /// the header.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Table> {
        let mut file = File::open(&self.path).map_err(|e| {
            CaseGuardError::data_source_with_source(
                "CSV",
                format!("Failed to open {}", self.path.display()),
                Box::new(e),
            )
        })?;

        let format = Format::default()
            .with_header(self.options.has_header)
            .with_delimiter(self.options.delimiter)
            .with_quote(self.options.quote)
            .with_truncated_rows(self.options.truncated_rows);
        let (inferred, records_read) = format
            .infer_schema(&mut file, self.options.schema_infer_max_records)
            .with_context(|| format!("Failed to read header of {}", self.path.display()))?;
        debug!(
            columns = inferred.fields().len(),
            records_read, "Inferred CSV schema"
        );

        let schema = Arc::new(text_schema(&inferred));
        file.seek(SeekFrom::Start(0))?;

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(self.options.has_header)
            .with_delimiter(self.options.delimiter)
            .with_quote(self.options.quote)
            .with_truncated_rows(self.options.truncated_rows)
            .with_batch_size(self.options.batch_size)
            .build(file)?;
        let batches = reader
            .collect::<std::result::Result<Vec<RecordBatch>, _>>()
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        let table = Table::from_record_batches(schema, &batches)
            .with_context(|| format!("Invalid test case file {}", self.path.display()))?;
        debug!(
            rows = table.row_count(),
            columns = table.columns().len(),
            "Loaded CSV table"
        );
        Ok(table)
    }
}

/// Keeps integer, float and boolean columns; every other column becomes
/// nullable text. A leading byte-order mark is dropped from the first name.
fn text_schema(inferred: &Schema) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let name = if position == 0 {
                field.name().trim_start_matches(UTF8_BOM)
            } else {
                field.name().as_str()
            };
            let data_type = match field.data_type() {
                DataType::Int64 | DataType::Float64 | DataType::Boolean => {
                    field.data_type().clone()
                }
                _ => DataType::Utf8,
            };
            Field::new(name, data_type, true)
        })
        .collect();
    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_types() {
        let file = csv_file(
            "Test Case ID,Step #,Action,Expected Results\n\
             TC1,1,Open app,App opens.\n\
             TC1,2,,Closes.\n",
        );

        let table = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(
            table.columns(),
            &["Test Case ID", "Step #", "Action", "Expected Results"]
        );
        assert_eq!(table.row_count(), 2);

        let first = table.row(0).unwrap();
        assert_eq!(first.get("Step #"), Some(&CellValue::Integer(1)));
        assert_eq!(first.text("Action"), "Open app");
        assert!(table.row(1).unwrap().is_empty_like("Action"));
    }

    #[test]
    fn test_mixed_step_column_is_text() {
        let file = csv_file("Step #,Action\n1,a\ntwo,b\n");
        let table = CsvSource::new(file.path()).load().unwrap();

        assert_eq!(
            table.row(1).unwrap().get("Step #"),
            Some(&CellValue::Text("two".to_string()))
        );
    }

    #[test]
    fn test_bom_and_delimiter() {
        let file = csv_file("\u{feff}Action;Expected Results\nClick;Done.\n");
        let options = CsvOptions {
            delimiter: b';',
            ..Default::default()
        };

        let table = CsvSource::with_options(file.path(), options).load().unwrap();
        assert!(table.has_columns(&["Action", "Expected Results"]));
    }

    #[test]
    fn test_long_record_fails_to_load() {
        let file = csv_file("Action,Expected Results\nClick,Done.,extra\n");
        let err = CsvSource::new(file.path()).load().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_short_record_padded_with_empty_cells() {
        let file = csv_file(
            "Test Case ID,Step #,Action,Expected Results\n\
             TC1,1,Open app,App opens.\n\
             TC1,2,Do thing\n",
        );

        let table = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(table.row_count(), 2);
        let short = table.row(1).unwrap();
        assert_eq!(short.get("Step #"), Some(&CellValue::Integer(2)));
        assert_eq!(short.get("Expected Results"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_short_record_rejected_when_padding_disabled() {
        let file = csv_file("Action,Expected Results\nClick\n");
        let options = CsvOptions {
            truncated_rows: false,
            ..Default::default()
        };
        let err = CsvSource::with_options(file.path(), options).load().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_types_inferred_from_every_record() {
        let mut content = String::from("Step #,Action\n");
        for step in 1..=1500 {
            content.push_str(&format!("{step},a\n"));
        }
        content.push_str("two,b\n");
        let file = csv_file(&content);

        let table = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(table.row_count(), 1501);
        assert_eq!(
            table.row(1500).unwrap().get("Step #"),
            Some(&CellValue::Text("two".to_string()))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::new("/definitely/not/here.csv").load().unwrap_err();
        assert!(matches!(err, CaseGuardError::DataSource { .. }));
    }

    #[test]
    fn test_name() {
        assert_eq!(CsvSource::new("cases/login.csv").name(), "login.csv");
    }
}
