//! Error types for case-guard.
//!
//! Validation findings are never errors: they are returned as
//! [`Issue`](crate::core::Issue) values. `CaseGuardError` covers the cases
//! where a scan cannot start at all, such as a test-case file that cannot be
//! read or parsed into a table, or an invalid configuration.

use thiserror::Error;

/// The main error type for case-guard.
#[derive(Error, Debug)]
pub enum CaseGuardError {
    /// A test-case file is missing, unreadable or has a malformed header.
    #[error("Data source error: {message}")]
    DataSource {
        /// Kind of input, such as "CSV" or "file"
        source_type: String,
        /// What went wrong
        message: String,
        /// The I/O or Arrow error behind it, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Arrow could not decode the CSV records.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Reading a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The records do not form a rectangular table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The scan settings or config file are invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A config file or report could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A bug or an environment problem unrelated to the input.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, CaseGuardError>`.
pub type Result<T> = std::result::Result<T, CaseGuardError>;

impl CaseGuardError {
    /// Load error without an underlying cause.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Load error wrapping the error that caused it.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Invalid settings.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this error means the table could not be loaded.
    ///
    /// Load errors are fatal to a scan: no validator runs and no partial
    /// result is produced.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::DataSource { .. } | Self::Arrow(_) | Self::Io(_) | Self::Parse(_)
        )
    }
}

impl From<serde_json::Error> for CaseGuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Prefixes error messages with what the caller was doing.
pub trait ErrorContext<T> {
    /// Prefixes the error message with `msg`.
    fn context(self, msg: &str) -> Result<T>;

    /// Like [`ErrorContext::context`], building the message only on error.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<CaseGuardError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| add_context(f(), e.into()))
    }
}

// Keeps the variant so load errors stay load errors after gaining context.
fn add_context(msg: String, err: CaseGuardError) -> CaseGuardError {
    match err {
        CaseGuardError::DataSource {
            source_type,
            message,
            source,
        } => CaseGuardError::DataSource {
            source_type,
            message: format!("{msg}: {message}"),
            source,
        },
        CaseGuardError::Io(inner) => CaseGuardError::DataSource {
            source_type: "file".to_string(),
            message: format!("{msg}: {inner}"),
            source: Some(Box::new(inner)),
        },
        CaseGuardError::Arrow(inner) => CaseGuardError::DataSource {
            source_type: "arrow".to_string(),
            message: format!("{msg}: {inner}"),
            source: Some(Box::new(inner)),
        },
        CaseGuardError::Parse(inner) => CaseGuardError::Parse(format!("{msg}: {inner}")),
        CaseGuardError::Configuration(inner) => {
            CaseGuardError::Configuration(format!("{msg}: {inner}"))
        }
        CaseGuardError::Serialization(inner) => {
            CaseGuardError::Serialization(format!("{msg}: {inner}"))
        }
        CaseGuardError::Internal(inner) => CaseGuardError::Internal(format!("{msg}: {inner}")),
    }
}
