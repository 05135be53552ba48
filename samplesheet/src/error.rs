//! Error types for the samplesheet check.
//!
//! - [`DialectError`] - dialect sniffing failures (no header, unknown delimiter)
//! - [`RowError`] - a single row broke a naming convention, with its line number
//! - [`CheckError`] - top-level errors, each mapped to a process exit code
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Dialect Errors
// =============================================================================

/// Errors while inferring the tabular dialect from the leading lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialectError {
    /// Nothing to sniff.
    #[error("The given sample sheet is empty.")]
    Empty,

    /// The first line does not look like a header.
    #[error("The given sample sheet does not appear to contain a header.")]
    NoHeader,

    /// No candidate delimiter splits the sample consistently.
    #[error("Could not determine the delimiter of the sample sheet (tried {tried}).")]
    UndeterminedDelimiter { tried: String },

    /// Reading the sample failed.
    #[error("Could not read the sample sheet prefix: {0}")]
    Read(String),
}

// =============================================================================
// Row Errors
// =============================================================================

/// A row that failed validation.
///
/// Mirrors the location-first layout of the parser errors: the line is always
/// known, the column and offending value when the failure is about one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for RowError {}

impl RowError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// =============================================================================
// Check Errors (top-level)
// =============================================================================

/// Top-level errors of [`crate::pipeline::check_samplesheet`].
///
/// Every variant is fatal. [`CheckError::exit_code`] gives the process status.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Input path missing or not a regular file.
    #[error("The given input file {} was not found!", .path.display())]
    InputNotFound { path: PathBuf },

    /// Reading the input or writing the output failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input bytes could not be decoded as text.
    #[error("Could not decode the sample sheet as {encoding}: {message}")]
    Encoding { encoding: String, message: String },

    /// Dialect could not be inferred.
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// Required columns absent from the header.
    #[error(
        "The sample sheet **must** contain these column headers: {}. It currently contains: {}.",
        .required.join(", "),
        .found.join(", ")
    )]
    Schema {
        required: Vec<String>,
        found: Vec<String>,
    },

    /// A row failed its naming conventions.
    #[error(transparent)]
    Row(#[from] RowError),

    /// Sample keys were not unique across the sheet.
    #[error("The {key} must be unique: found {distinct} distinct values for {rows} rows.")]
    Uniqueness {
        key: &'static str,
        distinct: usize,
        rows: usize,
    },

    /// Malformed delimited text (for example an unterminated quote).
    #[error("Invalid sample sheet format: {0}")]
    Csv(#[from] csv::Error),

    /// The summary report could not be serialized.
    #[error("Could not serialize the check summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckError {
    /// Process exit status for this error: 2 for a missing input, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::InputNotFound { .. } => 2,
            _ => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for dialect sniffing.
pub type DialectResult<T> = Result<T, DialectError>;

/// Result type for the whole check.
pub type CheckResult<T> = Result<T, CheckError>;
