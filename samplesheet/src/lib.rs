//! # Samplesheet - preflight check for VCF / traits / ancestry samplesheets
//!
//! Validates a tabular samplesheet before a pipeline run and writes a
//! normalized comma-delimited copy in which every sample is numbered by run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Any-delim  │────▶│   Sniffer   │────▶│ RowChecker  │────▶│  CSV with   │
//! │ samplesheet │     │ (delimiter, │     │ (suffixes,  │     │ single_end, │
//! │  (ISO/UTF8) │     │   header)   │     │  _T{n})     │     │ S1_T1, ...  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types and exit codes
//! - [`models`] - Header and row models
//! - [`parser`] - Encoding detection, dialect sniffing, CSV writing
//! - [`validation`] - Per-row checks and sample renaming
//! - [`pipeline`] - File-level orchestration
//! - [`report`] - Diagnostics sink
//! - [`logging`] - `[LEVEL] message` tracing setup for the CLI

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Orchestration
pub mod pipeline;

// Diagnostics
pub mod logging;
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CheckError, CheckResult, DialectError, DialectResult, RowError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Columns, Row, REQUIRED_COLUMNS, SINGLE_END};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    decode_input,
    detect_encoding,
    read_samplesheet,
    sniff,
    sniff_format,
    write_samplesheet,
    DecodedInput,
    Dialect,
    DEFAULT_SAMPLE_LINES,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{RowChecker, UniqueKey, ANCESTRY_SUFFIX, TRAITS_SUFFIX, VCF_SUFFIX};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    check_content,
    check_samplesheet,
    write_summary,
    CheckOptions,
    CheckReport,
    CheckedSheet,
};

// =============================================================================
// Re-exports - Diagnostics
// =============================================================================

pub use logging::{init_logging, LogLevel};
pub use report::{CollectingReporter, Diagnostic, Reporter, Severity, TracingReporter};
