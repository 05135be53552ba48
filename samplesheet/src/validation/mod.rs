//! Row validation and sample renaming.
//!
//! [`RowChecker`] consumes rows in input order. Each row must follow the file
//! naming conventions of its `vcf`, `traits` and `ancestry` columns; accepted
//! rows are kept in order and their uniqueness key recorded. Once every row
//! is in, [`RowChecker::validate_unique_samples`] checks that keys were
//! unique and suffixes each sample with `_T{n}`, where `n` counts earlier
//! rows of the same sample (multiple runs per sample).
//!
//! # Example
//!
//! ```rust,ignore
//! let mut checker = RowChecker::new(UniqueKey::SampleVcf);
//! for (i, row) in rows.into_iter().enumerate() {
//!     checker.validate_and_transform(i + 2, row)?;
//! }
//! checker.validate_unique_samples()?;
//! ```

use clap::ValueEnum;
use std::collections::{HashMap, HashSet};

use crate::error::{CheckError, CheckResult, RowError};
use crate::models::{Columns, Row, ANCESTRY, TRAITS, VCF};

pub const VCF_SUFFIX: &str = ".vcf.gz";
pub const TRAITS_SUFFIX: &str = "_traits-json.json";
pub const ANCESTRY_SUFFIX: &str = "_ancestry-json.json";

/// What has to be unique across the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UniqueKey {
    /// The combination of sample name and VCF path.
    #[default]
    SampleVcf,
    /// The sample name alone; any repeated sample is rejected.
    Sample,
}

impl UniqueKey {
    fn describe(self) -> &'static str {
        match self {
            UniqueKey::SampleVcf => "pair of sample name and VCF",
            UniqueKey::Sample => "sample name",
        }
    }
}

/// Convert one parsed record into a [`Row`], rejecting ragged lines.
pub fn row_from_record(line: usize, record: &csv::StringRecord, columns: &Columns) -> Result<Row, RowError> {
    if record.len() != columns.len() {
        return Err(RowError::new(
            line,
            format!("Expected {} fields, found {}.", columns.len(), record.len()),
        ));
    }
    Ok(Row::new(record.iter().map(String::from).collect(), columns))
}

fn check_suffix(line: usize, column: &str, value: &str, label: &str, suffix: &str) -> Result<(), RowError> {
    if value.ends_with(suffix) {
        return Ok(());
    }
    Err(RowError::new(
        line,
        format!("Unexpected {label} file extension. The valid extension should be: {suffix}."),
    )
    .with_column(column)
    .with_value(value))
}

/// Validates rows one by one and renames samples once all are accepted.
#[derive(Debug, Clone, Default)]
pub struct RowChecker {
    unique_key: UniqueKey,
    seen: HashSet<(String, String)>,
    modified: Vec<Row>,
    occurrences: HashMap<String, usize>,
}

impl RowChecker {
    pub fn new(unique_key: UniqueKey) -> Self {
        Self {
            unique_key,
            ..Self::default()
        }
    }

    /// Validate the row found on input line `line` and keep it.
    pub fn validate_and_transform(&mut self, line: usize, row: Row) -> Result<(), RowError> {
        Self::validate_files(line, &row)?;
        let key = self.key(&row);
        self.seen.insert(key);
        self.modified.push(row);
        Ok(())
    }

    /// Assert that the VCF, traits and ancestry files have the expected extensions.
    fn validate_files(line: usize, row: &Row) -> Result<(), RowError> {
        check_suffix(line, VCF, row.vcf(), "VCF", VCF_SUFFIX)?;
        check_suffix(line, TRAITS, row.traits(), "traits", TRAITS_SUFFIX)?;
        check_suffix(line, ANCESTRY, row.ancestry(), "ancestry", ANCESTRY_SUFFIX)
    }

    fn key(&self, row: &Row) -> (String, String) {
        match self.unique_key {
            UniqueKey::SampleVcf => (row.sample().to_string(), row.vcf().to_string()),
            UniqueKey::Sample => (row.sample().to_string(), String::new()),
        }
    }

    /// Check that every accepted row had a distinct key, then rename each
    /// sample to `{sample}_T{n}` in input order.
    ///
    /// Meant to run once, after the last row.
    pub fn validate_unique_samples(&mut self) -> CheckResult<()> {
        if self.seen.len() != self.modified.len() {
            return Err(CheckError::Uniqueness {
                key: self.unique_key.describe(),
                distinct: self.seen.len(),
                rows: self.modified.len(),
            });
        }

        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for row in &mut self.modified {
            let count = occurrences.entry(row.sample().to_string()).or_insert(0);
            *count += 1;
            let renamed = format!("{}_T{}", row.sample(), count);
            row.set_sample(renamed);
        }
        self.occurrences = occurrences;
        Ok(())
    }

    /// Accepted rows in input order.
    pub fn rows(&self) -> &[Row] {
        &self.modified
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.modified
    }

    /// Number of samples that appeared on more than one row.
    pub fn repeated_samples(&self) -> usize {
        self.occurrences.values().filter(|&&n| n > 1).count()
    }
}
