//! High-level API: check a samplesheet file and write the normalized copy.
//!
//! # Example
//!
//! ```rust,ignore
//! use samplesheet::{check_samplesheet, CheckOptions, TracingReporter};
//! use std::path::Path;
//!
//! let report = check_samplesheet(
//!     Path::new("samplesheet.csv"),
//!     Path::new("samplesheet.valid.csv"),
//!     &CheckOptions::default(),
//!     &mut TracingReporter,
//! )?;
//! println!("{} rows written", report.row_count);
//! ```

use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{CheckError, CheckResult};
use crate::models::{Columns, Row};
use crate::parser::{read_samplesheet, sniff_format, write_samplesheet, Dialect, DEFAULT_SAMPLE_LINES};
use crate::report::Reporter;
use crate::validation::{row_from_record, RowChecker, UniqueKey};

/// Options for the check.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Number of leading lines used to sniff the dialect.
    pub sample_lines: usize,

    /// What must be unique across rows.
    pub unique_key: UniqueKey,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            sample_lines: DEFAULT_SAMPLE_LINES,
            unique_key: UniqueKey::default(),
        }
    }
}

/// A fully validated samplesheet with renamed samples.
#[derive(Debug, Clone)]
pub struct CheckedSheet {
    pub dialect: Dialect,
    pub columns: Columns,
    pub rows: Vec<Row>,
    pub repeated_samples: usize,
}

impl CheckedSheet {
    /// The normalized comma-delimited text.
    pub fn to_csv(&self) -> CheckResult<String> {
        let mut out = Vec::new();
        write_samplesheet(&mut out, &self.columns, &self.rows)?;
        String::from_utf8(out).map_err(|e| CheckError::Encoding {
            encoding: "utf-8".to_string(),
            message: e.to_string(),
        })
    }
}

/// Summary of a successful check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub file_in: PathBuf,
    pub file_out: PathBuf,
    pub encoding: String,
    pub dialect: Dialect,
    pub input_columns: Vec<String>,
    pub output_columns: Vec<String>,
    pub row_count: usize,
    /// Samples that appeared on more than one row.
    pub repeated_samples: usize,
}

/// Check `file_in` and write the normalized samplesheet to `file_out`.
///
/// 1. Verifies the input is a regular file
/// 2. Decodes it and sniffs the dialect
/// 3. Validates the header and every row
/// 4. Checks uniqueness and renames samples
/// 5. Creates the parent directory of `file_out` and writes it
///
/// Nothing is written unless every step succeeds. A failure is reported
/// once through `reporter` before being returned.
pub fn check_samplesheet<R: Reporter>(
    file_in: &Path,
    file_out: &Path,
    options: &CheckOptions,
    reporter: &mut R,
) -> CheckResult<CheckReport> {
    let result = run(file_in, file_out, options, reporter);
    match &result {
        Err(err @ CheckError::InputNotFound { .. }) => reporter.error(err.to_string()),
        Err(err) => reporter.critical(err.to_string()),
        Ok(_) => {}
    }
    result
}

fn run<R: Reporter>(
    file_in: &Path,
    file_out: &Path,
    options: &CheckOptions,
    reporter: &mut R,
) -> CheckResult<CheckReport> {
    if !file_in.is_file() {
        return Err(CheckError::InputNotFound {
            path: file_in.to_path_buf(),
        });
    }

    reporter.info(format!("Checking samplesheet {}", file_in.display()));
    let input = read_samplesheet(file_in)?;
    reporter.debug(format!("Detected encoding: {}", input.encoding));

    let sheet = check_content(&input.text, options, reporter)?;

    if let Some(parent) = file_out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CheckError::io(parent, e))?;
    }
    let csv = sheet.to_csv()?;
    std::fs::write(file_out, csv).map_err(|e| CheckError::io(file_out, e))?;
    reporter.info(format!(
        "Wrote {} rows to {}",
        sheet.rows.len(),
        file_out.display()
    ));

    Ok(CheckReport {
        file_in: file_in.to_path_buf(),
        file_out: file_out.to_path_buf(),
        encoding: input.encoding,
        dialect: sheet.dialect,
        input_columns: sheet.columns.names().to_vec(),
        output_columns: sheet.columns.output_header(),
        row_count: sheet.rows.len(),
        repeated_samples: sheet.repeated_samples,
    })
}

/// Validate samplesheet text in memory.
///
/// Errors are returned, not reported; [`check_samplesheet`] does the reporting.
pub fn check_content<R: Reporter>(
    text: &str,
    options: &CheckOptions,
    reporter: &mut R,
) -> CheckResult<CheckedSheet> {
    let mut handle = Cursor::new(text.as_bytes());
    let dialect = sniff_format(&mut handle, options.sample_lines)?;
    reporter.debug(format!(
        "Detected delimiter '{}' and quote '{}'",
        format_delimiter(dialect.delimiter),
        dialect.quote
    ));

    let mut reader = dialect.reader(handle);
    let columns = Columns::from_header(reader.headers()?.iter())?;
    reporter.debug(format!("Columns: {}", columns.names().join(", ")));

    let mut checker = RowChecker::new(options.unique_key);
    for (i, record) in reader.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = record?;
        let row = row_from_record(line, &record, &columns)?;
        checker.validate_and_transform(line, row)?;
    }
    checker.validate_unique_samples()?;

    let repeated_samples = checker.repeated_samples();
    if repeated_samples > 0 {
        reporter.info(format!(
            "{repeated_samples} sample(s) appear on several rows and were numbered by run"
        ));
    }

    Ok(CheckedSheet {
        dialect,
        columns,
        rows: checker.into_rows(),
        repeated_samples,
    })
}

/// Write the check report as pretty JSON.
pub fn write_summary(report: &CheckReport, path: &Path) -> CheckResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CheckError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| CheckError::io(path, e))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CollectingReporter, Severity};

    fn check(text: &str) -> CheckResult<CheckedSheet> {
        check_content(text, &CheckOptions::default(), &mut CollectingReporter::new())
    }

    #[test]
    fn test_single_row() {
        let sheet = check(
            "sample,vcf,traits,ancestry\n\
             S1,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n",
        )
        .unwrap();
        assert_eq!(
            sheet.to_csv().unwrap(),
            "sample,single_end,vcf,traits,ancestry\n\
             S1_T1,,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n"
        );
    }

    #[test]
    fn test_tab_input_written_as_comma() {
        let sheet = check(
            "sample\tvcf\ttraits\tancestry\n\
             S1\tS1.vcf.gz\tS1_traits-json.json\tS1_ancestry-json.json\n",
        )
        .unwrap();
        assert_eq!(sheet.dialect.delimiter, '\t');
        assert!(sheet.to_csv().unwrap().starts_with("sample,single_end,vcf"));
    }

    #[test]
    fn test_bad_suffix_reports_line() {
        let err = check(
            "sample,vcf,traits,ancestry\n\
             S1,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n\
             S2,S2.vcf,S2_traits-json.json,S2_ancestry-json.json\n",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Line 3"), "{msg}");
        assert!(msg.contains(".vcf.gz"), "{msg}");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let err = check(
            "sample,vcf,traits,ancestry\n\
             S1,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n\
             S2,S2.vcf.gz,S2_traits-json.json,S2_ancestry-json.json\n\
             S3,S3.vcf.gz,S3_traits-json.json,S3_ancestry-json.json\n\
             S4,S4.vcf.gz,S4_traits-json.json,S4_ancestry-json.json\n\
             S5,S5.vcf.gz,S5_traits-json.json,S5_ancestry-json.json\n\
             S6,S6.vcf.gz,S6_traits-json.json,S6_ancestry-json.json\n\
             S7,S7.vcf.gz,S7_traits-json.json,S7_ancestry-json.json\n\
             S8,S8.vcf.gz,S8_traits-json.json,S8_ancestry-json.json\n\
             S9,S9.vcf.gz,S9_traits-json.json,S9_ancestry-json.json\n\
             S10,S10.vcf.gz\n",
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Line 11"), "{err}");
    }

    #[test]
    fn test_ragged_row_within_sniffed_lines() {
        let err = check(
            "sample,vcf,traits,ancestry\n\
             S1,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n\
             S2,S2.vcf.gz\n",
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::Row(_)));
        assert!(err.to_string().starts_with("Line 3"), "{err}");
    }

    #[test]
    fn test_space_after_comma() {
        let sheet = check(
            "sample, vcf, traits, ancestry\n\
             S1, S1.vcf.gz, S1_traits-json.json, S1_ancestry-json.json\n\
             S1, S1_b.vcf.gz, S1_traits-json.json, S1_ancestry-json.json\n",
        )
        .unwrap();
        assert!(sheet.dialect.skip_initial_space);
        assert_eq!(
            sheet.to_csv().unwrap(),
            "sample,single_end,vcf,traits,ancestry\n\
             S1_T1,,S1.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n\
             S1_T2,,S1_b.vcf.gz,S1_traits-json.json,S1_ancestry-json.json\n"
        );
    }

    #[test]
    fn test_missing_column() {
        let err = check(
            "sample,vcf,traits\n\
             S1,S1.vcf.gz,S1_traits-json.json\n",
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::Schema { .. }));
    }

    #[test]
    fn test_header_only_sheet() {
        let sheet = check("sample,vcf,traits,ancestry\n").unwrap();
        assert!(sheet.rows.is_empty());
        assert_eq!(sheet.to_csv().unwrap(), "sample,single_end,vcf,traits,ancestry\n");
    }

    #[test]
    fn test_debug_diagnostics() {
        let mut reporter = CollectingReporter::new();
        check_content(
            "sample;vcf;traits;ancestry\n\
             S1;S1_a.vcf.gz;S1_traits-json.json;S1_ancestry-json.json\n\
             S1;S1_b.vcf.gz;S1_traits-json.json;S1_ancestry-json.json\n",
            &CheckOptions::default(),
            &mut reporter,
        )
        .unwrap();

        let debug = reporter.messages(Severity::Debug);
        assert!(debug.iter().any(|m| m.contains("delimiter ';'")));
        assert_eq!(reporter.messages(Severity::Info).len(), 1);
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(';'), ";");
    }
}
