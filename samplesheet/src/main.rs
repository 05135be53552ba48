//! check-samplesheet CLI - validate and transform a tabular samplesheet
//!
//! ```bash
//! check-samplesheet samplesheet.csv samplesheet.valid.csv
//! check-samplesheet samplesheet.tsv out/samplesheet.valid.csv --log-level INFO
//! ```
//!
//! Exit status: 0 on success, 1 when the samplesheet is invalid, 2 when the
//! input file does not exist.

use clap::Parser;
use samplesheet::{
    check_samplesheet, init_logging, write_summary, CheckOptions, LogLevel, Reporter,
    TracingReporter, UniqueKey,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "check-samplesheet")]
#[command(about = "Validate and transform a tabular samplesheet.", long_about = None)]
#[command(after_help = "Example: check-samplesheet samplesheet.csv samplesheet.valid.csv")]
struct Cli {
    /// Tabular input samplesheet in CSV or TSV format.
    #[arg(value_name = "FILE_IN")]
    file_in: PathBuf,

    /// Transformed output samplesheet in CSV format.
    #[arg(value_name = "FILE_OUT")]
    file_out: PathBuf,

    /// The desired log level.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Warning, env = "SAMPLESHEET_LOG_LEVEL")]
    log_level: LogLevel,

    /// Number of leading lines used to detect the delimiter and header
    #[arg(long, default_value = "10")]
    sniff_lines: NonZeroUsize,

    /// What must be unique across rows
    #[arg(long, value_enum, default_value_t = UniqueKey::SampleVcf)]
    unique_key: UniqueKey,

    /// Also write a JSON summary of the check
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level) {
        eprintln!("[ERROR] Could not initialize logging: {}", e);
    }

    let options = CheckOptions {
        sample_lines: cli.sniff_lines.get(),
        unique_key: cli.unique_key,
    };
    let mut reporter = TracingReporter;

    let report = match check_samplesheet(&cli.file_in, &cli.file_out, &options, &mut reporter) {
        Ok(report) => report,
        Err(e) => return ExitCode::from(e.exit_code()),
    };

    if let Some(path) = cli.summary {
        if let Err(e) = write_summary(&report, &path) {
            reporter.critical(e.to_string());
            return ExitCode::from(e.exit_code());
        }
        reporter.info(format!("Summary written to {}", path.display()));
    }

    ExitCode::SUCCESS
}
