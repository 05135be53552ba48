//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Every event is written to stderr as a single `[LEVEL] message` line.
//! Levels follow the CLI names: `CRITICAL`, `ERROR`, `WARNING`, `INFO`,
//! `DEBUG`. `tracing` has no critical level, so critical diagnostics are
//! error events on [`CRITICAL_TARGET`] and are labeled from the target.

use std::fmt;
use std::io;

use clap::ValueEnum;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::report::CRITICAL_TARGET;

/// Minimum level of diagnostics written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Critical,
    Error,
    #[default]
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Filter letting through events at this level or more severe.
    pub fn targets(self) -> Targets {
        match self {
            LogLevel::Critical => Targets::new().with_target(CRITICAL_TARGET, LevelFilter::ERROR),
            LogLevel::Error => Targets::new().with_default(LevelFilter::ERROR),
            LogLevel::Warning => Targets::new().with_default(LevelFilter::WARN),
            LogLevel::Info => Targets::new().with_default(LevelFilter::INFO),
            LogLevel::Debug => Targets::new().with_default(LevelFilter::DEBUG),
        }
    }
}

/// Label printed between brackets for an event.
pub fn level_label(level: &Level, target: &str) -> &'static str {
    if target == CRITICAL_TARGET {
        return "CRITICAL";
    }
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// `[LEVEL] message` formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticFormat;

impl<S, N> FormatEvent<S, N> for DiagnosticFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(writer, "[{}] ", level_label(meta.level(), meta.target()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(level: LogLevel) -> Result<(), TryInitError> {
    init_logging_with_writer(level, io::stderr)
}

/// Install the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(level: LogLevel, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    subscriber(level, writer).try_init()
}

/// Subscriber filtering at `level` and writing `[LEVEL] message` lines to `writer`.
pub fn subscriber<W>(level: LogLevel, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .event_format(DiagnosticFormat)
        .with_writer(writer);

    tracing_subscriber::registry().with(level.targets()).with(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Reporter, TracingReporter};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn emit_all(level: LogLevel) -> String {
        let buffer = SharedBuffer::default();
        let writer = {
            let buffer = buffer.clone();
            move || buffer.clone()
        };

        tracing::subscriber::with_default(subscriber(level, writer), || {
            let mut reporter = TracingReporter;
            reporter.critical("The given sample sheet does not appear to contain a header.");
            reporter.error("The given input file in.csv was not found!");
            reporter.warning("two rows share a sample");
            reporter.info("Checking samplesheet in.csv");
        });
        buffer.contents()
    }

    #[test]
    fn test_diagnostic_lines_per_level() {
        assert_eq!(
            emit_all(LogLevel::default()),
            "[CRITICAL] The given sample sheet does not appear to contain a header.\n\
             [ERROR] The given input file in.csv was not found!\n\
             [WARNING] two rows share a sample\n"
        );

        assert_eq!(
            emit_all(LogLevel::Critical),
            "[CRITICAL] The given sample sheet does not appear to contain a header.\n"
        );

        let info = emit_all(LogLevel::Info);
        assert_eq!(info.lines().count(), 4);
        assert!(info.ends_with("[INFO] Checking samplesheet in.csv\n"));
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(level_label(&Level::ERROR, CRITICAL_TARGET), "CRITICAL");
        assert_eq!(level_label(&Level::ERROR, "samplesheet::pipeline"), "ERROR");
        assert_eq!(level_label(&Level::WARN, "samplesheet"), "WARNING");
        assert_eq!(level_label(&Level::DEBUG, "samplesheet"), "DEBUG");
    }

    #[test]
    fn test_cli_names() {
        let names: Vec<String> = LogLevel::value_variants()
            .iter()
            .filter_map(|level| level.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["CRITICAL", "ERROR", "WARNING", "INFO", "DEBUG"]);
        assert_eq!(LogLevel::default(), LogLevel::Warning);
    }

    #[test]
    fn test_critical_filter_only_passes_critical_target() {
        let targets = LogLevel::Critical.targets();
        assert!(targets.would_enable(CRITICAL_TARGET, &Level::ERROR));
        assert!(!targets.would_enable("samplesheet::pipeline", &Level::ERROR));

        let targets = LogLevel::Warning.targets();
        assert!(targets.would_enable(CRITICAL_TARGET, &Level::ERROR));
        assert!(targets.would_enable("samplesheet::pipeline", &Level::WARN));
        assert!(!targets.would_enable("samplesheet::pipeline", &Level::INFO));
    }
}
