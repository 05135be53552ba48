//! Diagnostics sink for the check.
//!
//! The core never logs through global state; it is handed a [`Reporter`].
//! The CLI uses [`TracingReporter`], tests and library callers can use
//! [`CollectingReporter`] to inspect what was reported.

/// Target used for critical events so the formatter can label them.
pub const CRITICAL_TARGET: &str = "samplesheet::critical";

/// Severity of a diagnostic, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Receiver of diagnostics produced while checking a samplesheet.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);

    fn critical(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Critical, message));
    }

    fn error(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Error, message));
    }

    fn warning(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Warning, message));
    }

    fn info(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Info, message));
    }

    fn debug(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Debug, message));
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        let message = diagnostic.message;
        match diagnostic.severity {
            Severity::Critical => tracing::error!(target: CRITICAL_TARGET, "{message}"),
            Severity::Error => tracing::error!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Debug => tracing::debug!("{message}"),
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    entries: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Messages reported at exactly `severity`, in order.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let mut reporter = CollectingReporter::new();
        reporter.info("first");
        reporter.critical("boom");
        reporter.info("second");

        assert_eq!(reporter.entries().len(), 3);
        assert_eq!(reporter.messages(Severity::Info), vec!["first", "second"]);
        assert_eq!(reporter.messages(Severity::Critical), vec!["boom"]);
        assert!(reporter.messages(Severity::Debug).is_empty());
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical < Severity::Error);
        assert!(Severity::Warning < Severity::Debug);
    }
}
