use crate::{
    util::{eprint_err, ErrorCode},
    writers::LogWriter,
    Comparison, LogLine, Severity,
};

/// Fans log lines out to an ordered list of writers.
///
/// Each writer is attached with a threshold and a [`Comparison`]; a line is handed to every
/// writer whose threshold accepts its severity, in the order the writers were added.
/// A writer that fails does not keep the following writers from getting the line.
#[derive(Default)]
pub struct Logger {
    writers: Vec<FilteredWriter>,
}

struct FilteredWriter {
    writer: Box<dyn LogWriter>,
    threshold: Severity,
    comparison: Comparison,
}
impl FilteredWriter {
    fn accepts(&self, severity: Severity) -> bool {
        self.comparison.accepts(severity, self.threshold)
    }
}

impl Logger {
    /// Creates a logger without writers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a writer.
    pub fn add_writer(
        &mut self,
        writer: Box<dyn LogWriter>,
        threshold: Severity,
        comparison: Comparison,
    ) {
        self.writers.push(FilteredWriter {
            writer,
            threshold,
            comparison,
        });
    }

    /// Shuts down and removes all writers.
    pub fn clear_writers(&mut self) {
        self.shutdown();
        self.writers.clear();
    }

    /// Number of attached writers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    /// `true` if no writer is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    /// Returns `true` if at least one writer would accept a line of the given severity.
    #[must_use]
    pub fn accepts(&self, severity: Severity) -> bool {
        self.writers.iter().any(|w| w.accepts(severity))
    }

    /// Hands the line to all writers that accept its severity.
    ///
    /// Returns the number of writers that wrote the line successfully.
    pub fn dispatch(&self, line: &LogLine) -> usize {
        let mut written = 0;
        for w in self.writers.iter().filter(|w| w.accepts(line.severity())) {
            match w.writer.write(line) {
                Ok(()) => written += 1,
                Err(e) => eprint_err(ErrorCode::Write, "writing log line failed", &e),
            }
        }
        written
    }

    /// Flushes all writers.
    pub fn flush(&self) {
        for w in &self.writers {
            w.writer
                .flush()
                .unwrap_or_else(|e| eprint_err(ErrorCode::Flush, "flushing failed", &e));
        }
    }

    /// Flushes and shuts down all writers.
    pub fn shutdown(&self) {
        self.flush();
        for w in &self.writers {
            w.writer.shutdown();
        }
    }
}
