use crate::Severity;
use chrono::{DateTime, Local};

/// A formatted log message, as it is handed to every writer.
///
/// Created once per log call that passes the gate; writers only read it.
#[derive(Clone, Debug)]
pub struct LogLine {
    timestamp: DateTime<Local>,
    severity: Severity,
    source: String,
    body: String,
    text: String,
}

impl LogLine {
    pub(crate) fn new(
        timestamp: DateTime<Local>,
        severity: Severity,
        source: String,
        body: String,
        text: String,
    ) -> Self {
        Self {
            timestamp,
            severity,
            source,
            body,
            text,
        }
    }

    /// When the message was logged.
    #[must_use]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    /// Severity of the message.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Source label of the message.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The digested message, without timestamp and labels.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The complete line, without line terminator.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
