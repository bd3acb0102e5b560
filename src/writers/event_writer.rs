use crate::{
    event_store::{DebuggerEvent, EventStore},
    writers::LogWriter,
    LogLine,
};
use std::sync::Arc;

/// A writer that stores every log line as a [`DebuggerEvent`].
pub struct EventWriter {
    store: Arc<dyn EventStore>,
}

impl EventWriter {
    /// Creates a writer for the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}

impl LogWriter for EventWriter {
    fn write(&self, line: &LogLine) -> std::io::Result<()> {
        self.store
            .create(DebuggerEvent {
                body: line.text().to_string(),
                source: line.source().to_string(),
            })
            .map_err(std::io::Error::other)
    }
}
