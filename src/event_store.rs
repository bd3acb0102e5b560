use crate::{util::lock, DebuggerError};
use std::sync::Mutex;

/// A durable record of one log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebuggerEvent {
    /// The formatted log line.
    pub body: String,
    /// Source label the line was logged under.
    pub source: String,
}

/// Persistence for [`DebuggerEvent`]s.
pub trait EventStore: Send + Sync {
    /// Stores a new event.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Event`] if the event could not be stored.
    fn create(&self, event: DebuggerEvent) -> Result<(), DebuggerError>;
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<DebuggerEvent>>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of all stored events, oldest first.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Poison`] if the mutex is poisoned.
    pub fn events(&self) -> Result<Vec<DebuggerEvent>, DebuggerError> {
        Ok(lock(&self.events)?.clone())
    }
}

impl EventStore for MemoryEventStore {
    fn create(&self, event: DebuggerEvent) -> Result<(), DebuggerError> {
        lock(&self.events)?.push(event);
        Ok(())
    }
}
