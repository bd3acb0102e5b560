use crate::LogLine;
use std::io;

/// Writes to a single log output.
///
/// Boxed instances of `LogWriter` are attached to a [`Logger`](crate::Logger),
/// together with a threshold that decides which lines they get to see.
pub trait LogWriter: Sync + Send {
    /// Writes out a log line.
    ///
    /// # Errors
    ///
    /// Any failure; it is reported, but does not keep other writers from getting the line.
    fn write(&self, line: &LogLine) -> io::Result<()>;

    /// Flushes any buffered lines.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying output.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Finishes the writer; called once when the owning debugger is torn down.
    fn shutdown(&self) {}
}
