//! Error codes of `sourcelog`.
//!
//! Failures that happen while a line is written, or while a debugger is torn down,
//! are not returned to the code that logs. They are reported on stderr instead,
//! with one of the following error codes.
//!
//! ## `Write`
//!
//! A writer failed to write a log line. The other writers still got the line.
//!
//! Example:
//!
//! ```text
//! [sourcelog][ERRCODE::Write] writing log line failed, caused by Os { code: 28, kind: StorageFull, .. }
//! ```
//!
//! For the file writer, check that the log directory is writable and not full.
//! An `EmailWriter` fails on writes after it has sent its mail,
//! an `EventWriter` fails if its `EventStore` refuses the record.
//!
//! ## `Flush`
//!
//! Flushing a writer failed.
//!
//! ```text
//! [sourcelog][ERRCODE::Flush] flushing failed, caused by ...
//! ```
//!
//! ## `Format`
//!
//! The format function that was set with `Debugger::set_format` returned an error.
//! The line was not written.
//!
//! ## `Mail`
//!
//! Sending the collected log lines, or the log file at teardown, failed.
//!
//! ```text
//! [sourcelog][ERRCODE::Mail] sending log mail failed, caused by Mail("sendmail exited with exit status: 75")
//! ```
//!
//! With `SendmailMailer`, check that the sendmail binary exists and accepts mail for the
//! recipient.
//!
//! ## `LogFile`
//!
//! The log file could not be read at teardown, so it was not mailed.
