//! Contains the trait [`LogWriter`] for the outputs a [`Logger`](crate::Logger) fans out to,
//! and the concrete implementations
//! for writing to a file ([`FileLogWriter`]),
//! to stdout or stderr ([`ScreenWriter`]),
//! to an email that is sent at teardown ([`EmailWriter`]),
//! or to persisted event records ([`EventWriter`]).
//!
//! A [`Debugger`](crate::Debugger) attaches these writers itself, according to the destination
//! bits of its level. You can attach further writers, also your own implementations of
//! [`LogWriter`], via [`Debugger::logger_mut`](crate::Debugger::logger_mut):
//!
//! ```rust
//! use sourcelog::{
//!     writers::FileLogWriter, Comparison, Debugger, DebuggerConfig, Facilities, Services, Severity,
//! };
//!
//! let mut debugger = Debugger::new(
//!     DebuggerConfig::default().into(),
//!     Services::default(),
//!     Facilities::INFO,
//!     Some("Payments"),
//! )
//! .unwrap();
//!
//! // alerts go to their own file
//! let alerts = FileLogWriter::builder("log_files/alerts.log").try_build().unwrap();
//! debugger
//!     .logger_mut()
//!     .add_writer(Box::new(alerts), Severity::Error, Comparison::LessOrEqual);
//!
//! debugger.warn("only the default writers see this");
//! debugger.fail("this ends up in the alert file, too");
//! ```

mod email_writer;
mod event_writer;
pub(crate) mod file_log_writer;
mod log_writer;
mod screen_writer;

pub use self::email_writer::EmailWriter;
pub use self::event_writer::EventWriter;
pub use self::file_log_writer::{FileLogWriter, FileLogWriterBuilder};
pub(crate) use self::file_log_writer::HTML_BREAK;
pub use self::log_writer::LogWriter;
pub use self::screen_writer::{ScreenTarget, ScreenWriter};
