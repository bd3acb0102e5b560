use crate::{DeferredNow, Severity};

/// What a format function gets to see of a message.
#[derive(Clone, Copy, Debug)]
pub struct LogRecord<'a> {
    /// Severity of the message.
    pub severity: Severity,
    /// Source label the message is logged under.
    pub source: &'a str,
    /// The message text, after digesting.
    pub message: &'a str,
}

/// Function type for format functions.
///
/// If you want to write the log lines in your own format,
/// implement a function with this signature and provide it to
/// [`Debugger::set_format`](crate::Debugger::set_format).
///
/// The line must not contain a line terminator;
/// line breaks are added by the writers.
pub type FormatFunction =
    fn(write: &mut dyn std::io::Write, now: &mut DeferredNow, record: &LogRecord) -> std::io::Result<()>;

/// A logline-formatter that produces tab-separated log lines like
/// <br>
/// ```2026-10-19	15:25:01	WARN  	OrderService	Payment took 3 attempts```
/// <br>
/// i.e. date, time, fixed-width severity label, source and message.
///
/// # Errors
///
/// See `std::write`
pub fn default_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &LogRecord,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{}\t{}\t{}\t{}\t{}",
        now.date(),
        now.time(),
        record.severity.label(),
        record.source,
        record.message
    )
}

/// A logline-formatter that produces log lines like
/// <br>
/// ```INFO   OrderService: Task successfully read from conf.json```
/// <br>
/// i.e. without timestamp.
///
/// # Errors
///
/// See `std::write`
pub fn simple_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &LogRecord,
) -> Result<(), std::io::Error> {
    if record.source.is_empty() {
        write!(w, "{} {}", record.severity.label(), record.message)
    } else {
        write!(
            w,
            "{} {}: {}",
            record.severity.label(),
            record.source,
            record.message
        )
    }
}
