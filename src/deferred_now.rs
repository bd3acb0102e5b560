use chrono::{DateTime, Local};

/// Deferred timestamp creation.
///
/// Is used to ensure that the date and the time column of a log line, and every
/// further use of "now" while handling one message, refer to the same instant.
#[derive(Debug, Default)]
pub struct DeferredNow(Option<DateTime<Local>>);

impl<'a> DeferredNow {
    /// Constructs a new instance, but does not generate the timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(None)
    }

    /// Retrieve the timestamp.
    ///
    /// Requires mutability because the first caller will generate the timestamp.
    pub fn now(&'a mut self) -> &'a DateTime<Local> {
        self.0.get_or_insert_with(Local::now)
    }

    /// The date part, as `YYYY-MM-DD`.
    pub fn date(&mut self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }

    /// The time part, as `HH:MM:SS`.
    pub fn time(&mut self) -> String {
        self.now().format("%H:%M:%S").to_string()
    }

    /// Date and time, as `YYYY-MM-DD HH:MM:SS`.
    pub fn date_time(&mut self) -> String {
        self.now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
