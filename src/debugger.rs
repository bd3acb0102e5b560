use crate::{
    digest::{self, NoTranslations, Tokens, Translator},
    event_store::EventStore,
    formats::{default_format, FormatFunction, LogRecord},
    mail::{Email, Mailer},
    util::{eprint_err, ErrorCode},
    writers::{EmailWriter, EventWriter, FileLogWriter, ScreenWriter, HTML_BREAK},
    Comparison, DebuggerConfig, DebuggerError, DeferredNow, Facilities, LogLine, Logger, Message,
    OutputContext, ScopedSource, Severity, SourceStack,
};
use std::{
    collections::BTreeSet,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// The collaborators a [`Debugger`] hands work to.
///
/// Without a mailer, email output is skipped; without an event store, event output is skipped.
///
/// Clones share their state: a log file that is truncated by one debugger
/// is not truncated again by another debugger that uses a clone.
#[derive(Clone)]
pub struct Services {
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) mailer: Option<Arc<dyn Mailer>>,
    pub(crate) events: Option<Arc<dyn EventStore>>,
    truncated: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            translator: Arc::new(NoTranslations),
            mailer: None,
            events: None,
            truncated: Arc::default(),
        }
    }
}

impl Services {
    /// Services that use the templates of the given configuration.
    #[must_use]
    pub fn for_config(config: &DebuggerConfig) -> Self {
        Self::default().translator(Arc::new(config.translator()))
    }

    /// Uses the given template lookup.
    #[must_use]
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Uses the given email transport.
    #[must_use]
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Uses the given store for event records.
    #[must_use]
    pub fn event_store(mut self, events: Arc<dyn EventStore>) -> Self {
        self.events = Some(events);
        self
    }

    // True only for the first request per path.
    fn claim_truncation(&self, path: &Path) -> bool {
        self.truncated
            .lock()
            .is_ok_and(|mut truncated| truncated.insert(path.to_path_buf()))
    }
}

/// Writes messages with a severity and a source label to the configured outputs.
///
/// A `Debugger` has a level, which is a [`Facilities`] value: its severity bits are the
/// threshold for messages, its destination bits decide which writers are attached when the
/// level is set up with [`initialize`](Debugger::initialize).
///
/// ```rust
/// use sourcelog::{Debugger, DebuggerConfig, Facilities, Message, Services};
///
/// let config = DebuggerConfig::default().log_file_prefix_date(false);
/// let mut debugger = Debugger::new(
///     config.into(),
///     Services::default(),
///     Facilities::INFO | Facilities::FILE,
///     Some("Importer"),
/// )
/// .unwrap();
///
/// debugger.info("importing").trace("you won't see this");
/// debugger.warn(Message::new("{count} rows skipped").token("count", 3));
/// ```
///
/// When the debugger is dropped, it is torn down (see [`shutdown`](Debugger::shutdown)).
pub struct Debugger {
    config: Arc<DebuggerConfig>,
    services: Services,
    level: Facilities,
    pub(crate) sources: SourceStack,
    logger: Logger,
    format: FormatFunction,
    log_file: Option<PathBuf>,
    shut_down: bool,
}

impl std::fmt::Debug for Debugger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debugger")
            .field("config", &self.config)
            .field("level", &self.level)
            .field("sources", &self.sources)
            .field("log_file", &self.log_file)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl Debugger {
    /// Creates a debugger, sets it up with the given level and source,
    /// and logs the start of logging.
    ///
    /// Without a source, the configured default source is used.
    ///
    /// # Errors
    ///
    /// See [`initialize`](Debugger::initialize).
    pub fn new(
        config: Arc<DebuggerConfig>,
        services: Services,
        level: Facilities,
        source: Option<&str>,
    ) -> Result<Self, DebuggerError> {
        let mut debugger = Self {
            sources: SourceStack::new(config.default_source.clone()),
            config,
            services,
            level: Facilities::NONE,
            logger: Logger::new(),
            format: default_format,
            log_file: None,
            shut_down: false,
        };
        debugger.initialize(level, source, true)?;
        let mut now = DeferredNow::new();
        debugger.info(format!("Start of logging at {}", now.date_time()));
        Ok(debugger)
    }

    /// Sets level and source, and attaches a writer for each destination bit of the level.
    ///
    /// With [`Facilities::FROM_ENV`], the level is taken from the environment mapping.
    /// Writers whose collaborator is missing (email without mailer or recipient,
    /// events without store) are skipped silently.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::UnmappedEnvironment`] if the level is to be taken from an
    /// environment without level,
    /// [`DebuggerError::UnsafePath`] if the log file would not be inside the base path.
    pub fn initialize(
        &mut self,
        level: Facilities,
        source: Option<&str>,
        clear_writers: bool,
    ) -> Result<&mut Self, DebuggerError> {
        if clear_writers {
            self.logger.clear_writers();
            self.log_file = None;
        }
        self.set_level(level)?;
        let source = source.map_or_else(|| self.config.default_source.clone(), str::to_string);
        self.set_source(source);

        let level = self.level;
        if level.test(Facilities::FILE) {
            self.to_file(level)?;
        }
        if level.test(Facilities::SCREEN) {
            self.to_screen(level);
        }
        if level.test(Facilities::EMAIL) {
            if let Some(to) = self.config.log_email.clone() {
                self.to_email(&to, level);
            }
        }
        if level.test(Facilities::EVENT) {
            self.to_events(level);
        }
        Ok(self)
    }

    /// Attaches a file writer for the log file of the current source.
    ///
    /// The severity bits of `level` give the threshold;
    /// with [`Facilities::TRUNCATE`] an existing file is deleted, but only by the first
    /// debugger of the shared [`Services`] that asks for it.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::UnsafePath`] if the log file would not be inside the base path.
    pub fn to_file(&mut self, level: Facilities) -> Result<&mut Self, DebuggerError> {
        let Some(threshold) = level.threshold() else {
            return Ok(self);
        };
        let path = self
            .config
            .log_file_path_name(self.sources.current(), &mut DeferredNow::new())?;
        let truncate =
            level.test(Facilities::TRUNCATE) && self.services.claim_truncation(&path);
        let writer = FileLogWriter::builder(&path)
            .truncate(truncate)
            .html_line_breaks(self.config.context == OutputContext::Web)
            .try_build()?;
        self.logger
            .add_writer(Box::new(writer), threshold, Comparison::LessOrEqual);
        self.log_file = Some(path);
        Ok(self)
    }

    /// Attaches a screen writer.
    pub fn to_screen(&mut self, level: Facilities) -> &mut Self {
        if let Some(threshold) = level.threshold() {
            let writer = ScreenWriter::new(self.config.screen, self.config.context);
            self.logger
                .add_writer(Box::new(writer), threshold, Comparison::LessOrEqual);
        }
        self
    }

    /// Attaches a writer that mails the collected lines to `to` at teardown.
    ///
    /// Does nothing if no mailer is available.
    pub fn to_email(&mut self, to: &str, level: Facilities) -> &mut Self {
        if let (Some(threshold), Some(mailer)) = (level.threshold(), &self.services.mailer) {
            let writer = EmailWriter::new(to, self.config.email_from.as_str(), Arc::clone(mailer));
            self.logger
                .add_writer(Box::new(writer), threshold, Comparison::LessOrEqual);
        }
        self
    }

    /// Attaches a writer that stores lines as event records.
    ///
    /// Does nothing if no event store is available.
    pub fn to_events(&mut self, level: Facilities) -> &mut Self {
        if let (Some(threshold), Some(events)) = (level.threshold(), &self.services.events) {
            let writer = EventWriter::new(Arc::clone(events));
            self.logger
                .add_writer(Box::new(writer), threshold, Comparison::LessOrEqual);
        }
        self
    }

    /// The current level.
    #[must_use]
    pub fn level(&self) -> Facilities {
        self.level
    }

    /// Sets the level; does not change the attached writers.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::UnmappedEnvironment`] if `level` contains [`Facilities::FROM_ENV`]
    /// and the current environment has no level.
    pub fn set_level(&mut self, level: Facilities) -> Result<&mut Self, DebuggerError> {
        self.level = if level.test(Facilities::FROM_ENV) {
            self.config.level_for(self.config.environment)?
        } else {
            level
        };
        Ok(self)
    }

    /// The current source label.
    #[must_use]
    pub fn source(&self) -> &str {
        self.sources.current()
    }

    /// Makes `source` the current source label; the previous one can be restored
    /// with [`pop_source`](Debugger::pop_source).
    pub fn set_source<S: Into<String>>(&mut self, source: S) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Restores the source label that was current before the last
    /// [`set_source`](Debugger::set_source), and returns the replaced one.
    ///
    /// Returns `None` if there is nothing to restore.
    pub fn pop_source(&mut self) -> Option<String> {
        self.sources.pop()
    }

    /// Makes `source` the current source label until the returned guard is dropped.
    ///
    /// ```rust
    /// # use sourcelog::{Debugger, DebuggerConfig, Facilities, Services};
    /// # let mut debugger = Debugger::new(
    /// #     DebuggerConfig::default().into(), Services::default(), Facilities::INFO, Some("App"),
    /// # ).unwrap();
    /// {
    ///     let mut scoped = debugger.scope("import_orders");
    ///     scoped.info("logged with source import_orders");
    /// }
    /// assert_eq!(debugger.source(), "App");
    /// ```
    pub fn scope<S: Into<String>>(&mut self, source: S) -> ScopedSource<'_> {
        ScopedSource::new(self, source.into())
    }

    /// Like [`scope`](Debugger::scope), with the caller's file and line as source label.
    #[track_caller]
    pub fn scope_here(&mut self) -> ScopedSource<'_> {
        let location = Location::caller();
        self.scope(format!("{}:{}", location.file(), location.line()))
    }

    /// Runs `f` with `source` as the current source label.
    pub fn scoped<S, F, R>(&mut self, source: S, f: F) -> R
    where
        S: Into<String>,
        F: FnOnce(&mut Debugger) -> R,
    {
        let mut scoped = self.scope(source);
        f(&mut scoped)
    }

    /// The fan-out logger, e.g. for attaching further writers.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The fan-out logger, e.g. for attaching further writers.
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Uses the given format function for the log lines,
    /// rather than [`default_format`](crate::default_format).
    pub fn set_format(&mut self, format: FormatFunction) -> &mut Self {
        self.format = format;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    /// Digests a message with the debugger's translator, see [`digest`](crate::digest::digest).
    #[must_use]
    pub fn digest(&self, message: &str, source: &str, tokens: &Tokens) -> String {
        digest::digest(self.services.translator.as_ref(), message, source, tokens)
    }

    /// Logs a message if the severity in `facilities` passes the level.
    ///
    /// The message is passed if its severity rank is not higher than the
    /// severity portion of the level; it is then formatted once and handed to every
    /// writer whose threshold accepts it. Otherwise nothing happens.
    pub fn log<'a, M: Into<Message<'a>>>(&mut self, message: M, facilities: Facilities) -> &mut Self {
        let message = message.into();
        if let Some(severity) = self.gate(facilities) {
            let (source, body) = self.resolve(&message);
            self.emit(severity, source, body);
        }
        self
    }

    /// Returns `true` if a message with the given severity would pass the level.
    #[must_use]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.gate(severity.into()).is_some()
    }

    /// Logs a message with severity `Info`.
    pub fn info<'a, M: Into<Message<'a>>>(&mut self, message: M) -> &mut Self {
        self.log(message, Facilities::INFO)
    }

    /// Logs a message with severity `Trace`.
    pub fn trace<'a, M: Into<Message<'a>>>(&mut self, message: M) -> &mut Self {
        self.log(message, Facilities::TRACE)
    }

    /// Logs a message with severity `Notice`.
    pub fn notice<'a, M: Into<Message<'a>>>(&mut self, message: M) -> &mut Self {
        self.log(message, Facilities::NOTICE)
    }

    /// Logs a message with severity `Warn`.
    pub fn warn<'a, M: Into<Message<'a>>>(&mut self, message: M) -> &mut Self {
        self.log(message, Facilities::WARN)
    }

    /// Logs a message with severity `Error`.
    ///
    /// # Errors
    ///
    /// In strict mode, [`DebuggerError::Escalated`] with the logged message;
    /// otherwise this never fails.
    pub fn error<'a, M: Into<Message<'a>>>(&mut self, message: M) -> Result<&mut Self, DebuggerError> {
        let message = message.into();
        if self.config.strict {
            let (origin, message) = self.resolve(&message);
            if let Some(severity) = self.gate(Facilities::ERROR) {
                self.emit(severity, origin.clone(), message.clone());
            }
            Err(DebuggerError::Escalated { origin, message })
        } else {
            Ok(self.log(message, Facilities::ERROR))
        }
    }

    /// Logs a message with severity `Error`, and returns normally.
    pub fn fail<'a, M: Into<Message<'a>>>(&mut self, message: M) -> &mut Self {
        self.log(message, Facilities::ERROR)
    }

    /// Logs an error with severity `Error`, together with the caller's location,
    /// its causes, and a backtrace if backtraces are enabled, and hands the error back.
    ///
    /// The line reads `<error> [<file>:<line>]`, followed by ` code=<os error code>` for
    /// I/O errors and ` cause=<causes, separated by ": ">` if the error has a source.
    /// The error text is not looked up as a template.
    ///
    /// Always returns `Err(err)`, so that it can be propagated with `?`:
    ///
    /// ```rust
    /// # use sourcelog::Debugger;
    /// fn read_settings(debugger: &mut Debugger) -> std::io::Result<String> {
    ///     match std::fs::read_to_string("settings.toml") {
    ///         Ok(s) => Ok(s),
    ///         Err(e) => {
    ///             debugger.fail_with(e)?;
    ///             unreachable!()
    ///         }
    ///     }
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Always, with the given error.
    #[track_caller]
    pub fn fail_with<E>(&mut self, err: E) -> Result<&mut Self, E>
    where
        E: std::error::Error + 'static,
    {
        let location = Location::caller();
        let mut body = format!("{err} [{}:{}]", location.file(), location.line());
        if let Some(code) = error_code(&err) {
            body.push_str(&format!(" code={code}"));
        }
        let mut causes = Vec::new();
        let mut cause = err.source();
        while let Some(c) = cause {
            causes.push(c.to_string());
            cause = c.source();
        }
        if !causes.is_empty() {
            body.push_str(&format!(" cause={}", causes.join(": ")));
        }
        let backtrace = std::backtrace::Backtrace::capture();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            body.push_str(&format!("\n{backtrace}"));
        }

        // the error text is logged as is, without template lookup
        if let Some(severity) = self.gate(Facilities::ERROR) {
            let source = self.current_source().to_string();
            self.emit(severity, source, body);
        }
        Err(err)
    }

    /// The log file, if a file writer was attached.
    #[must_use]
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// The lines of the log file; empty if there is no log file (yet).
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Io`] if the log file exists but cannot be read.
    pub fn read_log(&self) -> Result<Vec<String>, DebuggerError> {
        self.logger.flush();
        Ok(self
            .read_log_file()?
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Writes the content of the log file to `w`.
    ///
    /// With `html` (by default: if the output context is web), each line ends with
    /// one HTML break tag, also if the file already carries one.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Io`] if reading or writing fails.
    pub fn output_log(&self, w: &mut dyn Write, html: Option<bool>) -> Result<(), DebuggerError> {
        let html = html.unwrap_or(self.config.context == OutputContext::Web);
        for line in self.read_log()? {
            if html {
                let line = line.strip_suffix(HTML_BREAK).unwrap_or(&line);
                writeln!(w, "{line}<br />")?;
            } else {
                writeln!(w, "{line}")?;
            }
        }
        Ok(w.flush()?)
    }

    /// Tears the debugger down; further calls do nothing.
    ///
    /// If a recipient for the log file is configured and a log file is used,
    /// the end of logging is logged and the complete log file is mailed, unless it is empty.
    /// Then all writers are flushed and shut down; an [`EmailWriter`] sends its lines now.
    ///
    /// Is called when the debugger is dropped.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Some(to) = self.config.email_log_file_to.clone() {
            if self.log_file.is_some() {
                let mut now = DeferredNow::new();
                self.info(format!("End of logging at {}", now.date_time()));
                self.logger.flush();
                self.mail_log_file(&to);
            }
        }
        self.logger.shutdown();
    }

    fn mail_log_file(&self, to: &str) {
        let Some(mailer) = &self.services.mailer else {
            return;
        };
        match self.read_log_file() {
            Ok(Some(body)) if !body.is_empty() => {
                let email = Email {
                    to: to.to_string(),
                    from: self.config.email_from.clone(),
                    subject: Email::log_subject(),
                    body,
                };
                if let Err(e) = mailer.send(&email) {
                    eprint_err(ErrorCode::Mail, "mailing the log file failed", &e);
                }
            }
            Ok(_) => {}
            Err(e) => eprint_err(ErrorCode::LogFile, "reading the log file failed", &e),
        }
    }

    fn read_log_file(&self) -> Result<Option<String>, DebuggerError> {
        match &self.log_file {
            None => Ok(None),
            Some(path) => match std::fs::read_to_string(path) {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    // The severity to log with, if the facilities pass the level.
    fn gate(&self, facilities: Facilities) -> Option<Severity> {
        let gate = facilities.severity_bits();
        if gate != 0 && gate <= self.level.severity_bits() {
            facilities.severity()
        } else {
            None
        }
    }

    fn resolve(&self, message: &Message) -> (String, String) {
        let source = match message.source.as_deref() {
            Some(source) if !source.is_empty() => source,
            _ => self.current_source(),
        }
        .to_string();
        let body = self.digest(&message.body, &source, &message.tokens);
        (source, body)
    }

    fn current_source(&self) -> &str {
        if self.sources.current().is_empty() {
            self.config.default_source.as_str()
        } else {
            self.sources.current()
        }
    }

    fn emit(&self, severity: Severity, source: String, body: String) {
        let mut now = DeferredNow::new();
        let mut buffer = Vec::<u8>::with_capacity(80 + body.len());
        let record = LogRecord {
            severity,
            source: &source,
            message: &body,
        };
        if let Err(e) = (self.format)(&mut buffer, &mut now, &record) {
            eprint_err(ErrorCode::Format, "formatting failed", &e);
            return;
        }
        let text = String::from_utf8_lossy(&buffer).into_owned();
        let line = LogLine::new(*now.now(), severity, source, body, text);
        self.logger.dispatch(&line);
    }
}

impl Drop for Debugger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn error_code(err: &(dyn std::error::Error + 'static)) -> Option<String> {
    let io_err = err.downcast_ref::<std::io::Error>()?;
    Some(
        io_err
            .raw_os_error()
            .map_or_else(|| format!("{:?}", io_err.kind()), |code| code.to_string()),
    )
}
