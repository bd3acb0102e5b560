use crate::{Debugger, DebuggerError, Message, Severity};
use std::{
    cell::Cell,
    sync::{Arc, Mutex},
};

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

// Marks the current thread as dispatching into the debugger, until dropped.
struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Option<Self> {
        if DISPATCHING.with(|d| d.replace(true)) {
            None
        } else {
            Some(Self)
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|d| d.set(false));
    }
}

/// Routes the records of the `log` facade into a [`Debugger`].
///
/// The record's target becomes the source label; `debug!` and `trace!` both map to
/// [`Severity::Trace`]. Records are subject to the debugger's level like any other message.
///
/// Records that are emitted through the `log` facade while the bridge is dispatching
/// on the same thread, e.g. by a writer of the debugger, are dropped.
///
/// ```rust
/// use sourcelog::{Debugger, DebuggerConfig, Facilities, LogBridge, Services};
///
/// let debugger = Debugger::new(
///     DebuggerConfig::default().into(),
///     Services::default(),
///     Facilities::INFO | Facilities::SCREEN,
///     None,
/// )
/// .unwrap();
/// LogBridge::install(debugger, log::LevelFilter::Info).unwrap();
/// log::info!(target: "Startup", "listening on port {}", 8080);
/// ```
pub struct LogBridge {
    debugger: Arc<Mutex<Debugger>>,
}

impl LogBridge {
    /// Creates a bridge into a shared debugger.
    #[must_use]
    pub fn new(debugger: Arc<Mutex<Debugger>>) -> Self {
        Self { debugger }
    }

    /// Registers a bridge into `debugger` as the global logger of the `log` facade.
    ///
    /// Returns the handle through which the debugger stays reachable.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Log`] if a global logger was registered already.
    pub fn install(
        debugger: Debugger,
        max_level: log::LevelFilter,
    ) -> Result<Arc<Mutex<Debugger>>, DebuggerError> {
        let debugger = Arc::new(Mutex::new(debugger));
        log::set_boxed_logger(Box::new(Self::new(Arc::clone(&debugger))))?;
        log::set_max_level(max_level);
        Ok(debugger)
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(_guard) = DispatchGuard::enter() else {
            return false;
        };
        self.debugger
            .lock()
            .is_ok_and(|d| d.is_enabled(Severity::from(metadata.level())))
    }

    fn log(&self, record: &log::Record) {
        let Some(_guard) = DispatchGuard::enter() else {
            return;
        };
        let severity = Severity::from(record.level());
        if let Ok(mut debugger) = self.debugger.lock() {
            let message = Message::new(record.args().to_string()).source(record.target());
            debugger.log(message, severity.into());
        }
    }

    fn flush(&self) {
        let Some(_guard) = DispatchGuard::enter() else {
            return;
        };
        if let Ok(debugger) = self.debugger.lock() {
            debugger.logger().flush();
        }
    }
}

#[cfg(test)]
mod test {
    use super::LogBridge;
    use crate::{
        writers::LogWriter, Comparison, Debugger, DebuggerConfig, Facilities, LogLine, Services,
        Severity,
    };
    use log::Log;
    use std::sync::{Arc, Mutex, OnceLock};

    #[derive(Clone, Default)]
    struct Recording(Arc<Mutex<Vec<(Severity, String, String)>>>);
    impl LogWriter for Recording {
        fn write(&self, line: &LogLine) -> std::io::Result<()> {
            self.0.lock().unwrap().push((
                line.severity(),
                line.source().to_string(),
                line.body().to_string(),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_records_are_routed() {
        let recording = Recording::default();
        let mut debugger = Debugger::new(
            DebuggerConfig::default().into(),
            Services::default(),
            Facilities::INFO,
            None,
        )
        .unwrap();
        debugger
            .logger_mut()
            .add_writer(Box::new(recording.clone()), Severity::Trace, Comparison::LessOrEqual);
        let bridge = LogBridge::new(Arc::new(Mutex::new(debugger)));

        assert!(bridge.enabled(&log::Metadata::builder().level(log::Level::Warn).build()));
        assert!(!bridge.enabled(&log::Metadata::builder().level(log::Level::Debug).build()));

        for (level, text) in [
            (log::Level::Warn, "disk almost full"),
            (log::Level::Debug, "cache miss"),
        ] {
            bridge.log(
                &log::Record::builder()
                    .level(level)
                    .target("Storage")
                    .args(format_args!("{text}"))
                    .build(),
            );
        }
        bridge.flush();

        assert_eq!(
            *recording.0.lock().unwrap(),
            vec![(
                Severity::Warn,
                "Storage".to_string(),
                "disk almost full".to_string()
            )]
        );
    }

    // Logs through the bridge from within `write`.
    struct Echo(Arc<OnceLock<LogBridge>>);
    impl LogWriter for Echo {
        fn write(&self, line: &LogLine) -> std::io::Result<()> {
            if let Some(bridge) = self.0.get() {
                bridge.log(
                    &log::Record::builder()
                        .level(log::Level::Warn)
                        .target("Echo")
                        .args(format_args!("seen: {}", line.body()))
                        .build(),
                );
            }
            Ok(())
        }
    }

    #[test]
    fn test_records_from_writers_are_dropped() {
        let recording = Recording::default();
        let cell = Arc::new(OnceLock::new());
        let mut debugger = Debugger::new(
            DebuggerConfig::default().into(),
            Services::default(),
            Facilities::INFO,
            None,
        )
        .unwrap();
        debugger
            .logger_mut()
            .add_writer(Box::new(Echo(Arc::clone(&cell))), Severity::Trace, Comparison::LessOrEqual);
        debugger
            .logger_mut()
            .add_writer(Box::new(recording.clone()), Severity::Trace, Comparison::LessOrEqual);
        let bridge = cell.get_or_init(|| LogBridge::new(Arc::new(Mutex::new(debugger))));

        bridge.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .target("Storage")
                .args(format_args!("disk full"))
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("Storage")
                .args(format_args!("cleaned up"))
                .build(),
        );

        assert_eq!(
            *recording.0.lock().unwrap(),
            vec![
                (Severity::Error, "Storage".to_string(), "disk full".to_string()),
                (Severity::Info, "Storage".to_string(), "cleaned up".to_string()),
            ]
        );
    }
}
