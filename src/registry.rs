use crate::{util::lock, Debugger, DebuggerConfig, DebuggerError, Facilities, Services};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Source label of the debugger that [`DebuggerRegistry::global`] returns.
pub const GLOBAL_SOURCE: &str = "global";

/// Shared handle to a registered [`Debugger`].
pub type SharedDebugger = Arc<Mutex<Debugger>>;

/// One [`Debugger`] per source label, created on first use.
///
/// The registry is owned by the application and handed to the components that log;
/// all debuggers it creates share its configuration and services.
/// When the first debugger is created, the `global` one is created as well.
///
/// ```rust
/// use sourcelog::{DebuggerConfig, DebuggerRegistry, Services};
///
/// let registry = DebuggerRegistry::new(DebuggerConfig::default(), Services::default());
/// let orders = registry.debugger("Orders").unwrap();
/// orders.lock().unwrap().info("order received");
/// registry.shutdown();
/// ```
pub struct DebuggerRegistry {
    config: Arc<DebuggerConfig>,
    services: Services,
    debuggers: Mutex<BTreeMap<String, SharedDebugger>>,
}

impl DebuggerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: DebuggerConfig, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            services,
            debuggers: Mutex::new(BTreeMap::new()),
        }
    }

    /// The debugger for `source`; if it does not exist yet, it is created with the
    /// level of the current environment.
    ///
    /// # Errors
    ///
    /// See [`Debugger::new`].
    pub fn debugger(&self, source: &str) -> Result<SharedDebugger, DebuggerError> {
        let mut debuggers = lock(&self.debuggers)?;
        self.get_or_create(&mut debuggers, source, Facilities::FROM_ENV)
    }

    /// The debugger for `source`, with its level set to `level`.
    ///
    /// A new debugger attaches writers for the destinations in `level`;
    /// for an existing one only the level changes.
    ///
    /// # Errors
    ///
    /// See [`Debugger::new`] and [`Debugger::set_level`].
    pub fn debugger_with_level(
        &self,
        source: &str,
        level: Facilities,
    ) -> Result<SharedDebugger, DebuggerError> {
        let mut debuggers = lock(&self.debuggers)?;
        if let Some(debugger) = debuggers.get(source) {
            lock(debugger)?.set_level(level)?;
            return Ok(Arc::clone(debugger));
        }
        self.get_or_create(&mut debuggers, source, level)
    }

    /// The debugger for `source`, if it was created already.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<SharedDebugger> {
        lock(&self.debuggers).ok()?.get(source).cloned()
    }

    /// The debugger with source `global`.
    ///
    /// # Errors
    ///
    /// See [`Debugger::new`].
    pub fn global(&self) -> Result<SharedDebugger, DebuggerError> {
        self.debugger(GLOBAL_SOURCE)
    }

    /// Number of registered debuggers.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.debuggers).map_or(0, |d| d.len())
    }

    /// `true` if no debugger was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all debuggers and tears them down.
    pub fn shutdown(&self) {
        let debuggers = match lock(&self.debuggers) {
            Ok(mut debuggers) => std::mem::take(&mut *debuggers),
            Err(_) => return,
        };
        for debugger in debuggers.into_values() {
            if let Ok(mut debugger) = lock(&debugger) {
                debugger.shutdown();
            }
        }
    }

    fn get_or_create(
        &self,
        debuggers: &mut BTreeMap<String, SharedDebugger>,
        source: &str,
        level: Facilities,
    ) -> Result<SharedDebugger, DebuggerError> {
        if let Some(debugger) = debuggers.get(source) {
            return Ok(Arc::clone(debugger));
        }
        let debugger = Arc::new(Mutex::new(Debugger::new(
            Arc::clone(&self.config),
            self.services.clone(),
            level,
            Some(source),
        )?));
        if source != GLOBAL_SOURCE {
            self.get_or_create(debuggers, GLOBAL_SOURCE, Facilities::FROM_ENV)?;
        }
        debuggers.insert(source.to_string(), Arc::clone(&debugger));
        Ok(debugger)
    }
}

impl Drop for DebuggerRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
