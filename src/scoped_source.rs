use crate::Debugger;
use std::ops::{Deref, DerefMut};

/// Keeps a source label current on a [`Debugger`] while it is alive.
///
/// Created with [`Debugger::scope`]. When the guard is dropped, including during unwinding,
/// the debugger's source labels are restored to the state from before the scope was entered;
/// labels that were set inside the scope and not popped are discarded as well.
///
/// The guard dereferences to the debugger, so logging goes through it:
///
/// ```rust
/// # use sourcelog::{Debugger, DebuggerConfig, Facilities, Services};
/// # let mut debugger = Debugger::new(
/// #     DebuggerConfig::default().into(), Services::default(), Facilities::INFO, Some("App"),
/// # ).unwrap();
/// fn import(debugger: &mut Debugger) {
///     let mut debugger = sourcelog::debug_scope!(debugger);
///     debugger.info("starting import");
/// }
/// import(&mut debugger);
/// assert_eq!(debugger.source(), "App");
/// ```
pub struct ScopedSource<'a> {
    debugger: &'a mut Debugger,
    depth: usize,
}

impl<'a> ScopedSource<'a> {
    pub(crate) fn new(debugger: &'a mut Debugger, source: String) -> Self {
        let depth = debugger.sources.depth();
        debugger.set_source(source);
        Self { debugger, depth }
    }
}

impl Deref for ScopedSource<'_> {
    type Target = Debugger;
    fn deref(&self) -> &Debugger {
        self.debugger
    }
}

impl DerefMut for ScopedSource<'_> {
    fn deref_mut(&mut self) -> &mut Debugger {
        self.debugger
    }
}

impl Drop for ScopedSource<'_> {
    fn drop(&mut self) {
        self.debugger.sources.unwind_to(self.depth);
    }
}

/// The name of the surrounding function, e.g. `my_crate::orders::import`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Enters a [`ScopedSource`] named after the surrounding function.
#[macro_export]
macro_rules! debug_scope {
    ($debugger:expr) => {
        $debugger.scope($crate::function_name!())
    };
}

#[cfg(test)]
mod test {
    use crate::{Debugger, DebuggerConfig, Facilities, Services};

    fn debugger() -> Debugger {
        Debugger::new(
            DebuggerConfig::default().into(),
            Services::default(),
            Facilities::INFO,
            Some("Outer"),
        )
        .unwrap()
    }

    #[test]
    fn test_scope_restores_source() {
        let mut debugger = debugger();
        {
            let mut scoped = debugger.scope("Inner");
            assert_eq!(scoped.source(), "Inner");
            scoped.set_source("Leaked");
            scoped.set_source("LeakedAgain");
        }
        assert_eq!(debugger.source(), "Outer");
    }

    #[test]
    fn test_scoped_early_return() {
        fn work(debugger: &mut Debugger, fail: bool) -> Result<(), String> {
            let mut scoped = debugger.scope("Work");
            if fail {
                return Err(scoped.source().to_string());
            }
            scoped.info("done");
            Ok(())
        }
        let mut debugger = debugger();
        assert_eq!(work(&mut debugger, true), Err("Work".to_string()));
        assert_eq!(debugger.source(), "Outer");
        assert_eq!(work(&mut debugger, false), Ok(()));
        assert_eq!(debugger.source(), "Outer");
    }

    #[test]
    fn test_nested_scopes() {
        let mut debugger = debugger();
        let seen = debugger.scoped("A", |d| {
            let outer = d.source().to_string();
            let inner = d.scoped("B", |d| d.source().to_string());
            (outer, inner, d.source().to_string())
        });
        assert_eq!(seen, ("A".to_string(), "B".to_string(), "A".to_string()));
        assert_eq!(debugger.source(), "Outer");
    }

    #[test]
    fn test_function_name() {
        fn some_function() -> &'static str {
            crate::function_name!()
        }
        assert!(some_function().ends_with("some_function"));

        let mut debugger = debugger();
        let scoped = crate::debug_scope!(debugger);
        assert!(scoped.source().ends_with("test_function_name"));
    }
}
