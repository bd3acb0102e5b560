use crate::Environment;
use std::path::PathBuf;
use thiserror::Error;

/// Describes errors in the configuration and use of a [`Debugger`](crate::Debugger).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DebuggerError {
    /// The environment has no level assigned in the environment mapping.
    #[error("no debug level is configured for environment '{0}'")]
    UnmappedEnvironment(Environment),

    /// The requested log file lies outside of the configured base directory.
    #[error("log file path {path:?} is not inside of {base:?}")]
    UnsafePath {
        /// The rejected path.
        path: PathBuf,
        /// The directory log files must reside in.
        base: PathBuf,
    },

    /// A facilities specification could not be parsed.
    #[error("unknown facility '{0}'")]
    Facilities(String),

    /// A comparison operator could not be parsed.
    #[error("unknown comparison operator '{0}'")]
    Comparison(String),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file cannot be parsed.
    #[cfg(feature = "config_file")]
    #[cfg_attr(docsrs, doc(cfg(feature = "config_file")))]
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// Installing the bridge for the `log` facade failed.
    #[error(transparent)]
    Log(#[from] log::SetLoggerError),

    /// Sending an email failed.
    #[error("sending mail failed: {0}")]
    Mail(String),

    /// Storing an event record failed.
    #[error("storing event failed: {0}")]
    Event(String),

    /// Strict mode turned a logged error into a returned error.
    #[error("{origin}: {message}")]
    Escalated {
        /// The source label the error was logged under.
        origin: String,
        /// The logged message, after digesting.
        message: String,
    },

    /// Some mutex was poisoned.
    #[error("some mutex is poisoned")]
    Poison,
}
