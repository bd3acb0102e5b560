// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::wrong_self_convention)]
//! A leveled logging and debugging facility that writes messages,
//! tagged with a severity and a source label, to files, the screen, email, and event records.
//!
//! ```rust
//! use sourcelog::{Debugger, DebuggerConfig, Facilities, Services};
//!
//! let mut debugger = Debugger::new(
//!     DebuggerConfig::default().into(),
//!     Services::default(),
//!     Facilities::INFO | Facilities::FILE | Facilities::SCREEN,
//!     Some("Checkout"),
//! )
//! .unwrap();
//!
//! debugger.info("cart submitted");
//! {
//!     let mut debugger = debugger.scope("PaymentGateway");
//!     debugger.warn("gateway answered slowly");
//! }
//! debugger.trace("not written, the level is Info");
//! ```
//!
//! The level of a [`Debugger`] is a [`Facilities`] value: one or more severity bits, which
//! determine the least severe message that is still logged, plus destination bits, which
//! determine the writers that are attached. With [`Facilities::FROM_ENV`], the level is
//! taken from the environment mapping of the [`DebuggerConfig`].
//!
//! See
//!
//! * [`Debugger`] for the logging methods,
//! * [`DebuggerConfig`] for the configuration options, also loadable from a TOML file,
//! * [`DebuggerRegistry`] for keeping one debugger per source label,
//! * the module [`writers`] for the available outputs and for adding your own,
//! * [`LogBridge`] for routing the records of the `log` crate into a debugger.

pub mod bitfield;
mod bridge;
mod cookie;
mod debugger;
mod debugger_config;
mod debugger_error;
mod deferred_now;
pub mod digest;
pub mod error_info;
mod event_store;
mod formats;
mod level;
mod log_line;
mod logger;
pub mod mail;
mod message;
mod registry;
mod safe_path;
mod scoped_source;
mod source_stack;
mod util;
pub mod writers;

pub use crate::bridge::LogBridge;
pub use crate::cookie::{CookieAction, DebugCookie};
pub use crate::debugger::{Debugger, Services};
pub use crate::debugger_config::{DebugCookieConfig, DebuggerConfig, OutputContext};
pub use crate::debugger_error::DebuggerError;
pub use crate::deferred_now::DeferredNow;
pub use crate::event_store::{DebuggerEvent, EventStore, MemoryEventStore};
pub use crate::formats::{default_format, simple_format, FormatFunction, LogRecord};
pub use crate::level::{Comparison, Environment, Facilities, Severity, SEVERITY_MASK};
pub use crate::log_line::LogLine;
pub use crate::logger::Logger;
pub use crate::message::Message;
pub use crate::registry::{DebuggerRegistry, SharedDebugger, GLOBAL_SOURCE};
pub use crate::scoped_source::ScopedSource;
pub use crate::source_stack::SourceStack;
