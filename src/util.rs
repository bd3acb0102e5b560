use std::sync::{Mutex, MutexGuard};

use crate::DebuggerError;

#[derive(Copy, Clone, Debug)]
pub(crate) enum ErrorCode {
    Write,
    Flush,
    Format,
    Mail,
    LogFile,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Format => "format",
            Self::Mail => "mail",
            Self::LogFile => "logfile",
        }
    }
}

// Failures that must not reach the caller of a log call end up here.
pub(crate) fn eprint_err(error_code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    eprintln!(
        "[sourcelog][ERRCODE::{code:?}] {msg}, caused by {err:?}\n    \
         See https://docs.rs/sourcelog/latest/sourcelog/error_info/index.html#{code_lc}",
        msg = msg,
        err = err,
        code = error_code,
        code_lc = error_code.as_index(),
    );
}

pub(crate) fn io_err(s: &'static str) -> std::io::Error {
    std::io::Error::other(s)
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, DebuggerError> {
    m.lock().map_err(|_| DebuggerError::Poison)
}
