//! Sending log content by email.
//!
//! The crate does not talk to mail servers itself; it hands an [`Email`] to a
//! [`Mailer`] the host application provides. [`SendmailMailer`] covers hosts
//! that have a sendmail-compatible binary installed.

use crate::{util::io_err, DebuggerError};
use std::{
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
};

/// A plain-text email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    /// Recipient address.
    pub to: String,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Email {
    /// The subject used for log mails: `Debug log from: <host>`.
    #[must_use]
    pub fn log_subject() -> String {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "localhost".to_string());
        format!("Debug log from: {host}")
    }
}

/// Email transport.
pub trait Mailer: Send + Sync {
    /// Sends the email.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Mail`] if the email could not be handed over.
    fn send(&self, email: &Email) -> Result<(), DebuggerError>;
}

/// Sends emails through a sendmail-compatible binary (`sendmail -t`).
#[derive(Clone, Debug)]
pub struct SendmailMailer {
    program: PathBuf,
}

impl Default for SendmailMailer {
    fn default() -> Self {
        Self::new("/usr/sbin/sendmail")
    }
}

impl SendmailMailer {
    /// Uses the given binary.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Mailer for SendmailMailer {
    fn send(&self, email: &Email) -> Result<(), DebuggerError> {
        let mut child = Command::new(&self.program)
            .arg("-t")
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| DebuggerError::Mail(format!("{}: {e}", self.program.display())))?;
        // the child is reaped also if it stopped reading early
        let written = match child.stdin.take() {
            Some(mut stdin) => write!(
                stdin,
                "To: {}\r\nFrom: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}",
                email.to, email.from, email.subject, email.body
            ),
            None => Err(io_err("no stdin")),
        };
        let status = child.wait();
        written?;
        let status = status?;
        if status.success() {
            Ok(())
        } else {
            Err(DebuggerError::Mail(format!(
                "{} exited with {status}",
                self.program.display()
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Email, Mailer, SendmailMailer};

    #[test]
    fn test_subject_names_host() {
        assert!(Email::log_subject().starts_with("Debug log from: "));
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let mailer = SendmailMailer::new("/nonexistent/sendmail");
        let email = Email {
            to: "ops@example.org".to_string(),
            from: "app@example.org".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(mailer.send(&email).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_binary_that_does_not_read() {
        let mailer = SendmailMailer::new("/bin/true");
        let email = Email {
            to: "ops@example.org".to_string(),
            from: "app@example.org".to_string(),
            subject: "s".to_string(),
            body: "x".repeat(1024 * 1024),
        };
        assert!(mailer.send(&email).is_err());
    }
}
