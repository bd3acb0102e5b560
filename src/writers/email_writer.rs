use crate::{
    mail::{Email, Mailer},
    util::{eprint_err, io_err, ErrorCode},
    writers::LogWriter,
    LogLine,
};
use std::sync::{Arc, Mutex};

/// A writer that collects log lines and sends them as one email when it is shut down.
///
/// Nothing is sent if no recipient is set or if no line was collected.
pub struct EmailWriter {
    to: String,
    from: String,
    mailer: Arc<dyn Mailer>,
    buffer: Mutex<Option<String>>,
}

impl EmailWriter {
    /// Creates a writer that mails to `to`, from `from`.
    pub fn new<S: Into<String>>(to: S, from: S, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            mailer,
            buffer: Mutex::new(Some(String::new())),
        }
    }

    fn take_body(&self) -> Option<String> {
        self.buffer.lock().ok().and_then(|mut b| b.take())
    }
}

impl LogWriter for EmailWriter {
    fn write(&self, line: &LogLine) -> std::io::Result<()> {
        let mut buffer = self.buffer.lock().map_err(|_| io_err("Poison"))?;
        if let Some(ref mut body) = *buffer {
            body.push_str(line.text());
            body.push('\n');
            Ok(())
        } else {
            Err(io_err("email was already sent"))
        }
    }

    fn shutdown(&self) {
        let Some(body) = self.take_body() else {
            return;
        };
        if self.to.is_empty() || body.is_empty() {
            return;
        }
        let email = Email {
            to: self.to.clone(),
            from: self.from.clone(),
            subject: Email::log_subject(),
            body,
        };
        if let Err(e) = self.mailer.send(&email) {
            eprint_err(ErrorCode::Mail, "sending the collected log lines failed", &e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::EmailWriter;
    use crate::{
        mail::{Email, Mailer},
        writers::LogWriter,
        DebuggerError, LogLine, Severity,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Outbox(Mutex<Vec<Email>>);
    impl Mailer for Outbox {
        fn send(&self, email: &Email) -> Result<(), DebuggerError> {
            self.0.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn line(text: &str) -> LogLine {
        LogLine::new(
            chrono::Local::now(),
            Severity::Error,
            "mail".to_string(),
            text.to_string(),
            text.to_string(),
        )
    }

    #[test]
    fn test_sends_once_at_shutdown() {
        let outbox = Arc::new(Outbox::default());
        let writer = EmailWriter::new("ops@example.org", "app@example.org", outbox.clone());
        writer.write(&line("first")).unwrap();
        writer.write(&line("second")).unwrap();
        assert!(outbox.0.lock().unwrap().is_empty());

        writer.shutdown();
        writer.shutdown();
        let sent = outbox.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.org");
        assert_eq!(sent[0].body, "first\nsecond\n");
        assert!(writer.write(&line("late")).is_err());
    }

    #[test]
    fn test_nothing_to_send() {
        let outbox = Arc::new(Outbox::default());
        EmailWriter::new("ops@example.org", "app@example.org", outbox.clone()).shutdown();

        let no_recipient = EmailWriter::new("", "app@example.org", outbox.clone());
        no_recipient.write(&line("x")).unwrap();
        no_recipient.shutdown();

        assert!(outbox.0.lock().unwrap().is_empty());
    }
}
