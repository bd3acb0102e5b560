use crate::{writers::LogWriter, LogLine, OutputContext};
use std::io::Write;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use super::file_log_writer::HTML_BREAK;

/// The stream a [`ScreenWriter`] writes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ScreenTarget {
    /// Standard output, which in a web context is the response.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// A writer that prints log lines to stdout or stderr.
///
/// In a web context every line gets an HTML break tag, so that the output
/// stays readable when it ends up in a page.
pub struct ScreenWriter {
    target: ScreenTarget,
    context: OutputContext,
    #[cfg(test)]
    validation_buffer: Arc<Mutex<Vec<u8>>>,
}

impl ScreenWriter {
    /// Creates a writer for the given stream.
    #[must_use]
    pub fn new(target: ScreenTarget, context: OutputContext) -> Self {
        Self {
            target,
            context,
            #[cfg(test)]
            validation_buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn write_to(&self, w: &mut dyn Write, line: &LogLine) -> std::io::Result<()> {
        let mut buffer = Vec::<u8>::with_capacity(line.text().len() + 6);
        buffer.extend_from_slice(line.text().as_bytes());
        if self.context == OutputContext::Web {
            buffer.extend_from_slice(HTML_BREAK.as_bytes());
        }
        buffer.push(b'\n');
        w.write_all(&buffer)?;

        #[cfg(test)]
        {
            if let Ok(mut validation_buffer) = self.validation_buffer.lock() {
                validation_buffer.extend_from_slice(&buffer);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn written(&self) -> String {
        String::from_utf8_lossy(&self.validation_buffer.lock().unwrap()).to_string()
    }
}

impl LogWriter for ScreenWriter {
    fn write(&self, line: &LogLine) -> std::io::Result<()> {
        match self.target {
            ScreenTarget::Stdout => self.write_to(&mut std::io::stdout().lock(), line),
            ScreenTarget::Stderr => self.write_to(&mut std::io::stderr().lock(), line),
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        match self.target {
            ScreenTarget::Stdout => std::io::stdout().flush(),
            ScreenTarget::Stderr => std::io::stderr().flush(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ScreenTarget, ScreenWriter};
    use crate::{writers::LogWriter, LogLine, OutputContext, Severity};

    fn line(text: &str) -> LogLine {
        LogLine::new(
            chrono::Local::now(),
            Severity::Warn,
            "screen".to_string(),
            text.to_string(),
            text.to_string(),
        )
    }

    #[test]
    fn test_cli_lines_end_with_newline() {
        let writer = ScreenWriter::new(ScreenTarget::Stderr, OutputContext::Cli);
        writer.write(&line("one")).unwrap();
        writer.write(&line("two")).unwrap();
        assert_eq!(writer.written(), "one\ntwo\n");
    }

    #[test]
    fn test_web_lines_get_break_tag() {
        let writer = ScreenWriter::new(ScreenTarget::Stdout, OutputContext::Web);
        writer.write(&line("one")).unwrap();
        assert_eq!(writer.written(), "one<br/>\n");
    }
}
