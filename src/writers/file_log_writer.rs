use crate::{
    util::io_err,
    writers::LogWriter,
    DebuggerError, LogLine,
};
use std::{
    fs::{File, OpenOptions},
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

/// A writer that appends log lines to a file.
///
/// The file is opened with the first line that is written, and stays open
/// until the writer is dropped. Missing parent directories are created.
pub struct FileLogWriter {
    path: PathBuf,
    line_break: &'static [u8],
    line_ending: &'static [u8],
    state: Mutex<State>,
}

pub(crate) const HTML_BREAK: &str = "<br/>";

enum State {
    Initial,
    Open(LineWriter<File>),
}

/// Builder for [`FileLogWriter`].
#[allow(clippy::module_name_repetitions)]
pub struct FileLogWriterBuilder {
    path: PathBuf,
    truncate: bool,
    line_break: &'static [u8],
    line_ending: &'static [u8],
}

impl FileLogWriterBuilder {
    /// Deletes a pre-existing file when the writer is built,
    /// rather than appending to it.
    #[must_use]
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Appends an HTML break tag to every line, for logs that are viewed in a browser.
    #[must_use]
    pub fn html_line_breaks(mut self, html: bool) -> Self {
        self.line_break = if html { HTML_BREAK.as_bytes() } else { b"" };
        self
    }

    /// Use Windows line endings, rather than just `\n`.
    #[must_use]
    pub fn use_windows_line_ending(mut self) -> Self {
        self.line_ending = b"\r\n";
        self
    }

    /// Produces the `FileLogWriter`.
    ///
    /// # Errors
    ///
    /// [`DebuggerError::Io`] if the path denotes an existing directory,
    /// or if a file that is to be truncated cannot be deleted.
    pub fn try_build(self) -> Result<FileLogWriter, DebuggerError> {
        if self.path.is_dir() {
            return Err(DebuggerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is a directory", self.path.display()),
            )));
        }
        if self.truncate {
            match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }
        Ok(FileLogWriter {
            path: self.path,
            line_break: self.line_break,
            line_ending: self.line_ending,
            state: Mutex::new(State::Initial),
        })
    }
}

impl FileLogWriter {
    /// Instantiates a builder for `FileLogWriter`.
    #[must_use]
    pub fn builder<P: Into<PathBuf>>(path: P) -> FileLogWriterBuilder {
        FileLogWriterBuilder {
            path: path.into(),
            truncate: false,
            line_break: b"",
            line_ending: b"\n",
        }
    }

    /// The path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<LineWriter<File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(LineWriter::new(file))
    }
}

impl LogWriter for FileLogWriter {
    fn write(&self, line: &LogLine) -> std::io::Result<()> {
        let mut state = self.state.lock().map_err(|_| io_err("Poison"))?;
        if let State::Initial = *state {
            *state = State::Open(self.open()?);
        }
        match *state {
            State::Open(ref mut w) => {
                w.write_all(line.text().as_bytes())?;
                w.write_all(self.line_break)?;
                w.write_all(self.line_ending)
            }
            State::Initial => Ok(()),
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        let mut state = self.state.lock().map_err(|_| io_err("Poison"))?;
        match *state {
            State::Open(ref mut w) => w.flush(),
            State::Initial => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::FileLogWriter;
    use crate::{writers::LogWriter, LogLine, Severity};

    fn line(text: &str) -> LogLine {
        LogLine::new(
            chrono::Local::now(),
            Severity::Info,
            "test".to_string(),
            text.to_string(),
            text.to_string(),
        )
    }

    #[test]
    fn test_lazy_open_and_append() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("sub").join("app.log");
        let writer = FileLogWriter::builder(&path).try_build().unwrap();
        assert!(!path.exists());

        writer.write(&line("first")).unwrap();
        writer.write(&line("second")).unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        // a second writer appends
        let writer2 = FileLogWriter::builder(&path).try_build().unwrap();
        writer2.write(&line("third")).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "first\nsecond\nthird\n"
        );
    }

    #[test]
    fn test_truncate_deletes_existing_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old content\n").unwrap();

        let writer = FileLogWriter::builder(&path)
            .truncate(true)
            .try_build()
            .unwrap();
        assert!(!path.exists());
        writer.write(&line("new")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_html_line_breaks() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("web.log");
        let writer = FileLogWriter::builder(&path)
            .html_line_breaks(true)
            .try_build()
            .unwrap();
        writer.write(&line("shown in a page")).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "shown in a page<br/>\n"
        );
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = temp_dir::TempDir::new().unwrap();
        assert!(FileLogWriter::builder(dir.path()).try_build().is_err());
    }
}
