//! Dedicated writer thread draining the record channel into the log file.

use crate::error::Result;
use crate::record::LogRecord;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Receiver;

pub(crate) struct LogWriter {
    file: File,
}

impl LogWriter {
    /// Opens the log file in append mode, creating it if needed.
    pub fn new(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self { file })
    }

    /// Appends one rendered record. Write failures are reported to stderr
    /// instead of crashing the writer thread.
    fn write_record(&mut self, record: &LogRecord) {
        if let Err(e) = self.file.write_all(record.render().as_bytes()) {
            eprintln!("log write failed: {}", e);
            return;
        }
        if let Err(e) = self.file.flush() {
            eprintln!("log flush failed: {}", e);
        }
    }

    /// Drains the channel until every sender is dropped.
    pub fn run(mut self, receiver: Receiver<LogRecord>) {
        for record in receiver {
            self.write_record(&record);
        }
    }
}

/// Opens the file and spawns the writer loop on its own thread.
pub(crate) fn spawn_writer_thread(
    log_path: &Path,
    receiver: Receiver<LogRecord>,
) -> Result<()> {
    let writer = LogWriter::new(log_path)?;
    std::thread::spawn(move || writer.run(receiver));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use std::fs;
    use std::sync::mpsc::channel;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_writer_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("out.log");

        assert!(LogWriter::new(&log_path).is_ok());
        assert!(log_path.exists());
    }

    #[test]
    fn test_write_record_appends_line() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("out.log");

        let mut writer = LogWriter::new(&log_path).unwrap();
        writer.write_record(&LogRecord::new(LogLevel::Info, None, "first".to_string()));
        writer.write_record(&LogRecord::new(LogLevel::Info, None, "second".to_string()));

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("first"));
        assert!(content.contains("second"));
    }

    #[test]
    fn test_thread_drains_until_senders_drop() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("out.log");
        let (sender, receiver) = channel();

        spawn_writer_thread(&log_path, receiver).unwrap();
        sender
            .send(LogRecord::new(LogLevel::Debug, None, "from thread".to_string()))
            .unwrap();
        drop(sender);

        thread::sleep(Duration::from_millis(100));

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("from thread"));
    }
}
