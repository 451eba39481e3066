//! The [`Logger`] handle given out to application code.

use crate::error::Result;
use crate::level::LogLevel;
use crate::record::LogRecord;
use crate::writer::spawn_writer_thread;
use std::path::PathBuf;
use std::sync::mpsc::{Sender, channel};

/// Cheap-to-clone logging handle.
///
/// Each handle owns a sender to a writer thread; dropping every handle for
/// a file shuts that writer down. Records below the configured level are
/// discarded before they reach the channel.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::new("app.log".into(), LogLevel::Info).unwrap();
/// logger.info("client started");
/// logger.error("connect failed");
/// ```
#[derive(Clone)]
pub struct Logger {
    sender: Sender<LogRecord>,
    level: LogLevel,
    component: Option<String>,
    log_path: PathBuf,
    console_output: bool,
}

impl Logger {
    /// Creates a logger writing to `log_path`, spawning its writer thread.
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be created or opened for append.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        let (sender, receiver) = channel();
        spawn_writer_thread(&log_path, receiver)?;
        Ok(Logger {
            sender,
            level,
            component: None,
            log_path,
            console_output: false,
        })
    }

    /// Creates a logger whose records are tagged with a component name,
    /// optionally echoing each record to stdout.
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be created or opened for append.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: String,
        console_output: bool,
    ) -> Result<Self> {
        let (sender, receiver) = channel();
        spawn_writer_thread(&log_path, receiver)?;
        Ok(Logger {
            sender,
            level,
            component: Some(component),
            log_path,
            console_output,
        })
    }

    /// Derives a logger with the same file, level and echo setting but a
    /// different component tag.
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be reopened.
    pub fn for_component(&self, component: &str) -> Result<Self> {
        Self::with_component(
            self.log_path.clone(),
            self.level,
            component.to_string(),
            self.console_output,
        )
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        let record = LogRecord::new(level, self.component.clone(), message.to_string());
        if self.console_output {
            print!("{}", record.render());
        }
        let _ = self.sender.send(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn wait_for_write() {
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_logger_writes_to_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("client.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Debug).unwrap();
        logger.info("session started");
        wait_for_write();

        assert!(log_path.exists());
        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("session started"));
    }

    #[test]
    fn test_level_filter_drops_low_records() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("client.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Warn).unwrap();
        logger.debug("too quiet");
        logger.info("still too quiet");
        logger.warn("loud enough");
        logger.error("definitely");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("too quiet"));
        assert!(content.contains("loud enough"));
        assert!(content.contains("definitely"));
    }

    #[test]
    fn test_component_tag_in_output() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("client.log");

        let logger =
            Logger::with_component(log_path.clone(), LogLevel::Info, "Session".to_string(), false)
                .unwrap();
        logger.info("connected");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("[component: Session]"));
    }

    #[test]
    fn test_for_component_shares_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("client.log");

        let root = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let derived = root.for_component("Policy").unwrap();
        root.info("root line");
        derived.info("policy line");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("root line"));
        assert!(content.contains("[component: Policy]: policy line"));
    }

    #[test]
    fn test_clone_logs_from_other_thread() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("client.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let clone = logger.clone();
        let handle = thread::spawn(move || clone.info("from worker"));
        logger.info("from main");
        handle.join().unwrap();
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("from worker"));
        assert!(content.contains("from main"));
    }
}
