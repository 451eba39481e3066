use crate::level::LogLevel;
use chrono::Local;

/// A single log entry, timestamped when the log call was made rather than
/// when the writer thread gets around to it.
#[derive(Debug, Clone)]
pub(crate) struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, component: Option<String>, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component,
            message,
        }
    }

    /// Renders the entry as one log line, newline included.
    pub fn render(&self) -> String {
        match &self.component {
            Some(component) => format!(
                "[{}] {} [component: {}]: {}\n",
                self.timestamp,
                self.level.as_str(),
                component,
                self.message
            ),
            None => format!(
                "[{}] {}: {}\n",
                self.timestamp,
                self.level.as_str(),
                self.message
            ),
        }
    }
}
