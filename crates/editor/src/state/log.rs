//! Notification sink and the console / error-log message panels

use serde::Serialize;
use shared::Severity;

/// One-way `(severity, message)` channel
pub trait NotificationSink {
    fn notify(&mut self, severity: Severity, message: &str);

    fn info(&mut self, message: &str) {
        self.notify(Severity::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.notify(Severity::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Forwards notifications to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.severity.label(), self.message)
    }
}

/// Recorded messages: info goes to the console, warnings and errors to the
/// error log. Everything is also forwarded to `tracing`.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn console(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Info)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.severity >= Severity::Warning)
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// True if any entry contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl NotificationSink for MessageLog {
    fn notify(&mut self, severity: Severity, message: &str) {
        if message.is_empty() {
            return;
        }
        TracingSink.notify(severity, message);
        self.entries.push(LogEntry {
            severity,
            message: message.to_string(),
        });
    }
}
