//! Logging port.
//!
//! Components receive an `Arc<dyn LogSink>` at construction time instead of
//! reaching for a process-wide logger. The console + file sink lives in
//! `pricelens-runner`; this module only carries the trait and two sinks that
//! need no I/O.

use std::sync::Mutex;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// A consumer of leveled text messages.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);
}

/// Discards everything.
pub struct NullLog;

impl LogSink for NullLog {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// A captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every line in memory, in arrival order.
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<LogLine>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages logged at error level.
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.level == LogLevel::Error)
            .map(|l| l.message)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.message.contains(needle))
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(LogLine {
                level,
                message: message.to_string(),
            });
    }
}

impl LogSink for MemoryLog {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_keeps_order_and_levels() {
        let log = MemoryLog::new();
        log.info("first");
        log.error("second");
        log.info("third");

        let lines = log.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].level, LogLevel::Error);
        assert_eq!(log.errors(), vec!["second".to_string()]);
        assert!(log.contains("thi"));
        assert!(!log.contains("fourth"));
    }
}
