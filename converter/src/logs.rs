//! Conversion log.
//!
//! Every pipeline run records what it found (header row, assignments,
//! column classes, warnings) as a list of [`LogEntry`] values returned with
//! the result, so a UI can show them next to the preview. Entries are also
//! forwarded to the `log` facade for applications that install a logger.

use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Display prefix used by the CLI.
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    fn at(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::at(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::at(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::at(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::at(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render as one line with level prefix and indentation.
    pub fn render(&self) -> String {
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, self.level.prefix(), self.message)
    }
}

/// Entries collected during one conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ConversionLog {
    entries: Vec<LogEntry>,
}

impl ConversionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry and forward it to the `log` facade.
    pub fn push(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Info | LogLevel::Success => log::info!("{}", entry.message),
            LogLevel::Warning => log::warn!("{}", entry.message),
            LogLevel::Error => log::error!("{}", entry.message),
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.push(LogEntry::info(msg));
    }

    pub fn success(&mut self, msg: impl Into<String>) {
        self.push(LogEntry::success(msg));
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.push(LogEntry::warning(msg));
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.push(LogEntry::error(msg));
    }

    pub fn info_indent(&mut self, msg: impl Into<String>, indent: u8) {
        self.push(LogEntry::info(msg).with_indent(indent));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level == LogLevel::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = LogEntry::warning("Start date is in the future").with_indent(1);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 1);
    }

    #[test]
    fn test_render_prefix() {
        let line = LogEntry::success("3 assignments").with_indent(1).render();
        assert_eq!(line, "      ✓ 3 assignments");
    }

    #[test]
    fn test_log_collects_in_order() {
        let mut log = ConversionLog::new();
        log.info("reading");
        log.warning("no header row found");
        log.success("done");

        assert_eq!(log.entries().len(), 3);
        assert_eq!(log.warnings().count(), 1);
        assert_eq!(log.entries()[2].level, LogLevel::Success);
    }
}
