//! Structured JSON logger
//!
//! One line per event, synchronous, no buffering. Fields are emitted in
//! deterministic (sorted) key order so log output diffs cleanly across runs.

use std::fmt;

use serde_json::{Map, Value};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace,
    /// Normal operations
    Info,
    /// Recoverable issues
    Warn,
    /// Operation failures
    Error,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger
pub struct Logger;

impl Logger {
    /// Logs a normal-operations event
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        println!("{}", Self::render(Severity::Info, event, fields));
    }

    /// Logs a recoverable issue
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        eprintln!("{}", Self::render(Severity::Warn, event, fields));
    }

    /// Logs an operation failure
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        eprintln!("{}", Self::render(Severity::Error, event, fields));
    }

    /// Renders one event as a single JSON line.
    ///
    /// serde_json's object map keeps keys sorted, which is exactly the
    /// deterministic ordering the output format wants.
    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut record = Map::new();
        record.insert("event".to_string(), Value::from(event));
        record.insert("severity".to_string(), Value::from(severity.as_str()));
        for (key, value) in fields {
            record.insert((*key).to_string(), Value::from(*value));
        }
        Value::Object(record).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_single_json_line() {
        let line = Logger::render(Severity::Info, "JOIN_PLAN", &[("mode", "pushdown")]);
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "JOIN_PLAN");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["mode"], "pushdown");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_render_key_order_deterministic() {
        let a = Logger::render(Severity::Info, "E", &[("b", "2"), ("a", "1")]);
        let b = Logger::render(Severity::Info, "E", &[("a", "1"), ("b", "2")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
    }
}
