//! The logging capability a data source reports through.

use std::sync::{Arc, Mutex};

/// A write-only sink accepting one message per call.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, message: &str) {
        (**self).log(message)
    }
}

/// Forwards every message to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "mercurial_source", "{message}");
    }
}

/// Keeps every message in memory so the log stream can be inspected after a fetch.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the messages logged so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any logged message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}

#[cfg(test)]
mod test_memory_logger {
    use super::*;

    #[test]
    fn records_in_order() {
        let logger = MemoryLogger::new();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.messages(), vec!["first", "second"]);
        assert!(logger.contains("sec"));
        assert!(!logger.contains("third"));
    }

    #[test]
    fn shared_through_arc() {
        let logger = Arc::new(MemoryLogger::new());
        let shared: Arc<dyn Logger> = logger.clone();
        shared.log("via arc");
        assert_eq!(logger.messages(), vec!["via arc"]);
    }
}
