//! Alert sink implementations

use indoor_map_core::AlertSink;
use std::sync::Mutex;

/// Routes user warnings into the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Keeps every warning for later inspection
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AlertSink for RecordingAlertSink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
