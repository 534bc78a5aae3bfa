//! Alert sink for user-facing warnings

use std::sync::Arc;

/// Surfaces non-fatal warnings to the user
///
/// Fire-and-forget: nothing is returned and callers never wait on the user.
pub trait AlertSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Shared alert sink for dynamic dispatch
pub type SharedAlertSink = Arc<dyn AlertSink>;
