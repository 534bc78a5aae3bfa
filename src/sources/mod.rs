//! Collaborator implementations: fixture provider, alert sinks, scripted dialogs

mod alerts;
mod dialogs;
mod static_provider;

pub use alerts::{LogAlertSink, RecordingAlertSink};
pub use dialogs::ScriptedDialogHost;
pub use static_provider::{ProviderFixture, StaticMapDataProvider};
