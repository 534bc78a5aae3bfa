//! indoor-map-core: Collaborator traits for the indoor map widget configuration.
//!
//! This crate contains the traits the configuration engine talks to
//! (MapDataProvider, AlertSink, DialogHost), dialog cancellation tokens,
//! and shared constants.

pub mod cancellation;
pub mod constants;
mod alert;
mod data_provider;
mod dialog;

pub use alert::{AlertSink, SharedAlertSink};
pub use cancellation::{CancellationSource, CancellationToken};
pub use constants::{DEFAULT_ZOOM_LEVEL, DEVICE_NOT_FOUND_WARNING};
pub use data_provider::{MapDataProvider, SharedMapDataProvider};
pub use dialog::{DialogHost, DialogOutcome, PopupEditorRequest, SharedDialogHost, ThresholdEditorRequest};

// Re-export types used in trait signatures for convenience
pub use indoor_map_types::{MapConfiguration, Threshold};
