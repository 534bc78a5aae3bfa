//! indoor-map-config: Configuration engine for the data point indoor map widget
//!
//! This library provides the configuration state behind the widget:
//! - Initialization of stored, possibly partial widget configurations
//! - The map → device → series → measurement selection chain
//! - Threshold and popup data point list editing driven by dialogs
//! - Fixture-backed collaborators for the command line and tests

pub mod config;
pub mod core;
pub mod sources;

// Re-export commonly used types
pub use crate::config::{initialize, InitDefaults};
pub use crate::core::{MapConfigurator, SeriesUpdate, SessionState};
