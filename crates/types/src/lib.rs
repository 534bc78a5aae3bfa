//! indoor-map-types: Shared data types for the indoor map widget configuration.
//!
//! This crate contains the persisted widget configuration, its partial
//! (pre-initialization) shapes, legend thresholds, and the map configuration
//! candidates offered by the data provider. The types are plain serde data
//! with no async or I/O dependencies, making them the foundation layer for
//! the other crates.

pub mod map_configuration;
pub mod partial;
pub mod threshold;
pub mod widget;

// Re-export commonly used types at the crate root for convenience
pub use map_configuration::MapConfiguration;
pub use partial::{ConfigState, PartialLegend, PartialMapSettings, PartialWidgetConfiguration};
pub use threshold::{Threshold, ThresholdId};
pub use widget::{Legend, MapSettings, Measurement, WidgetConfiguration};
