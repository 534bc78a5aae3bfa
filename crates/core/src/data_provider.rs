//! Data provider trait for map configurations and measurement series

use anyhow::Result;
use async_trait::async_trait;
use indoor_map_types::MapConfiguration;
use std::sync::Arc;

/// Trait for the external map and measurement data provider
///
/// Providers own the stored map configurations and know which device backs
/// each of them and which measurement series that device reports. Failures
/// are passed through to the host unchanged; callers do not retry.
#[async_trait]
pub trait MapDataProvider: Send + Sync {
    /// Load every selectable map configuration
    async fn load_map_configurations(&self) -> Result<Vec<MapConfiguration>>;

    /// Derive the device backing a map configuration
    ///
    /// Returns `None` when the map configuration does not reference a device.
    fn device_id_from_map_configuration(&self, map_configuration: &MapConfiguration)
        -> Option<String>;

    /// Load the `"fragment.series"` identifiers a device supports
    ///
    /// An empty or unknown device id yields an empty list rather than an
    /// error. The order of the returned list is preserved by callers.
    async fn load_supported_data_point_series(&self, device_id: &str) -> Result<Vec<String>>;
}

/// Shared data provider for dynamic dispatch
pub type SharedMapDataProvider = Arc<dyn MapDataProvider>;
