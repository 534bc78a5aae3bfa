//! Data point series resolution for a selected map configuration

use anyhow::Result;
use indoor_map_core::{
    MapConfiguration, SharedAlertSink, SharedMapDataProvider, DEVICE_NOT_FOUND_WARNING,
};
use log::{debug, warn};

/// Resolves map configuration → device → supported series
pub struct DataPointSeriesResolver {
    provider: SharedMapDataProvider,
    alerts: SharedAlertSink,
}

impl DataPointSeriesResolver {
    pub fn new(provider: SharedMapDataProvider, alerts: SharedAlertSink) -> Self {
        Self { provider, alerts }
    }

    /// Derive the device backing `selection`
    ///
    /// When no device can be derived (including when nothing is selected) the
    /// user is warned and an empty id is returned.
    pub fn device_id(&self, selection: Option<&MapConfiguration>) -> String {
        let device_id = selection
            .and_then(|map_configuration| {
                self.provider.device_id_from_map_configuration(map_configuration)
            })
            .filter(|id| !id.is_empty());

        match device_id {
            Some(id) => id,
            None => {
                warn!(
                    "No device for map configuration {:?}",
                    selection.map(|m| m.id.as_str())
                );
                self.alerts.warn(DEVICE_NOT_FOUND_WARNING);
                String::new()
            }
        }
    }

    /// Load the series supported by the device behind `selection`
    ///
    /// The provider is always asked, even with an empty device id. Its order is
    /// kept and its errors are returned as they are.
    pub async fn resolve(&self, selection: Option<&MapConfiguration>) -> Result<Vec<String>> {
        let device_id = self.device_id(selection);
        let series = self
            .provider
            .load_supported_data_point_series(&device_id)
            .await?;
        debug!(
            "Device '{}' supports {} data point series",
            device_id,
            series.len()
        );
        Ok(series)
    }
}
