//! Data provider backed by a JSON fixture
//!
//! The fixture lists the map configurations, which device backs each of them,
//! and which series each device supports:
//!
//! ```json
//! {
//!   "mapConfigurations": [{"id": "M1", "name": "Office"}],
//!   "devices": {"M1": "Dev1"},
//!   "series": {"Dev1": ["c8y_Temperature.T"]}
//! }
//! ```
//!
//! A map configuration missing from `devices` may carry its own `deviceId`
//! field instead.

use anyhow::Result;
use async_trait::async_trait;
use indoor_map_core::{MapConfiguration, MapDataProvider};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::config::{read_json, write_json, ConfigError};

/// Contents of a provider fixture file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFixture {
    #[serde(default)]
    pub map_configurations: Vec<MapConfiguration>,
    /// Map configuration id → device id
    #[serde(default)]
    pub devices: HashMap<String, String>,
    /// Device id → supported `"fragment.series"` identifiers
    #[serde(default)]
    pub series: HashMap<String, Vec<String>>,
}

impl ProviderFixture {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        write_json(self, path)
    }
}

/// In-memory provider serving a fixture
#[derive(Debug, Clone, Default)]
pub struct StaticMapDataProvider {
    fixture: ProviderFixture,
}

impl StaticMapDataProvider {
    pub fn new(fixture: ProviderFixture) -> Self {
        Self { fixture }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        ProviderFixture::load_from_path(path).map(Self::new)
    }
}

#[async_trait]
impl MapDataProvider for StaticMapDataProvider {
    async fn load_map_configurations(&self) -> Result<Vec<MapConfiguration>> {
        Ok(self.fixture.map_configurations.clone())
    }

    fn device_id_from_map_configuration(
        &self,
        map_configuration: &MapConfiguration,
    ) -> Option<String> {
        self.fixture
            .devices
            .get(&map_configuration.id)
            .cloned()
            .or_else(|| {
                map_configuration
                    .extra
                    .get("deviceId")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .filter(|id| !id.is_empty())
    }

    async fn load_supported_data_point_series(&self, device_id: &str) -> Result<Vec<String>> {
        let series = self
            .fixture
            .series
            .get(device_id)
            .cloned()
            .unwrap_or_default();
        trace!("Fixture series for '{}': {:?}", device_id, series);
        Ok(series)
    }
}
