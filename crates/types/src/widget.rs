//! Persisted widget configuration
//!
//! The JSON layout of these types is the durable contract shared with
//! dashboard export/import tooling, so field names are camelCase and host
//! fields this crate does not model are carried through `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::threshold::Threshold;

/// Measurement type identified by `(fragment, series)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub fragment: String,
    #[serde(default)]
    pub series: String,
}

impl Measurement {
    pub fn new(fragment: impl Into<String>, series: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            series: series.into(),
        }
    }

    /// Split a `"fragment.series"` identifier on its first `.`
    ///
    /// An identifier without a dot yields an empty series.
    pub fn from_data_point(data_point: &str) -> Self {
        match data_point.split_once('.') {
            Some((fragment, series)) => Self::new(fragment, series),
            None => Self::new(data_point, ""),
        }
    }

    /// The `"fragment.series"` identifier for this measurement
    pub fn data_point(&self) -> String {
        format!("{}.{}", self.fragment, self.series)
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty() && self.series.is_empty()
    }
}

/// Map view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    /// Kept as the stored JSON number, fractional zoom levels included
    pub zoom_level: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legend shown next to the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub thresholds: Vec<Threshold>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully populated widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfiguration {
    /// Selected map configuration, empty when none is selected
    pub map_configuration_id: String,

    /// Primary measurement shown on the map markers
    pub measurement: Measurement,

    pub map_settings: MapSettings,

    pub legend: Legend,

    /// `"fragment.series"` identifiers shown in marker popups
    pub datapoints_popup: Vec<String>,

    /// Fields stored by the host that this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetConfiguration {
    /// A configuration has been set up once a map is chosen
    pub fn has_map_configuration(&self) -> bool {
        !self.map_configuration_id.is_empty()
    }
}
