//! Configuration shapes before initialization
//!
//! A host may hand over nothing at all, an older configuration missing some
//! fields, or a configuration that is already complete. `ConfigState` names
//! those three cases explicitly so initialization can be a total function.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::threshold::Threshold;
use crate::widget::{Legend, MapSettings, Measurement, WidgetConfiguration};

/// Map settings as stored, any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMapSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_level: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legend as stored, any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialLegend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Vec<Threshold>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Widget configuration as stored by the host, any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWidgetConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_configuration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_settings: Option<PartialMapSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<PartialLegend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datapoints_popup: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartialWidgetConfiguration {
    /// A map has been chosen and a measurement stored
    pub fn is_configured(&self) -> bool {
        self.map_configuration_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
            && self.measurement.is_some()
    }

    /// Convert to a complete configuration if every field is present
    pub fn into_complete(self) -> Result<WidgetConfiguration, Self> {
        match self {
            PartialWidgetConfiguration {
                map_configuration_id: Some(map_configuration_id),
                measurement: Some(measurement),
                map_settings:
                    Some(PartialMapSettings {
                        zoom_level: Some(zoom_level),
                        extra: map_settings_extra,
                    }),
                legend:
                    Some(PartialLegend {
                        title: Some(title),
                        thresholds: Some(thresholds),
                        extra: legend_extra,
                    }),
                datapoints_popup: Some(datapoints_popup),
                extra,
            } => Ok(WidgetConfiguration {
                map_configuration_id,
                measurement,
                map_settings: MapSettings {
                    zoom_level,
                    extra: map_settings_extra,
                },
                legend: Legend {
                    title,
                    thresholds,
                    extra: legend_extra,
                },
                datapoints_popup,
                extra,
            }),
            incomplete => Err(incomplete),
        }
    }
}

impl From<WidgetConfiguration> for PartialWidgetConfiguration {
    fn from(config: WidgetConfiguration) -> Self {
        Self {
            map_configuration_id: Some(config.map_configuration_id),
            measurement: Some(config.measurement),
            map_settings: Some(PartialMapSettings {
                zoom_level: Some(config.map_settings.zoom_level),
                extra: config.map_settings.extra,
            }),
            legend: Some(PartialLegend {
                title: Some(config.legend.title),
                thresholds: Some(config.legend.thresholds),
                extra: config.legend.extra,
            }),
            datapoints_popup: Some(config.datapoints_popup),
            extra: config.extra,
        }
    }
}

/// Shape of a configuration handed over by the host
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigState {
    /// No configuration was stored yet
    Uninitialized,
    /// Some fields are missing, or no map has been chosen yet
    Partial(PartialWidgetConfiguration),
    /// Already configured and fully populated
    Complete(WidgetConfiguration),
}

impl ConfigState {
    /// Classify a stored configuration
    pub fn classify(config: Option<PartialWidgetConfiguration>) -> Self {
        let Some(partial) = config else {
            return ConfigState::Uninitialized;
        };
        if !partial.is_configured() {
            return ConfigState::Partial(partial);
        }
        match partial.into_complete() {
            Ok(complete) => ConfigState::Complete(complete),
            Err(partial) => ConfigState::Partial(partial),
        }
    }

    /// Classify a raw JSON value; `null` counts as no configuration
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(ConfigState::Uninitialized);
        }
        let partial = serde_json::from_value(value)?;
        Ok(Self::classify(Some(partial)))
    }
}

impl From<WidgetConfiguration> for ConfigState {
    fn from(config: WidgetConfiguration) -> Self {
        Self::classify(Some(config.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_uninitialized() {
        assert_eq!(
            ConfigState::from_json(Value::Null).unwrap(),
            ConfigState::Uninitialized
        );
    }

    #[test]
    fn test_missing_legend_is_partial() {
        let state = ConfigState::from_json(json!({
            "mapConfigurationId": "m1",
            "measurement": {"fragment": "c8y_Temperature", "series": "T"},
            "mapSettings": {"zoomLevel": 18},
            "datapointsPopup": []
        }))
        .unwrap();

        match state {
            ConfigState::Partial(partial) => {
                assert!(partial.is_configured());
                assert!(partial.legend.is_none());
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_map_id_is_partial_even_when_fully_populated() {
        let state = ConfigState::from_json(json!({
            "mapConfigurationId": "",
            "measurement": {"fragment": "", "series": ""},
            "mapSettings": {"zoomLevel": 20},
            "legend": {"title": "", "thresholds": []},
            "datapointsPopup": []
        }))
        .unwrap();
        assert!(matches!(state, ConfigState::Partial(_)));
    }

    #[test]
    fn test_fully_populated_is_complete_and_keeps_host_fields() {
        let state = ConfigState::from_json(json!({
            "mapConfigurationId": "m1",
            "measurement": {"fragment": "c8y_Temperature", "series": "T"},
            "mapSettings": {"zoomLevel": 18},
            "legend": {"title": "Rooms", "thresholds": []},
            "datapointsPopup": ["c8y_Humidity.H"],
            "hostRevision": 7
        }))
        .unwrap();

        let ConfigState::Complete(config) = state else {
            panic!("expected complete configuration");
        };
        assert_eq!(config.map_settings.zoom_level, Number::from(18u32));
        assert_eq!(config.legend.title, "Rooms");
        assert_eq!(config.extra.get("hostRevision"), Some(&json!(7)));
    }
}
