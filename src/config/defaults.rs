//! Default configuration for new widgets
//!
//! Turns whatever the host stored (nothing, an older partial configuration,
//! or a complete one) into a fully populated `WidgetConfiguration`.

use indoor_map_core::DEFAULT_ZOOM_LEVEL;
use indoor_map_types::{
    ConfigState, Legend, MapSettings, PartialWidgetConfiguration, WidgetConfiguration,
};
use log::debug;
use serde_json::{Number, Value};

/// Values written into fields missing from a stored configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitDefaults {
    /// Zoom level for `mapSettings.zoomLevel`
    pub zoom_level: u32,
}

impl Default for InitDefaults {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

/// Initialize a stored configuration
///
/// Complete configurations are returned unchanged. Otherwise every missing
/// field is filled from `defaults`; fields that are present, including host
/// fields this crate does not model, are kept as they are. Running the result
/// through `initialize` again returns it unchanged.
pub fn initialize(state: ConfigState, defaults: &InitDefaults) -> WidgetConfiguration {
    match state {
        ConfigState::Complete(config) => config,
        ConfigState::Uninitialized => {
            debug!("No stored widget configuration, using defaults");
            fill_missing(PartialWidgetConfiguration::default(), defaults)
        }
        ConfigState::Partial(partial) => {
            debug!("Filling missing fields of stored widget configuration");
            fill_missing(partial, defaults)
        }
    }
}

/// Initialize a raw JSON configuration; `null` is treated as absent
pub fn initialize_json(
    value: Value,
    defaults: &InitDefaults,
) -> Result<WidgetConfiguration, serde_json::Error> {
    Ok(initialize(ConfigState::from_json(value)?, defaults))
}

fn fill_missing(partial: PartialWidgetConfiguration, defaults: &InitDefaults) -> WidgetConfiguration {
    let map_settings = partial.map_settings.unwrap_or_default();
    let legend = partial.legend.unwrap_or_default();

    WidgetConfiguration {
        map_configuration_id: partial.map_configuration_id.unwrap_or_default(),
        measurement: partial.measurement.unwrap_or_default(),
        map_settings: MapSettings {
            zoom_level: map_settings
                .zoom_level
                .unwrap_or_else(|| Number::from(defaults.zoom_level)),
            extra: map_settings.extra,
        },
        legend: Legend {
            title: legend.title.unwrap_or_default(),
            thresholds: legend.thresholds.unwrap_or_default(),
            extra: legend.extra,
        },
        datapoints_popup: partial.datapoints_popup.unwrap_or_default(),
        extra: partial.extra,
    }
}
