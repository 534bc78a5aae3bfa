//! Popup data point list

use indoor_map_types::WidgetConfiguration;

/// Replace the popup data points with the editor's result, verbatim
pub fn replace(config: &mut WidgetConfiguration, datapoints_popup: Vec<String>) {
    config.datapoints_popup = datapoints_popup;
}
