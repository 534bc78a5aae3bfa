//! Measurement selection reconciliation
//!
//! The stored `measurement` and the selected data point are kept consistent
//! here and nowhere else.

use indoor_map_types::{Measurement, WidgetConfiguration};
use log::debug;

/// Re-derive the selected data point after the supported series changed
///
/// On a match the measurement is rewritten from the matched identifier. On a
/// miss nothing is selected and the stored measurement is left alone, so a
/// device that is briefly unreachable does not wipe the configuration.
pub fn reconcile(config: &mut WidgetConfiguration, data_point_series: &[String]) -> Option<String> {
    let candidate = config.measurement.data_point();
    let Some(selected) = data_point_series.iter().find(|dp| **dp == candidate) else {
        debug!("Stored measurement {} is not among the supported series", candidate);
        return None;
    };

    select_data_point(config, selected);
    Some(selected.clone())
}

/// Store the user's chosen `"fragment.series"` as the measurement
pub fn select_data_point(config: &mut WidgetConfiguration, data_point: &str) {
    config.measurement = Measurement::from_data_point(data_point);
}
