//! Resolved (non-persisted) selection state

use indoor_map_types::MapConfiguration;

/// Selection state derived from the provider
///
/// Nothing here is persisted; it is rebuilt from the configuration and the
/// provider every time the widget is configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Candidates offered for selection
    pub map_configurations: Vec<MapConfiguration>,
    /// Currently selected candidate
    pub selected_map_configuration: Option<MapConfiguration>,
    /// Series supported by the selected map's device, `None` until resolved
    pub data_point_series: Option<Vec<String>>,
    /// Selected series; always an element of `data_point_series`
    pub selected_data_point: Option<String>,
}

impl SessionState {
    /// Whether `data_point` is one of the resolved series
    pub fn supports(&self, data_point: &str) -> bool {
        self.data_point_series
            .as_ref()
            .is_some_and(|series| series.iter().any(|s| s == data_point))
    }

    /// Forget everything derived from the previous map selection
    pub(crate) fn restart(&mut self, selection: Option<MapConfiguration>) {
        self.selected_map_configuration = selection;
        self.data_point_series = None;
        self.selected_data_point = None;
    }
}
