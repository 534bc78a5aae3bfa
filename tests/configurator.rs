use anyhow::{anyhow, Result};
use async_trait::async_trait;
use indoor_map_config::core::{ConfiguratorError, DialogResult, SeriesUpdate};
use indoor_map_config::sources::{
    ProviderFixture, RecordingAlertSink, ScriptedDialogHost, StaticMapDataProvider,
};
use indoor_map_config::{InitDefaults, MapConfigurator};
use indoor_map_core::{
    CancellationToken, DialogHost, DialogOutcome, MapConfiguration, MapDataProvider,
    PopupEditorRequest, Threshold, ThresholdEditorRequest, DEVICE_NOT_FOUND_WARNING,
};
use indoor_map_types::{ConfigState, Measurement};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

fn fixture() -> ProviderFixture {
    ProviderFixture {
        map_configurations: vec![
            MapConfiguration::new("M1", "Office"),
            MapConfiguration::new("M2", "Warehouse"),
            MapConfiguration::new("M3", "Unassigned"),
        ],
        devices: HashMap::from([
            ("M1".to_string(), "Dev1".to_string()),
            ("M2".to_string(), "Dev2".to_string()),
        ]),
        series: HashMap::from([
            ("Dev1".to_string(), vec!["c8y_Temperature.T".to_string()]),
            (
                "Dev2".to_string(),
                vec!["c8y_Humidity.H".to_string(), "c8y_Temperature.T".to_string()],
            ),
        ]),
    }
}

struct Harness {
    configurator: Arc<MapConfigurator>,
    alerts: Arc<RecordingAlertSink>,
    dialogs: Arc<ScriptedDialogHost>,
}

fn harness(stored: ConfigState) -> Harness {
    let alerts = Arc::new(RecordingAlertSink::new());
    let dialogs = Arc::new(ScriptedDialogHost::new());
    let configurator = MapConfigurator::new(
        stored,
        &InitDefaults::default(),
        Arc::new(StaticMapDataProvider::new(fixture())),
        alerts.clone(),
        dialogs.clone(),
    );
    Harness {
        configurator: Arc::new(configurator),
        alerts,
        dialogs,
    }
}

fn threshold(id: &str, label: &str) -> Threshold {
    serde_json::from_value(json!({"id": id, "label": label, "color": "#00ff00"})).unwrap()
}

fn label(threshold: &Threshold) -> &str {
    threshold.fields["label"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn empty_config_to_selected_measurement() {
    let h = harness(ConfigState::Uninitialized);
    assert_eq!(h.configurator.load().await.unwrap(), None);

    let update = h.configurator.map_configuration_changed("M1").await.unwrap();
    assert_eq!(
        update,
        SeriesUpdate::Applied {
            selected_data_point: None
        }
    );

    let session = h.configurator.session().await;
    assert_eq!(session.selected_map_configuration.unwrap().id, "M1");
    assert_eq!(
        session.data_point_series,
        Some(vec!["c8y_Temperature.T".to_string()])
    );
    assert_eq!(session.selected_data_point, None);

    h.configurator
        .measurement_changed("c8y_Temperature.T")
        .await
        .unwrap();

    let config = h.configurator.config().await;
    assert_eq!(config.map_configuration_id, "M1");
    assert_eq!(config.measurement, Measurement::new("c8y_Temperature", "T"));
    assert_eq!(
        h.configurator.session().await.selected_data_point.as_deref(),
        Some("c8y_Temperature.T")
    );
    assert!(h.alerts.messages().is_empty());
}

#[tokio::test]
async fn load_reselects_stored_map_and_measurement() {
    let stored = ConfigState::from_json(json!({
        "mapConfigurationId": "M2",
        "measurement": {"fragment": "c8y_Humidity", "series": "H"},
        "mapSettings": {"zoomLevel": 19},
        "legend": {"title": "", "thresholds": []},
        "datapointsPopup": []
    }))
    .unwrap();
    let h = harness(stored);

    let update = h.configurator.load().await.unwrap();
    assert_eq!(
        update,
        Some(SeriesUpdate::Applied {
            selected_data_point: Some("c8y_Humidity.H".to_string())
        })
    );
    assert_eq!(h.configurator.session().await.map_configurations.len(), 3);
}

#[tokio::test]
async fn switching_map_keeps_measurement_when_unsupported() {
    let h = harness(ConfigState::Uninitialized);
    h.configurator.load().await.unwrap();
    h.configurator.map_configuration_changed("M2").await.unwrap();
    h.configurator.measurement_changed("c8y_Humidity.H").await.unwrap();

    let update = h.configurator.map_configuration_changed("M1").await.unwrap();
    assert_eq!(
        update,
        SeriesUpdate::Applied {
            selected_data_point: None
        }
    );
    let config = h.configurator.config().await;
    assert_eq!(config.map_configuration_id, "M1");
    assert_eq!(config.measurement, Measurement::new("c8y_Humidity", "H"));
}

#[tokio::test]
async fn map_without_device_warns_once_and_resolves_empty() {
    let h = harness(ConfigState::Uninitialized);
    h.configurator.load().await.unwrap();

    let update = h.configurator.map_configuration_changed("M3").await.unwrap();
    assert_eq!(
        update,
        SeriesUpdate::Applied {
            selected_data_point: None
        }
    );
    assert_eq!(h.alerts.messages(), vec![DEVICE_NOT_FOUND_WARNING.to_string()]);
    assert_eq!(
        h.configurator.session().await.data_point_series,
        Some(Vec::new())
    );
}

#[tokio::test]
async fn stored_map_that_vanished_warns() {
    let stored = ConfigState::from_json(json!({
        "mapConfigurationId": "gone",
        "measurement": {"fragment": "c8y_Temperature", "series": "T"}
    }))
    .unwrap();
    let h = harness(stored);

    h.configurator.load().await.unwrap();
    assert_eq!(h.alerts.messages().len(), 1);
    let config = h.configurator.config().await;
    assert_eq!(config.map_configuration_id, "gone");
    assert_eq!(config.measurement, Measurement::new("c8y_Temperature", "T"));
}

#[tokio::test]
async fn unknown_map_and_unsupported_measurement_are_rejected() {
    let h = harness(ConfigState::Uninitialized);
    h.configurator.load().await.unwrap();

    let err = h.configurator.map_configuration_changed("nope").await.unwrap_err();
    assert!(matches!(err, ConfiguratorError::UnknownMapConfiguration(id) if id == "nope"));

    let err = h.configurator.measurement_changed("c8y_Temperature.T").await.unwrap_err();
    assert!(matches!(err, ConfiguratorError::UnsupportedDataPoint(_)));

    h.configurator.map_configuration_changed("M1").await.unwrap();
    let err = h.configurator.measurement_changed("c8y_Humidity.H").await.unwrap_err();
    assert!(matches!(err, ConfiguratorError::UnsupportedDataPoint(_)));
    assert_eq!(h.configurator.config().await.measurement, Measurement::default());
}

/// Provider whose "Slow" device answers only after `release` is notified
struct GatedProvider {
    requested: Notify,
    release: Notify,
}

#[async_trait]
impl MapDataProvider for GatedProvider {
    async fn load_map_configurations(&self) -> Result<Vec<MapConfiguration>> {
        Ok(vec![
            MapConfiguration::new("slow", "Slow"),
            MapConfiguration::new("fast", "Fast"),
        ])
    }

    fn device_id_from_map_configuration(&self, map_configuration: &MapConfiguration) -> Option<String> {
        Some(map_configuration.name.clone())
    }

    async fn load_supported_data_point_series(&self, device_id: &str) -> Result<Vec<String>> {
        if device_id == "Slow" {
            self.requested.notify_one();
            self.release.notified().await;
            return Ok(vec!["slow.S".to_string()]);
        }
        Ok(vec!["fast.F".to_string()])
    }
}

#[tokio::test]
async fn late_series_for_superseded_selection_is_dropped() {
    let provider = Arc::new(GatedProvider {
        requested: Notify::new(),
        release: Notify::new(),
    });
    let configurator = Arc::new(MapConfigurator::new(
        ConfigState::Uninitialized,
        &InitDefaults::default(),
        provider.clone(),
        Arc::new(RecordingAlertSink::new()),
        Arc::new(ScriptedDialogHost::new()),
    ));
    configurator.load().await.unwrap();

    let slow = {
        let configurator = configurator.clone();
        tokio::spawn(async move { configurator.map_configuration_changed("slow").await })
    };
    provider.requested.notified().await;

    let fast = configurator.map_configuration_changed("fast").await.unwrap();
    assert_eq!(
        fast,
        SeriesUpdate::Applied {
            selected_data_point: None
        }
    );

    provider.release.notify_one();
    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow, SeriesUpdate::Stale);

    let session = configurator.session().await;
    assert_eq!(session.selected_map_configuration.unwrap().id, "fast");
    assert_eq!(session.data_point_series, Some(vec!["fast.F".to_string()]));
    assert_eq!(configurator.config().await.map_configuration_id, "fast");
}

struct FailingProvider;

#[async_trait]
impl MapDataProvider for FailingProvider {
    async fn load_map_configurations(&self) -> Result<Vec<MapConfiguration>> {
        Err(anyhow!("inventory unreachable"))
    }

    fn device_id_from_map_configuration(&self, _: &MapConfiguration) -> Option<String> {
        None
    }

    async fn load_supported_data_point_series(&self, _: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn provider_failures_reach_the_host() {
    let configurator = MapConfigurator::new(
        ConfigState::Uninitialized,
        &InitDefaults::default(),
        Arc::new(FailingProvider),
        Arc::new(RecordingAlertSink::new()),
        Arc::new(ScriptedDialogHost::new()),
    );

    let err = configurator.load().await.unwrap_err();
    assert!(matches!(err, ConfiguratorError::External(_)));
    assert!(err.to_string().contains("inventory unreachable"));
}

#[tokio::test]
async fn threshold_dialogs_upsert_and_delete_by_id() {
    let h = harness(ConfigState::Uninitialized);

    for (id, label) in [("1", "A"), ("2", "B"), ("3", "C")] {
        h.dialogs
            .push_threshold_outcome(DialogOutcome::Saved(threshold(id, label)));
        assert_eq!(h.configurator.add_threshold().await.unwrap(), DialogResult::Saved);
    }

    let edited = threshold("2", "B'");
    h.dialogs
        .push_threshold_outcome(DialogOutcome::Saved(edited.clone()));
    h.configurator.edit_threshold(threshold("2", "B")).await.unwrap();

    let labels: Vec<String> = h
        .configurator
        .config()
        .await
        .legend
        .thresholds
        .into_iter()
        .map(|t| label(&t).to_string())
        .collect();
    assert_eq!(labels, vec!["A", "B'", "C"]);

    h.dialogs
        .push_threshold_outcome(DialogOutcome::Deleted(threshold("99", "missing")));
    assert_eq!(
        h.configurator.edit_threshold(threshold("1", "A")).await.unwrap(),
        DialogResult::Deleted { removed: false }
    );

    h.dialogs
        .push_threshold_outcome(DialogOutcome::Deleted(threshold("1", "A")));
    assert_eq!(
        h.configurator.edit_threshold(threshold("1", "A")).await.unwrap(),
        DialogResult::Deleted { removed: true }
    );
    assert_eq!(h.configurator.config().await.legend.thresholds.len(), 2);

    assert_eq!(h.configurator.add_threshold().await.unwrap(), DialogResult::Dismissed);

    let requests = h.dialogs.threshold_requests();
    assert_eq!(requests[0], ThresholdEditorRequest { threshold: None });
    assert_eq!(requests[3].threshold.as_ref().map(label), Some("B"));
}

#[tokio::test]
async fn popup_dialog_receives_supported_series_and_replaces_list() {
    let h = harness(ConfigState::Uninitialized);
    h.configurator.load().await.unwrap();
    h.configurator.replace_popup_datapoints(vec!["old.O".to_string()]).await;

    h.dialogs.push_popup_outcome(DialogOutcome::Dismissed);
    assert_eq!(
        h.configurator.edit_popup_datapoints().await.unwrap(),
        DialogResult::Dismissed
    );

    h.configurator.map_configuration_changed("M2").await.unwrap();
    let edited = vec!["c8y_Temperature.T".to_string(), "c8y_Humidity.H".to_string()];
    h.dialogs.push_popup_outcome(DialogOutcome::Saved(edited.clone()));
    assert_eq!(
        h.configurator.edit_popup_datapoints().await.unwrap(),
        DialogResult::Saved
    );
    assert_eq!(h.configurator.config().await.datapoints_popup, edited);

    let requests = h.dialogs.popup_requests();
    assert_eq!(
        requests[0],
        PopupEditorRequest {
            supported_datapoints: None,
            datapoints_popup: vec!["old.O".to_string()],
        }
    );
    assert_eq!(
        requests[1].supported_datapoints,
        Some(vec!["c8y_Humidity.H".to_string(), "c8y_Temperature.T".to_string()])
    );
}

/// Dialog host whose threshold editor stays open until `close` is notified
struct SlowDialogHost {
    opened: Notify,
    close: Notify,
}

#[async_trait]
impl DialogHost for SlowDialogHost {
    async fn edit_threshold(
        &self,
        _request: ThresholdEditorRequest,
        _token: CancellationToken,
    ) -> Result<DialogOutcome<Threshold>> {
        self.opened.notify_one();
        self.close.notified().await;
        Ok(DialogOutcome::Saved(threshold("late", "Late")))
    }

    async fn edit_popup_datapoints(
        &self,
        _request: PopupEditorRequest,
        _token: CancellationToken,
    ) -> Result<DialogOutcome<Vec<String>>> {
        Ok(DialogOutcome::Saved(vec!["new.N".to_string()]))
    }
}

#[tokio::test]
async fn superseded_dialog_cannot_apply_its_edit() {
    let dialogs = Arc::new(SlowDialogHost {
        opened: Notify::new(),
        close: Notify::new(),
    });
    let configurator = Arc::new(MapConfigurator::new(
        ConfigState::Uninitialized,
        &InitDefaults::default(),
        Arc::new(StaticMapDataProvider::new(fixture())),
        Arc::new(RecordingAlertSink::new()),
        dialogs.clone(),
    ));

    let first = {
        let configurator = configurator.clone();
        tokio::spawn(async move { configurator.add_threshold().await })
    };
    dialogs.opened.notified().await;

    assert_eq!(
        configurator.edit_popup_datapoints().await.unwrap(),
        DialogResult::Saved
    );

    dialogs.close.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), DialogResult::Superseded);

    let config = configurator.config().await;
    assert!(config.legend.thresholds.is_empty());
    assert_eq!(config.datapoints_popup, vec!["new.N".to_string()]);
}

#[tokio::test]
async fn cancelled_dialog_is_dropped() {
    let dialogs = Arc::new(SlowDialogHost {
        opened: Notify::new(),
        close: Notify::new(),
    });
    let configurator = Arc::new(MapConfigurator::new(
        ConfigState::Uninitialized,
        &InitDefaults::default(),
        Arc::new(StaticMapDataProvider::new(fixture())),
        Arc::new(RecordingAlertSink::new()),
        dialogs.clone(),
    ));

    let pending = {
        let configurator = configurator.clone();
        tokio::spawn(async move { configurator.add_threshold().await })
    };
    dialogs.opened.notified().await;
    configurator.cancel_dialog();
    dialogs.close.notify_one();

    assert_eq!(pending.await.unwrap().unwrap(), DialogResult::Superseded);
    assert!(configurator.config().await.legend.thresholds.is_empty());
}

#[tokio::test]
async fn duplicate_stored_thresholds_are_collapsed() {
    let stored = ConfigState::from_json(json!({
        "legend": {
            "title": "Rooms",
            "thresholds": [
                {"id": "a", "label": "cold", "min": 0, "max": 15, "color": "#0000ff"},
                {"id": "b", "label": "ok", "min": 15, "max": 25, "color": "#00ff00"},
                {"id": "a", "label": "chilly", "min": 0, "max": 18, "color": "#0000ff"}
            ]
        }
    }))
    .unwrap();
    let h = harness(stored);

    let thresholds = h.configurator.config().await.legend.thresholds;
    let ids: Vec<String> = thresholds.iter().map(|t| t.id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(label(&thresholds[0]), "chilly");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_selections_never_mix_map_and_series() {
    let h = harness(ConfigState::Uninitialized);
    h.configurator.load().await.unwrap();

    for _ in 0..200 {
        let first = {
            let configurator = h.configurator.clone();
            tokio::spawn(async move { configurator.map_configuration_changed("M1").await })
        };
        let second = {
            let configurator = h.configurator.clone();
            tokio::spawn(async move { configurator.map_configuration_changed("M2").await })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let config = h.configurator.config().await;
        let session = h.configurator.session().await;
        let selected = session.selected_map_configuration.unwrap().id;
        assert_eq!(config.map_configuration_id, selected);

        let expected = match selected.as_str() {
            "M1" => vec!["c8y_Temperature.T".to_string()],
            _ => vec!["c8y_Humidity.H".to_string(), "c8y_Temperature.T".to_string()],
        };
        assert_eq!(session.data_point_series, Some(expected));
    }
}
