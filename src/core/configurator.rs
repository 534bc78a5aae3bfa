//! Map configurator - the entry points the hosting widget calls
//!
//! Owns the widget configuration and the resolved session state and runs the
//! selection chain (map → device → series → measurement) plus the threshold
//! and popup dialogs against it.
//!
//! Every map selection bumps a generation counter in the same write-lock
//! section that stores the selection. Series results are only applied if no
//! newer selection started while the provider was busy, so a slow response
//! for an earlier map cannot overwrite a later one. The state lock is never
//! held while waiting on the provider or a dialog.

use indoor_map_core::{
    CancellationSource, CancellationToken, DialogOutcome, MapConfiguration, PopupEditorRequest,
    SharedAlertSink, SharedDialogHost, SharedMapDataProvider, Threshold, ThresholdEditorRequest,
};
use indoor_map_types::{ConfigState, WidgetConfiguration};
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

use super::resolver::DataPointSeriesResolver;
use super::session::SessionState;
use super::{popup, reconciler, thresholds};
use crate::config::{initialize, InitDefaults};

/// Errors returned by the configurator
#[derive(Debug, thiserror::Error)]
pub enum ConfiguratorError {
    #[error("unknown map configuration '{0}'")]
    UnknownMapConfiguration(String),
    #[error("data point '{0}' is not supported by the selected device")]
    UnsupportedDataPoint(String),
    /// Failure reported by the data provider or dialog host
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ConfiguratorError>;

/// Outcome of a series resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesUpdate {
    /// Series were stored and the measurement reconciled against them
    Applied { selected_data_point: Option<String> },
    /// A newer map selection started meanwhile; the result was dropped
    Stale,
}

/// Outcome of a dialog invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Saved,
    /// `removed` is false when the entry was already gone
    Deleted { removed: bool },
    Dismissed,
    /// Another dialog was opened meanwhile; the result was dropped
    Superseded,
}

struct ConfiguratorState {
    config: WidgetConfiguration,
    session: SessionState,
}

/// Configuration engine behind the indoor map widget
pub struct MapConfigurator {
    provider: SharedMapDataProvider,
    resolver: DataPointSeriesResolver,
    dialogs: SharedDialogHost,
    state: RwLock<ConfiguratorState>,
    generation: AtomicU64,
    active_dialog: Mutex<Option<CancellationSource>>,
}

impl MapConfigurator {
    /// Create a configurator for a stored configuration
    ///
    /// The configuration is initialized here, once, and duplicate threshold
    /// ids left by older versions are collapsed.
    pub fn new(
        stored: ConfigState,
        defaults: &InitDefaults,
        provider: SharedMapDataProvider,
        alerts: SharedAlertSink,
        dialogs: SharedDialogHost,
    ) -> Self {
        let mut config = initialize(stored, defaults);
        thresholds::normalize(&mut config.legend.thresholds);

        Self {
            resolver: DataPointSeriesResolver::new(provider.clone(), alerts),
            provider,
            dialogs,
            state: RwLock::new(ConfiguratorState {
                config,
                session: SessionState::default(),
            }),
            generation: AtomicU64::new(0),
            active_dialog: Mutex::new(None),
        }
    }

    /// Snapshot of the widget configuration
    pub async fn config(&self) -> WidgetConfiguration {
        self.state.read().await.config.clone()
    }

    /// Snapshot of the resolved session state
    pub async fn session(&self) -> SessionState {
        self.state.read().await.session.clone()
    }

    /// Hand the configuration back to the host
    pub fn into_config(self) -> WidgetConfiguration {
        self.state.into_inner().config
    }

    /// Load the candidate map configurations
    ///
    /// If the stored configuration already names a map, that map is selected
    /// and its series resolved. Returns `None` when nothing was stored.
    pub async fn load(&self) -> Result<Option<SeriesUpdate>> {
        let candidates = self.provider.load_map_configurations().await?;
        info!("Loaded {} map configurations", candidates.len());

        let selection = {
            let mut state = self.state.write().await;
            state.session.map_configurations = candidates;

            if !state.config.has_map_configuration() {
                return Ok(None);
            }
            let stored_id = state.config.map_configuration_id.clone();
            let selection =
                MapConfiguration::find(&state.session.map_configurations, &stored_id).cloned();
            if selection.is_none() {
                debug!("Stored map configuration {} is no longer offered", stored_id);
            }
            selection
        };

        self.select_map_configuration(selection).await.map(Some)
    }

    /// The user picked another map configuration
    pub async fn map_configuration_changed(&self, map_configuration_id: &str) -> Result<SeriesUpdate> {
        let selection = {
            let state = self.state.read().await;
            MapConfiguration::find(&state.session.map_configurations, map_configuration_id)
                .cloned()
                .ok_or_else(|| {
                    ConfiguratorError::UnknownMapConfiguration(map_configuration_id.to_string())
                })?
        };

        self.select_map_configuration(Some(selection)).await
    }

    /// The user picked a series from the resolved list
    pub async fn measurement_changed(&self, data_point: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.session.supports(data_point) {
            return Err(ConfiguratorError::UnsupportedDataPoint(data_point.to_string()));
        }

        reconciler::select_data_point(&mut state.config, data_point);
        state.session.selected_data_point = Some(data_point.to_string());
        debug!("Measurement set to {:?}", state.config.measurement);
        Ok(())
    }

    /// Start a new selection and run the chain down to the measurement
    async fn select_map_configuration(
        &self,
        selection: Option<MapConfiguration>,
    ) -> Result<SeriesUpdate> {
        // Bumped under the write lock: generation order is write order.
        let generation = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            if let Some(selected) = &selection {
                state.config.map_configuration_id = selected.id.clone();
            }
            state.session.restart(selection.clone());
            generation
        };
        debug!(
            "Resolving series for {:?} (generation {})",
            selection.as_ref().map(|m| m.id.as_str()),
            generation
        );

        let series = self.resolver.resolve(selection.as_ref()).await?;
        Ok(self.apply_series(generation, series).await)
    }

    /// Store resolved series unless a newer selection started
    async fn apply_series(&self, generation: u64, series: Vec<String>) -> SeriesUpdate {
        let mut state = self.state.write().await;
        let current = self.generation.load(Ordering::Acquire);
        if generation != current {
            debug!(
                "Dropping series of generation {} (current {})",
                generation, current
            );
            return SeriesUpdate::Stale;
        }

        let selected_data_point = reconciler::reconcile(&mut state.config, &series);
        state.session.data_point_series = Some(series);
        state.session.selected_data_point = selected_data_point.clone();
        SeriesUpdate::Applied {
            selected_data_point,
        }
    }

    /// Open the threshold editor for a new threshold
    pub async fn add_threshold(&self) -> Result<DialogResult> {
        self.run_threshold_dialog(ThresholdEditorRequest { threshold: None })
            .await
    }

    /// Open the threshold editor for an existing threshold
    pub async fn edit_threshold(&self, threshold: Threshold) -> Result<DialogResult> {
        self.run_threshold_dialog(ThresholdEditorRequest {
            threshold: Some(threshold),
        })
        .await
    }

    async fn run_threshold_dialog(&self, request: ThresholdEditorRequest) -> Result<DialogResult> {
        let token = self.begin_dialog();
        let outcome = self.dialogs.edit_threshold(request, token.clone()).await?;
        if token.is_cancelled() {
            debug!("Threshold dialog was superseded, dropping {:?}", outcome);
            return Ok(DialogResult::Superseded);
        }

        Ok(match outcome {
            DialogOutcome::Saved(threshold) => {
                self.apply_threshold_saved(threshold).await;
                DialogResult::Saved
            }
            DialogOutcome::Deleted(threshold) => DialogResult::Deleted {
                removed: self.apply_threshold_deleted(&threshold).await,
            },
            DialogOutcome::Dismissed => DialogResult::Dismissed,
        })
    }

    /// Insert or replace a threshold by id
    pub async fn apply_threshold_saved(&self, threshold: Threshold) {
        let mut state = self.state.write().await;
        let placed = thresholds::upsert(&mut state.config.legend.thresholds, threshold);
        debug!("Threshold saved: {:?}", placed);
    }

    /// Remove a threshold by id; returns `false` if it was already gone
    pub async fn apply_threshold_deleted(&self, threshold: &Threshold) -> bool {
        let mut state = self.state.write().await;
        thresholds::remove(&mut state.config.legend.thresholds, threshold)
    }

    /// Open the popup data point editor
    pub async fn edit_popup_datapoints(&self) -> Result<DialogResult> {
        let request = {
            let state = self.state.read().await;
            PopupEditorRequest {
                supported_datapoints: state.session.data_point_series.clone(),
                datapoints_popup: state.config.datapoints_popup.clone(),
            }
        };

        let token = self.begin_dialog();
        let outcome = self.dialogs.edit_popup_datapoints(request, token.clone()).await?;
        if token.is_cancelled() {
            debug!("Popup dialog was superseded, dropping {:?}", outcome);
            return Ok(DialogResult::Superseded);
        }

        Ok(match outcome {
            DialogOutcome::Saved(datapoints_popup) => {
                self.replace_popup_datapoints(datapoints_popup).await;
                DialogResult::Saved
            }
            DialogOutcome::Deleted(_) => {
                debug!("Popup editor has no delete action, ignoring");
                DialogResult::Dismissed
            }
            DialogOutcome::Dismissed => DialogResult::Dismissed,
        })
    }

    /// Replace the popup data point list verbatim
    pub async fn replace_popup_datapoints(&self, datapoints_popup: Vec<String>) {
        let mut state = self.state.write().await;
        popup::replace(&mut state.config, datapoints_popup);
    }

    /// Cancel the dialog that is currently open, if any
    pub fn cancel_dialog(&self) {
        let mut active = self.active_dialog.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(source) = active.take() {
            source.cancel();
        }
    }

    /// Cancel the previous dialog and hand out a token for the next one
    fn begin_dialog(&self) -> CancellationToken {
        let source = CancellationSource::new();
        let token = source.token();
        let mut active = self.active_dialog.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.replace(source) {
            previous.cancel();
        }
        token
    }
}
