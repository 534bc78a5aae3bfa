//! Dialog host trait and related types

use anyhow::Result;
use async_trait::async_trait;
use indoor_map_types::Threshold;
use std::sync::Arc;

use crate::cancellation::CancellationToken;

/// Result of a single dialog invocation
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome<T> {
    /// The user saved the edited value
    Saved(T),
    /// The user asked to delete the value (threshold editor only)
    Deleted(T),
    /// The dialog was closed without a result
    Dismissed,
}

/// Initial state for the threshold editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdEditorRequest {
    /// Threshold being edited, `None` when adding a new one
    pub threshold: Option<Threshold>,
}

/// Initial state for the popup data point editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupEditorRequest {
    /// Series the current device supports; `None` before any were resolved
    pub supported_datapoints: Option<Vec<String>>,
    /// Series currently shown in marker popups
    pub datapoints_popup: Vec<String>,
}

/// Trait for the modal dialog host
///
/// Every call shows one dialog and resolves once, when the user closes it.
/// Implementations may return early with [`DialogOutcome::Dismissed`] once
/// `token` is cancelled; callers drop any outcome returned after that.
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Show the threshold editor
    async fn edit_threshold(
        &self,
        request: ThresholdEditorRequest,
        token: CancellationToken,
    ) -> Result<DialogOutcome<Threshold>>;

    /// Show the popup data point editor; the result is the full desired list
    async fn edit_popup_datapoints(
        &self,
        request: PopupEditorRequest,
        token: CancellationToken,
    ) -> Result<DialogOutcome<Vec<String>>>;
}

/// Shared dialog host for dynamic dispatch
pub type SharedDialogHost = Arc<dyn DialogHost>;
