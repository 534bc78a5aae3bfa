//! Scripted dialog host
//!
//! Answers dialogs with outcomes queued up front instead of asking a user.
//! The command-line front end uses it to apply edits given as arguments, and
//! tests use it to drive the dialog paths.

use anyhow::Result;
use async_trait::async_trait;
use indoor_map_core::{
    CancellationToken, DialogHost, DialogOutcome, PopupEditorRequest, Threshold,
    ThresholdEditorRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Script {
    threshold_outcomes: VecDeque<DialogOutcome<Threshold>>,
    popup_outcomes: VecDeque<DialogOutcome<Vec<String>>>,
    threshold_requests: Vec<ThresholdEditorRequest>,
    popup_requests: Vec<PopupEditorRequest>,
}

/// Dialog host replaying queued outcomes; dismisses when the queue is empty
#[derive(Debug, Default)]
pub struct ScriptedDialogHost {
    script: Mutex<Script>,
}

impl ScriptedDialogHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next threshold dialog
    pub fn push_threshold_outcome(&self, outcome: DialogOutcome<Threshold>) {
        self.lock().threshold_outcomes.push_back(outcome);
    }

    /// Queue the outcome of the next popup dialog
    pub fn push_popup_outcome(&self, outcome: DialogOutcome<Vec<String>>) {
        self.lock().popup_outcomes.push_back(outcome);
    }

    /// Initial states the threshold dialog was opened with
    pub fn threshold_requests(&self) -> Vec<ThresholdEditorRequest> {
        self.lock().threshold_requests.clone()
    }

    /// Initial states the popup dialog was opened with
    pub fn popup_requests(&self) -> Vec<PopupEditorRequest> {
        self.lock().popup_requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DialogHost for ScriptedDialogHost {
    async fn edit_threshold(
        &self,
        request: ThresholdEditorRequest,
        token: CancellationToken,
    ) -> Result<DialogOutcome<Threshold>> {
        let mut script = self.lock();
        script.threshold_requests.push(request);
        if token.is_cancelled() {
            return Ok(DialogOutcome::Dismissed);
        }
        Ok(script
            .threshold_outcomes
            .pop_front()
            .unwrap_or(DialogOutcome::Dismissed))
    }

    async fn edit_popup_datapoints(
        &self,
        request: PopupEditorRequest,
        token: CancellationToken,
    ) -> Result<DialogOutcome<Vec<String>>> {
        let mut script = self.lock();
        script.popup_requests.push(request);
        if token.is_cancelled() {
            return Ok(DialogOutcome::Dismissed);
        }
        Ok(script
            .popup_outcomes
            .pop_front()
            .unwrap_or(DialogOutcome::Dismissed))
    }
}
