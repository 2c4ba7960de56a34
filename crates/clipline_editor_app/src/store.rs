// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline store: owns the state, applies action batches, keeps history.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::actions::{ActionSchemaError, EditorAction, EditorActionsPayload};
use crate::executor::{apply_edit, ActionError};
use crate::history::{History, HistoryStats};
use crate::state::TimelineState;

/// Store shared between every source of edits.
///
/// The mutex makes each batch a single writer: a batch from one caller is
/// applied completely before the next caller's batch starts.
pub type SharedTimelineStore = Arc<Mutex<TimelineStore>>;

/// Result of one action in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Action took effect
    Applied {
        /// Position in the batch
        index: usize,
        /// Action tag
        action: String,
        /// What changed
        message: String,
    },
    /// Action was rejected; the timeline is unchanged by it
    Failed {
        /// Position in the batch
        index: usize,
        /// Action tag
        action: String,
        /// Why it failed
        error: String,
    },
}

impl ActionOutcome {
    /// Whether the action took effect
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Per-action results of a batch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// One outcome per action, in order
    pub outcomes: Vec<ActionOutcome>,
    /// Whether the batch asked for an export
    pub export_requested: bool,
}

impl BatchReport {
    /// Number of applied actions
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Number of failed actions
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Owns the timeline and its undo history
#[derive(Debug, Default)]
pub struct TimelineStore {
    state: TimelineState,
    history: History,
}

impl TimelineStore {
    /// Store over `state` with the default history depth
    pub fn new(state: TimelineState) -> Self {
        Self {
            state,
            history: History::new(),
        }
    }

    /// Store over `state` keeping at most `depth` undo steps
    pub fn with_history_depth(state: TimelineState, depth: usize) -> Self {
        Self {
            state,
            history: History::with_max_depth(depth),
        }
    }

    /// Wrap for sharing across threads
    pub fn into_shared(self) -> SharedTimelineStore {
        Arc::new(Mutex::new(self))
    }

    /// Current state
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Consume the store, keeping only the state
    pub fn into_state(self) -> TimelineState {
        self.state
    }

    /// History statistics
    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    /// Parse a JSON payload and apply it.
    ///
    /// A payload that fails schema validation is rejected whole and the
    /// timeline is untouched.
    pub fn apply_json(&mut self, json: &str) -> Result<BatchReport, ActionSchemaError> {
        let payload = EditorActionsPayload::parse(json)?;
        self.apply_batch(&payload)
    }

    /// Validate a batch, then apply it in order.
    ///
    /// A batch with any out-of-range action is rejected whole. Otherwise
    /// later actions see the effects of earlier ones, and a failing action
    /// is reported and skipped while the rest of the batch still runs.
    pub fn apply_batch(&mut self, payload: &EditorActionsPayload) -> Result<BatchReport, ActionSchemaError> {
        payload.validate()?;
        let mut report = BatchReport::default();

        for (index, action) in payload.actions.iter().enumerate() {
            let outcome = match self.apply_action(action, &mut report) {
                Ok(message) => {
                    debug!("[{index}] {}: {message}", action.kind());
                    ActionOutcome::Applied {
                        index,
                        action: action.kind().to_string(),
                        message,
                    }
                }
                Err(error) => {
                    warn!("[{index}] {} failed: {error}", action.kind());
                    ActionOutcome::Failed {
                        index,
                        action: action.kind().to_string(),
                        error: error.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            "Applied batch: {} applied, {} failed",
            report.applied(),
            report.failed()
        );
        Ok(report)
    }

    /// Apply one action atomically
    pub fn apply_action(&mut self, action: &EditorAction, report: &mut BatchReport) -> Result<String, ActionError> {
        match action {
            EditorAction::Undo {} => {
                let (description, state) = self.history.undo()?;
                self.state = state;
                Ok(format!("Undid: {description}"))
            }
            EditorAction::Redo {} => {
                let (description, state) = self.history.redo()?;
                self.state = state;
                Ok(format!("Redid: {description}"))
            }
            EditorAction::ExportVideo {} => {
                if self.state.is_empty() {
                    return Err(ActionError::Invalid("nothing to export".to_string()));
                }
                report.export_requested = true;
                Ok(format!("Export requested for {} clips", self.state.len()))
            }
            edit => {
                let mut working = self.state.clone();
                let message = apply_edit(&mut working, edit)?;
                self.history.record(message.as_str(), &self.state, &working)?;
                self.state = working;
                Ok(message)
            }
        }
    }
}
