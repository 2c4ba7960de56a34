// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clipline Editor application layer.
//!
//! Ties the timeline engine and media handling into an editor:
//! - Editor action schema with fail-closed validation
//! - Timeline store applying action batches atomically per action
//! - Snapshot-based undo/redo history
//! - Automatic clip placement, including speech-aware cuts
//! - Render plans for the external renderer
//! - RON configuration and project files
//! - The `clipline` command-line interface

pub mod actions;
pub mod autocut;
pub mod cli;
pub mod config;
pub mod executor;
pub mod export;
pub mod history;
pub mod project;
pub mod state;
pub mod store;

pub use actions::{editor_actions_schema, ActionSchemaError, AutoCutStrategy, EditorAction, EditorActionsPayload};
pub use config::{ConfigError, EditorConfig};
pub use executor::{apply_edit, ActionError};
pub use export::{render_plan, ExportError, FrameTransform, RenderClip, RenderPlan};
pub use history::{History, HistoryError, HistoryStats};
pub use project::{ProjectError, ProjectFile};
pub use state::TimelineState;
pub use store::{ActionOutcome, BatchReport, SharedTimelineStore, TimelineStore};
