// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor action schema.
//!
//! An [`EditorActionsPayload`] is the contract between the editor and
//! anything that drives it from outside (an AI agent, a script, the CLI).
//! Parsing is fail-closed: if any single action is malformed or out of
//! range the whole payload is rejected and nothing is applied.

use clipline_editor_timeline::{AnimatableProperty, ClipId, Easing, KeyframeId};
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback speed limits
pub const SPEED_RANGE: (f64, f64) = (0.25, 3.0);

/// Static zoom limits
pub const ZOOM_RANGE: (f64, f64) = (1.0, 3.0);

/// Crop field limits (percent)
pub const CROP_RANGE: (f64, f64) = (0.0, 100.0);

/// Errors raised while parsing an action payload
#[derive(Debug, Error)]
pub enum ActionSchemaError {
    /// Payload is not a JSON object with an `actions` array
    #[error("Malformed action payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// An action does not match any variant
    #[error("Action {index} is invalid: {message}")]
    InvalidAction {
        /// Position in the batch
        index: usize,
        /// Deserializer message
        message: String,
    },

    /// An action violates a field constraint
    #[error("Action {index} ({action}) violates a constraint: {message}")]
    ConstraintViolation {
        /// Position in the batch
        index: usize,
        /// Action tag
        action: &'static str,
        /// What was out of range
        message: String,
    },
}

/// How `auto_cut` places its cuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AutoCutStrategy {
    /// Equal-length clips
    #[default]
    Even,
    /// Clips follow detected speech
    Proportional,
}

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum EditorAction {
    /// Set the timeline's default preset
    #[serde(rename_all = "camelCase")]
    SetPreset {
        /// Preset to use
        preset_id: String,
    },

    /// Move a clip's in and out points
    #[serde(rename_all = "camelCase")]
    TrimClip {
        /// Target clip
        clip_id: ClipId,
        /// New in-point in source seconds
        #[serde(default)]
        start: Option<f64>,
        /// New out-point in source seconds
        #[serde(default)]
        end: Option<f64>,
    },

    /// Change playback speed
    #[serde(rename_all = "camelCase")]
    SetClipSpeed {
        /// Target clip
        clip_id: ClipId,
        /// Speed multiplier
        #[schemars(range(min = 0.25, max = 3.0))]
        speed: f64,
    },

    /// Change static zoom
    #[serde(rename_all = "camelCase")]
    SetClipZoom {
        /// Target clip
        clip_id: ClipId,
        /// Zoom factor
        #[schemars(range(min = 1.0, max = 3.0))]
        zoom: f64,
    },

    /// Update any of the crop fields
    #[serde(rename_all = "camelCase")]
    CropClip {
        /// Target clip
        clip_id: ClipId,
        /// Left edge
        #[serde(default)]
        #[schemars(range(min = 0.0, max = 100.0))]
        x: Option<f64>,
        /// Top edge
        #[serde(default)]
        #[schemars(range(min = 0.0, max = 100.0))]
        y: Option<f64>,
        /// Width
        #[serde(default)]
        #[schemars(range(min = 0.0, max = 100.0))]
        width: Option<f64>,
        /// Height
        #[serde(default)]
        #[schemars(range(min = 0.0, max = 100.0))]
        height: Option<f64>,
    },

    /// Rename a clip
    #[serde(rename_all = "camelCase")]
    RenameClip {
        /// Target clip
        clip_id: ClipId,
        /// New name
        name: String,
    },

    /// Split a clip in two at a source time
    #[serde(rename_all = "camelCase")]
    SplitClip {
        /// Target clip
        clip_id: ClipId,
        /// Split point in source seconds
        at: f64,
    },

    /// Append a clip
    #[serde(rename_all = "camelCase")]
    AddClip {
        /// In-point, defaults to 0
        #[serde(default)]
        start: Option<f64>,
        /// Out-point
        #[serde(default)]
        end: Option<f64>,
        /// Length, used when `end` is absent
        #[serde(default)]
        duration: Option<f64>,
        /// Display name
        #[serde(default)]
        name: Option<String>,
        /// Preset, defaults to the timeline preset
        #[serde(default)]
        preset_id: Option<String>,
        /// Speed multiplier
        #[serde(default)]
        #[schemars(range(min = 0.25, max = 3.0))]
        speed: Option<f64>,
        /// Static zoom
        #[serde(default)]
        #[schemars(range(min = 1.0, max = 3.0))]
        zoom: Option<f64>,
    },

    /// Delete a clip
    #[serde(rename_all = "camelCase")]
    RemoveClip {
        /// Target clip
        clip_id: ClipId,
    },

    /// Copy a clip, placing the copy right after it
    #[serde(rename_all = "camelCase")]
    DuplicateClip {
        /// Target clip
        clip_id: ClipId,
    },

    /// Move a clip to another position
    #[serde(rename_all = "camelCase")]
    ReorderClips {
        /// Current position
        from_index: usize,
        /// New position
        to_index: usize,
    },

    /// Add a keyframe to a clip's animation
    #[serde(rename_all = "camelCase")]
    AddKeyframe {
        /// Target clip
        clip_id: ClipId,
        /// Animated property
        property: AnimatableProperty,
        /// Normalized time (clamped to 0-1)
        time: f64,
        /// Property value
        value: f64,
        /// Easing into this keyframe
        #[serde(default)]
        easing: Option<Easing>,
    },

    /// Remove a keyframe
    #[serde(rename_all = "camelCase")]
    RemoveKeyframe {
        /// Target clip
        clip_id: ClipId,
        /// Keyframe to remove
        keyframe_id: KeyframeId,
    },

    /// Replace the timeline with automatically placed clips
    #[serde(rename_all = "camelCase")]
    AutoCut {
        /// Cut placement
        #[serde(default)]
        strategy: Option<AutoCutStrategy>,
        /// Desired clip length in seconds
        #[serde(default)]
        target_duration: Option<f64>,
        /// Desired number of clips
        #[serde(default)]
        #[schemars(range(min = 1))]
        clip_count: Option<u32>,
    },

    /// Shave time off both ends of every clip
    #[serde(rename_all = "camelCase")]
    BatchTrim {
        /// Seconds removed from each start
        #[serde(default)]
        trim_start: Option<f64>,
        /// Seconds removed from each end
        #[serde(default)]
        trim_end: Option<f64>,
    },

    /// Apply a preset animation to every clip
    #[serde(rename_all = "camelCase")]
    ApplyPresetAll {
        /// Preset to apply
        preset_id: String,
    },

    /// Turn looped playback on or off
    ToggleLoop {
        /// New state
        value: bool,
    },

    // Empty braces keep `deny_unknown_fields` in force for fieldless actions
    /// Undo the last edit
    Undo {},

    /// Redo the last undone edit
    Redo {},

    /// Ask the renderer to export the timeline
    ExportVideo {},
}

impl EditorAction {
    /// Wire tag of this action
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetPreset { .. } => "set_preset",
            Self::TrimClip { .. } => "trim_clip",
            Self::SetClipSpeed { .. } => "set_clip_speed",
            Self::SetClipZoom { .. } => "set_clip_zoom",
            Self::CropClip { .. } => "crop_clip",
            Self::RenameClip { .. } => "rename_clip",
            Self::SplitClip { .. } => "split_clip",
            Self::AddClip { .. } => "add_clip",
            Self::RemoveClip { .. } => "remove_clip",
            Self::DuplicateClip { .. } => "duplicate_clip",
            Self::ReorderClips { .. } => "reorder_clips",
            Self::AddKeyframe { .. } => "add_keyframe",
            Self::RemoveKeyframe { .. } => "remove_keyframe",
            Self::AutoCut { .. } => "auto_cut",
            Self::BatchTrim { .. } => "batch_trim",
            Self::ApplyPresetAll { .. } => "apply_preset_all",
            Self::ToggleLoop { .. } => "toggle_loop",
            Self::Undo {} => "undo",
            Self::Redo {} => "redo",
            Self::ExportVideo {} => "export_video",
        }
    }

    /// Whether the action edits the timeline (and so lands in history)
    pub fn is_edit(&self) -> bool {
        !matches!(self, Self::Undo {} | Self::Redo {} | Self::ExportVideo {})
    }

    /// Check field constraints that the type system does not express
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::TrimClip { start, end, .. } => {
                finite_opt("start", *start)?;
                finite_opt("end", *end)
            }
            Self::SetClipSpeed { speed, .. } => in_range("speed", *speed, SPEED_RANGE),
            Self::SetClipZoom { zoom, .. } => in_range("zoom", *zoom, ZOOM_RANGE),
            Self::CropClip {
                x, y, width, height, ..
            } => {
                for (field, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
                    if let Some(value) = value {
                        in_range(field, *value, CROP_RANGE)?;
                    }
                }
                Ok(())
            }
            Self::SplitClip { at, .. } => finite("at", *at),
            Self::AddClip {
                start,
                end,
                duration,
                speed,
                zoom,
                ..
            } => {
                finite_opt("start", *start)?;
                finite_opt("end", *end)?;
                finite_opt("duration", *duration)?;
                if let Some(speed) = speed {
                    in_range("speed", *speed, SPEED_RANGE)?;
                }
                if let Some(zoom) = zoom {
                    in_range("zoom", *zoom, ZOOM_RANGE)?;
                }
                Ok(())
            }
            Self::AddKeyframe { time, value, .. } => {
                finite("time", *time)?;
                finite("value", *value)
            }
            Self::AutoCut {
                target_duration,
                clip_count,
                ..
            } => {
                if let Some(target) = target_duration {
                    if !target.is_finite() || *target <= 0.0 {
                        return Err(format!("targetDuration must be a positive number, got {target}"));
                    }
                }
                match clip_count {
                    Some(0) => Err("clipCount must be at least 1".to_string()),
                    _ => Ok(()),
                }
            }
            Self::BatchTrim { trim_start, trim_end } => {
                finite_opt("trimStart", *trim_start)?;
                finite_opt("trimEnd", *trim_end)
            }
            _ => Ok(()),
        }
    }
}

fn finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{field} must be a finite number"))
    }
}

fn finite_opt(field: &str, value: Option<f64>) -> Result<(), String> {
    value.map_or(Ok(()), |v| finite(field, v))
}

fn in_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be between {min} and {max}, got {value}"))
    }
}

/// A batch of actions applied in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditorActionsPayload {
    /// Actions, applied first to last
    pub actions: Vec<EditorAction>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPayload {
    actions: Vec<serde_json::Value>,
}

impl EditorActionsPayload {
    /// Wrap already-built actions
    pub fn new(actions: Vec<EditorAction>) -> Self {
        Self { actions }
    }

    /// Parse and validate a JSON payload, rejecting it whole on any error
    pub fn parse(json: &str) -> Result<Self, ActionSchemaError> {
        let raw: RawPayload = serde_json::from_str(json).map_err(ActionSchemaError::Malformed)?;

        let actions = raw
            .actions
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<EditorAction>(value).map_err(|e| ActionSchemaError::InvalidAction {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let payload = Self { actions };
        payload.validate()?;
        Ok(payload)
    }

    /// Check every action's constraints
    pub fn validate(&self) -> Result<(), ActionSchemaError> {
        for (index, action) in self.actions.iter().enumerate() {
            action
                .validate()
                .map_err(|message| ActionSchemaError::ConstraintViolation {
                    index,
                    action: action.kind(),
                    message,
                })?;
        }
        Ok(())
    }
}

/// JSON Schema of [`EditorActionsPayload`], for handing to tool-calling agents
pub fn editor_actions_schema() -> RootSchema {
    schemars::schema_for!(EditorActionsPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_out_of_range_rejected() {
        let json = r#"{"actions":[{"type":"set_clip_speed","clipId":"x","speed":5}]}"#;
        let err = EditorActionsPayload::parse(json).unwrap_err();
        assert!(matches!(
            err,
            ActionSchemaError::ConstraintViolation {
                index: 0,
                action: "set_clip_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_speed_in_range_accepted() {
        let json = r#"{"actions":[{"type":"set_clip_speed","clipId":"x","speed":1.5}]}"#;
        let payload = EditorActionsPayload::parse(json).unwrap();
        assert_eq!(
            payload.actions,
            vec![EditorAction::SetClipSpeed {
                clip_id: ClipId::from("x"),
                speed: 1.5,
            }]
        );
    }

    #[test]
    fn test_control_actions_accepted() {
        let json = r#"{"actions":[{"type":"undo"},{"type":"redo"},{"type":"export_video"}]}"#;
        let payload = EditorActionsPayload::parse(json).unwrap();
        assert_eq!(
            payload.actions,
            vec![EditorAction::Undo {}, EditorAction::Redo {}, EditorAction::ExportVideo {}]
        );
        assert!(payload.actions.iter().all(|a| !a.is_edit()));
    }

    #[test]
    fn test_one_bad_action_rejects_batch() {
        let json = r#"{"actions":[
            {"type":"rename_clip","clipId":"a","name":"Intro"},
            {"type":"set_clip_zoom","clipId":"a","zoom":0.5}
        ]}"#;
        let err = EditorActionsPayload::parse(json).unwrap_err();
        assert!(matches!(err, ActionSchemaError::ConstraintViolation { index: 1, .. }));
    }

    #[test]
    fn test_unknown_fields_and_types_rejected() {
        let extra = r#"{"actions":[{"type":"remove_clip","clipId":"a","force":true}]}"#;
        assert!(matches!(
            EditorActionsPayload::parse(extra),
            Err(ActionSchemaError::InvalidAction { index: 0, .. })
        ));

        let undo_extra = r#"{"actions":[{"type":"undo","clipId":"x","bogus":1}]}"#;
        assert!(matches!(
            EditorActionsPayload::parse(undo_extra),
            Err(ActionSchemaError::InvalidAction { index: 0, .. })
        ));
        for tag in ["redo", "export_video"] {
            let json = format!(r#"{{"actions":[{{"type":"{tag}","force":true}}]}}"#);
            assert!(EditorActionsPayload::parse(&json).is_err(), "{tag} accepted an extra field");
        }

        let unknown = r#"{"actions":[{"type":"explode_clip","clipId":"a"}]}"#;
        assert!(EditorActionsPayload::parse(unknown).is_err());

        let not_a_payload = r#"{"steps":[]}"#;
        assert!(matches!(
            EditorActionsPayload::parse(not_a_payload),
            Err(ActionSchemaError::Malformed(_))
        ));
    }

    #[test]
    fn test_reorder_indices_must_be_non_negative_integers() {
        let negative = r#"{"actions":[{"type":"reorder_clips","fromIndex":-1,"toIndex":0}]}"#;
        assert!(EditorActionsPayload::parse(negative).is_err());

        let fractional = r#"{"actions":[{"type":"reorder_clips","fromIndex":1.5,"toIndex":0}]}"#;
        assert!(EditorActionsPayload::parse(fractional).is_err());

        let ok = r#"{"actions":[{"type":"reorder_clips","fromIndex":2,"toIndex":0}]}"#;
        assert!(EditorActionsPayload::parse(ok).is_ok());
    }

    #[test]
    fn test_crop_and_clip_count_limits() {
        let crop = r#"{"actions":[{"type":"crop_clip","clipId":"a","width":150}]}"#;
        assert!(EditorActionsPayload::parse(crop).is_err());

        let zero = r#"{"actions":[{"type":"auto_cut","clipCount":0}]}"#;
        assert!(EditorActionsPayload::parse(zero).is_err());

        let cut = r#"{"actions":[{"type":"auto_cut","strategy":"proportional","clipCount":4}]}"#;
        let payload = EditorActionsPayload::parse(cut).unwrap();
        assert_eq!(
            payload.actions[0],
            EditorAction::AutoCut {
                strategy: Some(AutoCutStrategy::Proportional),
                target_duration: None,
                clip_count: Some(4),
            }
        );
    }

    #[test]
    fn test_add_keyframe_fields() {
        let json = r#"{"actions":[{"type":"add_keyframe","clipId":"a","property":"panX","time":0.5,"value":0.1,"easing":"easeOut"}]}"#;
        let payload = EditorActionsPayload::parse(json).unwrap();
        assert_eq!(
            payload.actions[0],
            EditorAction::AddKeyframe {
                clip_id: ClipId::from("a"),
                property: AnimatableProperty::PanX,
                time: 0.5,
                value: 0.1,
                easing: Some(Easing::EaseOut),
            }
        );

        let bad_property = r#"{"actions":[{"type":"add_keyframe","clipId":"a","property":"blur","time":0.5,"value":1}]}"#;
        assert!(EditorActionsPayload::parse(bad_property).is_err());
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let action = EditorAction::ToggleLoop { value: true };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({"type": "toggle_loop", "value": true}));

        let json = serde_json::to_value(EditorAction::Undo {}).unwrap();
        assert_eq!(json, serde_json::json!({"type": "undo"}));
    }

    #[test]
    fn test_schema_lists_every_action() {
        let schema = serde_json::to_string(&editor_actions_schema()).unwrap();
        for tag in ["set_preset", "split_clip", "auto_cut", "apply_preset_all", "export_video"] {
            assert!(schema.contains(tag), "{tag} missing from schema");
        }
    }

    #[test]
    fn test_speed_and_zoom_bounds_inclusive() {
        for speed in ["0.25", "3"] {
            let json = format!(r#"{{"actions":[{{"type":"set_clip_speed","clipId":"x","speed":{speed}}}]}}"#);
            assert!(EditorActionsPayload::parse(&json).is_ok(), "speed {speed} rejected");
        }
        for speed in ["0.24", "3.01"] {
            let json = format!(r#"{{"actions":[{{"type":"set_clip_speed","clipId":"x","speed":{speed}}}]}}"#);
            assert!(EditorActionsPayload::parse(&json).is_err(), "speed {speed} accepted");
        }
        for zoom in ["1", "3"] {
            let json = format!(r#"{{"actions":[{{"type":"set_clip_zoom","clipId":"x","zoom":{zoom}}}]}}"#);
            assert!(EditorActionsPayload::parse(&json).is_ok(), "zoom {zoom} rejected");
        }
        for zoom in ["0.99", "3.01"] {
            let json = format!(r#"{{"actions":[{{"type":"set_clip_zoom","clipId":"x","zoom":{zoom}}}]}}"#);
            assert!(EditorActionsPayload::parse(&json).is_err(), "zoom {zoom} accepted");
        }
    }
}
