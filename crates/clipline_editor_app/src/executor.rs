// SPDX-License-Identifier: MIT OR Apache-2.0
//! Applies validated edit actions to a [`TimelineState`].
//!
//! Each function here mutates the state it is given and may leave it half
//! edited on error. [`crate::store::TimelineStore`] runs them on a working
//! copy and only commits on success.

use clipline_editor_timeline::{
    clip_color, resolve_preset_animation, scene_name, AnimatableProperty, ClipAnimation, ClipId, Crop, Easing,
    Keyframe, KeyframeId, TimelineClip, MIN_CLIP_DURATION,
};
use thiserror::Error;
use tracing::debug;

use crate::actions::{AutoCutStrategy, EditorAction};
use crate::autocut::{clip_count_for, plan_cuts};
use crate::history::HistoryError;
use crate::state::TimelineState;

/// Name given to animations created by `add_keyframe`
pub const CUSTOM_ANIMATION_NAME: &str = "Custom";

/// Why a schema-valid action could not be applied
#[derive(Debug, Error)]
pub enum ActionError {
    /// No clip with this ID
    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    /// No keyframe with this ID on the clip
    #[error("Keyframe {keyframe_id} not found on clip {clip_id}")]
    KeyframeNotFound {
        /// Clip searched
        clip_id: ClipId,
        /// Missing keyframe
        keyframe_id: KeyframeId,
    },

    /// Preset ID is neither an animation factory nor a shot preset
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Requested in/out points are unusable
    #[error("Invalid trim: {0}")]
    InvalidTrim(String),

    /// Split point is not inside the clip
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Index outside the clip list
    #[error("Clip index {index} out of range for {len} clips")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of clips
        len: usize,
    },

    /// Nothing to operate on
    #[error("Timeline has no media to cut")]
    NoMedia,

    /// Field outside its allowed range
    #[error("Action violates a constraint: {0}")]
    Constraint(String),

    /// Any other rejected request
    #[error("Invalid action: {0}")]
    Invalid(String),

    /// Undo/redo failure
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Apply one edit action, returning a short description of what changed
pub fn apply_edit(state: &mut TimelineState, action: &EditorAction) -> Result<String, ActionError> {
    action.validate().map_err(ActionError::Constraint)?;
    match action {
        EditorAction::SetPreset { preset_id } => {
            ensure_preset(preset_id)?;
            state.preset_id = Some(preset_id.clone());
            Ok(format!("Timeline preset set to {preset_id}"))
        }

        EditorAction::TrimClip { clip_id, start, end } => {
            let limit = state.source_duration();
            let clip = clip_mut(state, clip_id)?;
            let start = start.unwrap_or(clip.start);
            let end = end.unwrap_or(clip.end);
            check_span(start, end, limit).map_err(ActionError::InvalidTrim)?;
            clip.start = start;
            clip.end = end;
            Ok(format!("Trimmed {} to {start:.2}s-{end:.2}s", clip.name))
        }

        EditorAction::SetClipSpeed { clip_id, speed } => {
            let clip = clip_mut(state, clip_id)?;
            clip.speed = *speed;
            Ok(format!("Set {} speed to {speed}x", clip.name))
        }

        EditorAction::SetClipZoom { clip_id, zoom } => {
            let clip = clip_mut(state, clip_id)?;
            clip.zoom = *zoom;
            Ok(format!("Set {} zoom to {zoom}x", clip.name))
        }

        EditorAction::CropClip {
            clip_id,
            x,
            y,
            width,
            height,
        } => {
            let clip = clip_mut(state, clip_id)?;
            let crop = Crop {
                x: x.unwrap_or(clip.crop.x),
                y: y.unwrap_or(clip.crop.y),
                width: width.unwrap_or(clip.crop.width),
                height: height.unwrap_or(clip.crop.height),
            };
            if crop.x + crop.width > 100.0 || crop.y + crop.height > 100.0 {
                return Err(ActionError::Invalid("crop extends past the frame".to_string()));
            }
            clip.crop = crop;
            Ok(format!("Cropped {}", clip.name))
        }

        EditorAction::RenameClip { clip_id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(ActionError::Invalid("clip name cannot be empty".to_string()));
            }
            let clip = clip_mut(state, clip_id)?;
            let old = std::mem::replace(&mut clip.name, name.to_string());
            Ok(format!("Renamed {old} to {name}"))
        }

        EditorAction::SplitClip { clip_id, at } => split_clip(state, clip_id, *at),

        EditorAction::AddClip {
            start,
            end,
            duration,
            name,
            preset_id,
            speed,
            zoom,
        } => {
            let start = start.unwrap_or(0.0);
            let end = match (end, duration) {
                (Some(end), _) => *end,
                (None, Some(duration)) => start + duration,
                (None, None) => state
                    .source_duration()
                    .ok_or_else(|| ActionError::Invalid("clip end is required without imported media".to_string()))?,
            };
            check_span(start, end, state.source_duration()).map_err(ActionError::Invalid)?;

            let preset_id = preset_id.clone().or_else(|| state.preset_id.clone());
            if let Some(id) = &preset_id {
                ensure_preset(id)?;
            }

            let index = state.len();
            let mut clip = TimelineClip::new(name.clone().unwrap_or_else(|| scene_name(index)), start, end)
                .with_color(clip_color(index))
                .with_preset(preset_id);
            clip.speed = speed.unwrap_or(1.0);
            clip.zoom = zoom.unwrap_or(1.0);

            let message = format!("Added {} ({})", clip.name, clip.id);
            state.push_clip(clip);
            Ok(message)
        }

        EditorAction::RemoveClip { clip_id } => {
            let clip = state
                .clips
                .shift_remove(clip_id)
                .ok_or_else(|| ActionError::ClipNotFound(clip_id.clone()))?;
            Ok(format!("Removed {}", clip.name))
        }

        EditorAction::DuplicateClip { clip_id } => {
            let index = state
                .clip_index(clip_id)
                .ok_or_else(|| ActionError::ClipNotFound(clip_id.clone()))?;
            let original = clip_mut(state, clip_id)?;
            let copy = TimelineClip {
                id: ClipId::new(),
                name: format!("{} (copy)", original.name),
                animation: original.animation.as_ref().map(ClipAnimation::duplicate),
                ..original.clone()
            };
            let message = format!("Duplicated {} as {}", original.name, copy.id);
            state.insert_clip(index + 1, copy);
            Ok(message)
        }

        EditorAction::ReorderClips { from_index, to_index } => {
            let len = state.len();
            for index in [*from_index, *to_index] {
                if index >= len {
                    return Err(ActionError::IndexOutOfRange { index, len });
                }
            }
            state.clips.move_index(*from_index, *to_index);
            Ok(format!("Moved clip {from_index} to {to_index}"))
        }

        EditorAction::AddKeyframe {
            clip_id,
            property,
            time,
            value,
            easing,
        } => add_keyframe(state, clip_id, *property, *time, *value, easing.unwrap_or_default()),

        EditorAction::RemoveKeyframe { clip_id, keyframe_id } => {
            let clip = clip_mut(state, clip_id)?;
            let not_found = || ActionError::KeyframeNotFound {
                clip_id: clip_id.clone(),
                keyframe_id: keyframe_id.clone(),
            };
            let animation = clip.animation.as_mut().ok_or_else(not_found)?;
            let (property, _) = animation.remove_keyframe(keyframe_id).ok_or_else(not_found)?;
            if animation.is_empty() {
                clip.animation = None;
            }
            Ok(format!("Removed {} keyframe from {}", property.name(), clip.name))
        }

        EditorAction::AutoCut {
            strategy,
            target_duration,
            clip_count,
        } => auto_cut(state, strategy.unwrap_or_default(), *target_duration, *clip_count),

        EditorAction::BatchTrim { trim_start, trim_end } => {
            let trim_start = trim_start.unwrap_or(0.0);
            let trim_end = trim_end.unwrap_or(0.0);
            let limit = state.source_duration();

            let (mut trimmed, mut skipped) = (0usize, 0usize);
            for clip in state.clips.values_mut() {
                let start = (clip.start + trim_start).max(0.0);
                let end = limit.map_or(clip.end - trim_end, |l| (clip.end - trim_end).min(l));
                if end - start < MIN_CLIP_DURATION {
                    debug!("Skipping {}: trim would leave {:.3}s", clip.name, end - start);
                    skipped += 1;
                    continue;
                }
                clip.start = start;
                clip.end = end;
                trimmed += 1;
            }
            Ok(format!("Trimmed {trimmed} clips, skipped {skipped}"))
        }

        EditorAction::ApplyPresetAll { preset_id } => {
            ensure_preset(preset_id)?;
            for clip in state.clips.values_mut() {
                clip.animation = resolve_preset_animation(preset_id, clip.playback_duration());
                clip.preset_id = Some(preset_id.clone());
            }
            Ok(format!("Applied {preset_id} to {} clips", state.len()))
        }

        EditorAction::ToggleLoop { value } => {
            state.loop_enabled = *value;
            Ok(format!("Loop {}", if *value { "on" } else { "off" }))
        }

        EditorAction::Undo {} | EditorAction::Redo {} | EditorAction::ExportVideo {} => Err(ActionError::Invalid(format!(
            "{} is not an edit",
            action.kind()
        ))),
    }
}

fn clip_mut<'a>(state: &'a mut TimelineState, clip_id: &ClipId) -> Result<&'a mut TimelineClip, ActionError> {
    state
        .clip_mut(clip_id)
        .ok_or_else(|| ActionError::ClipNotFound(clip_id.clone()))
}

fn ensure_preset(preset_id: &str) -> Result<(), ActionError> {
    if resolve_preset_animation(preset_id, 1.0).is_some() {
        Ok(())
    } else {
        Err(ActionError::UnknownPreset(preset_id.to_string()))
    }
}

/// A clip span must be ordered, long enough, and inside the source
fn check_span(start: f64, end: f64, limit: Option<f64>) -> Result<(), String> {
    if start < 0.0 {
        return Err(format!("start {start} is before the beginning of the media"));
    }
    if let Some(limit) = limit {
        if end > limit {
            return Err(format!("end {end} is past the end of the media ({limit:.2}s)"));
        }
    }
    if end - start < MIN_CLIP_DURATION {
        return Err(format!(
            "clip would be {:.3}s long, minimum is {MIN_CLIP_DURATION}s",
            end - start
        ));
    }
    Ok(())
}

fn split_clip(state: &mut TimelineState, clip_id: &ClipId, at: f64) -> Result<String, ActionError> {
    let index = state
        .clip_index(clip_id)
        .ok_or_else(|| ActionError::ClipNotFound(clip_id.clone()))?;
    let clip = clip_mut(state, clip_id)?;

    if at - clip.start < MIN_CLIP_DURATION || clip.end - at < MIN_CLIP_DURATION {
        return Err(ActionError::InvalidSplit(format!(
            "{at:.2}s is not inside {} ({:.2}s-{:.2}s) with room for both halves",
            clip.name, clip.start, clip.end
        )));
    }

    let second = TimelineClip {
        id: ClipId::new(),
        start: at,
        name: format!("{} (2)", clip.name),
        animation: clip.animation.as_ref().map(ClipAnimation::duplicate),
        ..clip.clone()
    };
    clip.end = at;

    let message = format!("Split {} at {at:.2}s, new clip {}", clip.name, second.id);
    state.insert_clip(index + 1, second);
    Ok(message)
}

fn add_keyframe(
    state: &mut TimelineState,
    clip_id: &ClipId,
    property: AnimatableProperty,
    time: f64,
    value: f64,
    easing: Easing,
) -> Result<String, ActionError> {
    let clip = clip_mut(state, clip_id)?;
    let keyframe = Keyframe::new(time.clamp(0.0, 1.0), value).with_easing(easing);
    let keyframe_id = keyframe.id.clone();

    clip.animation
        .get_or_insert_with(|| ClipAnimation::new(CUSTOM_ANIMATION_NAME))
        .add_keyframe(property, keyframe);

    Ok(format!(
        "Added {} keyframe {keyframe_id} to {}",
        property.name(),
        clip.name
    ))
}

fn auto_cut(
    state: &mut TimelineState,
    strategy: AutoCutStrategy,
    target_duration: Option<f64>,
    clip_count: Option<u32>,
) -> Result<String, ActionError> {
    let duration = state.media_duration();
    if duration < MIN_CLIP_DURATION {
        return Err(ActionError::NoMedia);
    }

    let count = clip_count_for(duration, target_duration, clip_count);
    let spans = plan_cuts(duration, strategy, count, &state.silent_regions);

    state.clips.clear();
    for (index, span) in spans.iter().enumerate() {
        let clip = TimelineClip::new(scene_name(index), span.start, span.end)
            .with_color(clip_color(index))
            .with_preset(state.preset_id.clone());
        state.push_clip(clip);
    }

    Ok(format!("Cut {:.2}s into {} clips", duration, state.len()))
}
