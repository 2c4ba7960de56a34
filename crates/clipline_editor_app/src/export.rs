// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render plan: per-frame transforms for the external renderer.
//!
//! The renderer never evaluates animations itself. It receives one
//! [`FrameTransform`] per output frame and applies it to the draw call.

use clipline_editor_timeline::{resolve_preset_animation, AnimationValues, ClipAnimation, ClipId, Crop, TimelineClip};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::TimelineState;

/// Output frame rate when none is configured
pub const DEFAULT_EXPORT_FPS: f64 = 30.0;

/// Longest output a render plan will describe, in seconds
pub const MAX_EXPORT_DURATION: f64 = 6.0 * 60.0 * 60.0;

/// Why a timeline cannot be turned into a render plan
#[derive(Debug, Error)]
pub enum ExportError {
    /// Clip timing is unusable, e.g. from a hand-edited project
    #[error("Clip {clip_id} cannot be rendered: {reason}")]
    InvalidClip {
        /// Offending clip
        clip_id: ClipId,
        /// What is wrong with it
        reason: String,
    },

    /// Output would run longer than [`MAX_EXPORT_DURATION`]
    #[error("Export would last {duration:.0}s, limit is {limit:.0}s")]
    TooLong {
        /// Requested output length
        duration: f64,
        /// Allowed output length
        limit: f64,
    },
}

/// Transform for one output frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTransform {
    /// Frame number on the output timeline
    pub frame: u64,
    /// Time into the clip at playback speed
    pub local_time: f64,
    /// Source media time to sample
    pub source_time: f64,
    /// Evaluated animation, with the clip's static zoom folded in
    pub values: AnimationValues,
}

/// One clip's slice of the render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderClip {
    /// Clip being rendered
    pub clip_id: ClipId,
    /// Display name
    pub name: String,
    /// First output frame
    pub first_frame: u64,
    /// Static crop
    pub crop: Crop,
    /// Frames in order
    pub frames: Vec<FrameTransform>,
}

/// Everything the renderer needs for an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    /// Output frame rate
    pub fps: f64,
    /// Total output frames
    pub frame_count: u64,
    /// Output duration in seconds
    pub duration: f64,
    /// Source media URL
    pub source_url: Option<String>,
    /// Whether playback loops
    pub loop_enabled: bool,
    /// Clips in playback order
    pub clips: Vec<RenderClip>,
}

/// Animation to render for `clip`: its own, or its preset's, or the timeline preset's
pub fn effective_animation(clip: &TimelineClip, timeline_preset: Option<&str>) -> Option<ClipAnimation> {
    if let Some(animation) = &clip.animation {
        return Some(animation.clone());
    }
    clip.preset_id
        .as_deref()
        .or(timeline_preset)
        .and_then(|id| resolve_preset_animation(id, clip.playback_duration()))
}

/// Sample every clip once per output frame.
///
/// Fails without allocating frames when a clip's timing is not finite or
/// the output would exceed [`MAX_EXPORT_DURATION`].
pub fn render_plan(state: &TimelineState, fps: f64) -> Result<RenderPlan, ExportError> {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps
    } else {
        warn!("Invalid export frame rate {fps}, using {DEFAULT_EXPORT_FPS}");
        DEFAULT_EXPORT_FPS
    };

    let mut total = 0.0;
    for clip in state.clips() {
        check_clip(clip)?;
        total += clip.playback_duration();
    }
    if total > MAX_EXPORT_DURATION {
        return Err(ExportError::TooLong {
            duration: total,
            limit: MAX_EXPORT_DURATION,
        });
    }

    let mut next_frame = 0u64;
    let clips: Vec<RenderClip> = state
        .clips()
        .map(|clip| {
            let plan = render_clip(clip, state.preset_id.as_deref(), fps, next_frame);
            next_frame += plan.frames.len() as u64;
            plan
        })
        .collect();

    info!("Render plan: {} clips, {} frames at {} fps", clips.len(), next_frame, fps);

    Ok(RenderPlan {
        fps,
        frame_count: next_frame,
        duration: next_frame as f64 / fps,
        source_url: state.source.as_ref().map(|s| s.url.clone()),
        loop_enabled: state.loop_enabled,
        clips,
    })
}

fn check_clip(clip: &TimelineClip) -> Result<(), ExportError> {
    let invalid = |reason: String| ExportError::InvalidClip {
        clip_id: clip.id.clone(),
        reason,
    };
    if !clip.start.is_finite() || !clip.end.is_finite() || clip.end < clip.start {
        return Err(invalid(format!("span {}-{} is not usable", clip.start, clip.end)));
    }
    if !clip.speed.is_finite() || clip.speed <= 0.0 {
        return Err(invalid(format!("speed {} is not positive", clip.speed)));
    }
    if !clip.playback_duration().is_finite() {
        return Err(invalid("playback duration overflows".to_string()));
    }
    Ok(())
}

fn render_clip(clip: &TimelineClip, timeline_preset: Option<&str>, fps: f64, first_frame: u64) -> RenderClip {
    let duration = clip.playback_duration();
    let animation = effective_animation(clip, timeline_preset);
    let count = (duration * fps).ceil() as u64;

    let frames = (0..count)
        .map(|i| {
            let local_time = i as f64 / fps;
            let mut values = match &animation {
                Some(animation) => animation.evaluate(local_time, duration),
                None => AnimationValues::default(),
            };
            values.zoom *= clip.zoom;
            FrameTransform {
                frame: first_frame + i,
                local_time,
                source_time: clip.start + local_time * clip.speed,
                values,
            }
        })
        .collect();

    RenderClip {
        clip_id: clip.id.clone(),
        name: clip.name.clone(),
        first_frame,
        crop: clip.crop,
        frames,
    }
}
