// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline clips.

use crate::animation::ClipAnimation;
use crate::property::AnimationValues;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Shortest clip the timeline allows, in seconds
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Palette cycled through as clips are created
pub const CLIP_COLORS: &[&str] = &[
    "#3b82f6", "#8b5cf6", "#ec4899", "#f97316", "#10b981", "#eab308", "#06b6d4", "#ef4444",
];

/// Colour for the clip created after `existing` others
pub fn clip_color(existing: usize) -> &'static str {
    CLIP_COLORS[existing % CLIP_COLORS.len()]
}

/// Unique identifier for a clip
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Static crop rectangle in percent of the source frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Default for Crop {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

/// A segment of the source media placed on the timeline.
///
/// `start`/`end` are source times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineClip {
    /// Unique clip ID
    pub id: ClipId,
    /// Source in-point
    pub start: f64,
    /// Source out-point
    pub end: f64,
    /// Playback speed multiplier
    pub speed: f64,
    /// Static zoom
    pub zoom: f64,
    /// Static crop
    pub crop: Crop,
    /// Display name
    pub name: String,
    /// Preset applied to the clip
    pub preset_id: Option<String>,
    /// Timeline colour
    pub color: String,
    /// Keyframe animation, if any
    pub animation: Option<ClipAnimation>,
}

impl TimelineClip {
    /// Create a clip spanning `start..end` with neutral settings
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: ClipId::new(),
            start,
            end,
            speed: 1.0,
            zoom: 1.0,
            crop: Crop::default(),
            name: name.into(),
            preset_id: None,
            color: CLIP_COLORS[0].to_string(),
            animation: None,
        }
    }

    /// Set the colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the preset
    pub fn with_preset(mut self, preset_id: Option<String>) -> Self {
        self.preset_id = preset_id;
        self
    }

    /// Source span in seconds
    pub fn source_duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Time the clip occupies on the output timeline
    pub fn playback_duration(&self) -> f64 {
        if self.speed > 0.0 {
            self.source_duration() / self.speed
        } else {
            self.source_duration()
        }
    }

    /// Evaluate the clip's animation `local_time` output seconds into the clip
    pub fn values_at(&self, local_time: f64) -> AnimationValues {
        match &self.animation {
            Some(animation) => animation.evaluate(local_time, self.playback_duration()),
            None => AnimationValues::default(),
        }
    }
}

/// Default name for the `index`-th clip (zero based)
pub fn scene_name(index: usize) -> String {
    format!("Scene {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::animation_from_factory;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(clip_color(0), CLIP_COLORS[0]);
        assert_eq!(clip_color(CLIP_COLORS.len()), CLIP_COLORS[0]);
        assert_eq!(clip_color(CLIP_COLORS.len() + 2), CLIP_COLORS[2]);
    }

    #[test]
    fn test_playback_duration_respects_speed() {
        let mut clip = TimelineClip::new("A", 2.0, 8.0);
        assert_eq!(clip.source_duration(), 6.0);
        clip.speed = 2.0;
        assert_eq!(clip.playback_duration(), 3.0);
    }

    #[test]
    fn test_values_without_animation() {
        let clip = TimelineClip::new("A", 0.0, 4.0);
        assert_eq!(clip.values_at(2.0), AnimationValues::default());
    }

    #[test]
    fn test_values_follow_playback_time() {
        let mut clip = TimelineClip::new("A", 0.0, 4.0);
        clip.speed = 2.0;
        clip.animation = animation_from_factory("cinematic-zoom-in", 2.0);
        // 2 s of output is the end of the clip at double speed
        assert_eq!(clip.values_at(2.0).zoom, 1.3);
    }

    #[test]
    fn test_scene_names() {
        assert_eq!(scene_name(0), "Scene 1");
        assert_eq!(scene_name(4), "Scene 5");
    }
}
