// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clip animations: a named set of keyframe tracks attached to one clip.

use crate::keyframe::{Keyframe, KeyframeId};
use crate::property::{AnimatableProperty, AnimationValues};
use crate::track::KeyframeTrack;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a clip animation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(pub String);

impl AnimationId {
    /// Create a new random animation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of keyframe tracks animating one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAnimation {
    /// Unique animation ID
    pub id: AnimationId,
    /// Display name
    pub name: String,
    /// One track per animated property
    pub tracks: Vec<KeyframeTrack>,
}

impl ClipAnimation {
    /// Create an animation with no tracks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AnimationId::new(),
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    /// Add a track, builder style
    pub fn with_track(mut self, track: KeyframeTrack) -> Self {
        self.tracks.push(track);
        self
    }

    /// Get the track for a property
    pub fn track(&self, property: AnimatableProperty) -> Option<&KeyframeTrack> {
        self.tracks.iter().find(|t| t.property == property)
    }

    /// Get the track for a property, creating an empty one if missing
    pub fn track_mut_or_insert(&mut self, property: AnimatableProperty) -> &mut KeyframeTrack {
        let idx = match self.tracks.iter().position(|t| t.property == property) {
            Some(idx) => idx,
            None => {
                self.tracks.push(KeyframeTrack::new(property));
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[idx]
    }

    /// Insert a keyframe into the property's track
    pub fn add_keyframe(&mut self, property: AnimatableProperty, keyframe: Keyframe) {
        self.track_mut_or_insert(property).insert(keyframe);
    }

    /// Remove a keyframe from whichever track holds it.
    ///
    /// Tracks left without keyframes are dropped.
    pub fn remove_keyframe(&mut self, keyframe_id: &KeyframeId) -> Option<(AnimatableProperty, Keyframe)> {
        let (idx, removed) = self
            .tracks
            .iter_mut()
            .enumerate()
            .find_map(|(idx, track)| track.remove(keyframe_id).map(|kf| (idx, kf)))?;

        let property = self.tracks[idx].property;
        if self.tracks[idx].is_empty() {
            self.tracks.remove(idx);
        }
        Some((property, removed))
    }

    /// Look up a keyframe by ID
    pub fn keyframe(&self, keyframe_id: &KeyframeId) -> Option<&Keyframe> {
        self.tracks.iter().find_map(|t| t.keyframe(keyframe_id))
    }

    /// Whether no property is animated
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(KeyframeTrack::is_empty)
    }

    /// Total keyframe count across tracks
    pub fn keyframe_count(&self) -> usize {
        self.tracks.iter().map(KeyframeTrack::len).sum()
    }

    /// Copy with fresh animation and keyframe IDs
    pub fn duplicate(&self) -> Self {
        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                let keyframes = track
                    .keyframes()
                    .iter()
                    .cloned()
                    .map(|kf| kf.with_id(KeyframeId::new()))
                    .collect();
                KeyframeTrack::from_keyframes(track.property, keyframes)
            })
            .collect();
        Self {
            id: AnimationId::new(),
            name: self.name.clone(),
            tracks,
        }
    }

    /// Evaluate at an absolute time in seconds from clip start
    pub fn evaluate(&self, time: f64, duration: f64) -> AnimationValues {
        evaluate_animation(self, time, duration)
    }
}

/// Evaluate an animation at `time` seconds into a clip of `duration` seconds.
///
/// Properties without a track keep their defaults. A non-positive or
/// non-finite duration evaluates at normalized time 0.
pub fn evaluate_animation(animation: &ClipAnimation, time: f64, duration: f64) -> AnimationValues {
    let normalized = if duration > 0.0 && duration.is_finite() {
        time / duration
    } else {
        0.0
    };

    let mut values = AnimationValues::default();
    for track in &animation.tracks {
        if track.is_empty() {
            continue;
        }
        values.set(track.property, track.interpolate(normalized));
    }
    values
}
