// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline state: the single source of truth for clips and playback.

use clipline_editor_media::{generate_clips_from_import, MediaSource, SilentRegion};
use clipline_editor_timeline::{ClipId, TimelineClip};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything an edit can change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    /// Clips in playback order
    pub clips: IndexMap<ClipId, TimelineClip>,
    /// Default preset for new clips
    pub preset_id: Option<String>,
    /// Whether playback loops
    pub loop_enabled: bool,
    /// Imported media the clips cut from
    pub source: Option<MediaSource>,
    /// Silence detected in the source audio
    pub silent_regions: Vec<SilentRegion>,
}

impl TimelineState {
    /// Empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeline holding one clip over the whole of `source`
    pub fn from_import(source: MediaSource, preset_id: Option<String>) -> Self {
        let mut state = Self {
            preset_id,
            ..Self::default()
        };
        for clip in generate_clips_from_import(source.duration, 0, state.preset_id.as_deref()) {
            state.push_clip(clip);
        }
        state.source = Some(source);
        state
    }

    /// Append a clip
    pub fn push_clip(&mut self, clip: TimelineClip) {
        self.clips.insert(clip.id.clone(), clip);
    }

    /// Insert a clip at a position, shifting later clips back
    pub fn insert_clip(&mut self, index: usize, clip: TimelineClip) {
        let index = index.min(self.clips.len());
        self.clips.shift_insert(index, clip.id.clone(), clip);
    }

    /// Look up a clip
    pub fn clip(&self, id: &ClipId) -> Option<&TimelineClip> {
        self.clips.get(id)
    }

    /// Look up a clip mutably
    pub fn clip_mut(&mut self, id: &ClipId) -> Option<&mut TimelineClip> {
        self.clips.get_mut(id)
    }

    /// Position of a clip in playback order
    pub fn clip_index(&self, id: &ClipId) -> Option<usize> {
        self.clips.get_index_of(id)
    }

    /// Clips in playback order
    pub fn clips(&self) -> impl Iterator<Item = &TimelineClip> {
        self.clips.values()
    }

    /// Number of clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether the timeline has no clips
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Length of the imported source, if any
    pub fn source_duration(&self) -> Option<f64> {
        self.source.as_ref().map(|s| s.duration)
    }

    /// Length of media available for cutting: the source, or the furthest clip end
    pub fn media_duration(&self) -> f64 {
        self.source_duration()
            .unwrap_or_else(|| self.clips().map(|c| c.end).fold(0.0, f64::max))
    }

    /// Output length with every clip at its playback speed
    pub fn timeline_duration(&self) -> f64 {
        self.clips().map(TimelineClip::playback_duration).sum()
    }
}
