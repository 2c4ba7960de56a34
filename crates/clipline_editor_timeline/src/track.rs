// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-property keyframe tracks.

use crate::keyframe::{lerp, Keyframe, KeyframeId};
use crate::property::AnimatableProperty;
use serde::{Deserialize, Serialize};

/// Keyframes driving a single property.
///
/// Keyframes are kept sorted ascending by time; evaluation relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UnsortedTrack")]
pub struct KeyframeTrack {
    /// Property this track animates
    pub property: AnimatableProperty,
    /// Keyframes, sorted by time
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    /// Create an empty track
    pub fn new(property: AnimatableProperty) -> Self {
        Self {
            property,
            keyframes: Vec::new(),
        }
    }

    /// Create a track from keyframes in any order
    pub fn from_keyframes(property: AnimatableProperty, keyframes: Vec<Keyframe>) -> Self {
        let mut track = Self { property, keyframes };
        track.sort_keyframes();
        track
    }

    /// Insert a keyframe, keeping time order.
    ///
    /// A keyframe with the same time as an existing one lands after it.
    pub fn insert(&mut self, keyframe: Keyframe) {
        let idx = self.keyframes.partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(idx, keyframe);
    }

    /// Remove a keyframe by ID
    pub fn remove(&mut self, keyframe_id: &KeyframeId) -> Option<Keyframe> {
        let idx = self.keyframes.iter().position(|k| &k.id == keyframe_id)?;
        Some(self.keyframes.remove(idx))
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: &KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| &k.id == keyframe_id)
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Re-sort after a deserialized or hand-built track
    pub fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Evaluate the track at a normalized time
    pub fn interpolate(&self, time: f64) -> f64 {
        interpolate_keyframes(&self.keyframes, time)
    }
}

#[derive(Deserialize)]
struct UnsortedTrack {
    property: AnimatableProperty,
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

impl From<UnsortedTrack> for KeyframeTrack {
    fn from(raw: UnsortedTrack) -> Self {
        Self::from_keyframes(raw.property, raw.keyframes)
    }
}

/// Evaluate a track at a normalized time
pub fn interpolate_property(track: &KeyframeTrack, time: f64) -> f64 {
    track.interpolate(time)
}

fn interpolate_keyframes(keyframes: &[Keyframe], time: f64) -> f64 {
    let (first, last) = match keyframes {
        [] => return 0.0,
        [only] => return only.value,
        [first, .., last] => (first, last),
    };

    // NaN compares false everywhere; pin it to the start
    if time.is_nan() || time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }

    // First keyframe strictly after `time`; always in 1..len here
    let next = keyframes.partition_point(|k| k.time <= time);
    let a = &keyframes[next - 1];
    let b = &keyframes[next];

    let span = b.time - a.time;
    if span <= 0.0 {
        return a.value;
    }

    let local_t = (time - a.time) / span;
    lerp(a.value, b.value, b.easing.apply(local_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Easing;

    fn track(points: &[(f64, f64, Easing)]) -> KeyframeTrack {
        KeyframeTrack::from_keyframes(
            AnimatableProperty::Zoom,
            points
                .iter()
                .map(|&(t, v, e)| Keyframe::new(t, v).with_easing(e))
                .collect(),
        )
    }

    #[test]
    fn test_empty_track_is_zero() {
        let empty = KeyframeTrack::new(AnimatableProperty::Opacity);
        assert_eq!(empty.interpolate(0.5), 0.0);
    }

    #[test]
    fn test_single_keyframe_everywhere() {
        let single = track(&[(0.3, 4.2, Easing::EaseIn)]);
        for t in [0.0, 0.5, 1.0, -1.0, 2.0, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(single.interpolate(t), 4.2);
        }
    }

    #[test]
    fn test_clamps_outside_range() {
        let tr = track(&[(0.2, 1.0, Easing::Linear), (0.8, 3.0, Easing::EaseOut)]);
        assert_eq!(tr.interpolate(0.0), 1.0);
        assert_eq!(tr.interpolate(0.2), 1.0);
        assert_eq!(tr.interpolate(0.8), 3.0);
        assert_eq!(tr.interpolate(1.5), 3.0);
        assert_eq!(tr.interpolate(f64::NAN), 1.0);
    }

    #[test]
    fn test_linear_midpoint_exact() {
        let tr = track(&[(0.0, 2.0, Easing::Linear), (1.0, 6.0, Easing::Linear)]);
        assert_eq!(tr.interpolate(0.5), (2.0 + 6.0) / 2.0);
    }

    #[test]
    fn test_easing_taken_from_arrival_keyframe() {
        // Departure easing must be ignored
        let tr = track(&[(0.0, 0.0, Easing::EaseOut), (1.0, 1.0, Easing::EaseIn)]);
        assert_eq!(tr.interpolate(0.5), 0.25);
    }

    #[test]
    fn test_multi_segment_lookup() {
        let tr = track(&[
            (0.0, 1.0, Easing::Linear),
            (0.25, 1.12, Easing::Linear),
            (0.5, 1.0, Easing::Linear),
            (0.75, 1.12, Easing::Linear),
            (1.0, 1.0, Easing::Linear),
        ]);
        assert!((tr.interpolate(0.125) - 1.06).abs() < 1e-12);
        assert_eq!(tr.interpolate(0.5), 1.0);
        assert!((tr.interpolate(0.875) - 1.06).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_times_do_not_divide_by_zero() {
        let tr = track(&[
            (0.0, 0.0, Easing::Linear),
            (0.5, 1.0, Easing::Linear),
            (0.5, 5.0, Easing::Linear),
            (1.0, 5.0, Easing::Linear),
        ]);
        let v = tr.interpolate(0.5);
        assert!(v.is_finite());
        assert_eq!(v, 5.0);
        assert_eq!(tr.interpolate(0.25), 0.5);
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let tr = track(&[(1.0, 10.0, Easing::Linear), (0.0, 0.0, Easing::Linear)]);
        assert_eq!(tr.keyframes()[0].time, 0.0);
        assert_eq!(tr.interpolate(0.5), 5.0);
    }

    #[test]
    fn test_deserialize_sorts() {
        let json = r#"{"property":"zoom","keyframes":[
            {"id":"b","time":1.0,"value":2.0},
            {"id":"a","time":0.0,"value":1.0}
        ]}"#;
        let tr: KeyframeTrack = serde_json::from_str(json).unwrap();
        assert_eq!(tr.keyframes()[0].id.as_str(), "a");
        assert_eq!(tr.interpolate(0.5), 1.5);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut tr = KeyframeTrack::new(AnimatableProperty::PanX);
        tr.insert(Keyframe::new(0.9, 1.0));
        tr.insert(Keyframe::new(0.1, 0.0));
        tr.insert(Keyframe::new(0.5, 0.5));
        let times: Vec<f64> = tr.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut tr = KeyframeTrack::new(AnimatableProperty::PanY);
        let kf = Keyframe::new(0.4, 2.0);
        let id = kf.id.clone();
        tr.insert(kf);
        assert!(tr.remove(&id).is_some());
        assert!(tr.remove(&id).is_none());
        assert!(tr.is_empty());
    }
}
