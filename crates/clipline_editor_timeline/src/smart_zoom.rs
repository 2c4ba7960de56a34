// SPDX-License-Identifier: MIT OR Apache-2.0
//! Zoom-into-region animation generator.
//!
//! Produces a push-in toward a target region and back out again. The pan
//! only nudges toward the target (a fixed fraction of the centre offset),
//! it does not fully re-centre the frame.

use crate::animation::ClipAnimation;
use crate::keyframe::{Easing, Keyframe};
use crate::property::AnimatableProperty;
use crate::track::KeyframeTrack;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pan offset per unit of centre displacement
const PAN_FACTOR: f64 = -0.2;

/// Region of the frame in percent; `x`/`y` locate the region centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    /// Horizontal centre (0-100)
    pub x: f64,
    /// Vertical centre (0-100)
    pub y: f64,
    /// Width (0-100)
    pub width: f64,
    /// Height (0-100)
    pub height: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            width: 50.0,
            height: 50.0,
        }
    }
}

/// Inputs to [`generate_smart_zoom_animation`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartZoomOptions {
    /// Region to push toward
    pub target_region: Region,
    /// Normalized start of the move
    pub start_time: f64,
    /// Normalized end of the move
    pub end_time: f64,
    /// Easing for every keyframe
    pub easing: Easing,
    /// Peak zoom
    pub zoom_level: f64,
}

impl Default for SmartZoomOptions {
    fn default() -> Self {
        Self {
            target_region: Region::default(),
            start_time: 0.0,
            end_time: 1.0,
            easing: Easing::EaseInOut,
            zoom_level: 1.5,
        }
    }
}

fn unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Generate a zoom-in/zoom-out animation toward a region
pub fn generate_smart_zoom_animation(options: &SmartZoomOptions) -> ClipAnimation {
    let mut start = unit(options.start_time, 0.0);
    let mut end = unit(options.end_time, 1.0);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    let peak = (start + end) / 2.0;

    let zoom_level = if options.zoom_level.is_finite() {
        options.zoom_level
    } else {
        SmartZoomOptions::default().zoom_level
    };

    let region = options.target_region;
    let center_x = unit(region.x / 100.0, 0.5);
    let center_y = unit(region.y / 100.0, 0.5);
    let pan_x = (center_x - 0.5) * PAN_FACTOR;
    let pan_y = (center_y - 0.5) * PAN_FACTOR;

    let easing = options.easing;
    let three_point = |property: AnimatableProperty, neutral: f64, target: f64| {
        KeyframeTrack::from_keyframes(
            property,
            vec![
                Keyframe::new(start, neutral).with_easing(easing),
                Keyframe::new(peak, target).with_easing(easing),
                Keyframe::new(end, neutral).with_easing(easing),
            ],
        )
    };

    ClipAnimation::new("Smart Zoom")
        .with_track(three_point(AnimatableProperty::Zoom, 1.0, zoom_level))
        .with_track(three_point(AnimatableProperty::PanX, 0.0, pan_x))
        .with_track(three_point(AnimatableProperty::PanY, 0.0, pan_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::evaluate_animation;

    #[test]
    fn test_default_options_centered() {
        let anim = generate_smart_zoom_animation(&SmartZoomOptions::default());
        assert_eq!(anim.tracks.len(), 3);

        let mid = evaluate_animation(&anim, 0.5, 1.0);
        assert_eq!(mid.zoom, 1.5);
        assert_eq!(mid.pan_x, 0.0);
        assert_eq!(mid.pan_y, 0.0);

        let end = evaluate_animation(&anim, 1.0, 1.0);
        assert_eq!(end.zoom, 1.0);
    }

    #[test]
    fn test_pan_nudges_toward_target() {
        let options = SmartZoomOptions {
            target_region: Region { x: 100.0, y: 0.0, width: 20.0, height: 20.0 },
            zoom_level: 2.0,
            ..SmartZoomOptions::default()
        };
        let anim = generate_smart_zoom_animation(&options);
        let peak = evaluate_animation(&anim, 0.5, 1.0);
        assert!((peak.pan_x - -0.1).abs() < 1e-12);
        assert!((peak.pan_y - 0.1).abs() < 1e-12);
        assert_eq!(peak.zoom, 2.0);
    }

    #[test]
    fn test_window_and_easing() {
        let options = SmartZoomOptions {
            start_time: 0.2,
            end_time: 0.6,
            easing: Easing::Linear,
            ..SmartZoomOptions::default()
        };
        let anim = generate_smart_zoom_animation(&options);
        let zoom = anim.track(AnimatableProperty::Zoom).unwrap();
        let times: Vec<f64> = zoom.keyframes().iter().map(|k| k.time).collect();
        for (actual, expected) in times.iter().zip([0.2, 0.4, 0.6]) {
            assert!((actual - expected).abs() < 1e-12);
        }
        assert!(zoom.keyframes().iter().all(|k| k.easing == Easing::Linear));
        assert_eq!(evaluate_animation(&anim, 0.1, 1.0).zoom, 1.0);
    }

    #[test]
    fn test_reversed_window_is_swapped() {
        let options = SmartZoomOptions {
            start_time: 0.9,
            end_time: 0.1,
            ..SmartZoomOptions::default()
        };
        let anim = generate_smart_zoom_animation(&options);
        let zoom = anim.track(AnimatableProperty::Zoom).unwrap();
        assert_eq!(zoom.keyframes()[0].time, 0.1);
        assert_eq!(zoom.keyframes()[2].time, 0.9);
    }

    #[test]
    fn test_partial_options_from_json() {
        let options: SmartZoomOptions = serde_json::from_str(r#"{"zoomLevel":2.5}"#).unwrap();
        assert_eq!(options.zoom_level, 2.5);
        assert_eq!(options.easing, Easing::EaseInOut);
        assert_eq!(options.target_region, Region::default());
    }
}
