// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canned clip animations and static shot presets.
//!
//! Two registries live here:
//! - [`ANIMATION_FACTORIES`]: keyed builders producing hand-tuned keyframe
//!   animations (zooms, pans, fades).
//! - [`SHOT_PRESETS`]: static framing presets (zoom, rotation, pan) that
//!   predate keyframe animation and are converted on demand.
//!
//! Both are immutable tables; nothing registers at runtime.

use crate::animation::ClipAnimation;
use crate::keyframe::{Easing, Keyframe};
use crate::property::AnimatableProperty;
use crate::track::KeyframeTrack;
use serde::Serialize;

/// Builder for a canned animation
#[derive(Debug, Clone, Copy)]
pub struct AnimationFactory {
    /// Stable registry key
    pub id: &'static str,
    build: fn(f64) -> ClipAnimation,
}

impl AnimationFactory {
    /// Build the animation for a clip of `duration` seconds
    pub fn build(&self, duration: f64) -> ClipAnimation {
        (self.build)(duration)
    }
}

/// Registry entry as shown in pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryInfo {
    /// Registry key
    pub id: &'static str,
    /// Display name
    pub name: String,
}

/// All canned animations
pub static ANIMATION_FACTORIES: &[AnimationFactory] = &[
    AnimationFactory { id: "cinematic-zoom-in", build: cinematic_zoom_in },
    AnimationFactory { id: "cinematic-zoom-out", build: cinematic_zoom_out },
    AnimationFactory { id: "ken-burns", build: ken_burns },
    AnimationFactory { id: "pan-left", build: pan_left },
    AnimationFactory { id: "pan-right", build: pan_right },
    AnimationFactory { id: "pulse-zoom", build: pulse_zoom },
    AnimationFactory { id: "fade-in", build: fade_in },
    AnimationFactory { id: "fade-out", build: fade_out },
    AnimationFactory { id: "fade-in-out", build: fade_in_out },
    AnimationFactory { id: "dramatic-rotate", build: dramatic_rotate },
    AnimationFactory { id: "slow-drift", build: slow_drift },
    AnimationFactory { id: "crop-reveal", build: crop_reveal },
];

/// Duration used when listing factories
const LISTING_DURATION: f64 = 3.0;

/// Length of a fade ramp in seconds
const FADE_SECONDS: f64 = 0.5;

/// Look up a factory by key
pub fn animation_factory(id: &str) -> Option<&'static AnimationFactory> {
    ANIMATION_FACTORIES.iter().find(|f| f.id == id)
}

/// Build a canned animation, or `None` for an unknown key
pub fn animation_from_factory(id: &str, duration: f64) -> Option<ClipAnimation> {
    animation_factory(id).map(|f| f.build(duration))
}

/// List registry keys with display names
pub fn animation_factory_list() -> Vec<FactoryInfo> {
    ANIMATION_FACTORIES
        .iter()
        .map(|f| FactoryInfo {
            id: f.id,
            name: f.build(LISTING_DURATION).name,
        })
        .collect()
}

fn track(property: AnimatableProperty, points: &[(f64, f64)], easing: Easing) -> KeyframeTrack {
    let keyframes = points
        .iter()
        .map(|&(time, value)| Keyframe::new(time, value).with_easing(easing))
        .collect();
    KeyframeTrack::from_keyframes(property, keyframes)
}

/// Fade ramp length in normalized clip time
fn fade_span(duration: f64) -> f64 {
    if duration > 0.0 && duration.is_finite() {
        (FADE_SECONDS / duration).min(0.5)
    } else {
        0.15
    }
}

fn cinematic_zoom_in(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Cinematic Zoom In")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.0), (1.0, 1.3)], Easing::EaseInOut))
}

fn cinematic_zoom_out(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Cinematic Zoom Out")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.3), (1.0, 1.0)], Easing::EaseInOut))
}

fn ken_burns(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Ken Burns")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.0), (1.0, 1.2)], Easing::Linear))
        .with_track(track(AnimatableProperty::PanX, &[(0.0, 0.0), (1.0, -0.05)], Easing::Linear))
        .with_track(track(AnimatableProperty::PanY, &[(0.0, 0.0), (1.0, -0.03)], Easing::Linear))
}

fn pan_left(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Pan Left")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.2), (1.0, 1.2)], Easing::Linear))
        .with_track(track(AnimatableProperty::PanX, &[(0.0, 0.05), (1.0, -0.05)], Easing::EaseInOut))
}

fn pan_right(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Pan Right")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.2), (1.0, 1.2)], Easing::Linear))
        .with_track(track(AnimatableProperty::PanX, &[(0.0, -0.05), (1.0, 0.05)], Easing::EaseInOut))
}

fn pulse_zoom(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Pulse Zoom").with_track(track(
        AnimatableProperty::Zoom,
        &[(0.0, 1.0), (0.25, 1.12), (0.5, 1.0), (0.75, 1.12), (1.0, 1.0)],
        Easing::EaseInOut,
    ))
}

fn fade_in(duration: f64) -> ClipAnimation {
    let span = fade_span(duration);
    ClipAnimation::new("Fade In")
        .with_track(track(AnimatableProperty::Opacity, &[(0.0, 0.0), (span, 1.0)], Easing::EaseOut))
}

fn fade_out(duration: f64) -> ClipAnimation {
    let span = fade_span(duration);
    ClipAnimation::new("Fade Out")
        .with_track(track(AnimatableProperty::Opacity, &[(1.0 - span, 1.0), (1.0, 0.0)], Easing::EaseIn))
}

fn fade_in_out(duration: f64) -> ClipAnimation {
    let span = fade_span(duration);
    let mut opacity = KeyframeTrack::new(AnimatableProperty::Opacity);
    opacity.insert(Keyframe::new(0.0, 0.0));
    opacity.insert(Keyframe::new(span, 1.0).with_easing(Easing::EaseOut));
    opacity.insert(Keyframe::new(1.0 - span, 1.0));
    opacity.insert(Keyframe::new(1.0, 0.0).with_easing(Easing::EaseIn));
    ClipAnimation::new("Fade In & Out").with_track(opacity)
}

fn dramatic_rotate(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Dramatic Rotate")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.0), (1.0, 1.15)], Easing::EaseInOut))
        .with_track(track(AnimatableProperty::Rotate, &[(0.0, 0.0), (1.0, -3.0)], Easing::EaseInOut))
}

fn slow_drift(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Slow Drift")
        .with_track(track(AnimatableProperty::Zoom, &[(0.0, 1.05), (1.0, 1.05)], Easing::Linear))
        .with_track(track(AnimatableProperty::PanY, &[(0.0, 0.02), (1.0, -0.02)], Easing::Linear))
}

fn crop_reveal(_duration: f64) -> ClipAnimation {
    ClipAnimation::new("Crop Reveal")
        .with_track(track(AnimatableProperty::CropX, &[(0.0, 20.0), (0.6, 0.0)], Easing::EaseOut))
        .with_track(track(AnimatableProperty::CropY, &[(0.0, 20.0), (0.6, 0.0)], Easing::EaseOut))
        .with_track(track(AnimatableProperty::CropWidth, &[(0.0, 60.0), (0.6, 100.0)], Easing::EaseOut))
        .with_track(track(AnimatableProperty::CropHeight, &[(0.0, 60.0), (0.6, 100.0)], Easing::EaseOut))
}

/// Static framing preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShotPreset {
    /// Preset key
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Scale factor
    pub zoom: f64,
    /// Rotation in degrees
    pub rotate: f64,
    /// Horizontal offset
    pub pan_x: f64,
    /// Vertical offset
    pub pan_y: f64,
}

impl ShotPreset {
    const fn new(id: &'static str, name: &'static str, zoom: f64, rotate: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { id, name, zoom, rotate, pan_x, pan_y }
    }

    fn values(&self) -> [(AnimatableProperty, f64); 4] {
        [
            (AnimatableProperty::Zoom, self.zoom),
            (AnimatableProperty::Rotate, self.rotate),
            (AnimatableProperty::PanX, self.pan_x),
            (AnimatableProperty::PanY, self.pan_y),
        ]
    }
}

/// Static shot presets
pub static SHOT_PRESETS: &[ShotPreset] = &[
    ShotPreset::new("wide", "Wide Shot", 1.0, 0.0, 0.0, 0.0),
    ShotPreset::new("medium", "Medium Shot", 1.25, 0.0, 0.0, 0.0),
    ShotPreset::new("close-up-1", "Close-Up", 1.5, 0.0, 0.0, 0.0),
    ShotPreset::new("close-up-2", "Close-Up (Upper)", 1.6, 0.0, 0.0, 0.05),
    ShotPreset::new("close-up-3", "Close-Up (Left)", 1.75, 0.0, 0.05, 0.03),
    ShotPreset::new("extreme-close-up", "Extreme Close-Up", 2.2, 0.0, 0.0, 0.0),
    ShotPreset::new("dutch-left", "Dutch Angle Left", 1.2, -8.0, 0.0, 0.0),
    ShotPreset::new("dutch-right", "Dutch Angle Right", 1.2, 8.0, 0.0, 0.0),
    ShotPreset::new("off-center-left", "Off-Center Left", 1.3, 0.0, 0.08, 0.0),
    ShotPreset::new("off-center-right", "Off-Center Right", 1.3, 0.0, -0.08, 0.0),
    ShotPreset::new("low-angle", "Low Angle", 1.2, 0.0, 0.0, -0.06),
    ShotPreset::new("high-angle", "High Angle", 1.2, 0.0, 0.0, 0.06),
];

/// Look up a shot preset by key
pub fn shot_preset(id: &str) -> Option<&'static ShotPreset> {
    SHOT_PRESETS.iter().find(|p| p.id == id)
}

/// Convert a static preset into a keyframe animation.
///
/// Only properties that differ from their default get a track, animated
/// from the default at time 0 to the preset value at time 1.
pub fn preset_to_animation(preset: &ShotPreset, _duration: f64) -> ClipAnimation {
    let mut animation = ClipAnimation::new(preset.name);
    for (property, value) in preset.values() {
        let default = property.default_value();
        if value == default {
            continue;
        }
        animation.tracks.push(track(property, &[(0.0, default), (1.0, value)], Easing::EaseInOut));
    }
    animation
}

/// Convert a shot preset by key, or `None` for an unknown key
pub fn legacy_preset_to_animation(preset_id: &str, duration: f64) -> Option<ClipAnimation> {
    shot_preset(preset_id).map(|preset| preset_to_animation(preset, duration))
}

/// Resolve any preset key: canned animations first, then shot presets
pub fn resolve_preset_animation(preset_id: &str, duration: f64) -> Option<ClipAnimation> {
    animation_from_factory(preset_id, duration).or_else(|| legacy_preset_to_animation(preset_id, duration))
}
