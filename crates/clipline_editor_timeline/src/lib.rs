// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline model and keyframe animation engine for Clipline Editor.
//!
//! This crate provides the numeric core of the editor:
//! - Keyframes with per-segment easing
//! - Per-property keyframe tracks with binary-search evaluation
//! - Clip animations evaluated into transform values once per frame
//! - Canned animation presets and static shot presets
//! - Smart zoom generation toward a frame region
//! - The timeline clip model
//!
//! ## Architecture
//!
//! Everything here is pure: no I/O, no shared state, no panics on odd
//! input. Keyframe times are normalized to the owning clip (0 to 1), so an
//! animation survives trims and speed changes unchanged.

pub mod animation;
pub mod clip;
pub mod keyframe;
pub mod presets;
pub mod property;
pub mod smart_zoom;
pub mod track;

pub use animation::{evaluate_animation, AnimationId, ClipAnimation};
pub use clip::{clip_color, scene_name, ClipId, Crop, TimelineClip, CLIP_COLORS, MIN_CLIP_DURATION};
pub use keyframe::{lerp, Easing, Keyframe, KeyframeId};
pub use presets::{
    animation_factory_list, animation_from_factory, legacy_preset_to_animation, preset_to_animation,
    resolve_preset_animation, shot_preset, AnimationFactory, FactoryInfo, ShotPreset, ANIMATION_FACTORIES,
    SHOT_PRESETS,
};
pub use property::{AnimatableProperty, AnimationValues};
pub use smart_zoom::{generate_smart_zoom_animation, Region, SmartZoomOptions};
pub use track::{interpolate_property, KeyframeTrack};
