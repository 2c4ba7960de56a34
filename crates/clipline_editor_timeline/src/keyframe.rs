// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and easing curves.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct KeyframeId(pub String);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyframeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Easing curve applied when arriving at a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Slow start
    EaseIn,
    /// Slow finish
    EaseOut,
    /// Slow start and finish
    EaseInOut,
}

impl Easing {
    /// Map normalized progress in `[0, 1]` to eased progress in `[0, 1]`.
    ///
    /// Input outside the unit range is clamped; NaN maps to 0.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Wire name of the easing
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
        }
    }

    /// All easing curves
    pub fn all() -> &'static [Easing] {
        &[Self::Linear, Self::EaseIn, Self::EaseOut, Self::EaseInOut]
    }
}

/// A keyframe in a track.
///
/// `time` is normalized to the owning clip: 0 is the first frame of the
/// clip and 1 the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Normalized time within the clip
    pub time: f64,
    /// Value at this keyframe
    pub value: f64,
    /// Easing used on the segment that ends at this keyframe
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    /// Create a new linear keyframe
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            easing: Easing::Linear,
        }
    }

    /// Set the arrival easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Replace the generated ID
    pub fn with_id(mut self, id: KeyframeId) -> Self {
        self.id = id;
        self
    }
}

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
