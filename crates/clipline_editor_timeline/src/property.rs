// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animatable clip properties and their evaluated values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A clip property that can carry a keyframe track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AnimatableProperty {
    /// Scale factor
    Zoom,
    /// Rotation in degrees
    Rotate,
    /// Horizontal offset as a fraction of the frame
    PanX,
    /// Vertical offset as a fraction of the frame
    PanY,
    /// Opacity (0 to 1)
    Opacity,
    /// Crop left edge (percent)
    CropX,
    /// Crop top edge (percent)
    CropY,
    /// Crop width (percent)
    CropWidth,
    /// Crop height (percent)
    CropHeight,
}

impl AnimatableProperty {
    /// Value the property takes when it has no track
    pub fn default_value(self) -> f64 {
        match self {
            Self::Zoom | Self::Opacity => 1.0,
            Self::Rotate | Self::PanX | Self::PanY | Self::CropX | Self::CropY => 0.0,
            Self::CropWidth | Self::CropHeight => 100.0,
        }
    }

    /// Wire name of the property
    pub fn name(self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Rotate => "rotate",
            Self::PanX => "panX",
            Self::PanY => "panY",
            Self::Opacity => "opacity",
            Self::CropX => "cropX",
            Self::CropY => "cropY",
            Self::CropWidth => "cropWidth",
            Self::CropHeight => "cropHeight",
        }
    }

    /// All animatable properties
    pub fn all() -> &'static [AnimatableProperty] {
        &[
            Self::Zoom,
            Self::Rotate,
            Self::PanX,
            Self::PanY,
            Self::Opacity,
            Self::CropX,
            Self::CropY,
            Self::CropWidth,
            Self::CropHeight,
        ]
    }
}

/// Transform values for one clip at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationValues {
    /// Scale factor
    pub zoom: f64,
    /// Rotation in degrees
    pub rotate: f64,
    /// Horizontal offset
    pub pan_x: f64,
    /// Vertical offset
    pub pan_y: f64,
    /// Opacity
    pub opacity: f64,
    /// Crop left edge
    pub crop_x: f64,
    /// Crop top edge
    pub crop_y: f64,
    /// Crop width
    pub crop_width: f64,
    /// Crop height
    pub crop_height: f64,
}

impl Default for AnimationValues {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotate: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            opacity: 1.0,
            crop_x: 0.0,
            crop_y: 0.0,
            crop_width: 100.0,
            crop_height: 100.0,
        }
    }
}

impl AnimationValues {
    /// Read one property
    pub fn get(&self, property: AnimatableProperty) -> f64 {
        match property {
            AnimatableProperty::Zoom => self.zoom,
            AnimatableProperty::Rotate => self.rotate,
            AnimatableProperty::PanX => self.pan_x,
            AnimatableProperty::PanY => self.pan_y,
            AnimatableProperty::Opacity => self.opacity,
            AnimatableProperty::CropX => self.crop_x,
            AnimatableProperty::CropY => self.crop_y,
            AnimatableProperty::CropWidth => self.crop_width,
            AnimatableProperty::CropHeight => self.crop_height,
        }
    }

    /// Overwrite one property
    pub fn set(&mut self, property: AnimatableProperty, value: f64) {
        let slot = match property {
            AnimatableProperty::Zoom => &mut self.zoom,
            AnimatableProperty::Rotate => &mut self.rotate,
            AnimatableProperty::PanX => &mut self.pan_x,
            AnimatableProperty::PanY => &mut self.pan_y,
            AnimatableProperty::Opacity => &mut self.opacity,
            AnimatableProperty::CropX => &mut self.crop_x,
            AnimatableProperty::CropY => &mut self.crop_y,
            AnimatableProperty::CropWidth => &mut self.crop_width,
            AnimatableProperty::CropHeight => &mut self.crop_height,
        };
        *slot = value;
    }
}
