//! Tuning constants for every lighting term.
//!
//! `ShadingConstants::default()` holds the canonical values. Hosts may override
//! any subset from RON; missing fields keep their defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ShadingError;

/// Daytime sky and fog tint (beige).
pub const DEFAULT_SKY_LIGHT: Vec3 = Vec3::new(0.83, 0.69, 0.51);
/// Night sky and fog tint (dark blue).
pub const DEFAULT_SKY_DARK: Vec3 = Vec3::new(0.0, 0.32, 0.67);

/// Where the drop-shadow disc is centred, in camera-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropShadowCentre {
    /// Directly below the camera (first-person hosts).
    #[default]
    Camera,
    /// Below `camera_target` (third-person hosts where the target is the player).
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConstants {
    /// Direction toward the sun, normalized on use.
    pub light_direction: Vec3,
    /// Light every lit surface receives regardless of orientation.
    pub ambient: f32,

    pub drop_shadow_radius: f32,
    /// Diffuse value painted inside the drop-shadow disc (scaled by light level).
    pub drop_shadow_light: f32,
    pub drop_shadow_centre: DropShadowCentre,

    /// How much full occlusion darkens the sun term.
    pub dynamic_shadow_strength: f32,
    /// Half-width of the soft band around the occlusion edge, in encoded height units.
    pub shadow_fade: f32,
    /// Offset along the normal's XY before sampling, so faces don't shadow themselves.
    pub shadow_normal_bias: f32,
    /// Side of one area in world units.
    pub area_size: u32,
    pub max_areas_in_shadow_per_axis: u32,

    /// Radius of the player light.
    pub player_light_strength: f32,
    /// Radius of a lamp.
    pub lamp_strength: f32,
    /// Distance at which lamp facing starts to matter.
    pub lamp_facing_near: f32,
    /// Distance beyond which lamp facing fully applies.
    pub lamp_facing_far: f32,

    pub specular_strength: f32,
    pub shininess: f32,
    pub reflection_intensity: f32,

    /// Colour multiplier for the sky backdrop.
    pub sky_darkening: f32,
    /// Billboard alpha gained per unit of eye depth.
    pub billboard_fade: f32,
    pub sky_color_light: Vec3,
    pub sky_color_dark: Vec3,
}

impl Default for ShadingConstants {
    fn default() -> Self {
        Self {
            light_direction: Vec3::new(0.2, 0.8, -1.0),
            ambient: 0.4,
            drop_shadow_radius: 0.4,
            drop_shadow_light: 0.2,
            drop_shadow_centre: DropShadowCentre::Camera,
            dynamic_shadow_strength: 0.5,
            shadow_fade: 0.005,
            shadow_normal_bias: 0.1,
            area_size: 16,
            max_areas_in_shadow_per_axis: 32,
            player_light_strength: 15.0,
            lamp_strength: 6.0,
            lamp_facing_near: 0.5,
            lamp_facing_far: 1.5,
            specular_strength: 0.5,
            shininess: 32.0,
            reflection_intensity: 0.1,
            sky_darkening: 0.8,
            billboard_fade: 0.05,
            sky_color_light: DEFAULT_SKY_LIGHT,
            sky_color_dark: DEFAULT_SKY_DARK,
        }
    }
}

impl ShadingConstants {
    /// Parse constants from RON. Fields left out keep their default values.
    pub fn from_ron_str(source: &str) -> Result<Self, ShadingError> {
        Ok(ron::from_str(source)?)
    }

    /// Unit vector toward the sun.
    pub fn light_dir(&self) -> Vec3 {
        self.light_direction.normalize_or_zero()
    }

    /// Side of the height field texture in texels (one texel per world column).
    ///
    /// Fails when the settings give an empty field or one too large to address
    /// with signed column offsets.
    pub fn shadow_extent(&self) -> Result<u32, ShadingError> {
        self.area_size
            .checked_mul(self.max_areas_in_shadow_per_axis)
            .filter(|&extent| extent > 0 && i32::try_from(extent).is_ok())
            .ok_or(ShadingError::ShadowExtent {
                area_size: self.area_size,
                areas: self.max_areas_in_shadow_per_axis,
            })
    }
}
