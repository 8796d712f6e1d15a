//! Per-frame scene lighting state and the context every term reads.

use glam::Vec3;

use crate::{
    config::{ShadingConstants, DEFAULT_SKY_DARK, DEFAULT_SKY_LIGHT},
    error::ShadingError,
    lights::EXTENDED_LAMP_CAPACITY,
    texture::HeightField,
};

/// Lighting state shared by every draw of a frame.
///
/// Built once per frame through [`SceneLighting::builder`], which enforces
/// `fog_near < fog_far`, `light_level` in `[0, 1]` and the lamp capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLighting {
    camera_pos: Vec3,
    camera_target: Vec3,
    light_level: f32,
    fog_near: f32,
    fog_far: f32,
    fog_color_light: Vec3,
    fog_color_dark: Vec3,
    lamps: Vec<Vec3>,
    has_dynamic_shadows: bool,
    show_drop_shadow: bool,
}

impl SceneLighting {
    pub fn builder() -> SceneLightingBuilder {
        SceneLightingBuilder::default()
    }

    /// Camera position in world space.
    pub fn camera_pos(&self) -> Vec3 {
        self.camera_pos
    }

    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    /// 1 at full day, 0 at full night.
    pub fn light_level(&self) -> f32 {
        self.light_level
    }

    pub fn dark_level(&self) -> f32 {
        1.0 - self.light_level
    }

    pub fn fog_near(&self) -> f32 {
        self.fog_near
    }

    pub fn fog_far(&self) -> f32 {
        self.fog_far
    }

    pub fn fog_color_light(&self) -> Vec3 {
        self.fog_color_light
    }

    pub fn fog_color_dark(&self) -> Vec3 {
        self.fog_color_dark
    }

    /// World-space lamp positions; the length is the light count.
    pub fn lamps(&self) -> &[Vec3] {
        &self.lamps
    }

    pub fn lights_count(&self) -> usize {
        self.lamps.len()
    }

    pub fn has_dynamic_shadows(&self) -> bool {
        self.has_dynamic_shadows
    }

    pub fn show_drop_shadow(&self) -> bool {
        self.show_drop_shadow
    }
}

#[derive(Debug, Clone)]
pub struct SceneLightingBuilder {
    scene: SceneLighting,
}

impl Default for SceneLightingBuilder {
    fn default() -> Self {
        Self {
            scene: SceneLighting {
                camera_pos: Vec3::ZERO,
                camera_target: Vec3::ZERO,
                light_level: 1.0,
                fog_near: 24.0,
                fog_far: 96.0,
                fog_color_light: DEFAULT_SKY_LIGHT,
                fog_color_dark: DEFAULT_SKY_DARK,
                lamps: Vec::new(),
                has_dynamic_shadows: false,
                show_drop_shadow: false,
            },
        }
    }
}

impl SceneLightingBuilder {
    pub fn camera(mut self, position: Vec3, target: Vec3) -> Self {
        self.scene.camera_pos = position;
        self.scene.camera_target = target;
        self
    }

    pub fn light_level(mut self, level: f32) -> Self {
        self.scene.light_level = level;
        self
    }

    pub fn fog(mut self, near: f32, far: f32) -> Self {
        self.scene.fog_near = near;
        self.scene.fog_far = far;
        self
    }

    pub fn fog_colors(mut self, light: Vec3, dark: Vec3) -> Self {
        self.scene.fog_color_light = light;
        self.scene.fog_color_dark = dark;
        self
    }

    /// Set the lamp list. More than [`EXTENDED_LAMP_CAPACITY`] entries fails in `build`.
    pub fn lamps(mut self, lamps: impl IntoIterator<Item = Vec3>) -> Self {
        self.scene.lamps = lamps.into_iter().collect();
        self
    }

    /// Set the lamp list, dropping whatever does not fit.
    pub fn lamps_clamped(mut self, lamps: impl IntoIterator<Item = Vec3>) -> Self {
        let mut lamps: Vec<Vec3> = lamps.into_iter().collect();
        if lamps.len() > EXTENDED_LAMP_CAPACITY {
            log::warn!(
                "Dropping {} lamps beyond the light list capacity of {}",
                lamps.len() - EXTENDED_LAMP_CAPACITY,
                EXTENDED_LAMP_CAPACITY
            );
            lamps.truncate(EXTENDED_LAMP_CAPACITY);
        }
        self.scene.lamps = lamps;
        self
    }

    pub fn dynamic_shadows(mut self, enabled: bool) -> Self {
        self.scene.has_dynamic_shadows = enabled;
        self
    }

    pub fn drop_shadow(mut self, enabled: bool) -> Self {
        self.scene.show_drop_shadow = enabled;
        self
    }

    pub fn build(self) -> Result<SceneLighting, ShadingError> {
        let scene = self.scene;
        // Rejects NaN too: every comparison with it is false.
        let ordered = scene.fog_near < scene.fog_far;
        if !ordered || !scene.fog_near.is_finite() || !scene.fog_far.is_finite() {
            return Err(ShadingError::InvalidFogRange {
                near: scene.fog_near,
                far: scene.fog_far,
            });
        }
        if !(0.0..=1.0).contains(&scene.light_level) {
            return Err(ShadingError::LightLevelOutOfRange(scene.light_level));
        }
        if scene.lamps.len() > EXTENDED_LAMP_CAPACITY {
            return Err(ShadingError::TooManyLamps {
                count: scene.lamps.len(),
                capacity: EXTENDED_LAMP_CAPACITY,
            });
        }
        log::debug!(
            "Scene lighting: light {:.2}, fog {}..{}, {} lamps, dynamic shadows {}",
            scene.light_level,
            scene.fog_near,
            scene.fog_far,
            scene.lamps.len(),
            scene.has_dynamic_shadows
        );
        Ok(scene)
    }
}

/// Everything a lighting term may read: the frame's scene state, the tuning
/// constants and, when dynamic shadows are baked, the height field.
#[derive(Debug, Clone, Copy)]
pub struct LightingContext<'a> {
    pub scene: &'a SceneLighting,
    pub constants: &'a ShadingConstants,
    height_field: Option<&'a HeightField>,
}

impl<'a> LightingContext<'a> {
    pub fn new(scene: &'a SceneLighting, constants: &'a ShadingConstants) -> Self {
        Self {
            scene,
            constants,
            height_field: None,
        }
    }

    /// Bind the baked height field; its size must match the shadow settings.
    pub fn with_height_field(mut self, field: &'a HeightField) -> Result<Self, ShadingError> {
        let expected = self.constants.shadow_extent()?;
        if field.size() != expected {
            return Err(ShadingError::HeightFieldSize {
                expected,
                actual: field.size(),
            });
        }
        self.height_field = Some(field);
        Ok(self)
    }

    pub fn height_field(&self) -> Option<&'a HeightField> {
        self.height_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let scene = SceneLighting::builder().build().unwrap();
        assert_eq!(scene.light_level(), 1.0);
        assert_eq!(scene.dark_level(), 0.0);
        assert_eq!(scene.lights_count(), 0);
    }

    #[test]
    fn inverted_fog_is_rejected() {
        let err = SceneLighting::builder().fog(20.0, 20.0).build().unwrap_err();
        assert!(matches!(err, ShadingError::InvalidFogRange { .. }));
        let err = SceneLighting::builder().fog(f32::NAN, 20.0).build().unwrap_err();
        assert!(matches!(err, ShadingError::InvalidFogRange { .. }));
        let err = SceneLighting::builder().fog(0.0, f32::INFINITY).build().unwrap_err();
        assert!(matches!(err, ShadingError::InvalidFogRange { .. }));
        let err = SceneLighting::builder().fog(f32::NEG_INFINITY, 20.0).build().unwrap_err();
        assert!(matches!(err, ShadingError::InvalidFogRange { .. }));
    }

    #[test]
    fn light_level_out_of_range_is_rejected() {
        let err = SceneLighting::builder().light_level(1.5).build().unwrap_err();
        assert!(matches!(err, ShadingError::LightLevelOutOfRange(_)));
    }

    #[test]
    fn lamp_overflow_is_rejected_or_clamped() {
        let many = (0..EXTENDED_LAMP_CAPACITY + 5).map(|i| Vec3::splat(i as f32));
        let err = SceneLighting::builder().lamps(many.clone()).build().unwrap_err();
        assert!(matches!(
            err,
            ShadingError::TooManyLamps {
                count: 69,
                capacity: EXTENDED_LAMP_CAPACITY
            }
        ));

        let scene = SceneLighting::builder().lamps_clamped(many).build().unwrap();
        assert_eq!(scene.lights_count(), EXTENDED_LAMP_CAPACITY);
        assert_eq!(scene.lamps()[0], Vec3::ZERO);
    }

    #[test]
    fn height_field_size_is_checked() {
        let scene = SceneLighting::builder().build().unwrap();
        let constants = ShadingConstants::default();
        let small = HeightField::from_encoded(8, vec![0.0; 64]).unwrap();
        let err = LightingContext::new(&scene, &constants)
            .with_height_field(&small)
            .unwrap_err();
        assert!(matches!(
            err,
            ShadingError::HeightFieldSize {
                expected: 512,
                actual: 8
            }
        ));
    }

    #[test]
    fn overflowing_shadow_settings_are_rejected_when_binding() {
        let scene = SceneLighting::builder().build().unwrap();
        let constants = ShadingConstants {
            area_size: u32::MAX,
            max_areas_in_shadow_per_axis: 2,
            ..Default::default()
        };
        let field = HeightField::from_encoded(8, vec![0.0; 64]).unwrap();
        let err = LightingContext::new(&scene, &constants)
            .with_height_field(&field)
            .unwrap_err();
        assert!(matches!(err, ShadingError::ShadowExtent { .. }));
    }
}
