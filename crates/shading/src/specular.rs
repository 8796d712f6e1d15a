//! Specular highlight and grazing-angle rim.

use glam::Vec3;

use crate::{math::reflect, scene::LightingContext, vertex::Fragment};

/// Unit vector from the face toward the camera.
pub fn view_direction(fragment: &Fragment) -> Vec3 {
    (-fragment.face_position).normalize_or_zero()
}

/// Narrow sun highlight, removed where the face is in shadow.
pub fn specular(ctx: &LightingContext, fragment: &Fragment, amount_in_shadow: f32) -> f32 {
    let c = ctx.constants;
    let reflected = reflect(-c.light_dir(), fragment.normal);
    let alignment = reflected.dot(view_direction(fragment)).max(0.0);
    alignment.powf(c.shininess)
        * c.specular_strength
        * ctx.scene.light_level()
        * (1.0 - amount_in_shadow)
}

/// Fresnel-style rim, strongest where the surface turns away from the viewer.
pub fn fresnel_rim(ctx: &LightingContext, fragment: &Fragment) -> f32 {
    let facing = fragment.normal.dot(view_direction(fragment)).max(0.0);
    (1.0 - facing).powi(3) * ctx.constants.reflection_intensity
}
