//! Dynamic shadows from the baked height field.
//!
//! The field covers `max_areas_in_shadow_per_axis` areas per axis around the
//! camera and is addressed toroidally, so only the camera's position within
//! its own area is needed to line the field up with the fragment.

use glam::Vec2;

use crate::{
    math::smoothstep, scene::LightingContext, texture::HEIGHT_ENCODING_SCALE, vertex::Fragment,
};

/// Coordinate for `fragment` in a field `extent` texels wide, wrapped into `[0, 1)`.
pub fn shadow_uv(ctx: &LightingContext, fragment: &Fragment, extent: u32) -> Vec2 {
    let c = ctx.constants;
    let area_size = c.area_size as f32;
    let camera_in_area = ctx.scene.camera_pos().truncate().rem_euclid(Vec2::splat(area_size));

    let sample = fragment.face_position.truncate()
        + fragment.normal.truncate() * c.shadow_normal_bias
        + camera_in_area;

    (sample / extent as f32).rem_euclid(Vec2::ONE)
}

/// The fragment's own height in the field's encoding.
pub fn encoded_height(ctx: &LightingContext, fragment: &Fragment) -> f32 {
    (ctx.scene.camera_pos().z + fragment.face_position.z) / HEIGHT_ENCODING_SCALE
}

/// Occlusion in `[0, 1]`: 1 when the column's baked height lies above the
/// fragment, blending over `shadow_fade` around the edge.
///
/// Exactly 0 without sampling when the scene has dynamic shadows off or no
/// field is bound.
pub fn amount_in_shadow(ctx: &LightingContext, fragment: &Fragment) -> f32 {
    if !ctx.scene.has_dynamic_shadows() {
        return 0.0;
    }
    let Some(field) = ctx.height_field() else {
        return 0.0;
    };

    let sampled = field.sample(shadow_uv(ctx, fragment, field.size()));
    let height = encoded_height(ctx, fragment);
    let fade = ctx.constants.shadow_fade;
    1.0 - smoothstep(height - fade, height + fade, sampled)
}
