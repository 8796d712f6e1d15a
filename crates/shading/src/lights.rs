//! Local lights: the player's own light and placed lamps.

use glam::Vec3;

use crate::{
    math::{mix, smoothstep},
    scene::LightingContext,
    vertex::Fragment,
};

/// Light list capacity of flat/liquid materials.
pub const BASIC_LAMP_CAPACITY: usize = 32;
/// Light list capacity of terrain, and the most any material reads.
pub const EXTENDED_LAMP_CAPACITY: usize = 64;

/// How a material reads the lamp list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampModel {
    /// Entries past this index are never read.
    pub capacity: usize,
    /// Attenuate lamps behind the surface.
    pub facing: bool,
}

impl LampModel {
    pub const BASIC: Self = Self {
        capacity: BASIC_LAMP_CAPACITY,
        facing: false,
    };

    pub const EXTENDED: Self = Self {
        capacity: EXTENDED_LAMP_CAPACITY,
        facing: true,
    };
}

/// Light carried by the player, centred on the camera. Fades in as night falls.
pub fn player_light(ctx: &LightingContext, distance_to_face: f32) -> f32 {
    let strength = ctx.constants.player_light_strength;
    let proximity = 1.0 - distance_to_face.min(strength) / strength;
    ctx.scene.dark_level() * proximity * proximity
}

/// Brightness of one lamp at `lamp_offset` (lamp position relative to the camera).
pub fn lamp_brightness(
    ctx: &LightingContext,
    model: LampModel,
    lamp_offset: Vec3,
    fragment: &Fragment,
) -> f32 {
    let c = ctx.constants;
    let light_vector = lamp_offset - fragment.face_position;
    let distance = light_vector.length();
    let base = (1.0 - distance / c.lamp_strength).clamp(0.0, 1.0);
    if !model.facing {
        return base;
    }

    let facing = (1.0 + light_vector.normalize_or_zero().dot(fragment.normal)) / 2.0;
    let blend = smoothstep(c.lamp_facing_near, c.lamp_facing_far, distance);
    base * mix(1.0, facing, blend)
}

/// Summed brightness of the first `model.capacity` lamps.
pub fn lamp_light(ctx: &LightingContext, model: LampModel, fragment: &Fragment) -> f32 {
    let camera = ctx.scene.camera_pos();
    ctx.scene
        .lamps()
        .iter()
        .take(model.capacity)
        .map(|&lamp| lamp_brightness(ctx, model, lamp - camera, fragment))
        .sum()
}

/// Combine sun, player and lamp terms, capping the total at 1.
pub fn accumulate(sun: f32, player: f32, lamps: f32) -> f32 {
    ((sun + player).min(1.0) + lamps).min(1.0)
}
