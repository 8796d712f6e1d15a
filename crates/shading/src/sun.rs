//! Sun lighting term with the drop-shadow disc.

use glam::{Vec2, Vec3};

use crate::{config::DropShadowCentre, scene::LightingContext, vertex::Fragment};

/// How a material decides whether to paint the drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropShadow {
    Off,
    /// Follows the scene's `show_drop_shadow` flag.
    Flag,
    /// Always on; for materials that predate the flag.
    Always,
}

impl DropShadow {
    pub fn active(self, ctx: &LightingContext) -> bool {
        match self {
            Self::Off => false,
            Self::Flag => ctx.scene.show_drop_shadow(),
            Self::Always => true,
        }
    }
}

/// Lambert term against the fixed sun direction.
pub fn diffuse(normal: Vec3, light_dir: Vec3) -> f32 {
    normal.dot(light_dir).max(0.0)
}

/// Centre of the drop-shadow disc in camera-relative XY.
fn drop_shadow_centre(ctx: &LightingContext) -> Vec2 {
    match ctx.constants.drop_shadow_centre {
        DropShadowCentre::Camera => Vec2::ZERO,
        DropShadowCentre::Target => (ctx.scene.camera_target() - ctx.scene.camera_pos()).truncate(),
    }
}

/// Whether `face_position` lies inside the disc beneath the viewer.
pub fn in_drop_shadow(ctx: &LightingContext, face_position: Vec3) -> bool {
    let horizontal = face_position.truncate() - drop_shadow_centre(ctx);
    face_position.z > 0.0 && horizontal.length() < ctx.constants.drop_shadow_radius
}

/// Sun contribution before local lights are added.
///
/// `amount_in_shadow` comes from the dynamic shadow term (0 when disabled).
pub fn sun_light(
    ctx: &LightingContext,
    fragment: &Fragment,
    drop_shadow: DropShadow,
    amount_in_shadow: f32,
) -> f32 {
    let c = ctx.constants;
    let light_level = ctx.scene.light_level();

    let diffuse = if drop_shadow.active(ctx) && in_drop_shadow(ctx, fragment.face_position) {
        c.drop_shadow_light * light_level
    } else {
        diffuse(fragment.normal, c.light_dir())
    };

    (c.ambient + diffuse * (1.0 - c.ambient))
        * light_level.min(1.0)
        * (1.0 - c.dynamic_shadow_strength * amount_in_shadow)
}
