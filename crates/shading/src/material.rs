//! Material variants and fragment shading by term composition.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{
    fog,
    lights::{self, LampModel},
    scene::LightingContext,
    shadow, specular,
    sun::{self, DropShadow},
    texture::RgbaTexture,
    vertex::{Fragment, VertexStage},
};

/// Which lighting terms a material evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub sun: bool,
    pub drop_shadow: DropShadow,
    pub dynamic_shadow: bool,
    pub player_light: bool,
    pub lamps: Option<LampModel>,
    pub specular: bool,
    pub fresnel: bool,
    pub fog: bool,
    /// Multiply the texture colour by `sky_darkening`.
    pub darken: bool,
    /// Fade alpha in with eye depth (billboards).
    pub fade: bool,
}

impl Features {
    /// Texture colour passes straight through.
    pub const UNLIT: Self = Self {
        sun: false,
        drop_shadow: DropShadow::Off,
        dynamic_shadow: false,
        player_light: false,
        lamps: None,
        specular: false,
        fresnel: false,
        fog: false,
        darken: false,
        fade: false,
    };

    /// Whether any light term runs. Unlit materials keep the texture colour as is.
    pub fn is_lit(&self) -> bool {
        self.sun || self.player_light || self.lamps.is_some()
    }
}

/// Draw variants of the voxel renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Solid voxel blocks.
    Terrain,
    /// Flat and liquid surfaces.
    Flat,
    /// Sky backdrop.
    Sky,
    /// Camera-facing sprites.
    Billboard,
    /// Screen-space overlays.
    Ui,
}

impl Material {
    pub fn features(self) -> Features {
        match self {
            Self::Terrain => Features {
                sun: true,
                drop_shadow: DropShadow::Flag,
                dynamic_shadow: true,
                player_light: true,
                lamps: Some(LampModel::EXTENDED),
                specular: true,
                fresnel: true,
                fog: true,
                ..Features::UNLIT
            },
            Self::Flat => Features {
                sun: true,
                drop_shadow: DropShadow::Always,
                player_light: true,
                lamps: Some(LampModel::BASIC),
                specular: true,
                fresnel: true,
                fog: true,
                ..Features::UNLIT
            },
            Self::Sky => Features {
                darken: true,
                ..Features::UNLIT
            },
            Self::Billboard => Features {
                fade: true,
                ..Features::UNLIT
            },
            Self::Ui => Features::UNLIT,
        }
    }

    pub fn vertex_stage(self) -> VertexStage {
        match self {
            Self::Terrain | Self::Flat => VertexStage::CameraRelative,
            Self::Billboard => VertexStage::Billboard,
            Self::Sky | Self::Ui => VertexStage::Passthrough,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Terrain => "terrain",
            Self::Flat => "flat",
            Self::Sky => "sky",
            Self::Billboard => "billboard",
            Self::Ui => "ui",
        }
    }

    /// Sample `texture` at the fragment and shade it.
    pub fn shade(self, ctx: &LightingContext, texture: &RgbaTexture, fragment: &Fragment) -> Vec4 {
        shade(&self.features(), ctx, texture.sample(fragment.tex_coords), fragment)
    }
}

/// Every intermediate term of one lit fragment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightingTerms {
    pub amount_in_shadow: f32,
    pub sun: f32,
    pub player: f32,
    pub lamps: f32,
    /// Sun, player and lamps combined and capped at 1.
    pub lighting: f32,
    pub specular: f32,
    pub rim: f32,
    /// Weight of the lit colour against fog; 1 when fog is off.
    pub fog_factor: f32,
}

/// Evaluate the terms `features` enables; disabled terms are 0.
pub fn evaluate_terms(
    features: &Features,
    ctx: &LightingContext,
    fragment: &Fragment,
) -> LightingTerms {
    let distance = fragment.distance();

    let amount_in_shadow = if features.dynamic_shadow {
        shadow::amount_in_shadow(ctx, fragment)
    } else {
        0.0
    };
    let sun = if features.sun {
        sun::sun_light(ctx, fragment, features.drop_shadow, amount_in_shadow)
    } else {
        0.0
    };
    let player = if features.player_light {
        lights::player_light(ctx, distance)
    } else {
        0.0
    };
    let lamps = features
        .lamps
        .map_or(0.0, |model| lights::lamp_light(ctx, model, fragment));

    let specular = if features.specular {
        specular::specular(ctx, fragment, amount_in_shadow)
    } else {
        0.0
    };
    let rim = if features.fresnel {
        specular::fresnel_rim(ctx, fragment)
    } else {
        0.0
    };
    let fog_factor = if features.fog {
        fog::fog_factor(ctx.scene.fog_near(), ctx.scene.fog_far(), distance)
    } else {
        1.0
    };

    LightingTerms {
        amount_in_shadow,
        sun,
        player,
        lamps,
        lighting: lights::accumulate(sun, player, lamps),
        specular,
        rim,
        fog_factor,
    }
}

/// Final RGBA colour of a fragment with surface colour `albedo`.
pub fn shade(features: &Features, ctx: &LightingContext, albedo: Vec4, fragment: &Fragment) -> Vec4 {
    let c = ctx.constants;

    let mut rgb = albedo.truncate();
    if features.darken {
        rgb *= c.sky_darkening;
    }

    if features.is_lit() {
        let terms = evaluate_terms(features, ctx, fragment);
        let lit = rgb * terms.lighting + Vec3::splat(terms.specular + terms.rim);
        rgb = if features.fog {
            fog::apply_fog(ctx.scene, lit, terms.fog_factor)
        } else {
            lit
        };
    }

    let alpha = if features.fade {
        (-fragment.face_position.z * c.billboard_fade)
            .clamp(0.0, 1.0)
            .min(albedo.w)
    } else {
        albedo.w
    };

    rgb.extend(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ShadingConstants, scene::SceneLighting};
    use glam::Vec2;

    fn scene() -> SceneLighting {
        SceneLighting::builder()
            .camera(Vec3::new(40.0, 40.0, 20.0), Vec3::new(40.0, 41.0, 20.0))
            .light_level(0.3)
            .fog(2.0, 20.0)
            .lamps([Vec3::new(41.0, 40.0, 22.0), Vec3::new(38.0, 43.0, 21.0)])
            .drop_shadow(true)
            .build()
            .unwrap()
    }

    fn fragments() -> Vec<Fragment> {
        (0..64)
            .map(|i| {
                let t = i as f32;
                Fragment::new(
                    Vec2::new(t / 64.0, 0.5),
                    Vec3::new((t * 0.3).sin(), (t * 0.7).cos(), -1.0),
                    Vec3::new((t * 0.5).cos() * 3.0, (t * 0.2).sin() * 3.0, 0.5 + t * 0.3),
                )
            })
            .collect()
    }

    #[test]
    fn feature_table_matches_materials() {
        let terrain = Material::Terrain.features();
        assert_eq!(terrain.lamps, Some(LampModel::EXTENDED));
        assert!(terrain.dynamic_shadow);
        assert_eq!(terrain.drop_shadow, DropShadow::Flag);

        let flat = Material::Flat.features();
        assert_eq!(flat.lamps, Some(LampModel::BASIC));
        assert!(!flat.dynamic_shadow);
        assert_eq!(flat.drop_shadow, DropShadow::Always);

        for m in [Material::Sky, Material::Billboard, Material::Ui] {
            assert!(!m.features().is_lit(), "{}", m.label());
        }
        assert_eq!(Material::Terrain.vertex_stage(), VertexStage::CameraRelative);
        assert_eq!(Material::Billboard.vertex_stage(), VertexStage::Billboard);
        assert_eq!(Material::Sky.vertex_stage(), VertexStage::Passthrough);
    }

    #[test]
    fn shading_is_deterministic_across_threads() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let albedo = Vec4::new(0.6, 0.5, 0.4, 1.0);
        let frags = fragments();
        let features = Material::Terrain.features();

        let sequential: Vec<Vec4> = frags
            .iter()
            .map(|f| shade(&features, &ctx, albedo, f))
            .collect();
        let reversed: Vec<Vec4> = frags
            .iter()
            .rev()
            .map(|f| shade(&features, &ctx, albedo, f))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(sequential, reversed);

        let parallel: Vec<Vec4> = std::thread::scope(|scope| {
            let handles: Vec<_> = frags
                .chunks(16)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|f| shade(&features, &ctx, albedo, f))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn light_is_capped_before_highlights() {
        let s = SceneLighting::builder()
            .light_level(0.0)
            .lamps(vec![Vec3::ZERO; 40])
            .build()
            .unwrap();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        for material in [Material::Terrain, Material::Flat] {
            for f in fragments() {
                let terms = evaluate_terms(&material.features(), &ctx, &f);
                assert!(terms.lighting <= 1.0);
                assert!(terms.lighting >= 0.0);
            }
        }
    }

    #[test]
    fn lit_colour_composes_terms() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let albedo = Vec4::new(0.8, 0.6, 0.2, 0.9);
        let features = Material::Flat.features();
        for f in fragments() {
            let t = evaluate_terms(&features, &ctx, &f);
            let lit = albedo.truncate() * t.lighting + Vec3::splat(t.specular + t.rim);
            let expected = fog::fog_color(&s).lerp(lit, t.fog_factor);
            let got = shade(&features, &ctx, albedo, &f);
            assert!((got.truncate() - expected).length() < 1e-6);
            assert_eq!(got.w, 0.9);
        }
    }

    #[test]
    fn scenario_fog_factor() {
        let s = SceneLighting::builder()
            .light_level(1.0)
            .fog(2.0, 20.0)
            .dynamic_shadows(false)
            .build()
            .unwrap();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let f = Fragment::new(Vec2::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 5.0));
        let t = evaluate_terms(&Material::Terrain.features(), &ctx, &f);
        assert!((t.fog_factor - 0.8333).abs() < 1e-3);
        assert_eq!(t.amount_in_shadow, 0.0);
        assert_eq!(t.lamps, 0.0);
    }

    #[test]
    fn sky_is_darkened_texture_colour() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let f = Fragment::new(Vec2::ZERO, Vec3::ZERO, Vec3::ZERO);
        let got = shade(&Material::Sky.features(), &ctx, Vec4::new(1.0, 0.5, 0.25, 1.0), &f);
        assert!((got - Vec4::new(0.8, 0.4, 0.2, 1.0)).length() < 1e-6);
    }

    #[test]
    fn ui_passes_through() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let f = Fragment::new(Vec2::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0));
        let colour = Vec4::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(shade(&Material::Ui.features(), &ctx, colour, &f), colour);
    }

    #[test]
    fn billboard_fades_in_with_depth() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let colour = Vec4::new(1.0, 1.0, 0.0, 0.7);
        let features = Material::Billboard.features();
        let at = |z: f32| {
            let f = Fragment::new(Vec2::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, z));
            shade(&features, &ctx, colour, &f)
        };

        assert_eq!(at(0.0).w, 0.0);
        assert!((at(-4.0).w - 0.2).abs() < 1e-6);
        assert_eq!(at(-40.0).w, 0.7);
        assert_eq!(at(-4.0).truncate(), colour.truncate());
    }

    #[test]
    fn textured_shading_samples_at_tex_coords() {
        let s = scene();
        let c = ShadingConstants::default();
        let ctx = LightingContext::new(&s, &c);
        let texture = RgbaTexture::new(2, 1, &[[255, 0, 0, 255], [0, 0, 255, 128]]).unwrap();
        let f = Fragment::new(Vec2::new(0.75, 0.5), Vec3::ZERO, Vec3::ZERO);
        let got = Material::Ui.shade(&ctx, &texture, &f);
        assert!((got - Vec4::new(0.0, 0.0, 1.0, 128.0 / 255.0)).length() < 1e-6);
    }
}
