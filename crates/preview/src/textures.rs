//! Procedural textures for the preview materials.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};
use rand::prelude::*;
use shading::{RgbaTexture, ShadingError};

fn to_rgba(color: Vec3, alpha: f32) -> Rgba<u8> {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    Rgba([
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    ])
}

pub struct TextureGenerator {
    perlin: Perlin,
    rng: StdRng,
}

impl TextureGenerator {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            perlin: Perlin::new(rng.gen()),
            rng,
        }
    }

    /// Tileable fractal noise in `[0, 1]` over the unit square.
    fn fbm(&self, u: f64, v: f64, scale: f64, octaves: u32) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;
        let mut frequency = 1.0;
        for _ in 0..octaves {
            // Sample on a torus so the texture repeats without seams.
            let (su, cu) = (u * std::f64::consts::TAU).sin_cos();
            let (sv, cv) = (v * std::f64::consts::TAU).sin_cos();
            let r = scale * frequency / std::f64::consts::TAU;
            value += self.perlin.get([su * r, cu * r, sv * r, cv * r]) * amplitude;
            max_value += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        ((value / max_value + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Grass and dirt blocks with speckles.
    pub fn terrain(&mut self, size: u32) -> RgbaImage {
        let grass = Vec3::new(0.36, 0.55, 0.24);
        let dirt = Vec3::new(0.47, 0.36, 0.24);
        let mut img = RgbaImage::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let (u, v) = (x as f64 / size as f64, y as f64 / size as f64);
                let patch = self.fbm(u, v, 3.0, 3) as f32;
                let speckle: f32 = self.rng.gen_range(0.85..1.1);
                let color = dirt.lerp(grass, (patch * 1.6 - 0.3).clamp(0.0, 1.0)) * speckle;
                img.put_pixel(x, y, to_rgba(color, 1.0));
            }
        }
        img
    }

    /// Water surface with soft ripples.
    pub fn water(&self, size: u32) -> RgbaImage {
        let deep = Vec3::new(0.12, 0.28, 0.52);
        let light = Vec3::new(0.25, 0.45, 0.7);
        RgbaImage::from_fn(size, size, |x, y| {
            let (u, v) = (x as f64 / size as f64, y as f64 / size as f64);
            let ripple = self.fbm(u, v, 6.0, 2) as f32;
            to_rgba(deep.lerp(light, ripple), 1.0)
        })
    }

    /// Cloud layer for the sky backdrop; alpha carries the cloud cover.
    pub fn clouds(&self, size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let (u, v) = (x as f64 / size as f64, y as f64 / size as f64);
            let cover = self.fbm(u, v, 4.0, 4) as f32;
            to_rgba(Vec3::ONE, ((cover - 0.5) * 2.5).clamp(0.0, 0.8))
        })
    }
}

/// Round glow for lamp sprites.
pub fn lamp_glow(size: u32) -> RgbaImage {
    let warm = Vec3::new(1.0, 0.85, 0.5);
    RgbaImage::from_fn(size, size, |x, y| {
        let p = (Vec2::new(x as f32, y as f32) + 0.5) / size as f32 * 2.0 - Vec2::ONE;
        let falloff = (1.0 - p.length()).clamp(0.0, 1.0);
        to_rgba(warm, falloff * falloff)
    })
}

/// Plus-shaped crosshair on a transparent background.
pub fn crosshair(size: u32) -> RgbaImage {
    let centre = size / 2;
    RgbaImage::from_fn(size, size, |x, y| {
        let on = x == centre || y == centre;
        to_rgba(Vec3::ONE, if on { 0.9 } else { 0.0 })
    })
}

/// Every texture the preview samples.
pub struct PreviewTextures {
    pub terrain: RgbaTexture,
    pub water: RgbaTexture,
    pub clouds: RgbaTexture,
    pub lamp: RgbaTexture,
    pub crosshair: RgbaTexture,
}

impl PreviewTextures {
    pub fn generate(seed: u64, terrain: Option<RgbaTexture>) -> Result<Self, ShadingError> {
        let mut generator = TextureGenerator::new(seed);
        let terrain = match terrain {
            Some(texture) => texture,
            None => RgbaTexture::from_image(&generator.terrain(16))?,
        };
        Ok(Self {
            terrain,
            water: RgbaTexture::from_image(&generator.water(32))?,
            clouds: RgbaTexture::from_image(&generator.clouds(128))?
                .with_filter(shading::FilterMode::Linear),
            lamp: RgbaTexture::from_image(&lamp_glow(32))?.with_filter(shading::FilterMode::Linear),
            crosshair: RgbaTexture::from_image(&crosshair(15))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_seeded() {
        let a = TextureGenerator::new(4).terrain(8);
        let b = TextureGenerator::new(4).terrain(8);
        assert_eq!(a, b);
    }

    #[test]
    fn glow_is_opaque_in_the_middle_and_clear_at_corners() {
        let img = lamp_glow(32);
        assert!(img.get_pixel(16, 16)[3] > 200);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn crosshair_is_transparent_off_axis() {
        let img = crosshair(15);
        assert!(img.get_pixel(7, 2)[3] > 0);
        assert_eq!(img.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn all_textures_build() {
        let t = PreviewTextures::generate(1, None).unwrap();
        assert_eq!(t.terrain.dimensions(), (16, 16));
        assert_eq!(t.clouds.dimensions(), (128, 128));
    }
}
