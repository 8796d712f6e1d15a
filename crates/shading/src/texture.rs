//! Surface sampler: albedo textures and the encoded height field.
//!
//! Both textures use repeat addressing and GPU texel-centre conventions, so a
//! coordinate of `(i + 0.5) / width` lands exactly on texel `i`.

use std::{
    ops::{Add, Mul},
    path::Path,
};

use glam::{Vec2, Vec4};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::ShadingError;

/// Heights are stored as `height / HEIGHT_ENCODING_SCALE` in the red channel.
pub const HEIGHT_ENCODING_SCALE: f32 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

/// User-facing dynamic shadow setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowQuality {
    None,
    /// Nearest filtering: blocky, voxel-aligned edges.
    Hard,
    /// Linear filtering: edges blend across neighbouring columns.
    #[default]
    Soft,
}

impl ShadowQuality {
    pub fn enabled(self) -> bool {
        self != Self::None
    }

    /// Filter the height field should use, or `None` when shadows are off.
    pub fn filter_mode(self) -> Option<FilterMode> {
        match self {
            Self::None => None,
            Self::Hard => Some(FilterMode::Nearest),
            Self::Soft => Some(FilterMode::Linear),
        }
    }
}

/// Filtered lookup with repeat addressing over a `width` x `height` grid.
fn sample_wrapped<T>(
    width: u32,
    height: u32,
    filter: FilterMode,
    uv: Vec2,
    fetch: impl Fn(usize) -> T,
) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let (w, h) = (width as i64, height as i64);
    let index = |x: i64, y: i64| (x.rem_euclid(w) + y.rem_euclid(h) * w) as usize;

    match filter {
        FilterMode::Nearest => {
            let x = (uv.x * width as f32).floor() as i64;
            let y = (uv.y * height as f32).floor() as i64;
            fetch(index(x, y))
        }
        FilterMode::Linear => {
            let px = uv.x * width as f32 - 0.5;
            let py = uv.y * height as f32 - 0.5;
            let (x0, y0) = (px.floor(), py.floor());
            let (fx, fy) = (px - x0, py - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);

            let top = fetch(index(x0, y0)) * (1.0 - fx) + fetch(index(x0 + 1, y0)) * fx;
            let bottom = fetch(index(x0, y0 + 1)) * (1.0 - fx) + fetch(index(x0 + 1, y0 + 1)) * fx;
            top * (1.0 - fy) + bottom * fy
        }
    }
}

/// Texels in a `width` x `height` texture; `None` for an empty or unaddressable size.
fn texel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&count| count > 0)
}

/// RGBA albedo texture with normalized texels.
#[derive(Debug, Clone)]
pub struct RgbaTexture {
    width: u32,
    height: u32,
    filter: FilterMode,
    texels: Vec<Vec4>,
}

impl RgbaTexture {
    /// Build from 8-bit RGBA texels in row-major order.
    pub fn new(width: u32, height: u32, texels: &[[u8; 4]]) -> Result<Self, ShadingError> {
        if texel_count(width, height) != Some(texels.len()) {
            return Err(ShadingError::TextureSize {
                width,
                height,
                len: texels.len(),
            });
        }
        let texels = texels
            .iter()
            .map(|t| Vec4::new(t[0] as f32, t[1] as f32, t[2] as f32, t[3] as f32) / 255.0)
            .collect();
        Ok(Self {
            width,
            height,
            filter: FilterMode::Nearest,
            texels,
        })
    }

    /// Build from a decoded image.
    pub fn from_image(image: &RgbaImage) -> Result<Self, ShadingError> {
        let texels: Vec<[u8; 4]> = image.pixels().map(|p| p.0).collect();
        Self::new(image.width(), image.height(), &texels)
    }

    /// Load and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShadingError> {
        let image = image::open(path.as_ref())?.to_rgba8();
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Self::from_image(&image)
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Albedo at `uv`.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        sample_wrapped(self.width, self.height, self.filter, uv, |i| self.texels[i])
    }
}

/// Square single-channel texture of encoded heights (`height / 256`).
///
/// Texel `(i, j)` holds the column `i` units east and `j` units north of the
/// origin of the camera's area, wrapped toroidally over the field.
#[derive(Debug, Clone)]
pub struct HeightField {
    size: u32,
    filter: FilterMode,
    values: Vec<f32>,
}

impl HeightField {
    /// Build from raw column heights, encoding each as `height / 256`.
    pub fn from_heights(size: u32, heights: &[u8]) -> Result<Self, ShadingError> {
        let values = heights
            .iter()
            .map(|&h| h as f32 / HEIGHT_ENCODING_SCALE)
            .collect();
        Self::from_encoded(size, values)
    }

    /// Build from values that are already encoded.
    pub fn from_encoded(size: u32, values: Vec<f32>) -> Result<Self, ShadingError> {
        if texel_count(size, size) != Some(values.len()) {
            return Err(ShadingError::TextureSize {
                width: size,
                height: size,
                len: values.len(),
            });
        }
        Ok(Self {
            size,
            filter: FilterMode::Linear,
            values,
        })
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Encoded height at `uv` (the red channel).
    pub fn sample(&self, uv: Vec2) -> f32 {
        sample_wrapped(self.size, self.size, self.filter, uv, |i| self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> RgbaTexture {
        RgbaTexture::new(
            2,
            2,
            &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 0]],
        )
        .unwrap()
    }

    #[test]
    fn nearest_hits_texel_centres() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.25, 0.25)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.75, 0.25)), Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.25, 0.75)), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn nearest_repeats_outside_unit_square() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(1.25, -0.75)), tex.sample(Vec2::new(0.25, 0.25)));
    }

    #[test]
    fn linear_blends_between_texels() {
        let tex = checker().with_filter(FilterMode::Linear);
        // Halfway between the two top texel centres.
        let c = tex.sample(Vec2::new(0.5, 0.25));
        assert!((c - Vec4::new(0.5, 0.5, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn linear_wraps_at_the_edge() {
        let tex = checker().with_filter(FilterMode::Linear);
        // u = 0 sits halfway between texel 1 (wrapped) and texel 0.
        let c = tex.sample(Vec2::new(0.0, 0.25));
        assert!((c - Vec4::new(0.5, 0.5, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn texture_rejects_mismatched_len() {
        let err = RgbaTexture::new(2, 2, &[[0; 4]; 3]).unwrap_err();
        assert!(matches!(err, ShadingError::TextureSize { len: 3, .. }));
    }

    #[test]
    fn oversized_textures_are_size_errors() {
        let err = RgbaTexture::new(65536, 65536, &[]).unwrap_err();
        assert!(matches!(
            err,
            ShadingError::TextureSize {
                width: 65536,
                height: 65536,
                len: 0
            }
        ));
        let err = RgbaTexture::new(u32::MAX, u32::MAX, &[[0; 4]]).unwrap_err();
        assert!(matches!(err, ShadingError::TextureSize { len: 1, .. }));
        let err = HeightField::from_encoded(65536, vec![]).unwrap_err();
        assert!(matches!(err, ShadingError::TextureSize { width: 65536, .. }));
        assert!(HeightField::from_encoded(0, vec![]).is_err());
    }

    #[test]
    fn from_image_matches_pixels() {
        let img = RgbaImage::from_pixel(4, 2, image::Rgba([51, 102, 153, 255]));
        let tex = RgbaTexture::from_image(&img).unwrap();
        assert_eq!(tex.dimensions(), (4, 2));
        let c = tex.sample(Vec2::new(0.9, 0.9));
        assert!((c - Vec4::new(0.2, 0.4, 0.6, 1.0)).length() < 1e-5);
    }

    #[test]
    fn missing_texture_file_is_an_image_error() {
        let err = RgbaTexture::open("does/not/exist.png").unwrap_err();
        assert!(matches!(err, ShadingError::Image(_)));
    }

    #[test]
    fn height_field_encodes_by_256() {
        let field = HeightField::from_heights(2, &[64, 64, 64, 64]).unwrap();
        assert!((field.sample(Vec2::new(0.3, 0.6)) - 0.25).abs() < 1e-6);
        assert_eq!(field.filter(), FilterMode::Linear);
        let hard = field.with_filter(FilterMode::Nearest);
        assert_eq!(hard.filter(), FilterMode::Nearest);
        assert_eq!(hard.sample(Vec2::new(0.3, 0.6)), 0.25);
    }

    #[test]
    fn hard_shadows_use_nearest_filtering() {
        assert_eq!(ShadowQuality::Hard.filter_mode(), Some(FilterMode::Nearest));
        assert_eq!(ShadowQuality::Soft.filter_mode(), Some(FilterMode::Linear));
        assert!(!ShadowQuality::None.enabled());
    }
}
