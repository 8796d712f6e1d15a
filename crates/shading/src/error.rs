//! Errors raised while a host assembles per-frame shading state.
//!
//! Per-fragment functions never fail; everything here is caught once per
//! frame (or once at startup) before any fragment is shaded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadingError {
    #[error("fog range must satisfy near < far (near {near}, far {far})")]
    InvalidFogRange { near: f32, far: f32 },

    #[error("light level {0} is outside [0, 1]")]
    LightLevelOutOfRange(f32),

    #[error("{count} lamps exceed the light list capacity of {capacity}")]
    TooManyLamps { count: usize, capacity: usize },

    #[error("height field is {actual} texels per side, shadow settings expect {expected}")]
    HeightFieldSize { expected: u32, actual: u32 },

    #[error("shadow field of {areas} areas of {area_size} columns per axis has no addressable size")]
    ShadowExtent { area_size: u32, areas: u32 },

    #[error("texture of {width}x{height} texels cannot be built from {len} values")]
    TextureSize { width: u32, height: u32, len: usize },

    #[error("invalid shading config: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("failed to load texture: {0}")]
    Image(#[from] image::ImageError),
}
