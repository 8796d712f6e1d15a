//! Height-field baking around the camera.

use glam::{IVec2, Vec3};
use image::GrayImage;
use shading::{FilterMode, HeightField, ShadingConstants, ShadingError, HEIGHT_ENCODING_SCALE};

use crate::world::ColumnWorld;

/// Added to each baked depth so a column's own top face sits clear of the occlusion edge.
pub const SURFACE_BIAS: f32 = 1.5;

/// World column stored in texel `texel` for a camera whose area starts at `area_origin`.
///
/// Texels wrap toroidally; each maps to the column within half a field of the area origin.
pub fn texel_column(texel: IVec2, area_origin: IVec2, extent: i32) -> IVec2 {
    let half = extent / 2;
    let offset = (texel + IVec2::splat(half)).rem_euclid(IVec2::splat(extent)) - IVec2::splat(half);
    area_origin + offset
}

/// Origin of the area containing `camera_pos`.
pub fn area_origin(camera_pos: Vec3, area_size: u32) -> IVec2 {
    let area = area_size as i32;
    camera_pos.truncate().floor().as_ivec2().div_euclid(IVec2::splat(area)) * area
}

/// Bake the topmost opaque depth of every column the shadow field covers.
pub fn bake_height_field(
    world: &ColumnWorld,
    camera_pos: Vec3,
    constants: &ShadingConstants,
    filter: FilterMode,
) -> Result<HeightField, ShadingError> {
    let size = constants.shadow_extent()?;
    // Fits: shadow_extent only returns sizes that are valid i32 values.
    let extent = size as i32;
    let origin = area_origin(camera_pos, constants.area_size);

    let values = (0..extent)
        .flat_map(|y| (0..extent).map(move |x| IVec2::new(x, y)))
        .map(|texel| {
            let column = texel_column(texel, origin, extent);
            (world.top_depth(column.x, column.y) as f32 + SURFACE_BIAS) / HEIGHT_ENCODING_SCALE
        })
        .collect();

    let field = HeightField::from_encoded(size, values)?.with_filter(filter);
    log::info!(
        "Baked {}x{} height field around area ({}, {}), {:?} filtering",
        size,
        size,
        origin.x,
        origin.y,
        field.filter()
    );
    Ok(field)
}

/// Greyscale view of a baked field, stretched so the shallowest column is white.
pub fn height_field_image(field: &HeightField) -> GrayImage {
    let size = field.size();
    let texel_uv = |x: u32, y: u32| {
        glam::Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / size as f32
    };
    let nearest = field.clone().with_filter(FilterMode::Nearest);
    let values: Vec<f32> = (0..size * size)
        .map(|i| nearest.sample(texel_uv(i % size, i / size)))
        .collect();
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = (max - min).max(f32::EPSILON);

    GrayImage::from_fn(size, size, |x, y| {
        let v = values[(y * size + x) as usize];
        image::Luma([(255.0 * (1.0 - (v - min) / range)).round() as u8])
    })
}
