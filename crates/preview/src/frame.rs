//! Frame assembly: ray-cast the world, shade every hit through the shading
//! core, then composite lamp sprites and the overlay.

use engine_core::Transform;
use glam::{Mat4, Vec2, Vec3, Vec4};
use image::RgbaImage;
use rand::prelude::*;
use shading::{
    sky::sky_colour, DrawTransforms, Fragment, LightingContext, Material, RgbaTexture, Vertex,
};

use crate::{camera::PreviewCamera, textures::PreviewTextures, world::ColumnWorld};

/// World size of a lamp sprite.
const LAMP_SPRITE_SIZE: f32 = 0.8;
/// How far above the ground lamps hover.
const LAMP_HOVER: f32 = 0.6;
/// Crosshair size in pixels.
const CROSSHAIR_PIXELS: f32 = 15.0;

/// Scatter `count` lamps over the ground within `radius` of `centre`.
pub fn scatter_lamps(
    world: &ColumnWorld,
    centre: Vec3,
    count: usize,
    radius: f32,
    seed: u64,
) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(42));
    let radius = radius.max(1.0);
    (0..count)
        .map(|_| {
            let x = centre.x + rng.gen_range(-radius..radius);
            let y = centre.y + rng.gen_range(-radius..radius);
            let ground = world.top_depth(x.floor() as i32, y.floor() as i32);
            Vec3::new(x, y, ground as f32 - LAMP_HOVER)
        })
        .collect()
}

/// Source-over blend of `src` onto an opaque `dst`.
fn blend(dst: Vec4, src: Vec4) -> Vec4 {
    dst.truncate()
        .lerp(src.truncate(), src.w.clamp(0.0, 1.0))
        .extend(1.0)
}

/// Shaded colour and view depth per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub colour: Vec<Vec4>,
    /// Distance along the view axis, or infinity where only sky was drawn.
    pub depth: Vec<f32>,
}

impl Frame {
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.colour[(y * self.width + x) as usize].clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
            image::Rgba([
                c.x.round() as u8,
                c.y.round() as u8,
                c.z.round() as u8,
                c.w.round() as u8,
            ])
        })
    }
}

/// Everything needed to shade one frame; shared read-only by every worker.
pub struct FrameRenderer<'a> {
    pub ctx: LightingContext<'a>,
    pub world: &'a ColumnWorld,
    pub camera: &'a PreviewCamera,
    pub textures: &'a PreviewTextures,
    pub width: u32,
    pub height: u32,
}

impl FrameRenderer<'_> {
    fn ndc(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32 * 2.0 - 1.0,
            1.0 - (y as f32 + 0.5) / self.height as f32 * 2.0,
        )
    }

    fn texture_for(&self, material: Material) -> &RgbaTexture {
        match material {
            Material::Flat => &self.textures.water,
            Material::Sky => &self.textures.clouds,
            Material::Billboard => &self.textures.lamp,
            Material::Ui => &self.textures.crosshair,
            Material::Terrain => &self.textures.terrain,
        }
    }

    /// Backdrop for a ray that hit nothing: the clear colour with the cloud layer on top.
    fn sky(&self, ndc: Vec2, direction: Vec3) -> Vec4 {
        let clear = sky_colour(self.ctx.scene.light_level(), self.ctx.constants);
        if direction.z >= -0.02 {
            return clear;
        }
        // Project onto a cloud plane above the camera.
        let cloud_uv = direction.truncate() / -direction.z * 0.15
            + self.camera.position.truncate() * 0.002;
        let vertex = Vertex::unlit([ndc.x, ndc.y, 1.0], cloud_uv.to_array());
        let draw = DrawTransforms::new(Mat4::IDENTITY, Mat4::IDENTITY, self.camera.position);
        let out = Material::Sky.vertex_stage().run(&vertex, &draw);
        let fragment = Fragment::from_vertex(&out);
        let clouds = Material::Sky.shade(&self.ctx, self.texture_for(Material::Sky), &fragment);
        blend(clear, clouds)
    }

    /// Colour and view depth of pixel `(x, y)`.
    pub fn shade_pixel(&self, x: u32, y: u32) -> (Vec4, f32) {
        let ndc = self.ndc(x, y);
        let direction = self.camera.ray_direction(ndc);
        let max_distance = self.ctx.scene.fog_far();

        let Some(hit) = self.world.raycast(self.camera.position, direction, max_distance) else {
            return (self.sky(ndc, direction), f32::INFINITY);
        };

        // The hit point is the interpolated vertex; run it through the material's vertex stage.
        let vertex = Vertex::new(hit.point.to_array(), hit.face_uv(), hit.normal.to_array());
        let draw = DrawTransforms::new(
            Mat4::IDENTITY,
            self.camera.view_projection(),
            self.camera.position,
        );
        let out = hit.material.vertex_stage().run(&vertex, &draw);
        let fragment = Fragment::from_vertex(&out);
        let colour = hit
            .material
            .shade(&self.ctx, self.texture_for(hit.material), &fragment);

        let background = sky_colour(self.ctx.scene.light_level(), self.ctx.constants);
        // Perspective clip w is the view depth, the same measure the sprites test against.
        (blend(background, colour), out.clip_position.w)
    }

    /// Shade the rows starting at `first_row` into `colour` and `depth` (whole rows).
    fn shade_rows(&self, first_row: u32, colour: &mut [Vec4], depth: &mut [f32]) {
        let width = self.width as usize;
        for (i, (c, d)) in colour.iter_mut().zip(depth.iter_mut()).enumerate() {
            let x = (i % width) as u32;
            let y = first_row + (i / width) as u32;
            (*c, *d) = self.shade_pixel(x, y);
        }
    }

    /// Shade the whole frame, splitting rows across `workers` threads.
    pub fn render(&self, workers: usize) -> Frame {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut colour = vec![Vec4::ZERO; width * height];
        let mut depth = vec![f32::INFINITY; width * height];

        let rows_per_worker = height.div_ceil(workers.max(1)).max(1);
        let chunk = rows_per_worker * width;
        std::thread::scope(|scope| {
            let rows = colour.chunks_mut(chunk).zip(depth.chunks_mut(chunk));
            for (index, (c, d)) in rows.enumerate() {
                let first_row = (index * rows_per_worker) as u32;
                scope.spawn(move || self.shade_rows(first_row, c, d));
            }
        });

        Frame {
            width: self.width,
            height: self.height,
            colour,
            depth,
        }
    }

    /// Draw a camera-facing sprite for every lamp, depth-tested against the frame.
    pub fn draw_lamp_sprites(&self, frame: &mut Frame) {
        let view = self.camera.view_rotation();
        let projection = self.camera.projection();
        let camera_pos = self.camera.position;
        let stage = Material::Billboard.vertex_stage();

        for &lamp in self.ctx.scene.lamps() {
            let sprite = Transform::from_position_scale(lamp - camera_pos, LAMP_SPRITE_SIZE);
            let draw = DrawTransforms::new(sprite.billboard(&view), projection, camera_pos);

            let centre = stage.run(&Vertex::unlit([0.0; 3], [0.5, 0.5]), &draw);
            let corner = stage.run(&Vertex::unlit([0.5, 0.5, 0.0], [1.0, 0.0]), &draw);
            let (Some(centre_ndc), Some(corner_ndc)) = (centre.ndc(), corner.ndc()) else {
                continue;
            };
            let Some(eye) = centre.face_position else {
                continue;
            };
            let half = (corner_ndc - centre_ndc).truncate().abs();
            self.composite_quad(frame, centre_ndc.truncate(), half, -eye.z, |uv| {
                let fragment = Fragment::new(uv, Vec3::ZERO, eye);
                Material::Billboard.shade(&self.ctx, self.texture_for(Material::Billboard), &fragment)
            });
        }
    }

    /// Draw the crosshair in the middle of the screen.
    pub fn draw_crosshair(&self, frame: &mut Frame) {
        let scale = Vec3::new(
            CROSSHAIR_PIXELS / self.width as f32,
            CROSSHAIR_PIXELS / self.height as f32,
            1.0,
        );
        let draw = DrawTransforms::new(Mat4::from_scale(scale), Mat4::IDENTITY, self.camera.position);
        let stage = Material::Ui.vertex_stage();
        let centre = stage.run(&Vertex::unlit([0.0; 3], [0.5, 0.5]), &draw);
        let corner = stage.run(&Vertex::unlit([1.0, 1.0, 0.0], [1.0, 0.0]), &draw);
        let (Some(centre_ndc), Some(corner_ndc)) = (centre.ndc(), corner.ndc()) else {
            return;
        };
        let half = (corner_ndc - centre_ndc).truncate().abs();
        self.composite_quad(frame, centre_ndc.truncate(), half, 0.0, |uv| {
            let fragment = Fragment::new(uv, Vec3::ZERO, Vec3::ZERO);
            Material::Ui.shade(&self.ctx, self.texture_for(Material::Ui), &fragment)
        });
    }

    /// Blend `shade(uv)` over every pixel of the screen rectangle `centre ± half` (NDC)
    /// that lies nearer than `depth`.
    fn composite_quad(
        &self,
        frame: &mut Frame,
        centre: Vec2,
        half: Vec2,
        depth: f32,
        shade: impl Fn(Vec2) -> Vec4,
    ) {
        if half.x <= 0.0 || half.y <= 0.0 {
            return;
        }
        let (w, h) = (self.width as f32, self.height as f32);
        let to_pixel = |ndc: Vec2| Vec2::new((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h);
        let min = to_pixel(Vec2::new(centre.x - half.x, centre.y + half.y)).max(Vec2::ZERO);
        let max = to_pixel(Vec2::new(centre.x + half.x, centre.y - half.y)).min(Vec2::new(w, h));

        for y in min.y.floor() as u32..max.y.ceil() as u32 {
            for x in min.x.floor() as u32..max.x.ceil() as u32 {
                let i = (y * self.width + x) as usize;
                if depth >= frame.depth[i] {
                    continue;
                }
                let ndc = self.ndc(x, y);
                let uv = Vec2::new(
                    (ndc.x - centre.x) / (2.0 * half.x) + 0.5,
                    (centre.y - ndc.y) / (2.0 * half.y) + 0.5,
                );
                if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
                    continue;
                }
                frame.colour[i] = blend(frame.colour[i], shade(uv));
            }
        }
    }
}
