//! Procedural column world and the voxel ray caster that feeds the shader.
//!
//! Depth grows downward: a column is solid from its surface depth to the
//! bottom of the world, water fills any air below `WATER_DEPTH`, and some
//! columns carry a one-voxel ledge hanging above the ground.

use glam::{IVec3, Vec3};
use noise::{NoiseFn, Perlin};
use shading::Material;

/// Depth of the water surface.
pub const WATER_DEPTH: i32 = 40;
/// Depth of the shallowest possible ground.
const BASE_DEPTH: i32 = 30;
/// Ground relief: surfaces lie in `[BASE_DEPTH, BASE_DEPTH + RELIEF]`.
const RELIEF: f64 = 16.0;
/// Gap between a ledge and the ground below it.
const LEDGE_CLEARANCE: i32 = 4;
const LEDGE_THRESHOLD: f64 = 0.62;

/// Derive a deterministic noise seed from the world seed and an offset.
fn noise_seed(seed: u64, offset: u64) -> u32 {
    (seed
        .wrapping_add(offset)
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Noise remapped from `[-1, 1]` to `[0, 1]`, summed over a few octaves.
fn fractal(noise: &Perlin, x: f64, y: f64, frequency: f64) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = frequency;
    let mut max_value = 0.0;
    for _ in 0..3 {
        value += noise.get([x * frequency, y * frequency]) * amplitude;
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    (value / max_value + 1.0) * 0.5
}

pub struct ColumnWorld {
    ground: Perlin,
    ledges: Perlin,
}

impl ColumnWorld {
    pub fn new(seed: u64) -> Self {
        Self {
            ground: Perlin::new(noise_seed(seed, 0)),
            ledges: Perlin::new(noise_seed(seed, 1)),
        }
    }

    /// Depth of the top ground voxel in column `(x, y)`.
    pub fn surface_depth(&self, x: i32, y: i32) -> i32 {
        let n = fractal(&self.ground, x as f64, y as f64, 0.03).clamp(0.0, 1.0);
        BASE_DEPTH + (n * RELIEF).round() as i32
    }

    /// Depth of the ledge voxel over column `(x, y)`, if it has one.
    pub fn ledge_depth(&self, x: i32, y: i32) -> Option<i32> {
        let n = self.ledges.get([x as f64 * 0.11, y as f64 * 0.11]);
        let surface = self.surface_depth(x, y);
        (n > LEDGE_THRESHOLD && surface <= WATER_DEPTH).then(|| surface - LEDGE_CLEARANCE - 1)
    }

    /// Depth of the first opaque voxel when looking straight down column `(x, y)`.
    pub fn top_depth(&self, x: i32, y: i32) -> i32 {
        let ground = self.surface_depth(x, y).min(WATER_DEPTH);
        self.ledge_depth(x, y).map_or(ground, |ledge| ledge.min(ground))
    }

    /// Material of the voxel at `(x, y, z)`, or `None` for air.
    pub fn voxel(&self, x: i32, y: i32, z: i32) -> Option<Material> {
        let surface = self.surface_depth(x, y);
        if z >= surface || self.ledge_depth(x, y) == Some(z) {
            Some(Material::Terrain)
        } else if z >= WATER_DEPTH {
            Some(Material::Flat)
        } else {
            None
        }
    }
}

/// Result of a ray cast against the column world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub voxel: IVec3,
    pub material: Material,
    /// World position of the hit.
    pub point: Vec3,
    /// Outward normal of the face that was entered.
    pub normal: Vec3,
}

impl RaycastHit {
    /// Coordinates within the hit face, in `[0, 1)` per axis.
    pub fn face_uv(&self) -> [f32; 2] {
        let local = self.point - self.voxel.as_vec3();
        if self.normal.x != 0.0 {
            [local.y, local.z]
        } else if self.normal.y != 0.0 {
            [local.x, local.z]
        } else {
            [local.x, local.y]
        }
    }
}

impl ColumnWorld {
    /// Walk the voxel grid from `origin` along `direction` and return the first solid voxel.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let dir = direction.try_normalize()?;
        let mut voxel = origin.floor().as_ivec3();
        let step = IVec3::new(
            if dir.x >= 0.0 { 1 } else { -1 },
            if dir.y >= 0.0 { 1 } else { -1 },
            if dir.z >= 0.0 { 1 } else { -1 },
        );

        let axis_delta = |d: f32| if d == 0.0 { f32::INFINITY } else { (1.0 / d).abs() };
        let t_delta = Vec3::new(axis_delta(dir.x), axis_delta(dir.y), axis_delta(dir.z));

        let first_boundary = |o: f32, v: i32, d: f32| {
            if d > 0.0 {
                ((v + 1) as f32 - o) / d
            } else if d < 0.0 {
                (v as f32 - o) / d
            } else {
                f32::INFINITY
            }
        };
        let mut t_max = Vec3::new(
            first_boundary(origin.x, voxel.x, dir.x),
            first_boundary(origin.y, voxel.y, dir.y),
            first_boundary(origin.z, voxel.z, dir.z),
        );

        let mut distance = 0.0;
        let mut normal = Vec3::ZERO;
        while distance <= max_distance {
            if let Some(material) = self.voxel(voxel.x, voxel.y, voxel.z) {
                return Some(RaycastHit {
                    voxel,
                    material,
                    point: origin + dir * distance,
                    normal,
                });
            }

            if t_max.x < t_max.y && t_max.x < t_max.z {
                distance = t_max.x;
                t_max.x += t_delta.x;
                voxel.x += step.x;
                normal = Vec3::new(-step.x as f32, 0.0, 0.0);
            } else if t_max.y < t_max.z {
                distance = t_max.y;
                t_max.y += t_delta.y;
                voxel.y += step.y;
                normal = Vec3::new(0.0, -step.y as f32, 0.0);
            } else {
                distance = t_max.z;
                t_max.z += t_delta.z;
                voxel.z += step.z;
                normal = Vec3::new(0.0, 0.0, -step.z as f32);
            }
        }
        None
    }
}
