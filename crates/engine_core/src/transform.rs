//! Draw transforms: model matrices for meshes and camera-facing sprites.
//!
//! World axes follow the voxel world: X/Y are horizontal and Z is depth,
//! growing downward from the top of the world.

use glam::{Mat4, Quat, Vec3};

/// "Up" in world space (toward smaller depth).
pub const WORLD_UP: Vec3 = Vec3::NEG_Z;

/// Position, rotation and scale of a single draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a uniformly scaled transform at the given position.
    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// The `Model` matrix for this draw.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Model-view matrix for a camera-facing sprite centred on `position`.
    ///
    /// The sprite keeps its scale but drops every rotation, so its quad stays
    /// parallel to the image plane.
    pub fn billboard(&self, view: &Mat4) -> Mat4 {
        let eye_centre = view.transform_point3(self.position);
        Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, eye_centre)
    }
}
