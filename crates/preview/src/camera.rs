//! Preview camera.

use engine_core::WORLD_UP;
use glam::{Mat4, Vec2, Vec3};

use crate::{config::PreviewConfig, world::ColumnWorld};

/// Pitch is kept short of straight down so the view basis stays defined.
const MAX_PITCH_DEGREES: f32 = 89.0;

#[derive(Debug, Clone, Copy)]
pub struct PreviewCamera {
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PreviewCamera {
    /// Place the camera `eye_height` above the first opaque voxel of its column.
    pub fn from_config(config: &PreviewConfig, world: &ColumnWorld) -> Self {
        let [x, y] = config.camera_xy;
        let ground = world.top_depth(x.floor() as i32, y.floor() as i32) as f32;
        let yaw = config.yaw_degrees.to_radians();
        let pitch = config
            .pitch_degrees
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES)
            .to_radians();
        // Positive pitch looks down, toward greater depth.
        let forward = Vec3::new(yaw.cos() * pitch.cos(), yaw.sin() * pitch.cos(), pitch.sin());

        Self {
            position: Vec3::new(x, y, ground - config.eye_height),
            forward,
            fov_degrees: config.fov_degrees,
            aspect: config.width as f32 / config.height.max(1) as f32,
            near: 0.1,
            far: config.fog_far * 2.0,
        }
    }

    /// Point the drop shadow may centre on: the ground a little ahead of the eye.
    pub fn target(&self) -> Vec3 {
        self.position + self.forward
    }

    /// View rotation only; camera-relative draws never see the camera translation.
    pub fn view_rotation(&self) -> Mat4 {
        Mat4::look_to_rh(Vec3::ZERO, self.forward, WORLD_UP)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Rotation and projection combined, for camera-relative draws.
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view_rotation()
    }

    /// Unit world-space direction through `ndc` (x right, y up).
    pub fn ray_direction(&self, ndc: Vec2) -> Vec3 {
        let inverse = self.view_projection().inverse();
        inverse
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0))
            .normalize_or_zero()
    }
}
