//! Vertex types and the vertex stage.

use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Mesh vertex: position, texture coordinate and normal, all in object space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coords,
            normal,
        }
    }

    /// Vertex for materials that ignore normals (sky, sprites, UI).
    pub fn unlit(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self::new(position, tex_coords, [0.0; 3])
    }
}

/// Per-draw transforms consumed by the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransforms {
    /// Object to world (or object to eye space for billboards).
    pub model: Mat4,
    /// For camera-relative draws this carries the view rotation only.
    pub projection: Mat4,
    pub camera_pos: Vec3,
}

impl DrawTransforms {
    pub fn new(model: Mat4, projection: Mat4, camera_pos: Vec3) -> Self {
        Self {
            model,
            projection,
            camera_pos,
        }
    }

    /// Transforms for a mesh placed by `transform`, viewed from `camera_pos`.
    pub fn from_transform(transform: &Transform, projection: Mat4, camera_pos: Vec3) -> Self {
        Self::new(transform.to_matrix(), projection, camera_pos)
    }

    /// Rotational part of `model`, applied to normals before re-normalizing.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model)
    }
}

/// Which attributes the vertex stage produces and in which frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStage {
    /// World-space projection with a transformed normal; no face position.
    Standard,
    /// World position shifted by `-camera_pos` before projecting; face position
    /// and normal forwarded for lighting.
    CameraRelative,
    /// `model` is a model-view matrix; the eye-space position becomes the face position.
    Billboard,
    /// Texture coordinate only (sky, UI).
    Passthrough,
}

/// Attributes handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    pub tex_coords: Vec2,
    pub normal: Option<Vec3>,
    pub face_position: Option<Vec3>,
}

impl VertexOutput {
    /// Normalized device coordinates, or `None` behind the eye.
    pub fn ndc(&self) -> Option<Vec3> {
        let c = self.clip_position;
        (c.w > 0.0).then(|| c.truncate() / c.w)
    }
}

impl VertexStage {
    pub fn run(self, vertex: &Vertex, draw: &DrawTransforms) -> VertexOutput {
        let position = Vec3::from_array(vertex.position);
        let tex_coords = Vec2::from_array(vertex.tex_coords);
        let normal = || {
            (draw.normal_matrix() * Vec3::from_array(vertex.normal)).normalize_or_zero()
        };

        match self {
            Self::Standard => {
                let world = draw.model.transform_point3(position);
                VertexOutput {
                    clip_position: draw.projection * world.extend(1.0),
                    tex_coords,
                    normal: Some(normal()),
                    face_position: None,
                }
            }
            Self::CameraRelative => {
                let relative = draw.model.transform_point3(position) - draw.camera_pos;
                VertexOutput {
                    clip_position: draw.projection * relative.extend(1.0),
                    tex_coords,
                    normal: Some(normal()),
                    face_position: Some(relative),
                }
            }
            Self::Billboard => {
                let eye = draw.model.transform_point3(position);
                VertexOutput {
                    clip_position: draw.projection * eye.extend(1.0),
                    tex_coords,
                    normal: None,
                    face_position: Some(eye),
                }
            }
            Self::Passthrough => VertexOutput {
                clip_position: draw.projection * draw.model * position.extend(1.0),
                tex_coords,
                normal: None,
                face_position: None,
            },
        }
    }
}

/// Interpolated attributes of one covered pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub tex_coords: Vec2,
    /// Unit normal, or zero for materials without one.
    pub normal: Vec3,
    /// Position relative to the camera.
    pub face_position: Vec3,
}

impl Fragment {
    /// Interpolation shortens normals, so they are re-normalized here.
    pub fn new(tex_coords: Vec2, normal: Vec3, face_position: Vec3) -> Self {
        Self {
            tex_coords,
            normal: normal.normalize_or_zero(),
            face_position,
        }
    }

    /// Fragment sitting exactly on a vertex; attributes the stage omitted are zero.
    pub fn from_vertex(output: &VertexOutput) -> Self {
        Self::new(
            output.tex_coords,
            output.normal.unwrap_or(Vec3::ZERO),
            output.face_position.unwrap_or(Vec3::ZERO),
        )
    }

    /// Distance from the camera.
    pub fn distance(&self) -> f32 {
        self.face_position.length()
    }
}
