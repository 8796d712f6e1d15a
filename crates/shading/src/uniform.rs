//! Scene state packed the way a GPU uniform block receives it.

use bytemuck::{Pod, Zeroable};

use crate::{lights::EXTENDED_LAMP_CAPACITY, scene::SceneLighting, vertex::DrawTransforms};

/// Per-draw uniform block (std140-compatible).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    pub model: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub camera_pos: [f32; 4], // w unused, padding
    pub camera_target: [f32; 4],
    /// fog near, fog far, light level, dark level
    pub fog_params: [f32; 4],
    pub fog_color_light: [f32; 4],
    pub fog_color_dark: [f32; 4],
    /// has dynamic shadows, show drop shadow, lights count, padding
    pub flags: [u32; 4],
    /// World-space lamp positions; entries at or past `flags[2]` are zero.
    pub lights: [[f32; 4]; EXTENDED_LAMP_CAPACITY],
}

impl SceneUniform {
    pub fn new(scene: &SceneLighting, draw: &DrawTransforms) -> Self {
        let mut uniform = Self::zeroed();
        uniform.model = draw.model.to_cols_array_2d();
        uniform.projection = draw.projection.to_cols_array_2d();
        uniform.camera_pos = draw.camera_pos.extend(0.0).to_array();
        uniform.camera_target = scene.camera_target().extend(0.0).to_array();
        uniform.fog_params = [
            scene.fog_near(),
            scene.fog_far(),
            scene.light_level(),
            scene.dark_level(),
        ];
        uniform.fog_color_light = scene.fog_color_light().extend(1.0).to_array();
        uniform.fog_color_dark = scene.fog_color_dark().extend(1.0).to_array();
        uniform.flags = [
            scene.has_dynamic_shadows() as u32,
            scene.show_drop_shadow() as u32,
            scene.lights_count() as u32,
            0,
        ];
        for (slot, lamp) in uniform.lights.iter_mut().zip(scene.lamps()) {
            *slot = lamp.extend(1.0).to_array();
        }
        uniform
    }

    pub fn lights_count(&self) -> u32 {
        self.flags[2]
    }
}
