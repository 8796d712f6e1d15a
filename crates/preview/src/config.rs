//! Preview settings (frame size, world, camera, lighting). Loaded from preview.ron at startup.

use serde::{Deserialize, Serialize};
use shading::{ShadingConstants, ShadowQuality};
use std::path::{Path, PathBuf};

/// Default settings file, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "preview.ron";

/// Everything the preview host needs to build one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Output image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// World and lamp placement seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of the day in `[0, 1)`; 0.5 is midday.
    #[serde(default = "default_time_of_day")]
    pub time_of_day: f32,

    /// Camera column in world X/Y.
    #[serde(default = "default_camera_xy")]
    pub camera_xy: [f32; 2],
    /// Height of the eye above the ground under the camera.
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Heading in degrees, 0 = +X.
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Degrees below the horizon.
    #[serde(default = "default_pitch")]
    pub pitch_degrees: f32,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,

    #[serde(default = "default_fog_near")]
    pub fog_near: f32,
    #[serde(default = "default_fog_far")]
    pub fog_far: f32,
    /// Lamps scattered around the camera. Anything past the light list capacity is dropped.
    #[serde(default = "default_lamp_count")]
    pub lamp_count: usize,
    /// Radius of the lamp scatter.
    #[serde(default = "default_lamp_radius")]
    pub lamp_radius: f32,
    #[serde(default)]
    pub shadow_quality: ShadowQuality,
    #[serde(default = "default_true")]
    pub drop_shadow: bool,
    /// Draw lamp sprites.
    #[serde(default = "default_true")]
    pub lamp_sprites: bool,
    /// Draw the crosshair overlay.
    #[serde(default = "default_true")]
    pub crosshair: bool,

    /// Worker threads for shading rows; 0 uses every available core.
    #[serde(default)]
    pub threads: usize,
    /// Albedo image for terrain; a procedural texture is used when unset.
    #[serde(default)]
    pub terrain_texture: Option<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Also write the baked height field as a greyscale image.
    #[serde(default)]
    pub height_field_output: Option<PathBuf>,

    #[serde(default)]
    pub shading: ShadingConstants,
}

fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    360
}
fn default_seed() -> u64 {
    7
}
fn default_time_of_day() -> f32 {
    0.35
}
fn default_camera_xy() -> [f32; 2] {
    [8.5, 8.5]
}
fn default_eye_height() -> f32 {
    1.7
}
fn default_pitch() -> f32 {
    20.0
}
fn default_fov() -> f32 {
    70.0
}
fn default_fog_near() -> f32 {
    24.0
}
fn default_fog_far() -> f32 {
    96.0
}
fn default_lamp_count() -> usize {
    12
}
fn default_lamp_radius() -> f32 {
    20.0
}
fn default_true() -> bool {
    true
}
fn default_output() -> PathBuf {
    PathBuf::from("preview.png")
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            time_of_day: default_time_of_day(),
            camera_xy: default_camera_xy(),
            eye_height: default_eye_height(),
            yaw_degrees: 0.0,
            pitch_degrees: default_pitch(),
            fov_degrees: default_fov(),
            fog_near: default_fog_near(),
            fog_far: default_fog_far(),
            lamp_count: default_lamp_count(),
            lamp_radius: default_lamp_radius(),
            shadow_quality: ShadowQuality::default(),
            drop_shadow: default_true(),
            lamp_sprites: default_true(),
            crosshair: default_true(),
            threads: 0,
            terrain_texture: None,
            output: default_output(),
            height_field_output: None,
            shading: ShadingConstants::default(),
        }
    }
}

impl PreviewConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_ron_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::info!("No config at {:?} ({}), using defaults", path, e),
        }
        Self::default()
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Worker count for row shading.
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Config path from the first CLI argument, or `preview.ron` in the current directory.
pub fn config_path(args: impl IntoIterator<Item = String>) -> PathBuf {
    args.into_iter().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = PreviewConfig::from_ron_str("()").unwrap();
        assert_eq!(c.width, 640);
        assert_eq!(c.lamp_count, 12);
        assert_eq!(c.shadow_quality, ShadowQuality::Soft);
        assert_eq!(c.shading, ShadingConstants::default());
    }

    #[test]
    fn nested_shading_overrides() {
        let c = PreviewConfig::from_ron_str(
            "(width: 320, shadow_quality: Hard, shading: (lamp_strength: 9.0))",
        )
        .unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 360);
        assert_eq!(c.shadow_quality, ShadowQuality::Hard);
        assert_eq!(c.shading.lamp_strength, 9.0);
        assert_eq!(c.shading.ambient, 0.4);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let c = PreviewConfig::load(Path::new("definitely/not/here.ron"));
        assert_eq!(c.seed, default_seed());
    }

    #[test]
    fn first_argument_overrides_config_path() {
        let args = ["shade-preview".to_string(), "night.ron".to_string()];
        assert_eq!(config_path(args), PathBuf::from("night.ron"));
        let default = config_path(["shade-preview".to_string()]);
        assert!(default.ends_with(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn explicit_thread_count_wins() {
        let c = PreviewConfig {
            threads: 3,
            ..Default::default()
        };
        assert_eq!(c.worker_threads(), 3);
        assert!(PreviewConfig::default().worker_threads() >= 1);
    }
}
