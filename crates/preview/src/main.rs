//! shade-preview: renders one frame of a procedural voxel world through the
//! shading pipeline and writes it to a PNG.

mod bake;
mod camera;
mod config;
mod frame;
mod textures;
mod world;

use std::time::Instant;

use anyhow::{ensure, Context, Result};
use engine_core::WorldTime;
use glam::Mat4;
use shading::{DrawTransforms, LightingContext, RgbaTexture, SceneLighting, SceneUniform};

use camera::PreviewCamera;
use config::PreviewConfig;
use frame::FrameRenderer;
use textures::PreviewTextures;
use world::ColumnWorld;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config::config_path(std::env::args());
    let config = PreviewConfig::load(&path);
    ensure!(
        config.width > 0 && config.height > 0,
        "Frame size must be non-zero, got {}x{}",
        config.width,
        config.height
    );
    log::info!(
        "Rendering {}x{} preview (seed {}, time of day {:.2})",
        config.width,
        config.height,
        config.seed,
        config.time_of_day
    );

    let world = ColumnWorld::new(config.seed);
    let camera = PreviewCamera::from_config(&config, &world);
    let time = WorldTime::from_day_fraction(config.time_of_day);

    let lamps = frame::scatter_lamps(
        &world,
        camera.position,
        config.lamp_count,
        config.lamp_radius,
        config.seed,
    );
    let scene = SceneLighting::builder()
        .camera(camera.position, camera.target())
        .light_level(time.light_level())
        .fog(config.fog_near, config.fog_far)
        .fog_colors(config.shading.sky_color_light, config.shading.sky_color_dark)
        .lamps_clamped(lamps)
        .dynamic_shadows(config.shadow_quality.enabled())
        .drop_shadow(config.drop_shadow)
        .build()
        .context("Invalid scene lighting")?;

    let height_field = config
        .shadow_quality
        .filter_mode()
        .map(|filter| bake::bake_height_field(&world, camera.position, &config.shading, filter))
        .transpose()
        .context("Failed to bake height field")?;
    let mut ctx = LightingContext::new(&scene, &config.shading);
    if let Some(field) = &height_field {
        ctx = ctx.with_height_field(field)?;
    }

    let uniform = SceneUniform::new(
        &scene,
        &DrawTransforms::new(Mat4::IDENTITY, camera.view_projection(), camera.position),
    );
    log::debug!(
        "Scene uniform: {} bytes, {} lights",
        bytemuck::bytes_of(&uniform).len(),
        uniform.lights_count()
    );

    let terrain = config
        .terrain_texture
        .as_ref()
        .map(|p| {
            RgbaTexture::open(p).with_context(|| format!("Failed to load terrain texture {:?}", p))
        })
        .transpose()?;
    let textures = PreviewTextures::generate(config.seed, terrain)?;

    let renderer = FrameRenderer {
        ctx,
        world: &world,
        camera: &camera,
        textures: &textures,
        width: config.width,
        height: config.height,
    };
    let workers = config.worker_threads();
    let start = Instant::now();
    let mut frame = renderer.render(workers);
    if config.lamp_sprites {
        renderer.draw_lamp_sprites(&mut frame);
    }
    if config.crosshair {
        renderer.draw_crosshair(&mut frame);
    }
    log::info!(
        "Shaded frame in {:.1?} on {} threads (light level {:.2}, {} lamps)",
        start.elapsed(),
        workers,
        scene.light_level(),
        scene.lights_count()
    );

    frame
        .to_image()
        .save(&config.output)
        .with_context(|| format!("Failed to write {:?}", config.output))?;
    log::info!("Wrote {:?}", config.output);

    if let (Some(out), Some(field)) = (&config.height_field_output, &height_field) {
        bake::height_field_image(field)
            .save(out)
            .with_context(|| format!("Failed to write {:?}", out))?;
        log::info!("Wrote height field to {:?}", out);
    }

    Ok(())
}
