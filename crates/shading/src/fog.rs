//! Distance fog.

use glam::Vec3;

use crate::scene::SceneLighting;

/// Weight of the lit colour: 1 up to `near`, falling linearly to 0 at `far`.
pub fn fog_factor(near: f32, far: f32, distance: f32) -> f32 {
    ((far - distance) / (far - near)).clamp(0.0, 1.0)
}

/// Fog tint for the scene's time of day.
pub fn fog_color(scene: &SceneLighting) -> Vec3 {
    scene.fog_color_light() * scene.light_level() + scene.fog_color_dark() * scene.dark_level()
}

/// Fog colour where `factor` is 0, `lit` where it is 1.
pub fn apply_fog(scene: &SceneLighting, lit: Vec3, factor: f32) -> Vec3 {
    fog_color(scene).lerp(lit, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_boundaries() {
        assert_eq!(fog_factor(2.0, 20.0, 0.0), 1.0);
        assert_eq!(fog_factor(2.0, 20.0, 2.0), 1.0);
        assert_eq!(fog_factor(2.0, 20.0, 20.0), 0.0);
        assert_eq!(fog_factor(2.0, 20.0, 500.0), 0.0);
    }

    #[test]
    fn factor_is_monotone() {
        let mut previous = 1.0;
        for step in 0..200 {
            let f = fog_factor(2.0, 20.0, step as f32 * 0.125);
            assert!(f <= previous);
            previous = f;
        }
    }

    #[test]
    fn factor_at_five_units() {
        let distance = glam::Vec3::new(0.0, 0.0, 5.0).length();
        assert!((fog_factor(2.0, 20.0, distance) - 0.8333).abs() < 1e-3);
    }

    #[test]
    fn fog_colour_follows_time_of_day() {
        let light = Vec3::new(1.0, 0.5, 0.0);
        let dark = Vec3::new(0.0, 0.0, 1.0);
        let scene = |level| {
            SceneLighting::builder()
                .light_level(level)
                .fog_colors(light, dark)
                .build()
                .unwrap()
        };
        assert_eq!(fog_color(&scene(1.0)), light);
        assert_eq!(fog_color(&scene(0.0)), dark);
        assert!((fog_color(&scene(0.5)) - Vec3::new(0.5, 0.25, 0.5)).length() < 1e-6);
    }

    #[test]
    fn distant_faces_take_the_fog_colour() {
        let scene = SceneLighting::builder().fog(2.0, 20.0).build().unwrap();
        let lit = Vec3::new(0.1, 0.9, 0.3);
        let near = fog_factor(scene.fog_near(), scene.fog_far(), 1.0);
        let far = fog_factor(scene.fog_near(), scene.fog_far(), 40.0);
        assert!((apply_fog(&scene, lit, near) - lit).length() < 1e-6);
        assert!((apply_fog(&scene, lit, far) - fog_color(&scene)).length() < 1e-6);
    }
}
