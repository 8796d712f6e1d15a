//! Sky clear colour.

use glam::Vec4;

use crate::config::ShadingConstants;

/// Backdrop colour for `light_level`: the day tint fading into the night tint.
pub fn sky_colour(light_level: f32, constants: &ShadingConstants) -> Vec4 {
    let light = light_level.clamp(0.0, 1.0);
    let rgb = constants.sky_color_light * light + constants.sky_color_dark * (1.0 - light);
    rgb.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_SKY_DARK, DEFAULT_SKY_LIGHT};

    #[test]
    fn endpoints_are_the_configured_tints() {
        let c = ShadingConstants::default();
        assert_eq!(sky_colour(1.0, &c), DEFAULT_SKY_LIGHT.extend(1.0));
        assert_eq!(sky_colour(0.0, &c), DEFAULT_SKY_DARK.extend(1.0));
    }

    #[test]
    fn dusk_is_between() {
        let c = ShadingConstants::default();
        let dusk = sky_colour(0.5, &c);
        let expected = (DEFAULT_SKY_LIGHT + DEFAULT_SKY_DARK) * 0.5;
        assert!((dusk.truncate() - expected).length() < 1e-6);
        assert_eq!(dusk.w, 1.0);
    }
}
