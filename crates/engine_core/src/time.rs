//! Day/night clock driving the scene light level.

use std::f32::consts::PI;

/// Seconds of simulated time per full day.
pub const LENGTH_OF_DAY: f32 = 100.0;
/// Darkest light level the clock reports; nights are never pitch black.
pub const MIN_LIGHT_LEVEL: f32 = 0.1;

/// World clock. The phase runs over `[0, PI)`; light peaks at midday (`PI / 2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    /// Current phase of the day in radians.
    phase: f32,
    /// Cached light level for `phase`.
    light: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        Self::new(PI / 2.0)
    }
}

impl WorldTime {
    /// Create a clock at the given phase (radians, wrapped into `[0, PI)`).
    pub fn new(phase: f32) -> Self {
        let phase = phase.rem_euclid(PI);
        Self {
            phase,
            light: Self::to_light_level(phase),
        }
    }

    /// Create a clock from a fraction of the day in `[0, 1)`.
    pub fn from_day_fraction(fraction: f32) -> Self {
        Self::new(fraction * PI)
    }

    /// Advance the clock by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.phase = (self.phase + delta / LENGTH_OF_DAY).rem_euclid(PI);
        self.light = Self::to_light_level(self.phase);
    }

    /// Current light level in `[MIN_LIGHT_LEVEL, 1]`.
    pub fn light_level(&self) -> f32 {
        self.light
    }

    /// `1 - light_level`.
    pub fn dark_level(&self) -> f32 {
        1.0 - self.light
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    fn to_light_level(phase: f32) -> f32 {
        (phase.sin().max(0.0).sqrt() * 1.2).clamp(MIN_LIGHT_LEVEL, 1.0)
    }
}
