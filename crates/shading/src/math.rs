//! Scalar helpers with GLSL semantics.

use glam::Vec3;

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
///
/// Equal edges act as a step at `edge0`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend from `a` (at `t = 0`) to `b` (at `t = 1`).
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Reflect incident direction `i` about unit normal `n`.
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}
