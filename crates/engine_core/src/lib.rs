//! Core engine types shared by the shading pipeline and its hosts.
//!
//! This crate provides the foundational types used across the workspace:
//! - Draw transforms (model matrices, billboards)
//! - The day/night world clock

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
