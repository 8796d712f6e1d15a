//! Voxel terrain shading pipeline.
//!
//! Every lighting term is a pure function over a shared, immutable
//! [`LightingContext`]. Materials pick the terms they need through a
//! [`Features`] value instead of shipping one hand-written shader per variant.
//!
//! Stage order for a lit fragment:
//! surface sample → sun → dynamic shadow → player/lamp lights →
//! specular/fresnel → fog.

pub mod config;
pub mod error;
pub mod fog;
pub mod lights;
pub mod material;
pub mod math;
pub mod scene;
pub mod shadow;
pub mod sky;
pub mod specular;
pub mod sun;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use config::*;
pub use error::*;
pub use lights::{LampModel, BASIC_LAMP_CAPACITY, EXTENDED_LAMP_CAPACITY};
pub use material::*;
pub use scene::*;
pub use sun::DropShadow;
pub use texture::*;
pub use uniform::*;
pub use vertex::*;
