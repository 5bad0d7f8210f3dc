//! Texture loading and inspection for material synthesis.

pub mod registry;

pub use registry::{LoadedTexture, TextureRegistry};
