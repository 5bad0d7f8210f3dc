//! Rebuilds renderable materials for extracted Kingdom Hearts worlds.
//!
//! The extraction pipeline leaves a mesh-hierarchy document plus a manifest
//! mapping each mesh to a texture and its draw state. This crate parses the
//! manifest, resolves meshes by naming convention, nudges transparent
//! geometry off its opaque backing, and compiles each binding into a
//! shading-graph blueprint that a host application can realize.

pub mod graph;
pub mod import;
pub mod manifest;
pub mod mesh_processing;
pub mod texture_pipeline;
pub mod validation;
pub mod world;

pub use import::{import_world, ImportError, ImportOptions, WorldImportResult};
