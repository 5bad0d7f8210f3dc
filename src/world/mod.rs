//! In-memory world document: the imported mesh hierarchy this tool mutates.
//!
//! The arena of named scene objects stands in for the host's live scene
//! graph; renames, scale normalization, vertex nudges and material
//! assignments all happen here, and a host-side glue layer replays them.

pub mod loader;
pub mod resolver;

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use cgmath::{Quaternion, Vector3};

use crate::graph::MaterialBlueprint;

/// Index of an object inside one [`WorldDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Geometry payload of a mesh object.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// UV set names in order; the second set carries baked vertex alpha.
    pub uv_sets: Vec<String>,
    pub has_vertex_colors: bool,
}

/// One node of the imported hierarchy.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
    pub children: Vec<ObjectId>,
    pub mesh: Option<MeshData>,
    /// Name of the assigned material, if any.
    pub material: Option<String>,
}

/// The whole imported world: object arena plus the name-keyed material set.
#[derive(Debug)]
pub struct WorldDocument {
    pub world_id: String,
    pub objects: Vec<SceneObject>,
    pub roots: Vec<ObjectId>,
    /// Materials by name. Name collisions are fatal, never silent overwrites.
    pub materials: BTreeMap<String, MaterialBlueprint>,
}

impl WorldDocument {
    pub fn new(world_id: &str) -> Self {
        Self {
            world_id: world_id.to_string(),
            objects: vec![],
            roots: vec![],
            materials: BTreeMap::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    pub fn object(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut SceneObject {
        &mut self.objects[id.0]
    }

    /// Register a freshly built material. An existing material with the same
    /// name means the scene was already populated by an earlier import run.
    pub fn insert_material(&mut self, blueprint: MaterialBlueprint) -> Result<()> {
        if self.materials.contains_key(&blueprint.name) {
            bail!("material '{}' already exists", blueprint.name);
        }
        self.materials.insert(blueprint.name.clone(), blueprint);
        Ok(())
    }

    /// Drop an object's current material, unlinking it from the document.
    pub fn clear_material(&mut self, id: ObjectId) {
        if let Some(name) = self.objects[id.0].material.take() {
            self.materials.remove(&name);
        }
    }

    /// Assign a registered material to an object.
    pub fn assign_material(&mut self, id: ObjectId, name: &str) {
        self.objects[id.0].material = Some(name.to_string());
    }
}
