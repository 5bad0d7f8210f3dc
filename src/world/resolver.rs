//! Manifest index → scene object resolution.
//!
//! The upstream exporter names root objects `"{group} Mesh Group …"` (or a
//! `BOB` variant) and mesh children `"Group {g} Mesh {m} …"`. Lookups match
//! whole index tokens, are memoized for the run, and rename what they find to
//! stable `"{world_id} …"` names. A missing group or mesh is fatal.

use std::collections::HashMap;

use anyhow::{bail, Result};
use cgmath::Vector3;

use super::{ObjectId, WorldDocument};

fn tokens(name: &str) -> Vec<&str> {
    name.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Root object for a group: first name token is the decimal group index.
fn is_group_root(name: &str, group: u32) -> bool {
    tokens(name).first() == Some(&group.to_string().as_str())
}

/// Mesh child: `"Group {g} Mesh {m} …"`, or a `BOB…` object carrying the
/// `Mesh {m}` token pair anywhere in its name.
fn is_group_mesh(name: &str, group: u32, mesh: u32) -> bool {
    let toks = tokens(name);
    let group = group.to_string();
    let mesh = mesh.to_string();

    if toks.len() >= 4
        && toks[0] == "Group"
        && toks[1] == group
        && toks[2] == "Mesh"
        && toks[3] == mesh
    {
        return true;
    }
    if toks.first().is_some_and(|t| t.starts_with("BOB")) {
        return toks
            .windows(2)
            .any(|w| w[0] == "Mesh" && w[1] == mesh);
    }
    false
}

/// Memoized group/mesh lookups against a [`WorldDocument`].
pub struct MeshResolver {
    groups: HashMap<u32, ObjectId>,
    meshes: HashMap<(u32, u32), ObjectId>,
}

impl MeshResolver {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            meshes: HashMap::new(),
        }
    }

    /// Find the root object of a group, renaming it and normalizing its
    /// centimetre-scale transform on first resolution.
    pub fn resolve_group(&mut self, world: &mut WorldDocument, group: u32) -> Result<ObjectId> {
        if let Some(&id) = self.groups.get(&group) {
            return Ok(id);
        }

        let roots = world.roots.clone();
        for id in roots {
            if !is_group_root(&world.object(id).name, group) {
                continue;
            }
            let kind = if tokens(&world.object(id).name).get(1) == Some(&"Mesh") {
                "Mesh Group"
            } else {
                "BOB"
            };
            let new_name = format!("{} {} {}", world.world_id, group, kind);
            log::debug!("group {}: '{}' → '{}'", group, world.object(id).name, new_name);

            let object = world.object_mut(id);
            object.name = new_name;
            object.scale = Vector3::new(0.01, 0.01, 0.01);
            object.translation *= 0.01;

            self.groups.insert(group, id);
            return Ok(id);
        }
        bail!("Group {} not found", group);
    }

    /// Find a mesh object inside a group, renaming it on first resolution.
    pub fn resolve_mesh(
        &mut self,
        world: &mut WorldDocument,
        group: u32,
        mesh: u32,
    ) -> Result<ObjectId> {
        if let Some(&id) = self.meshes.get(&(group, mesh)) {
            return Ok(id);
        }

        let root = self.resolve_group(world, group)?;
        let children = world.object(root).children.clone();
        for id in children {
            if !is_group_mesh(&world.object(id).name, group, mesh) {
                continue;
            }
            let new_name = format!("{} {} {}", world.world_id, group, mesh);
            log::debug!(
                "mesh {},{}: '{}' → '{}'",
                group,
                mesh,
                world.object(id).name,
                new_name
            );
            world.object_mut(id).name = new_name;

            self.meshes.insert((group, mesh), id);
            return Ok(id);
        }
        bail!("Mesh {} not found in group {}", mesh, group);
    }
}

impl Default for MeshResolver {
    fn default() -> Self {
        Self::new()
    }
}
