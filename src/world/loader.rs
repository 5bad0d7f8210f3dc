//! glTF world-document loading.
//!
//! Reads the mesh-hierarchy document the extraction pipeline exports next to
//! the manifest: node names and transforms drive mesh resolution, vertex
//! positions and normals feed the transparent-vertex nudge, and UV-set /
//! vertex-colour presence feeds material synthesis.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use cgmath::{Quaternion, Vector3};

use super::{MeshData, ObjectId, SceneObject, WorldDocument};

fn read_f32_le(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Read a float-vec3 attribute accessor into a vector list.
fn read_vec3_attr(
    accessor: &gltf::Accessor,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Vector3<f32>>> {
    if accessor.data_type() != gltf::accessor::DataType::F32 {
        bail!(
            "attribute accessor has unsupported data type {:?}",
            accessor.data_type()
        );
    }
    let view = accessor
        .view()
        .ok_or_else(|| anyhow!("attribute accessor has no buffer view"))?;
    let buf = &buffers[view.buffer().index()].0;
    let base_offset = accessor.offset() + view.offset();
    let stride = view.stride().unwrap_or(accessor.size());

    let mut out = Vec::with_capacity(accessor.count());
    for i in 0..accessor.count() {
        let off = base_offset + i * stride;
        if off + 12 > buf.len() {
            bail!("attribute accessor reads past the end of its buffer");
        }
        out.push(Vector3::new(
            read_f32_le(buf, off),
            read_f32_le(buf, off + 4),
            read_f32_le(buf, off + 8),
        ));
    }
    Ok(out)
}

fn load_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<MeshData> {
    let mut positions: Vec<Vector3<f32>> = vec![];
    let mut normals: Vec<Vector3<f32>> = vec![];
    let mut uv_set_count: u32 = 0;
    let mut has_vertex_colors = false;

    for primitive in mesh.primitives() {
        for (semantic, accessor) in primitive.attributes() {
            match semantic {
                gltf::Semantic::Positions => {
                    positions.extend(read_vec3_attr(&accessor, buffers)?);
                }
                gltf::Semantic::Normals => {
                    normals.extend(read_vec3_attr(&accessor, buffers)?);
                }
                gltf::Semantic::TexCoords(set) => {
                    uv_set_count = uv_set_count.max(set + 1);
                }
                gltf::Semantic::Colors(_) => {
                    has_vertex_colors = true;
                }
                _ => {} // joints, weights, tangents are irrelevant here
            }
        }
    }

    let uv_sets = (0..uv_set_count).map(|i| format!("TEXCOORD_{}", i)).collect();

    Ok(MeshData {
        positions,
        normals,
        uv_sets,
        has_vertex_colors,
    })
}

fn load_node(
    world: &mut WorldDocument,
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
) -> Result<ObjectId> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mesh = node
        .mesh()
        .as_ref()
        .map(|m| load_mesh(m, buffers))
        .transpose()?;

    let id = world.add_object(SceneObject {
        name: node.name().unwrap_or("").to_string(),
        translation: Vector3::new(translation[0], translation[1], translation[2]),
        rotation: Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
        scale: Vector3::new(scale[0], scale[1], scale[2]),
        children: vec![],
        mesh,
        material: None,
    });

    for child in node.children() {
        let child_id = load_node(world, &child, buffers)?;
        world.object_mut(id).children.push(child_id);
    }
    Ok(id)
}

/// Load the world document the manifest refers to.
pub fn load_world_document(path: &Path, world_id: &str) -> Result<WorldDocument> {
    let (doc, buffers, _images) = gltf::import(path)?;

    let scene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or_else(|| anyhow!("world document {} has no scene", path.display()))?;

    let mut world = WorldDocument::new(world_id);
    for node in scene.nodes() {
        let id = load_node(&mut world, &node, &buffers)?;
        world.roots.push(id);
    }

    log::info!(
        "loaded world document {} ({} root objects, {} total)",
        path.display(),
        world.roots.len(),
        world.objects.len()
    );
    Ok(world)
}
