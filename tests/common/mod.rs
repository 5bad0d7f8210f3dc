// Common test utilities and helpers
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cgmath::{Quaternion, Vector3};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

use kh_world_tools::world::{MeshData, SceneObject, WorldDocument};

/// Write a 4x4 RGBA texture; `translucent` punches one half-alpha texel.
pub fn write_texture(dir: &Path, name: &str, translucent: bool) {
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([180, 160, 140, 255]));
    if translucent {
        img.put_pixel(1, 2, Rgba([180, 160, 140, 40]));
    }
    img.save(dir.join(format!("{}.png", name))).unwrap();
}

/// Write a 4x4 RGB (no alpha channel) texture.
pub fn write_rgb_texture(dir: &Path, name: &str) {
    let img = RgbImage::from_pixel(4, 4, Rgb([90, 120, 150]));
    img.save(dir.join(format!("{}.png", name))).unwrap();
}

/// Write a manifest for `world_id` from raw lines.
pub fn write_manifest(dir: &Path, world_id: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(format!("{}-preSliced-texture-info.txt", world_id));
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

/// Write a minimal world document fixture: one group root named
/// `"0 Mesh Group 2"` with mesh children `"Group 0 Mesh 0"` and
/// `"Group 0 Mesh 1"`, each a single triangle with two UV sets.
pub fn write_world_gltf(dir: &Path, world_id: &str) -> PathBuf {
    let mut bin: Vec<u8> = vec![];
    // positions
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    // normals
    push_f32s(&mut bin, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    // TEXCOORD_0
    push_f32s(&mut bin, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    // TEXCOORD_1 (vertex alpha carrier)
    push_f32s(&mut bin, &[0.5, 0.0, 0.5, 0.0, 0.5, 0.0]);
    assert_eq!(bin.len(), 120);

    let bin_name = format!("{}-world.bin", world_id);
    std::fs::write(dir.join(&bin_name), &bin).unwrap();

    let json = serde_json::json!({
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"name": "0 Mesh Group 2", "children": [1, 2]},
            {"name": "Group 0 Mesh 0", "mesh": 0},
            {"name": "Group 0 Mesh 1", "mesh": 0}
        ],
        "meshes": [
            {"primitives": [{
                "attributes": {
                    "POSITION": 0,
                    "NORMAL": 1,
                    "TEXCOORD_0": 2,
                    "TEXCOORD_1": 3
                },
                "mode": 4
            }]}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC2"},
            {"bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC2"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 36},
            {"buffer": 0, "byteOffset": 72, "byteLength": 24},
            {"buffer": 0, "byteOffset": 96, "byteLength": 24}
        ],
        "buffers": [{"uri": bin_name, "byteLength": 120}]
    });

    let path = dir.join(format!("{}-world.gltf", world_id));
    std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
    path
}

fn triangle_mesh() -> MeshData {
    MeshData {
        positions: vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        normals: vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        uv_sets: vec!["TEXCOORD_0".to_string(), "TEXCOORD_1".to_string()],
        has_vertex_colors: true,
    }
}

fn object(name: &str, mesh: Option<MeshData>) -> SceneObject {
    SceneObject {
        name: name.to_string(),
        translation: Vector3::new(0.0, 0.0, 0.0),
        rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        scale: Vector3::new(1.0, 1.0, 1.0),
        children: vec![],
        mesh,
        material: None,
    }
}

/// In-memory document matching the glTF fixture, for driving the mutation
/// phase without touching the loader.
pub fn demo_world(world_id: &str) -> WorldDocument {
    let mut world = WorldDocument::new(world_id);
    let root = world.add_object(object("0 Mesh Group 2", None));
    let m0 = world.add_object(object("Group 0 Mesh 0", Some(triangle_mesh())));
    let m1 = world.add_object(object("Group 0 Mesh 1", Some(triangle_mesh())));
    world.object_mut(root).children = vec![m0, m1];
    world.roots.push(root);
    world
}
