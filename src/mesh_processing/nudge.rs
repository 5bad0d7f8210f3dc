//! Transparent-vertex nudge.
//!
//! Transparent surfaces in the extracted worlds are frequently coplanar with
//! the opaque geometry they decorate, which z-fights. Pushing the transparent
//! mesh out along its normals by a small distance resolves that. Vertices
//! sharing a position (seams, split faces) must move together, so the
//! displacement direction is the renormalized average of every unit normal
//! recorded at that position.

use std::collections::HashMap;

use anyhow::{bail, Result};
use cgmath::{InnerSpace, Vector3};

use crate::world::MeshData;

/// Bit-exact position key; positions only count as shared when identical.
fn position_key(p: Vector3<f32>) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > 1e-12 {
        v.normalize()
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}

/// Displace every vertex along the averaged unit normal of its position.
pub fn displace_along_shared_normals(mesh: &mut MeshData, distance: f32) -> Result<()> {
    if mesh.positions.is_empty() {
        return Ok(());
    }
    if mesh.normals.len() != mesh.positions.len() {
        bail!(
            "mesh has {} normals for {} positions",
            mesh.normals.len(),
            mesh.positions.len()
        );
    }

    let mut summed: HashMap<[u32; 3], Vector3<f32>> = HashMap::new();
    for (position, normal) in mesh.positions.iter().zip(&mesh.normals) {
        let entry = summed
            .entry(position_key(*position))
            .or_insert_with(|| Vector3::new(0.0, 0.0, 0.0));
        *entry += safe_normalize(*normal);
    }

    for position in mesh.positions.iter_mut() {
        let direction = safe_normalize(summed[&position_key(*position)]);
        *position += direction * distance;
    }
    Ok(())
}
