//! Import orchestration.
//!
//! Two phases, matching the two error tiers:
//! - **Pre-flight**: parse the manifest, check every referenced file, bounds-
//!   check the options. All findings are collected; any error cancels the
//!   import before the world document is touched.
//! - **Mutation**: load the world document, then walk the bindings in
//!   manifest order: resolve the mesh, nudge transparent geometry, replace
//!   the material, synthesize the shading graph. Failures here abort mid-run
//!   with the document left as-is.

pub mod error;
pub mod options;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::Serialize;

use crate::graph::builder::build_material;
use crate::graph::BlendMethod;
use crate::manifest::{self, TextureBinding};
use crate::mesh_processing;
use crate::texture_pipeline::TextureRegistry;
use crate::validation::{rules, ValidationCategory, ValidationItem, ValidationReport, ValidationSeverity};
use crate::world::resolver::MeshResolver;
use crate::world::{loader, WorldDocument};

pub use error::ImportError;
pub use options::{CutoutMode, ImportOptions, MaterialMode, ViewportAlphaMode};

/// Everything pre-flight established before mutation begins.
pub struct Preflight {
    pub world_id: String,
    pub directory: PathBuf,
    pub world_document_path: PathBuf,
    pub bindings: Vec<TextureBinding>,
    /// Warning-only report; error reports never leave pre-flight.
    pub report: ValidationReport,
}

/// Summary of a finished import.
#[derive(Debug, Serialize)]
pub struct WorldImportResult {
    pub world_id: String,
    pub materials_created: Vec<String>,
    pub meshes_nudged: u32,
    pub textures_loaded: u32,
    pub cutouts: u32,
    pub warnings: u32,
}

fn manifest_item(code: &str, message: String) -> ValidationItem {
    ValidationItem {
        code: code.to_string(),
        message,
        severity: ValidationSeverity::Error,
        category: ValidationCategory::Manifest,
        line: None,
    }
}

/// Validate the manifest, the files it references, and the options.
pub fn preflight(manifest_path: &Path, options: &ImportOptions) -> error::Result<Preflight> {
    let mut report = ValidationReport::new();

    for item in options.validate() {
        report.add(item);
    }

    let world_id = match manifest::world_id_from_manifest(manifest_path) {
        Some(id) => id,
        None => {
            report.add(manifest_item(
                "MANIFEST_NAME",
                format!(
                    "{} does not end in '{}'",
                    manifest_path.display(),
                    manifest::MANIFEST_SUFFIX
                ),
            ));
            return Err(ImportError::Validation(report));
        }
    };
    let directory = manifest_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let world_document_path = match rules::validate_world_document(&directory, &world_id) {
        Ok(path) => path,
        Err(item) => {
            report.add(item);
            PathBuf::new()
        }
    };

    let text = match fs::read_to_string(manifest_path) {
        Ok(text) => text,
        Err(e) => {
            report.add(manifest_item(
                "MANIFEST_UNREADABLE",
                format!("cannot read {}: {}", manifest_path.display(), e),
            ));
            return Err(ImportError::Validation(report));
        }
    };

    let (bindings, parse_report) = manifest::parse_manifest(&text);
    report.merge(parse_report);

    for item in rules::validate_texture_files(&directory, &bindings) {
        report.add(item);
    }

    if !report.is_valid {
        return Err(ImportError::Validation(report));
    }

    log::info!(
        "pre-flight ok: {} bindings for world '{}' ({} warnings)",
        bindings.len(),
        world_id,
        report.warning_count
    );
    Ok(Preflight {
        world_id,
        directory,
        world_document_path,
        bindings,
        report,
    })
}

/// Apply validated bindings to a loaded world document.
///
/// Separated from [`import_world`] so callers that already hold a document
/// (or build one another way) can drive the mutation phase directly.
pub fn apply_bindings(
    world: &mut WorldDocument,
    bindings: &[TextureBinding],
    directory: &Path,
    options: &ImportOptions,
) -> error::Result<WorldImportResult> {
    let mut registry = TextureRegistry::new(directory);
    let mut resolver = MeshResolver::new();

    let mut materials_created = vec![];
    let mut meshes_nudged = 0u32;
    let mut cutouts = 0u32;

    for binding in bindings {
        let texture = registry.get_or_load(&binding.texture_name)?;
        let object_id = resolver.resolve_mesh(world, binding.group_index, binding.mesh_index)?;

        if !binding.alpha_flags.opaque_only() {
            let mesh = world
                .object_mut(object_id)
                .mesh
                .as_mut()
                .ok_or_else(|| {
                    anyhow!(
                        "object for mesh {},{} has no geometry",
                        binding.group_index,
                        binding.mesh_index
                    )
                })?;
            mesh_processing::displace_along_shared_normals(mesh, options.transparent_nudge)?;
            meshes_nudged += 1;
        }

        let uv_sets = world
            .object(object_id)
            .mesh
            .as_ref()
            .ok_or_else(|| {
                anyhow!(
                    "object for mesh {},{} has no geometry",
                    binding.group_index,
                    binding.mesh_index
                )
            })?
            .uv_sets
            .clone();

        world.clear_material(object_id);

        let blueprint = build_material(binding, options, texture, &uv_sets)?;
        if binding.alpha_flags.opaque_only() && blueprint.blend_method == BlendMethod::Clip {
            cutouts += 1;
        }

        log::info!(
            "creating material '{}' for {} {} {}",
            blueprint.name,
            binding.texture_name,
            binding.wrap_u,
            binding.wrap_v
        );
        let name = blueprint.name.clone();
        world.insert_material(blueprint)?;
        world.assign_material(object_id, &name);
        materials_created.push(name);
    }

    Ok(WorldImportResult {
        world_id: world.world_id.clone(),
        materials_created,
        meshes_nudged,
        textures_loaded: registry.loaded_count() as u32,
        cutouts,
        warnings: 0,
    })
}

/// Run a complete import: pre-flight, load the world document, apply every
/// binding. Returns the mutated document together with the run summary.
pub fn import_world(
    manifest_path: &Path,
    options: &ImportOptions,
) -> error::Result<(WorldDocument, WorldImportResult)> {
    let pf = preflight(manifest_path, options)?;

    let mut world = loader::load_world_document(&pf.world_document_path, &pf.world_id)?;
    let mut result = apply_bindings(&mut world, &pf.bindings, &pf.directory, options)?;
    result.warnings = pf.report.warning_count;

    log::info!(
        "imported world '{}': {} materials, {} meshes nudged, {} cutouts",
        result.world_id,
        result.materials_created.len(),
        result.meshes_nudged,
        result.cutouts
    );
    Ok((world, result))
}
