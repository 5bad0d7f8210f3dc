use std::path::{Path, PathBuf};

use super::report::{ValidationCategory, ValidationItem, ValidationSeverity};
use crate::manifest::{self, TextureBinding};

/// Check that every referenced texture exists next to the manifest.
pub fn validate_texture_files(dir: &Path, bindings: &[TextureBinding]) -> Vec<ValidationItem> {
    let mut items = vec![];
    for binding in bindings {
        let path = manifest::texture_path(dir, &binding.texture_name);
        if !path.exists() {
            items.push(ValidationItem {
                code: "TEXTURE_NOT_FOUND".to_string(),
                message: format!(
                    "Line {}: texture '{}' not found at {}",
                    binding.source_line,
                    binding.texture_name,
                    path.display()
                ),
                severity: ValidationSeverity::Error,
                category: ValidationCategory::Texture,
                line: Some(binding.source_line),
            });
        }
    }
    items
}

/// Locate the world mesh-hierarchy document next to the manifest.
pub fn validate_world_document(dir: &Path, world_id: &str) -> Result<PathBuf, ValidationItem> {
    let candidates = manifest::world_document_candidates(dir, world_id);
    for candidate in &candidates {
        if candidate.exists() {
            return Ok(candidate.clone());
        }
    }
    Err(ValidationItem {
        code: "WORLD_DOC_NOT_FOUND".to_string(),
        message: format!(
            "World document not found, looked for {}",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        severity: ValidationSeverity::Error,
        category: ValidationCategory::Scene,
        line: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;

    #[test]
    fn missing_texture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (bindings, _) = parse_manifest("0,0:missing:1:0:0:Wrap, Wrap\n");
        let items = validate_texture_files(dir.path(), &bindings);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "TEXTURE_NOT_FOUND");
        assert_eq!(items[0].line, Some(1));
    }

    #[test]
    fn present_texture_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.png"), b"notapng").unwrap();
        let (bindings, _) = parse_manifest("0,0:ok:1:0:0:Wrap, Wrap\n");
        assert!(validate_texture_files(dir.path(), &bindings).is_empty());
    }

    #[test]
    fn world_document_lookup_prefers_glb() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_world_document(dir.path(), "tt07").is_err());

        std::fs::write(dir.path().join("tt07-world.gltf"), b"{}").unwrap();
        let found = validate_world_document(dir.path(), "tt07").unwrap();
        assert!(found.ends_with("tt07-world.gltf"));

        std::fs::write(dir.path().join("tt07-world.glb"), b"glTF").unwrap();
        let found = validate_world_document(dir.path(), "tt07").unwrap();
        assert!(found.ends_with("tt07-world.glb"));
    }
}
