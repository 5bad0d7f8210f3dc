use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::manifest;

/// A decoded texture plus the queries material synthesis needs.
pub struct LoadedTexture {
    /// Manifest texture name (no extension).
    pub name: String,
    /// On-disk file name; blueprints reference images by this.
    pub file_name: String,
    pub path: PathBuf,
    image: DynamicImage,
}

impl LoadedTexture {
    pub fn channel_count(&self) -> u8 {
        self.image.color().channel_count()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Whether any texel carries an alpha below full coverage. Scans the
    /// whole image, so `Detect` cutout classification is expensive by design.
    pub fn has_translucent_texels(&self) -> bool {
        match &self.image {
            DynamicImage::ImageRgba8(img) => img.pixels().any(|p| p.0[3] < u8::MAX),
            DynamicImage::ImageRgba16(img) => img.pixels().any(|p| p.0[3] < u16::MAX),
            DynamicImage::ImageLumaA8(img) => img.pixels().any(|p| p.0[1] < u8::MAX),
            DynamicImage::ImageLumaA16(img) => img.pixels().any(|p| p.0[1] < u16::MAX),
            _ => false,
        }
    }
}

/// Memoized PNG loader: each referenced texture is decoded once per import
/// run, however many bindings share it.
pub struct TextureRegistry {
    dir: PathBuf,
    loaded: HashMap<String, LoadedTexture>,
}

impl TextureRegistry {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            loaded: HashMap::new(),
        }
    }

    /// Fetch a texture by manifest name, decoding it on first use.
    pub fn get_or_load(&mut self, texture_name: &str) -> Result<&LoadedTexture> {
        match self.loaded.entry(texture_name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = manifest::texture_path(&self.dir, texture_name);
                let image = image::open(&path)
                    .with_context(|| format!("loading texture {}", path.display()))?;
                log::debug!(
                    "loaded texture '{}' ({}x{}, {} channels)",
                    texture_name,
                    image.width(),
                    image.height(),
                    image.color().channel_count()
                );
                Ok(entry.insert(LoadedTexture {
                    name: texture_name.to_string(),
                    file_name: format!("{}.png", texture_name),
                    path,
                    image,
                }))
            }
        }
    }

    /// Number of distinct textures decoded so far.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}
