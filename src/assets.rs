//! Design and material bitmaps on local disk.
//!
//! Assets live under `{root}/{category}/{name}.png`, e.g. `images/designs/Design1.png`.

use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::{Design, Material};
use crate::error::{RenderError, Result};

pub const DESIGNS_DIR: &str = "designs";
pub const MATERIALS_DIR: &str = "materials";

#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn design_path(&self, design: Design) -> PathBuf {
        self.root
            .join(DESIGNS_DIR)
            .join(format!("{}.png", design.name()))
    }

    pub fn material_path(&self, material: Material) -> PathBuf {
        self.root
            .join(MATERIALS_DIR)
            .join(format!("{}.png", material.name()))
    }

    pub fn load_design(&self, design: Design) -> Result<DynamicImage> {
        load_image(&self.design_path(design))
    }

    pub fn load_material(&self, material: Material) -> Result<DynamicImage> {
        load_image(&self.material_path(material))
    }
}

/// Open and decode an image, telling a missing file apart from a bad one
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(RenderError::AssetNotFound {
            path: path.to_path_buf(),
        });
    }

    let decode_err = |source| RenderError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode_err)?;

    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Loaded image"
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_paths() {
        let store = AssetStore::new("images");
        assert_eq!(
            store.design_path(Design::Design2),
            Path::new("images/designs/Design2.png")
        );
        assert_eq!(
            store.material_path(Material::Holz),
            Path::new("images/materials/Holz.png")
        );
    }

    #[test]
    fn test_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        let err = store.load_design(Design::Design1).unwrap_err();
        assert!(matches!(err, RenderError::AssetNotFound { .. }));
    }

    #[test]
    fn test_corrupt_asset() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join(MATERIALS_DIR)).unwrap();
        std::fs::write(store.material_path(Material::Kork), b"not an image").unwrap();
        let err = store.load_material(Material::Kork).unwrap_err();
        assert!(matches!(err, RenderError::ImageDecode { .. }));
    }
}
