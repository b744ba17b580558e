//! Library of user-supplied custom images copied into a local directory.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{RenderError, Result};

/// Extensions accepted by the import dialog and the library listing
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

#[derive(Debug, Clone)]
pub struct ImportLibrary {
    dir: PathBuf,
}

impl ImportLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Copy an image into the library under its base name and return that name.
    /// An existing file with the same name is replaced.
    pub fn import(&self, source: &Path) -> Result<String> {
        if !is_supported(source) {
            return Err(RenderError::UnsupportedFormat {
                path: source.to_path_buf(),
            });
        }
        if !source.is_file() {
            return Err(RenderError::AssetNotFound {
                path: source.to_path_buf(),
            });
        }
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RenderError::UnsupportedFormat {
                path: source.to_path_buf(),
            })?
            .to_string();

        std::fs::create_dir_all(&self.dir)?;
        let dest = self.path_of(&name);
        if dest != source {
            std::fs::copy(source, &dest)?;
        }
        info!(source = %source.display(), name = %name, "Imported custom image");
        Ok(name)
    }

    /// Sorted names of importable images; empty when the directory does not exist
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported(path))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let library = ImportLibrary::new(dir.path().join("imports"));
        assert!(library.list().is_empty());
    }

    #[test]
    fn test_import_copies_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.PNG");
        std::fs::write(&source, b"bytes").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let library = ImportLibrary::new(dir.path().join("imports"));
        let name = library.import(&source).unwrap();
        assert_eq!(name, "photo.PNG");
        assert!(library.path_of(&name).is_file());
        assert_eq!(library.list(), vec!["photo.PNG".to_string()]);
    }

    #[test]
    fn test_import_rejects_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc.gif");
        std::fs::write(&source, b"GIF89a").unwrap();
        let library = ImportLibrary::new(dir.path().join("imports"));
        assert!(matches!(
            library.import(&source),
            Err(RenderError::UnsupportedFormat { .. })
        ));
    }
}
