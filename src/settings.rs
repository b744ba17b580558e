//! Persistent application settings stored as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings path unavailable")]
    MissingConfigPath,
}

/// When a camera cutout is carved out of the material layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraCutoutPolicy {
    /// Configured rectangles if the model has any, otherwise detect dark blobs in the design
    #[default]
    Auto,
    /// Configured rectangles only
    ExplicitOnly,
    Off,
}

/// Inclusive rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// RGB the alpha channel is flattened onto
    pub background: [u8; 3],
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub assets_dir: PathBuf,
    pub imports_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Box a custom image is shrunk into before scaling
    pub custom_image_box: [u32; 2],
    pub camera_policy: CameraCutoutPolicy,
    /// Model name -> camera cutout rectangles
    pub camera_specs: BTreeMap<String, Vec<CameraRect>>,
    pub move_step: i32,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub export: ExportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("images"),
            imports_dir: PathBuf::from("imports"),
            canvas_width: 540,
            canvas_height: 540,
            custom_image_box: [540, 540],
            camera_policy: CameraCutoutPolicy::default(),
            camera_specs: BTreeMap::new(),
            move_step: 10,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            export: ExportOptions::default(),
        }
    }
}

impl Settings {
    /// Load from the platform config directory, falling back to defaults
    /// when no settings file exists yet
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(settings_file_path()?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            let payload = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&payload)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }
}

fn settings_file_path() -> Result<PathBuf, SettingsError> {
    use directories::ProjectDirs;

    let proj_dirs =
        ProjectDirs::from("com", "CaseStudio", "case-studio").ok_or(SettingsError::MissingConfigPath)?;
    Ok(proj_dirs.config_dir().join(SETTINGS_FILE))
}
