//! Controller that owns the current configuration and the last preview.
//!
//! Every mutation re-renders synchronously. A failed render keeps the
//! previous preview and records the failure in [`Status`] instead of
//! dropping it.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::case::CaseConfiguration;
use crate::catalog::{Design, Material};
use crate::compositor::Compositor;
use crate::error::{RenderError, Result};
use crate::export::{ExportOutcome, export_jpeg};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Rendered,
    Failed(String),
    Exported(PathBuf),
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed(_))
    }
}

pub struct Session {
    settings: Settings,
    compositor: Compositor,
    config: CaseConfiguration,
    preview: Option<RgbaImage>,
    status: Status,
    /// Bumped whenever `preview` is replaced, so UIs can refresh textures lazily
    generation: u64,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let compositor = Compositor::from_settings(&settings);
        let (width, height) = settings.canvas_size();
        Self {
            compositor,
            config: CaseConfiguration::with_canvas(width, height),
            settings,
            preview: None,
            status: Status::Idle,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &CaseConfiguration {
        &self.config
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn imported_images(&self) -> Vec<String> {
        self.compositor.imports().list()
    }

    /// Render the current configuration. On failure the last preview stays.
    pub fn refresh(&mut self) -> Result<()> {
        match self.compositor.render(&self.config) {
            Ok(image) => {
                self.preview = Some(image);
                self.generation += 1;
                self.status = Status::Rendered;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Render failed, keeping previous preview");
                self.status = Status::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the whole configuration and re-render
    pub fn set_config(&mut self, config: CaseConfiguration) -> Result<()> {
        self.config = config;
        self.refresh()
    }

    pub fn select_manufacturer(&mut self, manufacturer: &str) -> Result<()> {
        if self.config.set_manufacturer(manufacturer) {
            self.refresh()
        } else {
            Ok(())
        }
    }

    pub fn select_model(&mut self, model: &str) -> Result<()> {
        if self.config.set_model(model) {
            self.refresh()
        } else {
            Ok(())
        }
    }

    pub fn select_design(&mut self, design: Option<Design>) -> Result<()> {
        self.config.design = design;
        self.refresh()
    }

    pub fn select_material(&mut self, material: Option<Material>) -> Result<()> {
        self.config.material = material;
        self.refresh()
    }

    /// Choose an image from the imports library (or none)
    pub fn select_custom_image(&mut self, name: Option<String>) -> Result<()> {
        if self.config.custom_image != name {
            self.config.reset_custom_placement();
        }
        self.config.custom_image = name;
        self.refresh()
    }

    /// Copy a file into the imports library and select it
    pub fn import_custom_image(&mut self, source: &Path) -> Result<String> {
        let name = match self.compositor.imports().import(source) {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "Import failed");
                self.status = Status::Failed(e.to_string());
                return Err(e);
            }
        };
        self.select_custom_image(Some(name.clone()))?;
        Ok(name)
    }

    pub fn move_custom_image(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.config.move_custom_image(dx, dy);
        self.refresh()
    }

    pub fn scale_custom_image(&mut self, factor: f64) -> Result<()> {
        if self.config.scale_custom_image(factor) {
            self.refresh()
        } else {
            Ok(())
        }
    }

    /// Export the preview currently on display.
    /// `None` means the user closed the save dialog; nothing is written.
    pub fn export(&mut self, destination: Option<&Path>) -> Result<ExportOutcome> {
        let Some(path) = destination else {
            return Ok(ExportOutcome::Cancelled);
        };
        let Some(preview) = &self.preview else {
            self.status = Status::Failed(RenderError::NothingToExport.to_string());
            return Err(RenderError::NothingToExport);
        };

        match export_jpeg(preview, path, &self.settings.export) {
            Ok(()) => {
                self.status = Status::Exported(path.to_path_buf());
                Ok(ExportOutcome::Written)
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Export failed");
                self.status = Status::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
