//! Phone case compositing pipeline
//!
//! A render stacks up to three layers on a transparent canvas:
//! 1. The design, fitted and centered; its dark regions form the design mask
//! 2. The material, stretched to the canvas and painted through the design
//!    mask, minus any camera cutout
//! 3. The custom image, keeping only its light pixels, gated by the design
//!    mask and placed at the configured offset and scale
//!
//! Every render starts from scratch, so identical inputs give identical pixels.

mod layers;
mod mask;

use image::imageops::{self, FilterType};
use image::{GenericImageView, GrayImage, RgbaImage};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::assets::{self, AssetStore};
use crate::case::CaseConfiguration;
use crate::error::{RenderError, Result};
use crate::imports::ImportLibrary;
use crate::settings::{CameraCutoutPolicy, CameraRect, Settings};

pub use layers::{
    MAX_CANVAS_EDGE, MAX_CUSTOM_EDGE, TRANSPARENT, fit_centered, fit_within, paste_with_mask,
    scaled_size, set_alpha, stretch,
};
pub use mask::{
    MAX_CAMERA_BLOB_FRACTION, THRESHOLD, alpha_mask, apply_luminance_alpha, darker, design_mask,
    detect_camera_mask, drop_large_blobs, gate_alpha, gray_over_white, luma, open_blobs,
    rect_mask, threshold_dark,
};

/// Knobs of the pipeline that come from settings rather than user selection
#[derive(Debug, Clone)]
pub struct CompositorOptions {
    pub camera_policy: CameraCutoutPolicy,
    pub camera_specs: BTreeMap<String, Vec<CameraRect>>,
    pub custom_image_box: (u32, u32),
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for CompositorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            camera_policy: settings.camera_policy,
            camera_specs: settings.camera_specs.clone(),
            custom_image_box: (settings.custom_image_box[0], settings.custom_image_box[1]),
        }
    }
}

pub struct Compositor {
    assets: AssetStore,
    imports: ImportLibrary,
    options: CompositorOptions,
}

impl Compositor {
    pub fn new(assets: AssetStore, imports: ImportLibrary, options: CompositorOptions) -> Self {
        Self {
            assets,
            imports,
            options,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            AssetStore::new(&settings.assets_dir),
            ImportLibrary::new(&settings.imports_dir),
            CompositorOptions::from(settings),
        )
    }

    /// Library custom image names are resolved against
    pub fn imports(&self) -> &ImportLibrary {
        &self.imports
    }

    /// Render one flattened preview of exactly `config.canvas_size`
    pub fn render(&self, config: &CaseConfiguration) -> Result<RgbaImage> {
        let (width, height) = config.canvas_size;
        let too_large = width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE;
        if width == 0 || height == 0 || too_large {
            return Err(RenderError::InvalidCanvas { width, height });
        }

        let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
        let mut gate: Option<GrayImage> = None;

        if let Some(design) = config.design {
            let design_canvas = fit_centered(&self.assets.load_design(design)?, (width, height));
            let design_mask = design_mask(&design_canvas);
            imageops::overlay(&mut canvas, &design_canvas, 0, 0);
            debug!(design = %design, "Design layer composited");

            if let Some(material) = config.material {
                let mut material_layer =
                    stretch(&self.assets.load_material(material)?, (width, height));
                set_alpha(&mut material_layer, &design_mask);

                let paste_mask = match self.camera_mask(&config.model, &design_canvas) {
                    Some(camera) => darker(&design_mask, &camera),
                    None => design_mask.clone(),
                };
                paste_with_mask(&mut canvas, &material_layer, &paste_mask, 0, 0);
                debug!(material = %material, "Material layer composited");
            }

            gate = Some(design_mask);
        } else if config.material.is_some() {
            debug!("Material ignored without a design");
        }

        if let Some(custom) = &config.custom_image {
            self.draw_custom_image(&mut canvas, custom, config, gate.as_ref())?;
        }

        info!(
            width,
            height,
            design = ?config.design,
            material = ?config.material,
            custom_image = ?config.custom_image,
            "Rendered preview"
        );
        Ok(canvas)
    }

    /// Cutout mask for the model, or `None` when no cutout applies
    fn camera_mask(&self, model: &str, design_canvas: &RgbaImage) -> Option<GrayImage> {
        let (width, height) = design_canvas.dimensions();
        let policy = self.options.camera_policy;
        if policy == CameraCutoutPolicy::Off {
            return None;
        }

        if let Some(rects) = self.options.camera_specs.get(model)
            && !rects.is_empty()
        {
            debug!(model, rects = rects.len(), "Using configured camera cutouts");
            return Some(rect_mask(width, height, rects));
        }

        if policy == CameraCutoutPolicy::Auto {
            debug!(model, "Detecting camera cutouts from design");
            return Some(detect_camera_mask(&gray_over_white(design_canvas)));
        }
        None
    }

    /// Names inside the imports library win over plain paths
    fn resolve_custom_image(&self, custom: &str) -> PathBuf {
        let in_library = self.imports.path_of(custom);
        if in_library.is_file() {
            in_library
        } else {
            PathBuf::from(custom)
        }
    }

    fn draw_custom_image(
        &self,
        canvas: &mut RgbaImage,
        custom: &str,
        config: &CaseConfiguration,
        gate: Option<&GrayImage>,
    ) -> Result<()> {
        let img = assets::load_image(&self.resolve_custom_image(custom))?;
        let fitted = fit_within(img, self.options.custom_image_box);

        let Some((w, h)) = scaled_size(fitted.dimensions(), config.custom_image_scale) else {
            debug!(
                scale = config.custom_image_scale,
                "Custom image scaled to nothing, skipping"
            );
            return Ok(());
        };

        let mut layer = if (w, h) == fitted.dimensions() {
            fitted.to_rgba8()
        } else {
            fitted.resize_exact(w, h, FilterType::Lanczos3).to_rgba8()
        };

        let (x, y) = config.custom_image_position;
        let (x, y) = (x as i64, y as i64);
        apply_luminance_alpha(&mut layer);
        if let Some(gate) = gate {
            gate_alpha(&mut layer, gate, x, y);
        }
        let paste_mask = alpha_mask(&layer);
        paste_with_mask(canvas, &layer, &paste_mask, x, y);

        debug!(x, y, width = w, height = h, "Custom image composited");
        Ok(())
    }
}
