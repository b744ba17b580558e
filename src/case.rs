//! The user's current phone case configuration.

use crate::catalog::{self, Design, Material};

/// Everything the compositor needs to render one preview
#[derive(Debug, Clone, PartialEq)]
pub struct CaseConfiguration {
    pub manufacturer: String,
    pub model: String,
    pub design: Option<Design>,
    pub material: Option<Material>,
    /// Name inside the imports library, or a path for headless renders
    pub custom_image: Option<String>,
    pub custom_image_position: (i32, i32),
    pub custom_image_scale: f64,
    pub canvas_size: (u32, u32),
}

impl Default for CaseConfiguration {
    fn default() -> Self {
        let manufacturer = catalog::manufacturers().next().unwrap_or_default();
        Self {
            manufacturer: manufacturer.to_string(),
            model: catalog::default_model(manufacturer)
                .unwrap_or_default()
                .to_string(),
            design: None,
            material: None,
            custom_image: None,
            custom_image_position: (0, 0),
            custom_image_scale: 1.0,
            canvas_size: (540, 540),
        }
    }
}

impl CaseConfiguration {
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas_size: (width, height),
            ..Self::default()
        }
    }

    /// Switch manufacturer and reset the model to the first one it offers.
    /// Returns false and leaves the configuration untouched for an unknown manufacturer.
    pub fn set_manufacturer(&mut self, manufacturer: &str) -> bool {
        let Some(model) = catalog::default_model(manufacturer) else {
            return false;
        };
        self.manufacturer = manufacturer.to_string();
        self.model = model.to_string();
        true
    }

    /// Select a model of the current manufacturer
    pub fn set_model(&mut self, model: &str) -> bool {
        let known = catalog::models_for(&self.manufacturer)
            .is_some_and(|models| models.contains(&model));
        if known {
            self.model = model.to_string();
        }
        known
    }

    pub fn move_custom_image(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.custom_image_position;
        self.custom_image_position = (x.saturating_add(dx), y.saturating_add(dy));
    }

    /// Multiply the custom image scale. Negative or non-finite factors are ignored.
    pub fn scale_custom_image(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor < 0.0 {
            return false;
        }
        self.custom_image_scale *= factor;
        true
    }

    /// Forget position and scale, e.g. when a different custom image is chosen
    pub fn reset_custom_placement(&mut self) {
        self.custom_image_position = (0, 0);
        self.custom_image_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = CaseConfiguration::default();
        assert_eq!(config.manufacturer, "Apple");
        assert_eq!(config.model, "iPhone SE");
        assert_eq!(config.canvas_size, (540, 540));
        assert!(config.design.is_none());
    }

    #[test]
    fn test_manufacturer_change_resets_model() {
        let mut config = CaseConfiguration::default();
        assert!(config.set_model("iPhone 13"));
        assert!(config.set_manufacturer("Samsung"));
        assert_eq!(config.model, "Galaxy S21");
    }

    #[test]
    fn test_unknown_manufacturer_ignored() {
        let mut config = CaseConfiguration::default();
        assert!(!config.set_manufacturer("Nokia"));
        assert_eq!(config.manufacturer, "Apple");
    }

    #[test]
    fn test_model_must_belong_to_manufacturer() {
        let mut config = CaseConfiguration::default();
        assert!(!config.set_model("Pixel 6"));
        assert_eq!(config.model, "iPhone SE");
    }

    #[test]
    fn test_move_is_unbounded() {
        let mut config = CaseConfiguration::default();
        config.move_custom_image(-5000, 7000);
        assert_eq!(config.custom_image_position, (-5000, 7000));
    }

    #[test]
    fn test_scale_multiplies() {
        let mut config = CaseConfiguration::default();
        config.scale_custom_image(2.0);
        config.scale_custom_image(0.5);
        config.scale_custom_image(0.9);
        assert!((config.custom_image_scale - 0.9).abs() < 1e-12);
        assert!(!config.scale_custom_image(f64::NAN));
        assert!(config.scale_custom_image(0.0));
        assert_eq!(config.custom_image_scale, 0.0);
    }
}
