use eframe::egui;
use tracing::debug;

use case_studio::catalog::{self, Design, Material, NONE_LABEL};
use case_studio::error::Result;
use case_studio::imports::SUPPORTED_EXTENSIONS;
use case_studio::settings::Settings;
use case_studio::{ExportOutcome, Session, Status};

use super::preview::{PreviewState, render_preview};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);

pub struct CaseDesignerApp {
    session: Session,
    preview_state: PreviewState,
    /// Imports library listing, refreshed after each import
    imported: Vec<String>,
}

impl CaseDesignerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut session = Session::new(settings);
        let imported = session.imported_images();
        // Failures land in the session status and show up in the status bar
        let _ = session.refresh();

        Self {
            session,
            preview_state: PreviewState::new(),
            imported,
        }
    }

    /// Run a session action; its outcome is already recorded in the session status
    fn apply(&mut self, action: impl FnOnce(&mut Session) -> Result<()>) {
        if let Err(e) = action(&mut self.session) {
            debug!(error = %e, "Action failed");
        }
    }

    fn import_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image Files", SUPPORTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        if self.session.import_custom_image(&path).is_ok() {
            self.imported = self.session.imported_images();
        }
    }

    fn export_preview(&mut self) {
        let destination = rfd::FileDialog::new()
            .add_filter("JPEG files", &["jpg"])
            .set_file_name("preview.jpg")
            .save_file()
            .map(|path| path.with_extension("jpg"));

        match self.session.export(destination.as_deref()) {
            Ok(ExportOutcome::Cancelled) => debug!("Export cancelled"),
            Ok(ExportOutcome::Written) => {}
            Err(e) => debug!(error = %e, "Export failed"),
        }
    }

    fn render_selection(&mut self, ui: &mut egui::Ui) {
        let config = self.session.config().clone();

        ui.horizontal(|ui| {
            ui.label("Manufacturer:");
            let mut manufacturer = config.manufacturer.clone();
            egui::ComboBox::from_id_salt("manufacturer")
                .selected_text(manufacturer.as_str())
                .show_ui(ui, |ui| {
                    for name in catalog::manufacturers() {
                        ui.selectable_value(&mut manufacturer, name.to_string(), name);
                    }
                });
            if manufacturer != config.manufacturer {
                self.apply(|s| s.select_manufacturer(&manufacturer));
            }

            ui.label("Model:");
            let mut model = self.session.config().model.clone();
            let before = model.clone();
            egui::ComboBox::from_id_salt("model")
                .selected_text(model.as_str())
                .show_ui(ui, |ui| {
                    let models = catalog::models_for(&manufacturer).unwrap_or_default();
                    for name in models {
                        ui.selectable_value(&mut model, name.to_string(), *name);
                    }
                });
            if model != before {
                self.apply(|s| s.select_model(&model));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Design:");
            let mut design = config.design;
            egui::ComboBox::from_id_salt("design")
                .selected_text(design.map_or(NONE_LABEL, Design::name))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut design, None, NONE_LABEL);
                    for d in Design::ALL {
                        ui.selectable_value(&mut design, Some(d), d.name());
                    }
                });
            if design != config.design {
                self.apply(|s| s.select_design(design));
            }

            ui.label("Material:");
            let mut material = config.material;
            egui::ComboBox::from_id_salt("material")
                .selected_text(material.map_or(NONE_LABEL, Material::name))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut material, None, NONE_LABEL);
                    for m in Material::ALL {
                        ui.selectable_value(&mut material, Some(m), m.name());
                    }
                });
            if material != config.material {
                self.apply(|s| s.select_material(material));
            }

            ui.label("Custom Image:");
            let mut custom = config.custom_image.clone();
            egui::ComboBox::from_id_salt("custom_image")
                .selected_text(custom.as_deref().unwrap_or(NONE_LABEL))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut custom, None, NONE_LABEL);
                    for name in &self.imported {
                        ui.selectable_value(&mut custom, Some(name.clone()), name.as_str());
                    }
                });
            if custom != config.custom_image {
                self.apply(|s| s.select_custom_image(custom));
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Import image").clicked() {
                self.import_image();
            }
            if ui
                .add_enabled(
                    self.session.preview().is_some(),
                    egui::Button::new("Export preview"),
                )
                .clicked()
            {
                self.export_preview();
            }
        });
    }

    fn render_tools(&mut self, ui: &mut egui::Ui) {
        let step = self.session.settings().move_step;
        let zoom_in = self.session.settings().zoom_in_factor;
        let zoom_out = self.session.settings().zoom_out_factor;
        let has_custom = self.session.config().custom_image.is_some();

        ui.add_enabled_ui(has_custom, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Move Up").clicked() {
                    self.apply(|s| s.move_custom_image(0, -step));
                }
                if ui.button("Move Down").clicked() {
                    self.apply(|s| s.move_custom_image(0, step));
                }
                if ui.button("Move Left").clicked() {
                    self.apply(|s| s.move_custom_image(-step, 0));
                }
                if ui.button("Move Right").clicked() {
                    self.apply(|s| s.move_custom_image(step, 0));
                }
                ui.separator();
                if ui.button("Zoom In").clicked() {
                    self.apply(|s| s.scale_custom_image(zoom_in));
                }
                if ui.button("Zoom Out").clicked() {
                    self.apply(|s| s.scale_custom_image(zoom_out));
                }
                ui.separator();
                let config = self.session.config();
                ui.label(format!(
                    "Offset: ({}, {})  Scale: {:.0}%",
                    config.custom_image_position.0,
                    config.custom_image_position.1,
                    config.custom_image_scale * 100.0
                ));
            });
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.session.config().custom_image.is_none() || ctx.wants_keyboard_input() {
            return;
        }
        let step = self.session.settings().move_step;
        let (mut dx, mut dy, mut zoom) = (0, 0, None);

        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowUp) {
                dy -= step;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                dy += step;
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                dx -= step;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                dx += step;
            }
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                zoom = Some(self.session.settings().zoom_in_factor);
            }
            if i.key_pressed(egui::Key::Minus) {
                zoom = Some(self.session.settings().zoom_out_factor);
            }
        });

        if (dx, dy) != (0, 0) {
            self.apply(|s| s.move_custom_image(dx, dy));
        }
        if let Some(factor) = zoom {
            self.apply(|s| s.scale_custom_image(factor));
        }
    }

    fn status_text(&self) -> (String, bool) {
        match self.session.status() {
            Status::Idle => ("Ready".to_string(), false),
            Status::Rendered => {
                let (w, h) = self.session.config().canvas_size;
                (format!("Preview {} x {}", w, h), false)
            }
            Status::Failed(message) => (format!("Error: {}", message), true),
            Status::Exported(path) => (format!("Exported to {}", path.display()), false),
        }
    }
}

impl eframe::App for CaseDesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("options").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_selection(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (text, is_error) = self.status_text();
                if is_error {
                    ui.colored_label(ERROR_COLOR, text);
                } else {
                    ui.label(text);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let config = self.session.config();
                    ui.label(format!("{} {}", config.manufacturer, config.model));
                });
            });
        });

        egui::TopBottomPanel::bottom("tools").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_tools(ui);
            ui.add_space(4.0);
        });

        self.preview_state
            .sync(ctx, self.session.preview(), self.session.generation());

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some((dx, dy)) = render_preview(ui, &mut self.preview_state)
                && self.session.config().custom_image.is_some()
            {
                self.apply(|s| s.move_custom_image(dx, dy));
            }
        });
    }
}
