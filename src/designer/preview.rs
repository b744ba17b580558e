use egui::{Color32, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;

const CHECKER_SIZE: f32 = 12.0;
const CHECKER_LIGHT: Color32 = Color32::from_gray(70);
const CHECKER_DARK: Color32 = Color32::from_gray(55);

/// GPU side of the preview plus in-progress mouse drag
#[derive(Default)]
pub struct PreviewState {
    texture: Option<TextureHandle>,
    /// Session generation the texture was uploaded from
    uploaded_generation: Option<u64>,
    /// Drag distance in preview pixels not yet applied to the custom image
    pending_drag: Vec2,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the preview if the session produced a new one since the last frame
    pub fn sync(&mut self, ctx: &egui::Context, preview: Option<&RgbaImage>, generation: u64) {
        if self.uploaded_generation == Some(generation) {
            return;
        }
        let Some(preview) = preview else {
            return;
        };

        let size = [preview.width() as usize, preview.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("case-preview", color_image, TextureOptions::LINEAR))
            }
        }
        self.uploaded_generation = Some(generation);
    }
}

/// Draw the preview centered in the available space.
///
/// Returns the whole-pixel offset of a finished drag, so the caller can move
/// the custom image by it.
pub fn render_preview(ui: &mut egui::Ui, state: &mut PreviewState) -> Option<(i32, i32)> {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
    let area = response.rect;

    painter.rect_filled(area, 0.0, Color32::from_gray(40));

    let Some(texture) = &state.texture else {
        painter.text(
            area.center(),
            egui::Align2::CENTER_CENTER,
            "No preview",
            egui::FontId::proportional(16.0),
            Color32::GRAY,
        );
        return None;
    };

    // Never upscale; shrink to fit small windows
    let tex_size = texture.size_vec2();
    let fit = (area.width() / tex_size.x).min(area.height() / tex_size.y).min(1.0);
    let shown = tex_size * fit;
    let image_rect = Rect::from_center_size(area.center(), shown);

    paint_checkerboard(&painter, image_rect);
    painter.image(
        texture.id(),
        image_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );
    painter.rect_stroke(image_rect, 0.0, Stroke::new(1.0, Color32::GRAY));

    if response.dragged() {
        state.pending_drag += response.drag_delta() / fit;
    }

    if response.drag_stopped() {
        let delta = std::mem::take(&mut state.pending_drag);
        let offset = (delta.x.round() as i32, delta.y.round() as i32);
        if offset != (0, 0) {
            return Some(offset);
        }
    }
    None
}

fn paint_checkerboard(painter: &egui::Painter, rect: Rect) {
    let cols = (rect.width() / CHECKER_SIZE).ceil() as usize;
    let rows = (rect.height() / CHECKER_SIZE).ceil() as usize;
    for row in 0..rows {
        for col in 0..cols {
            let min = rect.min + Vec2::new(col as f32, row as f32) * CHECKER_SIZE;
            let cell = Rect::from_min_size(min, Vec2::splat(CHECKER_SIZE)).intersect(rect);
            let color = if (row + col) % 2 == 0 {
                CHECKER_LIGHT
            } else {
                CHECKER_DARK
            };
            painter.rect_filled(cell, 0.0, color);
        }
    }
}
