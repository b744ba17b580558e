//! Resizing and pasting of individual layers.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, Rgba, RgbaImage};

/// Starting pixel of every canvas
pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Upper bound on either edge of the render canvas
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Upper bound on either edge of a scaled custom image
pub const MAX_CUSTOM_EDGE: u32 = 8192;

const FILTER: FilterType = FilterType::Lanczos3;

/// Resize keeping the aspect ratio so the long edge meets the canvas, then
/// center on a transparent canvas of exactly `size`
pub fn fit_centered(img: &DynamicImage, size: (u32, u32)) -> RgbaImage {
    let (width, height) = size;
    let resized = img.resize(width, height, FILTER).to_rgba8();
    let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
    let x = (width.saturating_sub(resized.width()) / 2) as i64;
    let y = (height.saturating_sub(resized.height()) / 2) as i64;
    imageops::overlay(&mut canvas, &resized, x, y);
    canvas
}

/// Stretch to exactly `size`, ignoring the aspect ratio
pub fn stretch(img: &DynamicImage, size: (u32, u32)) -> RgbaImage {
    img.resize_exact(size.0, size.1, FILTER).to_rgba8()
}

/// Shrink (never enlarge) to fit inside `bounds`, keeping the aspect ratio
pub fn fit_within(img: DynamicImage, bounds: (u32, u32)) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= bounds.0 && height <= bounds.1 {
        img
    } else {
        img.resize(bounds.0.max(1), bounds.1.max(1), FILTER)
    }
}

/// Dimensions of an image after applying `scale`.
///
/// Returns `None` when either edge rounds to zero. Oversized results are
/// shrunk uniformly so the long edge is at most [`MAX_CUSTOM_EDGE`].
pub fn scaled_size(size: (u32, u32), scale: f64) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let mut w = size.0 as f64 * scale;
    let mut h = size.1 as f64 * scale;
    let long_edge = w.max(h);
    if long_edge > MAX_CUSTOM_EDGE as f64 {
        let shrink = MAX_CUSTOM_EDGE as f64 / long_edge;
        w *= shrink;
        h *= shrink;
    }
    let (w, h) = (w.round() as u32, h.round() as u32);
    (w > 0 && h > 0).then_some((w, h))
}

/// Replace the alpha channel with a mask of the same size
pub fn set_alpha(img: &mut RgbaImage, mask: &GrayImage) {
    debug_assert_eq!(img.dimensions(), mask.dimensions());
    for (p, m) in img.pixels_mut().zip(mask.pixels()) {
        p.0[3] = m.0[0];
    }
}

/// Paste `src` at (x, y) through `mask`: every channel, alpha included, is
/// interpolated between canvas and source by `mask / 255`. Parts outside the
/// canvas are clipped.
pub fn paste_with_mask(dst: &mut RgbaImage, src: &RgbaImage, mask: &GrayImage, x: i64, y: i64) {
    debug_assert_eq!(src.dimensions(), mask.dimensions());
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    let (sw, sh) = (src.width() as i64, src.height() as i64);

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + sw).min(dw);
    let y_end = (y + sh).min(dh);
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    for cy in y_start..y_end {
        for cx in x_start..x_end {
            let (sx, sy) = ((cx - x) as u32, (cy - y) as u32);
            let m = mask.get_pixel(sx, sy).0[0] as u32;
            if m == 0 {
                continue;
            }
            let s = src.get_pixel(sx, sy).0;
            let d = dst.get_pixel_mut(cx as u32, cy as u32);
            for c in 0..4 {
                let blended = (s[c] as u32 * m + d.0[c] as u32 * (255 - m) + 127) / 255;
                d.0[c] = blended as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_centered_wide_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255])));
        let canvas = fit_centered(&img, (100, 100));
        assert_eq!(canvas.dimensions(), (100, 100));
        // 100x50 band centered vertically
        assert_eq!(canvas.get_pixel(50, 10).0[3], 0);
        assert_eq!(canvas.get_pixel(50, 50).0[3], 255);
        assert_eq!(canvas.get_pixel(50, 90).0[3], 0);
    }

    #[test]
    fn test_fit_within_never_enlarges() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(10, 20));
        assert_eq!(fit_within(img, (100, 100)).dimensions(), (10, 20));
        let big = DynamicImage::ImageRgba8(RgbaImage::new(400, 200));
        assert_eq!(fit_within(big, (100, 100)).dimensions(), (100, 50));
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size((100, 50), 1.1), Some((110, 55)));
        assert_eq!(scaled_size((100, 50), 0.001), None);
        assert_eq!(scaled_size((100, 50), 0.0), None);
        assert_eq!(scaled_size((100, 50), 1e9), Some((MAX_CUSTOM_EDGE, MAX_CUSTOM_EDGE / 2)));
    }

    #[test]
    fn test_paste_with_mask_clips() {
        let mut dst = RgbaImage::from_pixel(4, 4, TRANSPARENT);
        let src = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 255]));
        let mask = GrayImage::from_pixel(3, 3, image::Luma([255]));
        paste_with_mask(&mut dst, &src, &mask, -1, 2);

        assert_eq!(dst.get_pixel(0, 2).0, [10, 20, 30, 255]);
        assert_eq!(dst.get_pixel(1, 3).0, [10, 20, 30, 255]);
        assert_eq!(dst.get_pixel(2, 2).0, TRANSPARENT.0);
        assert_eq!(dst.get_pixel(0, 1).0, TRANSPARENT.0);
    }

    #[test]
    fn test_paste_with_zero_mask_keeps_canvas() {
        let mut dst = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 255]));
        let mask = GrayImage::new(2, 2);
        paste_with_mask(&mut dst, &src, &mask, 0, 0);
        assert!(dst.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }
}
