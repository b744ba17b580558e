//! Grayscale masks used to gate the material and custom image layers
//!
//! All masks are `GrayImage`s where 255 means "paint here" and 0 means
//! "leave the canvas alone".

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::settings::CameraRect;

/// Luminance boundary shared by every threshold in the pipeline
pub const THRESHOLD: u8 = 128;

/// Gaussian sigma of both blur passes in camera detection
const CAMERA_BLUR_SIGMA: f32 = 2.0;

/// Dark blobs covering more than this share of the canvas are artwork,
/// not camera rings
pub const MAX_CAMERA_BLOB_FRACTION: f64 = 0.05;

/// ITU-R 601-2 luma with 16-bit fixed point weights (sum = 65536)
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Grayscale of an RGBA image as seen over a white backdrop.
/// Transparent pixels count as white.
pub fn gray_over_white(img: &RgbaImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let over = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Luma([luma(over(r), over(g), over(b))])
    })
}

/// 255 where the gray value is strictly below 128, 0 elsewhere
pub fn threshold_dark(gray: &GrayImage) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        p.0[0] = if p.0[0] < THRESHOLD { 255 } else { 0 };
    }
    out
}

/// Mask of the dark regions of a centered design canvas
pub fn design_mask(design_canvas: &RgbaImage) -> GrayImage {
    threshold_dark(&gray_over_white(design_canvas))
}

/// Pixel-wise minimum of two equally sized masks
pub fn darker(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = a.clone();
    for (p, q) in out.pixels_mut().zip(b.pixels()) {
        p.0[0] = p.0[0].min(q.0[0]);
    }
    out
}

/// White mask with each rectangle filled black. Rectangles are inclusive and
/// clipped to the mask.
pub fn rect_mask(width: u32, height: u32, rects: &[CameraRect]) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([255]));
    if width == 0 || height == 0 {
        return mask;
    }
    for rect in rects {
        let (x0, x1) = (rect.x0.min(rect.x1), rect.x0.max(rect.x1));
        let (y0, y1) = (rect.y0.min(rect.y1), rect.y0.max(rect.y1));
        if x0 >= width || y0 >= height {
            continue;
        }
        for y in y0..=y1.min(height - 1) {
            for x in x0..=x1.min(width - 1) {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
    }
    mask
}

/// Morphological opening with a 3x3 window: erosion first, then dilation.
/// Removes specks narrower than three pixels and keeps larger blobs.
pub fn open_blobs(mask: &GrayImage) -> GrayImage {
    let eroded = erode(mask, Norm::LInf, 1);
    dilate(&eroded, Norm::LInf, 1)
}

/// Clear every 8-connected blob of more than `max_area` pixels
pub fn drop_large_blobs(mask: &GrayImage, max_area: u32) -> GrayImage {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<u32> = Vec::new();
    for label in labels.pixels() {
        let label = label.0[0] as usize;
        if label >= areas.len() {
            areas.resize(label + 1, 0);
        }
        areas[label] += 1;
    }

    let mut out = mask.clone();
    for (p, label) in out.pixels_mut().zip(labels.pixels()) {
        let label = label.0[0] as usize;
        if label != 0 && areas[label] > max_area {
            p.0[0] = 0;
        }
    }
    out
}

/// Derive a camera cutout mask from the grayscale design.
///
/// Blur, keep the dark regions, open them and drop blobs too large to be a
/// camera ring, then blur and threshold again. The second threshold flips
/// polarity: detected blobs end at 0 (excluded from material placement)
/// and the rest of the canvas at 255.
pub fn detect_camera_mask(design_gray: &GrayImage) -> GrayImage {
    let (width, height) = design_gray.dimensions();
    let max_area = (width as f64 * height as f64 * MAX_CAMERA_BLOB_FRACTION) as u32;

    let blurred = gaussian_blur_f32(design_gray, CAMERA_BLUR_SIGMA);
    let blobs = open_blobs(&threshold_dark(&blurred));
    let rings = drop_large_blobs(&blobs, max_area);
    let smoothed = gaussian_blur_f32(&rings, CAMERA_BLUR_SIGMA);
    threshold_dark(&smoothed)
}

/// Replace each pixel's alpha with `min(alpha, luma > 128 ? 255 : 0)`
pub fn apply_luminance_alpha(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let Rgba([r, g, b, a]) = *p;
        let light = if luma(r, g, b) > THRESHOLD { 255 } else { 0 };
        p.0[3] = a.min(light);
    }
}

/// Limit a layer's alpha to a canvas-sized mask, with the layer placed at (x, y).
/// Layer pixels falling outside the mask become transparent.
pub fn gate_alpha(layer: &mut RgbaImage, mask: &GrayImage, x: i64, y: i64) {
    let (mw, mh) = (mask.width() as i64, mask.height() as i64);
    for (lx, ly, p) in layer.enumerate_pixels_mut() {
        let cx = x + lx as i64;
        let cy = y + ly as i64;
        let gate = if cx >= 0 && cy >= 0 && cx < mw && cy < mh {
            mask.get_pixel(cx as u32, cy as u32).0[0]
        } else {
            0
        };
        p.0[3] = p.0[3].min(gate);
    }
}

/// Alpha channel of an RGBA image as a mask
pub fn alpha_mask(img: &RgbaImage) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| Luma([img.get_pixel(x, y).0[3]]))
}
