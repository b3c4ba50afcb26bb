use image::{
    imageops::{self, FilterType},
    GrayImage, ImageBuffer, Luma, Rgba, RgbaImage,
};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_filled_rect_mut},
    rect::Rect,
};

use super::matrix::BitMatrix;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// Full coverage on a mask means the pixel is cleared
const CLEAR: Luma<u8> = Luma([255]);

// Rasterize
//------------------------------------------------------------------------------

/// Dark pixels take `fg`, everything else is left fully transparent.
pub fn rasterize(matrix: &BitMatrix, fg: Rgba<u8>) -> RgbaImage {
    let sz = matrix.size();
    ImageBuffer::from_fn(sz, sz, |x, y| if matrix.get(x, y) { fg } else { TRANSPARENT })
}

// Mask
//------------------------------------------------------------------------------

/// Mask marking a centred rounded square of `side` pixels with corner radius `side / 2`.
pub fn cutout_mask(size: u32, side: u32) -> GrayImage {
    let mut mask = GrayImage::new(size, size);
    let side = side.min(size);
    if side > 0 {
        let offset = ((size - side) / 2) as i32;
        draw_rounded_square_mut(&mut mask, (offset, offset), side, side / 2, CLEAR);
    }
    mask
}

// Corner circles are inset so the shape stays inside the `side` square, the radius is
// capped at (side - 1) / 2 which also keeps both bands at least one pixel thick
fn draw_rounded_square_mut(
    canvas: &mut GrayImage,
    (left, top): (i32, i32),
    side: u32,
    radius: u32,
    color: Luma<u8>,
) {
    let r = radius.min((side - 1) / 2);
    let band = side - 2 * r;
    let (r, s) = (r as i32, side as i32);

    draw_filled_rect_mut(canvas, Rect::at(left, top + r).of_size(side, band), color);
    draw_filled_rect_mut(canvas, Rect::at(left + r, top).of_size(band, side), color);

    let (near, far) = (r, s - 1 - r);
    for (dx, dy) in [(near, near), (far, near), (near, far), (far, far)] {
        draw_filled_circle_mut(canvas, (left + dx, top + dy), r, color);
    }
}

// Compose
//------------------------------------------------------------------------------

/// Draws `qr` onto a fresh transparent canvas, then clears it wherever `mask` has coverage.
pub fn composite(qr: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    debug_assert!(qr.dimensions() == mask.dimensions(), "Mask and QR sizes differ");

    let (w, h) = qr.dimensions();
    let mut canvas = RgbaImage::from_pixel(w, h, TRANSPARENT);
    imageops::overlay(&mut canvas, qr, 0, 0);

    for (px, Luma([cov])) in canvas.pixels_mut().zip(mask.pixels()) {
        clear(px, *cov);
    }
    canvas
}

// Destination-out: keeps (255 - coverage) of the destination alpha
fn clear(px: &mut Rgba<u8>, coverage: u8) {
    if coverage == 0 {
        return;
    }
    let alpha = px[3] as u16 * (255 - coverage as u16) / 255;
    *px = if alpha == 0 { TRANSPARENT } else { Rgba([px[0], px[1], px[2], alpha as u8]) };
}

// Logo
//------------------------------------------------------------------------------

/// Scales `logo` to a `side` square without smoothing and draws it over the centre of `img`.
pub fn overlay_logo(img: &mut RgbaImage, logo: &RgbaImage, side: u32) {
    if side == 0 || logo.width() == 0 || logo.height() == 0 {
        return;
    }
    let scaled = imageops::resize(logo, side, side, FilterType::Nearest);
    let x = (img.width() as i64 - side as i64) / 2;
    let y = (img.height() as i64 - side as i64) / 2;
    imageops::overlay(img, &scaled, x, y);
}
