use image::{DynamicImage, GrayImage, Luma};

// Luma weights scaled by 1000
const WEIGHTS: [u32; 3] = [299, 587, 114];

/// Flattens `img` onto a white background and converts it to luma.
///
/// Transparent pixels read as white, so a composited QR with a cleared centre or quiet zone
/// binarizes the same as one printed on paper.
pub fn prepare(img: &DynamicImage) -> GrayImage {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let px = rgba.get_pixel(x, y);
        let a = px[3] as u32;
        let luma = (0..3).map(|i| WEIGHTS[i] * px[i] as u32).sum::<u32>() / 1000;
        Luma([((luma * a + 255 * (255 - a)) / 255) as u8])
    })
}

#[cfg(test)]
mod prepare_tests {
    use image::{DynamicImage, Rgba, RgbaImage};
    use test_case::test_case;

    use super::prepare;

    #[test_case(Rgba([0, 0, 0, 255]), 0)]
    #[test_case(Rgba([0, 0, 0, 0]), 255; "transparent reads white")]
    #[test_case(Rgba([255, 255, 255, 255]), 255)]
    #[test_case(Rgba([255, 0, 0, 255]), 76)]
    #[test_case(Rgba([0, 0, 0, 128]), 127; "half transparent black")]
    fn test_prepare(px: Rgba<u8>, exp: u8) {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, px));
        let gray = prepare(&img);
        assert_eq!(gray.dimensions(), (2, 2));
        assert_eq!(gray.get_pixel(1, 1)[0], exp);
    }
}
