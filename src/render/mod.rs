mod compose;
mod matrix;

pub use compose::TRANSPARENT;
pub use matrix::{BitMatrix, MAX_SIZE};

use image::{Rgba, RgbaImage};
use num_traits::NumCast;
use tracing::{debug, warn};

use crate::error::{PayQrError, PayQrResult};
use compose::{composite, cutout_mask, overlay_logo, rasterize};

// Render options
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width and height of the output in pixels.
    pub size: u32,
    /// Side of the centre cutout as a fraction of `size`.
    pub center_cutout_scale: f32,
    /// Fraction of the cutout left empty around the logo.
    pub logo_padding_scale: f32,
    pub logo: Option<RgbaImage>,
    pub foreground: Rgba<u8>,
    /// Light modules kept around the symbol, counted in modules.
    pub quiet_zone: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 500,
            center_cutout_scale: 0.2,
            logo_padding_scale: 0.2,
            logo: None,
            foreground: Rgba([0, 0, 0, 255]),
            quiet_zone: 4,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_logo(mut self, logo: RgbaImage) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_padding_scale(mut self, scale: f32) -> Self {
        self.logo_padding_scale = scale;
        self
    }

    pub fn with_cutout_scale(mut self, scale: f32) -> Self {
        self.center_cutout_scale = scale;
        self
    }

    pub fn cutout_side(&self) -> u32 {
        scale_px(self.size, self.center_cutout_scale)
    }

    pub fn logo_side(&self) -> u32 {
        scale_px(self.cutout_side(), 1.0 - self.logo_padding_scale)
    }

    fn validate(&self) -> PayQrResult<()> {
        if self.size == 0 {
            return Err(PayQrError::InvalidOptions("size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.center_cutout_scale) {
            return Err(PayQrError::InvalidOptions("center cutout scale must be within 0..=1"));
        }
        if !(0.0..=1.0).contains(&self.logo_padding_scale) {
            return Err(PayQrError::InvalidOptions("logo padding scale must be within 0..=1"));
        }
        Ok(())
    }
}

// Truncates like an integer cast, NaN and negatives give 0
fn scale_px(len: u32, scale: f32) -> u32 {
    NumCast::from((len as f32 * scale).trunc()).unwrap_or(0)
}

// Render
//------------------------------------------------------------------------------

/// Renders `content` as a QR image with a rounded transparent hole in the centre and the
/// optional logo drawn into it.
pub fn render(content: &str, opts: &RenderOptions) -> PayQrResult<RgbaImage> {
    opts.validate()?;
    debug!(size = opts.size, len = content.len(), "Rendering QR");

    debug!("Generating bit matrix...");
    let matrix = BitMatrix::encode(content, opts.size, opts.quiet_zone).inspect_err(|e| {
        warn!(error = %e, "Failed to generate bit matrix");
    })?;

    debug!("Rasterizing matrix...");
    let qr = rasterize(&matrix, opts.foreground);

    debug!("Cutting centre...");
    let mask = cutout_mask(opts.size, opts.cutout_side());
    let mut img = composite(&qr, &mask);

    if let Some(logo) = &opts.logo {
        debug!("Drawing logo...");
        overlay_logo(&mut img, logo, opts.logo_side());
    }

    Ok(img)
}
