use qrcode::{Color, EcLevel, QrCode};

use crate::error::{PayQrError, PayQrResult};

/// Largest accepted canvas side in pixels.
pub const MAX_SIZE: u32 = 16_384;

// Bit matrix
//------------------------------------------------------------------------------

/// Pixel-level matrix of a QR symbol scaled into a square canvas. `true` marks a pixel
/// covered by a dark module.
#[derive(Debug, Clone)]
pub struct BitMatrix {
    size: u32,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Encodes `content` at error correction level H and scales it into a `size` square.
    ///
    /// Modules are scaled by the largest whole factor that fits the symbol plus a quiet zone
    /// of `quiet_zone` modules on each side; the symbol is centred and the leftover space
    /// stays light.
    pub fn encode(content: &str, size: u32, quiet_zone: u32) -> PayQrResult<Self> {
        if size > MAX_SIZE {
            return Err(PayQrError::InvalidOptions("size exceeds the maximum canvas side"));
        }
        let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::H)?;
        let w = code.width() as u32;
        let required = quiet_zone
            .checked_mul(2)
            .and_then(|q| q.checked_add(w))
            .ok_or(PayQrError::InvalidOptions("quiet zone is too large"))?;
        if size < required {
            return Err(PayQrError::SizeTooSmall { requested: size, required });
        }

        let multiple = size / required;
        let pad = (size - w * multiple) / 2;
        let colors = code.to_colors();

        let side = size as usize;
        let len = side
            .checked_mul(side)
            .ok_or(PayQrError::InvalidOptions("size exceeds the maximum canvas side"))?;
        let mut bits = vec![false; len];
        for (i, clr) in colors.iter().enumerate() {
            if *clr != Color::Dark {
                continue;
            }
            let (mx, my) = (i as u32 % w, i as u32 / w);
            let (x0, y0) = (pad + mx * multiple, pad + my * multiple);
            for y in y0..y0 + multiple {
                let row = y as usize * side;
                bits[row + x0 as usize..row + (x0 + multiple) as usize].fill(true);
            }
        }

        Ok(Self { size, bits })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        debug_assert!(x < self.size && y < self.size, "Pixel out of bounds: ({x}, {y})");
        self.bits[y as usize * self.size as usize + x as usize]
    }

    pub fn count_dark(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}
