mod prepare;

pub use prepare::prepare;

use std::{borrow::Cow, path::Path};

use chrono::NaiveDate;
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::{
    codec::decode,
    constraint::ConstraintSet,
    error::PayQrResult,
    expiry::today,
    types::ScanResult,
};

// Symbol reading
//------------------------------------------------------------------------------

/// Locates and decodes the first readable QR symbol in `img`.
///
/// Returns `None` when no symbol can be read, which is a normal outcome for a frame or
/// picture without a code.
pub fn read_qr_text(img: &DynamicImage) -> Option<String> {
    debug!("Preparing image...");
    let gray = prepare(img);
    let (w, h) = gray.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        gray.get_pixel(x as u32, y as u32)[0]
    });

    debug!("Detecting grids...");
    let grids = prepared.detect_grids();
    debug!(count = grids.len(), "Decoding grids...");
    grids.iter().find_map(|g| {
        let mut bytes = Vec::new();
        match g.decode_to(&mut bytes) {
            Ok(_) => Some(decode_text(&bytes).into_owned()),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable grid");
                None
            }
        }
    })
}

// Byte segments without an ECI are UTF-8 in practice, anything else is read as windows-1252
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

// Scanner
//------------------------------------------------------------------------------

/// Turns scanned payloads into [`ScanResult`]s. Results are validated when constraints are
/// configured and passed through as parsed otherwise.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    constraints: Option<ConstraintSet>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(constraints: ConstraintSet) -> Self {
        Self { constraints: Some(constraints) }
    }

    pub fn constraints(&self) -> Option<&ConstraintSet> {
        self.constraints.as_ref()
    }

    pub fn scan_text(&self, raw: &str) -> PayQrResult<ScanResult> {
        self.scan_text_on(raw, today())
    }

    pub fn scan_text_on(&self, raw: &str, today: NaiveDate) -> PayQrResult<ScanResult> {
        let res = decode(raw)?;
        if let Some(c) = &self.constraints {
            c.validate_on(&res, today).inspect_err(|e| warn!(error = %e, "Rejected scan"))?;
        }
        info!(identifier = ?res.identifier, "Scanned payment QR");
        Ok(res)
    }

    /// Reads a QR from `img` and scans its text. `Ok(None)` means no symbol was found.
    pub fn scan_image(&self, img: &DynamicImage) -> PayQrResult<Option<ScanResult>> {
        self.scan_image_on(img, today())
    }

    pub fn scan_image_on(
        &self,
        img: &DynamicImage,
        today: NaiveDate,
    ) -> PayQrResult<Option<ScanResult>> {
        match read_qr_text(img) {
            Some(text) => self.scan_text_on(&text, today).map(Some),
            None => {
                info!("No QR found in image");
                Ok(None)
            }
        }
    }

    pub fn scan_file(&self, path: impl AsRef<Path>) -> PayQrResult<Option<ScanResult>> {
        self.scan_file_on(path, today())
    }

    pub fn scan_file_on(
        &self,
        path: impl AsRef<Path>,
        today: NaiveDate,
    ) -> PayQrResult<Option<ScanResult>> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading image...");
        let img = image::open(path)?;
        self.scan_image_on(&img, today)
    }
}

#[cfg(test)]
mod reader_tests {
    use chrono::NaiveDate;
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{decode_text, read_qr_text, Scanner};
    use crate::{
        constraint::ConstraintSet,
        error::PayQrError,
        render::{render, RenderOptions},
        types::{Field, ScanResult},
    };

    const PAYLOAD: &str =
        "pay%3A%2F%2F%3Fidentifier%3D123%26amount%3D1.0%26expiry%3D2%252F10%252F2024";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("héllo".as_bytes()), "héllo");
        assert_eq!(decode_text(b"caf\xe9"), "café");
    }

    #[test]
    fn test_read_rendered() {
        let img = render("Hello, world!", &RenderOptions::default()).unwrap();
        let text = read_qr_text(&DynamicImage::ImageRgba8(img));
        assert_eq!(text.as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn test_read_nothing() {
        let blank = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        assert_eq!(read_qr_text(&DynamicImage::ImageRgba8(blank)), None);
        assert_eq!(Scanner::new().scan_image(&DynamicImage::new_rgba8(50, 50)).unwrap(), None);
    }

    #[test]
    fn test_scan_text_without_constraints() {
        let res = Scanner::new().scan_text("pay://?identifier=&amount=x&expiry=").unwrap();
        assert_eq!(res.amount.as_deref(), Some("x"));
    }

    #[test]
    fn test_scan_text_with_constraints() {
        let scanner = Scanner::with_constraints(ConstraintSet::strict());
        let res = scanner.scan_text_on(PAYLOAD, day(2024, 2, 1)).unwrap();
        assert_eq!(res.identifier.as_deref(), Some("123"));

        let res = scanner.scan_text_on(PAYLOAD, day(2024, 3, 1));
        assert!(matches!(res, Err(PayQrError::InvalidField(Field::Expiry))));
    }

    #[test]
    fn test_scan_text_invalid() {
        let res = Scanner::new().scan_text("https://example.com");
        assert!(matches!(res, Err(PayQrError::InvalidPayload)));
    }

    #[test]
    fn test_scan_image() {
        let opts = RenderOptions::default().with_cutout_scale(0.0);
        let img = render(PAYLOAD, &opts).unwrap();
        let scanner = Scanner::with_constraints(ConstraintSet::default());
        let res = scanner.scan_image(&DynamicImage::ImageRgba8(img)).unwrap();
        let exp = ScanResult {
            identifier: Some("123".into()),
            amount: Some("1.0".into()),
            expiry: Some("2/10/2024".into()),
        };
        assert_eq!(res, Some(exp));
    }

    #[test]
    fn test_scan_image_with_hole() {
        // Version 6, the only alignment pattern sits outside the hole
        let payload = "pay%3A%2F%2F%3Fidentifier%3D1%26amount%3D1%26expiry%3D1";
        let img = render(payload, &RenderOptions::default()).unwrap();
        let res = Scanner::new().scan_image(&DynamicImage::ImageRgba8(img)).unwrap().unwrap();
        assert_eq!(res.identifier.as_deref(), Some("1"));
        assert_eq!(res.expiry.as_deref(), Some("1"));
    }

    #[test]
    fn test_scan_missing_file() {
        let res = Scanner::new().scan_file("does/not/exist.png");
        assert!(matches!(res, Err(PayQrError::Image(_))));
    }
}
