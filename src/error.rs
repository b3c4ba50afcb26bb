use thiserror::Error;

use crate::types::Field;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PayQrError {
    // Payload
    #[error("The {0} field is invalid")]
    InvalidField(Field),
    #[error("The QR code is invalid")]
    InvalidPayload,

    // Render
    #[error("Failed to encode QR symbol: {0}")]
    EncodingFailure(#[from] qrcode::types::QrError),
    #[error("Requested size {requested}px is too small, symbol needs at least {required}px")]
    SizeTooSmall { requested: u32, required: u32 },
    #[error("Invalid render options: {0}")]
    InvalidOptions(&'static str),

    // Reader
    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

impl PayQrError {
    /// Field that failed its constraint, if this is a field error.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidField(f) => Some(*f),
            _ => None,
        }
    }
}

pub type PayQrResult<T> = Result<T, PayQrError>;
