//! # payqr
//!
//! A Rust library for generating and scanning payment QR codes. A payment carries three
//! text fields, an identifier, an amount and an expiry date, packed into a percent-encoded
//! `pay://` URI that is rendered as a QR image with a transparent centre for a logo.
//!
//! ## Features
//!
//! - **Payload Codec**: Encode payment fields into a QR payload and parse scanned payloads back
//! - **Field Constraints**: Pluggable per-field validation applied before encoding and after scanning
//! - **Rendering**: QR images at error correction level H with a rounded centre cutout and optional logo
//! - **Scanning**: Detect and decode payment QR codes from images or image files
//!
//! ## Quick Start
//!
//! ### Generating a Payment QR
//!
//! ```rust,no_run
//! use payqr::{generate, ConstraintSet, PaymentFields, RenderOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fields = PaymentFields::new("123", "1.0", "2/10/2030");
//! let img = generate(&fields, &ConstraintSet::default(), &RenderOptions::default())?;
//! img.save("payment_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Scanning a Payment QR
//!
//! ```rust,no_run
//! use payqr::{ConstraintSet, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = Scanner::with_constraints(ConstraintSet::strict());
//! if let Some(res) = scanner.scan_file("payment_qr.png")? {
//!     println!("Pay {:?} to {:?}", res.amount, res.identifier);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Payload Format
//!
//! The fields are written as `pay://?identifier=<id>&amount=<amt>&expiry=<date>` with each
//! value percent-encoded, and the whole URI is percent-encoded once more. Scanners decode
//! the outer layer, check the shape of the URI and read each field back.
//!
//! ```rust
//! use payqr::{codec, ConstraintSet, PaymentFields};
//!
//! let fields = PaymentFields::new("123", "1.0", "2/10/2024");
//! let payload = codec::encode(&fields, &ConstraintSet::default()).unwrap();
//! assert_eq!(payload, "pay%3A%2F%2F%3Fidentifier%3D123%26amount%3D1.0%26expiry%3D2%252F10%252F2024");
//!
//! let res = codec::decode(&payload).unwrap();
//! assert_eq!(res.expiry.as_deref(), Some("2/10/2024"));
//! ```

pub mod codec;
pub mod constraint;
pub mod error;
pub mod expiry;
pub mod generator;
pub mod reader;
pub mod render;
pub mod types;

pub use codec::{decode, encode, encode_on};
pub use constraint::{ConstraintSet, FieldConstraint};
pub use error::{PayQrError, PayQrResult};
pub use expiry::ExpiryWindow;
pub use generator::{generate, generate_on};
pub use reader::{read_qr_text, Scanner};
pub use render::{render, RenderOptions};
pub use types::{Field, PaymentFields, ScanResult};
