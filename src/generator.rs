use chrono::NaiveDate;
use image::RgbaImage;
use tracing::info;

use crate::{
    codec::encode_on,
    constraint::ConstraintSet,
    error::PayQrResult,
    expiry::today,
    render::{render, RenderOptions},
    types::PaymentFields,
};

/// Validates `fields`, encodes them and renders the payment QR.
pub fn generate(
    fields: &PaymentFields,
    constraints: &ConstraintSet,
    opts: &RenderOptions,
) -> PayQrResult<RgbaImage> {
    generate_on(fields, constraints, opts, today())
}

/// [`generate`] with an explicit reference date for date constraints.
pub fn generate_on(
    fields: &PaymentFields,
    constraints: &ConstraintSet,
    opts: &RenderOptions,
    today: NaiveDate,
) -> PayQrResult<RgbaImage> {
    let payload = encode_on(fields, constraints, today)?;
    let img = render(&payload, opts)?;
    info!(identifier = %fields.identifier, size = opts.size, "Payment QR generated");
    Ok(img)
}
