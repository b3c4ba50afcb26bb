use std::error::Error;

use payqr::{generate, ConstraintSet, ExpiryWindow, PaymentFields, RenderOptions};

fn main() -> Result<(), Box<dyn Error>> {
    // Payment expiring two days from today, default styling with a centre hole
    let expiry = ExpiryWindow::default().format_from_today().ok_or("Expiry date out of range")?;
    let fields = PaymentFields::new("merchant-000123", "250.75", expiry);

    let img = generate(&fields, &ConstraintSet::strict(), &RenderOptions::default())?;
    img.save("payment_qr.png")?;

    println!("Payment QR code saved to: payment_qr.png");
    Ok(())
}
