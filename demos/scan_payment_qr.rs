use std::error::Error;

use payqr::{ConstraintSet, Scanner};

fn main() -> Result<(), Box<dyn Error>> {
    // Read the code written by the basic_payment_qr example
    let qr_path = "payment_qr.png";
    let scanner = Scanner::with_constraints(ConstraintSet::strict());

    match scanner.scan_file(qr_path)? {
        Some(res) => {
            println!("Successfully decoded payment QR from: {}", qr_path);
            println!("Identifier: {:?}", res.identifier);
            println!("Amount: {:?}", res.amount);
            println!("Expiry: {:?}", res.expiry);
        }
        None => println!("No QR code found in the image: {}", qr_path),
    }

    Ok(())
}
