use std::error::Error;

use qrenc::{ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let data = std::env::args().nth(1).unwrap_or_else(|| "Hello, world! 🌏".to_string());

    let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::H).optimize(true).build()?;
    println!("{}", qr.metadata());
    println!("{}", qr.to_str(1));

    Ok(())
}
