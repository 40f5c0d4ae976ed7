//! # qrenc
//!
//! A Rust library for generating QR codes (model 2, versions 1-40) with Reed-Solomon
//! error correction.
//!
//! ## Features
//!
//! - **Automatic sizing**: Picks the smallest version that fits the payload at the chosen level
//! - **Encoding modes**: Numeric, alphanumeric & byte, with optional mixed-mode segmentation
//! - **Reed-Solomon Error Correction**: Built-in error correction with configurable levels (L, M, Q, H)
//! - **Mask selection**: Scores all 8 mask patterns in parallel and keeps the lowest penalty
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrenc::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode(b"Hello, World!", ECLevel::M)?;
//!
//! for row in qr.rows() {
//!     let line: String = row.iter().map(|&dark| if dark { '#' } else { ' ' }).collect();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrenc::{QRBuilder, ECLevel, MaskPattern, Mode, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"HELLO WORLD")
//!     .min_version(Version::new(2)?)   // Smallest version allowed - defaults to 1
//!     .ec_level(ECLevel::Q)            // Error correction level - defaults to ECLevel::M
//!     .mode(Mode::Alphanumeric)        // Encoding mode - if not provided, narrowest mode covering the data
//!     .mask(MaskPattern::new(3)?)      // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! let img = qr.to_image(4);  // 4x scale factor
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
mod qrcode;
mod render;

pub use builder::QRBuilder;
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{decode_format_info, format_info, ECLevel, Metadata, Version};
pub use qrcode::QRCode;

/// Encodes `data` at `ec_level` into the smallest fitting symbol, with every other
/// setting automatic.
pub fn encode(data: &[u8], ec_level: ECLevel) -> QRResult<QRCode> {
    QRBuilder::new(data).ec_level(ec_level).build()
}
