//! QR code encoder: data segmentation, bit stream, Reed-Solomon error correction, placement and
//! mask selection. Micro QR symbols are delegated to the `qrcode` crate.
//!
//! # Example
//! ```
//! use qrenc_core::{Ecl, Version};
//! use qrenc_encode::Encoder;
//!
//! let qrcode = Encoder::new().with_ecl(Ecl::M).encode("HELLO WORLD").unwrap();
//! assert_eq!(qrcode.meta().version, Version::V01);
//! assert_eq!(qrcode.width(), 21);
//! ```

mod ecc;
mod encode;
mod micro;
mod paint;
mod penalty;

pub use encode::{Encoder, EncodingError, ModeConstraint};
pub use micro::MAX_MICRO_VERSION;
