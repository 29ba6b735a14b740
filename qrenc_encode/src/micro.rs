//! Micro QR symbols, M1 to M4.
//!
//! Micro symbols have their own mode indicator lengths, capacities and a single finder pattern,
//! so they are built with the `qrcode` crate and copied into a [Canvas].

use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode as MicroCode};

use qrenc_core::{Canvas, Ecl, Mode, Module};

use crate::{Encoder, EncodingError, ModeConstraint};

/// Highest Micro QR version.
pub const MAX_MICRO_VERSION: u8 = 4;

impl Encoder {
    /// Encode `data` as a Micro QR symbol of version `min_version` or, when the data does not
    /// fit, the next larger one. Uses the lowest allowed [Ecl].
    ///
    /// M1 only holds digits and has no error correction level to choose, M2 and M3 support L
    /// and M, and M4 goes up to Q.
    /// # Example
    /// ```
    /// use qrenc_core::Ecl;
    /// use qrenc_encode::Encoder;
    ///
    /// let canvas = Encoder::new().with_ecl(Ecl::L).encode_micro("12345", 1).unwrap();
    /// assert_eq!(canvas.size(), 11);
    /// ```
    pub fn encode_micro<T: AsRef<[u8]>>(
        &self,
        data: T,
        min_version: u8,
    ) -> Result<Canvas, EncodingError> {
        if !(1..=MAX_MICRO_VERSION).contains(&min_version) {
            return Err(EncodingError::InvalidMicroVersion(min_version));
        }
        let ecl = *self.allowed_ecls().start();
        let level = match ecl {
            Ecl::L => EcLevel::L,
            Ecl::M => EcLevel::M,
            Ecl::Q => EcLevel::Q,
            Ecl::H => return Err(EncodingError::MicroEcl(ecl)),
        };
        let data = self.fold_case(data.as_ref());
        let as_bytes = match self.mode_constraint() {
            ModeConstraint::Only(Mode::Bytes) => true,
            ModeConstraint::Only(mode) => {
                let invalid = data.iter().find(|&&b| !Mode::from(b).could_be_promoted_to(*mode));
                if let Some(&byte) = invalid {
                    return Err(EncodingError::CannotEncodeWithMode(byte, *mode));
                }
                false
            }
            // The optimal segmentation would read non ASCII UTF-8 as Shift JIS kanji.
            ModeConstraint::AnyMixed => !data.is_ascii(),
        };

        for number in min_version..=MAX_MICRO_VERSION {
            match build(&data, number, level, as_bytes) {
                Ok(code) => {
                    tracing::debug!(bytes = data.len(), version = number, %ecl, "encoded micro symbol");
                    return Ok(to_canvas(&code));
                }
                // Smaller versions may lack the level or the mode.
                Err(error) => tracing::trace!(version = number, %error, "micro version rejected"),
            }
        }
        Err(EncodingError::MicroDataTooBig(data.len(), MAX_MICRO_VERSION, ecl))
    }
}

fn build(data: &[u8], number: u8, level: EcLevel, as_bytes: bool) -> Result<MicroCode, QrError> {
    let mut bits = Bits::new(qrcode::Version::Micro(number.into()));
    if as_bytes {
        bits.push_byte_data(data)?;
    } else {
        bits.push_optimal_data(data)?;
    }
    bits.push_terminator(level)?;
    MicroCode::with_bits(bits, level)
}

fn to_canvas(code: &MicroCode) -> Canvas {
    let size = code.width();
    let mut canvas = Canvas::filled(size, Module::Light);
    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color == qrcode::Color::Dark {
            canvas.set(index / size, index % size, Module::Dark);
        }
    }
    canvas
}
