use bitvec::{order::{Lsb0, Msb0}, slice::BitSlice, vec::BitVec, view::BitView};

use qrenc_core::qrstandard;
use qrenc_core::{Ecl, Mask, MaskTable, Meta, QrCode, Version};
use qrenc_core::{Canvas, Module, ReservedAreaAtlas, FINDER_SIZE, TIMING_POS};

use crate::penalty;

pub struct Painter {
    meta: Meta,
    canvas: Canvas,
    atlas: ReservedAreaAtlas,
}

impl Painter {
    /// Create a new [Painter].
    pub fn new(meta: &Meta) -> Self {
        Self {
            meta: meta.clone(),
            canvas: Canvas::filled(qrstandard::canvas_size(meta.version), Module::Light),
            atlas: ReservedAreaAtlas::new(meta.version),
        }
    }

    /// Paint a [QrCode] according to the QR code standards, filling it with `codewords` (error correction
    /// included) and choosing the best mask among the `allowed` ones.
    pub fn paint(mut self, codewords: Vec<u8>, allowed: &MaskTable<bool>) -> QrCode {
        self.paint_patterns();
        if self.meta.version >= Version::V07 {
            self.paint_version_info();
        }
        self.paint_codewords(codewords);
        // Try every allowed mask on a copy and keep the one with the lowest penalty.
        let mut best: Option<(u32, Mask, Canvas)> = None;
        for (mask, _) in allowed.iter().filter(|(_, allowed)| **allowed) {
            let candidate = self.masked(mask);
            let score = penalty::score(&candidate);
            tracing::trace!(mask = %mask, score, "evaluated mask");
            if best.as_ref().map_or(true, |(best_score, _, _)| score < *best_score) {
                best = Some((score, mask, candidate));
            }
        }
        let (mask, canvas) = match best {
            Some((_, mask, canvas)) => (mask, canvas),
            None => (Mask::M000, self.masked(Mask::M000)),
        };
        self.meta.mask = mask;
        QrCode::new(canvas, self.meta).unwrap_or_else(|| {
            unreachable!("the painted canvas always matches the version")
        })
    }

    /// Get a copy of the canvas with `mask` applied to the data modules and the matching format information.
    fn masked(&self, mask: Mask) -> Canvas {
        let mut canvas = self.canvas.clone();
        let function = mask.function();
        let atlas = &self.atlas;
        canvas.toggle(|i, j| !atlas.is_reserved(i, j) && function(i, j));
        paint_format_info(&mut canvas, format_info(self.meta.ecl, mask));
        canvas
    }

    /// Place the codewords on the canvas avoiding the reserved areas like locator patterns,
    /// format information and so on.
    fn paint_codewords(&mut self, codewords: Vec<u8>) {
        let size = self.canvas.size();
        let atlas = &self.atlas;
        let mut indices = (0..(size * (size - 1)))
            .map(|i| qrenc_core::canvas_position(i, size))
            .filter(|&(i, j)| !atlas.is_reserved(i, j));
        let bits: BitVec<u8, Msb0> = BitVec::from_vec(codewords);
        for bit in bits.into_iter() {
            let Some((i, j)) = indices.next() else {
                unreachable!("data size should match the amount of non-reserved indices")
            };
            self.canvas.set(i, j, bit.into());
        }
    }

    #[rustfmt::skip]
    fn paint_patterns(&mut self) {
        let size = self.canvas.size();
        // Locator patterns, with their light separators.
        self.paint_square(Module::Light,        0,        0, 8);
        self.paint_square(Module::Light,        0, size - 8, 8);
        self.paint_square(Module::Light, size - 8,        0, 8);
        for (i, j) in [(0, 0), (0, size - FINDER_SIZE), (size - FINDER_SIZE, 0)] {
            self.paint_square(Module::Dark,  i,     j,     7);
            self.paint_square(Module::Light, i + 1, j + 1, 5);
            self.paint_square(Module::Dark,  i + 2, j + 2, 3);
        }
        // Timing patterns.
        let mut module = Module::Dark;
        for k in 8..(size - 8) {
            self.canvas.set(TIMING_POS, k, module);
            self.canvas.set(k, TIMING_POS, module);
            module = module.inverted();
        }
        // Alignment patterns.
        for (i, j) in qrstandard::alignment_pattern_centers(self.meta.version) {
            self.paint_square(Module::Dark,  i - 2, j - 2, 5);
            self.paint_square(Module::Light, i - 1, j - 1, 3);
            self.canvas.set(i, j, Module::Dark);
        }
        // The always dark module.
        let v = self.meta.version.number() as usize;
        self.canvas.set(4 * v + 9, 8, Module::Dark);
    }

    /// Paint the two copies of the version information, in the 6x3 block left of the top-right locator and the
    /// 3x6 block above the bottom-left one.
    fn paint_version_info(&mut self) {
        let size = self.canvas.size();
        let info = qrstandard::version_info(self.meta.version);
        let bits: &BitSlice<u32, Lsb0> = &info.view_bits()[0..18];
        for (k, bit) in bits.iter().enumerate() {
            let module = Module::from(*bit);
            let (a, b) = (size - 11 + k % 3, k / 3);
            self.canvas.set(b, a, module);
            self.canvas.set(a, b, module);
        }
    }

    fn paint_square(&mut self, value: Module, i: usize, j: usize, size: usize) {
        self.canvas.fill(value, i, j, size, size)
    }
}

/// Paint both copies of the 15 bit `format_info` around the locator patterns.
fn paint_format_info(canvas: &mut Canvas, format_info: u16) {
    const FINFO_OFFSET: usize = 8;
    let size = canvas.size();

    let bits: &BitSlice<u16, Lsb0> = &format_info.view_bits()[0..=15];
    // Draw first 7 bits from the top and from the right.
    for (k, bit) in bits[0..=7].iter().enumerate() {
        let module = Module::from(*bit);
        // Vertical line.
        let ver_offset = if k <= 5 { 0 } else { 1 };
        canvas.set(k + ver_offset, FINFO_OFFSET, module);
        // Horizontal line.
        canvas.set(FINFO_OFFSET, size - 1 - k, module);
    }
    // Draw remaining from the bottom and from the left.
    for (k, bit) in bits[8..=14].iter().enumerate() {
        let module = Module::from(*bit);
        // Vertical line.
        let i_ver = size - 7 + k;
        canvas.set(i_ver, FINFO_OFFSET, module);
        // Horizontal line.
        let hor_offset = if k == 0 { 1 } else { 0 };
        let j_hor = 6 - k + hor_offset;
        canvas.set(FINFO_OFFSET, j_hor, module);
    }
}

/// Compute the 15 bit format information: ECL and mask codes, their BCH code, and the fixed XOR pattern.
fn format_info(ecl: Ecl, mask: Mask) -> u16 {
    const MASK: u16 = 0b101010000010010;
    let ecl_code = ecl.code() as u16;
    let mask_code = mask.code() as u16;
    let code = ecl_code << 3 | mask_code;
    let ecc = match code {
        0b00000 => 0b0000000000,
        0b00001 => 0b0100110111,
        0b00010 => 0b1001101110,
        0b00011 => 0b1101011001,
        0b00100 => 0b0111101011,
        0b00101 => 0b0011011100,
        0b00110 => 0b1110000101,
        0b00111 => 0b1010110010,
        0b01000 => 0b1111010110,
        0b01001 => 0b1011100001,
        0b01010 => 0b0110111000,
        0b01011 => 0b0010001111,
        0b01100 => 0b1000111101,
        0b01101 => 0b1100001010,
        0b01110 => 0b0001010011,
        0b01111 => 0b0101100100,
        0b10000 => 0b1010011011,
        0b10001 => 0b1110101100,
        0b10010 => 0b0011110101,
        0b10011 => 0b0111000010,
        0b10100 => 0b1101110000,
        0b10101 => 0b1001000111,
        0b10110 => 0b0100011110,
        0b10111 => 0b0000101001,
        0b11000 => 0b0101001101,
        0b11001 => 0b0001111010,
        0b11010 => 0b1100100011,
        0b11011 => 0b1000010100,
        0b11100 => 0b0010100110,
        0b11101 => 0b0110010001,
        0b11110 => 0b1011001000,
        0b11111 => 0b1111111111,
        p => unreachable!("invalid functional pattern {:b}", p),
    };
    let pattern: u16 = (code << 10) | ecc;
    pattern ^ MASK
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Encoder;

    /// Read back the first copy of the format information.
    fn read_format_info(canvas: &Canvas) -> u16 {
        let mut info = 0u16;
        let positions = (0..=5)
            .map(|i| (i, 8))
            .chain([(7, 8), (8, 8), (8, 7)])
            .chain((0..=5).rev().map(|j| (8, j)));
        for (k, (i, j)) in positions.enumerate() {
            info |= (canvas.is_dark(i, j) as u16) << k;
        }
        info
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info(Ecl::L, Mask::M000), 0b111011111000100);
        assert_eq!(format_info(Ecl::M, Mask::M000), 0b101010000010010);
        assert_eq!(format_info(Ecl::H, Mask::M111), 0b000100000111011);
    }

    #[test]
    fn test_function_patterns() {
        let qrcode = Encoder::new().with_version(Version::V02).encode("HELLO").unwrap();
        let canvas = qrcode.canvas();
        let size = canvas.size();
        assert_eq!(size, 25);
        // Locator pattern corners and centers.
        for (i, j) in [(0, 0), (0, size - 7), (size - 7, 0)] {
            assert!(canvas.is_dark(i, j));
            assert!(!canvas.is_dark(i + 1, j + 1));
            assert!(canvas.is_dark(i + 3, j + 3));
        }
        // Separators.
        assert!(!canvas.is_dark(7, 7));
        assert!(!canvas.is_dark(size - 8, 7));
        // Timing patterns alternate.
        for k in 8..(size - 8) {
            assert_eq!(canvas.is_dark(6, k), k % 2 == 0);
            assert_eq!(canvas.is_dark(k, 6), k % 2 == 0);
        }
        // Alignment pattern of version 2.
        assert!(canvas.is_dark(18, 18));
        assert!(!canvas.is_dark(17, 17));
        assert!(canvas.is_dark(16, 16));
        // Dark module.
        assert!(canvas.is_dark(size - 8, 8));
    }

    #[test]
    fn test_format_info_copies_match() {
        let qrcode = Encoder::new().with_ecl(Ecl::Q).encode("format information").unwrap();
        let canvas = qrcode.canvas();
        let size = canvas.size();
        let info = read_format_info(canvas);
        assert_eq!(info, format_info(qrcode.meta().ecl, qrcode.meta().mask));
        let mut second = 0u16;
        for k in 0..8 {
            second |= (canvas.is_dark(8, size - 1 - k) as u16) << k;
        }
        for k in 8..15 {
            second |= (canvas.is_dark(size - 15 + k, 8) as u16) << k;
        }
        assert_eq!(info, second);
    }

    #[test]
    fn test_forced_mask() {
        for mask in Mask::ALL {
            let qrcode = Encoder::new().with_mask(mask).encode("mask").unwrap();
            assert_eq!(qrcode.meta().mask, mask);
            assert_eq!(read_format_info(qrcode.canvas()), format_info(qrcode.meta().ecl, mask));
        }
    }

    #[test]
    fn test_version_info() {
        let qrcode = Encoder::new().with_version(Version::V07).encode("v7").unwrap();
        let canvas = qrcode.canvas();
        let size = canvas.size();
        let mut top_right = 0u32;
        let mut bottom_left = 0u32;
        for k in 0..18 {
            let (a, b) = (size - 11 + k % 3, k / 3);
            top_right |= (canvas.is_dark(b, a) as u32) << k;
            bottom_left |= (canvas.is_dark(a, b) as u32) << k;
        }
        assert_eq!(top_right, 0x07c94);
        assert_eq!(bottom_left, 0x07c94);
    }

    #[test]
    fn test_codewords_fill_free_modules() {
        // Every data module receives a codeword bit: an all-dark canvas stays dark where free.
        let meta = Meta {
            version: Version::V03,
            ecl: Ecl::L,
            mask: Mask::M000,
        };
        let mut painter = Painter::new(&meta);
        let raw = qrstandard::num_raw_data_modules(meta.version);
        painter.paint_codewords(vec![0xff; raw / 8]);
        assert_eq!(painter.canvas.dark_count(), raw / 8 * 8);
    }
}
