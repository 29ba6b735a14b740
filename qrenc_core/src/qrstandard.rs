use crate::Segment;
use crate::{Ecl, Mode, Version};

/// Bits taken by a segment's mode indicator.
pub const MODE_INDICATOR_LEN: usize = 4;

/// Bits taken by the structured append header: mode indicator, symbol index, symbol count and parity.
pub const STRUCTURED_HEADER_LEN: usize = MODE_INDICATOR_LEN + 4 + 4 + 8;

/// Maximum number of symbols in a structured append sequence.
pub const MAX_STRUCTURED_SYMBOLS: usize = 16;

/// Determine the QR code's canvas size in pixels for the given `version`.
/// # Example
/// ```
/// use qrenc_core::{qrstandard, Version};
/// assert_eq!(qrstandard::canvas_size(Version::V01), 21);
/// assert_eq!(qrstandard::canvas_size(Version::V40), 177);
/// ```
pub fn canvas_size(version: Version) -> usize {
    17 + version.number() as usize * 4
}

/// Get the group of versions sharing the same character count lengths: 1-9, 10-26 and 27-40.
pub fn char_count_version_group(version: Version) -> usize {
    match version.number() {
        1..=9 => 0,
        10..=26 => 1,
        27..=40 => 2,
        invalid => unreachable!("invalid version '{}'", invalid),
    }
}

/// Get the number of bits of the character count of `mode` for the given `version`.
pub fn char_count_len(mode: Mode, version: Version) -> usize {
    let base = match mode {
        Mode::Bytes => 8,
        Mode::Alnum => 9,
        Mode::Num => 10,
    };
    let group = char_count_version_group(version);
    let factor = match (mode, group) {
        (Mode::Bytes, 0) => 0,
        (Mode::Bytes, _) => 4,
        (Mode::Alnum, group) => group,
        (Mode::Num, group) => group,
    };
    base + 2 * factor
}

/// Get the number of bits needed to store `segment` with its header in the given `version`.
pub fn segment_encoding_len(segment: &Segment, version: Version) -> usize {
    let d = segment.len;
    let header = MODE_INDICATOR_LEN + char_count_len(segment.mode, version);
    let data = match segment.mode {
        Mode::Num => 10 * (d / 3) + [0, 4, 7][d % 3],
        Mode::Alnum => 11 * (d / 2) + 6 * (d % 2),
        Mode::Bytes => 8 * d,
    };
    header + data
}

/// Get the number of modules available for data and error correction, remainder bits included.
pub fn num_raw_data_modules(version: Version) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Get the number of data codewords (error correction excluded) of a symbol.
/// # Example
/// ```
/// use qrenc_core::{qrstandard, Ecl, Version};
/// assert_eq!(qrstandard::num_data_codewords(Version::V01, Ecl::M), 16);
/// assert_eq!(qrstandard::num_data_codewords(Version::V40, Ecl::L), 2956);
/// ```
pub fn num_data_codewords(version: Version, ecl: Ecl) -> usize {
    num_raw_data_modules(version) / 8
        - ecc_codewords_per_block(version, ecl) * num_ecc_blocks(version, ecl)
}

/// Get the number of data bits (error correction excluded) of a symbol.
pub fn num_data_bits(version: Version, ecl: Ecl) -> usize {
    8 * num_data_codewords(version, ecl)
}

#[rustfmt::skip]
const ECC_CODEWORDS_PER_BLOCK: [[u8; 40]; 4] = [
    // 1   2   3   4   5   6   7   8   9  10  11  12  13  14  15  16  17  18  19  20  21  22  23  24  25  26  27  28  29  30  31  32  33  34  35  36  37  38  39  40
    [  7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // L
    [ 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28], // M
    [ 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // Q
    [ 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // H
];

#[rustfmt::skip]
const NUM_ECC_BLOCKS: [[u8; 40]; 4] = [
    // 1   2   3   4   5   6   7   8   9  10  11  12  13  14  15  16  17  18  19  20  21  22  23  24  25  26  27  28  29  30  31  32  33  34  35  36  37  38  39  40
    [  1,  1,  1,  1,  1,  2,  2,  2,  2,  4,  4,  4,  4,  4,  6,  6,  6,  6,  7,  8,  8,  9,  9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25], // L
    [  1,  1,  1,  2,  2,  4,  4,  4,  5,  5,  5,  8,  9,  9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49], // M
    [  1,  1,  2,  2,  4,  4,  6,  6,  8,  8,  8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68], // Q
    [  1,  1,  2,  4,  4,  4,  5,  6,  8,  8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81], // H
];

fn ecl_row(ecl: Ecl) -> usize {
    match ecl {
        Ecl::L => 0,
        Ecl::M => 1,
        Ecl::Q => 2,
        Ecl::H => 3,
    }
}

/// Get the number of error correction codewords in each block.
pub fn ecc_codewords_per_block(version: Version, ecl: Ecl) -> usize {
    ECC_CODEWORDS_PER_BLOCK[ecl_row(ecl)][version.number() as usize - 1] as usize
}

/// Get the number of error correction blocks the codewords are split into.
pub fn num_ecc_blocks(version: Version, ecl: Ecl) -> usize {
    NUM_ECC_BLOCKS[ecl_row(ecl)][version.number() as usize - 1] as usize
}

/// Get the row/column coordinates shared by the alignment pattern centers, in ascending order.
/// # Example
/// ```
/// use qrenc_core::{qrstandard, Version};
/// assert!(qrstandard::alignment_pattern_positions(Version::V01).is_empty());
/// assert_eq!(qrstandard::alignment_pattern_positions(Version::V07), vec![6, 22, 38]);
/// ```
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };
    let size = canvas_size(version);
    let mut positions: Vec<usize> = (0..num_align - 1).map(|k| size - 7 - k * step).collect();
    positions.push(6);
    positions.reverse();
    positions
}

/// Get the `(i, j)` centers of the alignment patterns, leaving out those overlapping the
/// locator patterns.
pub fn alignment_pattern_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let Some(last) = positions.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut centers = Vec::with_capacity(positions.len() * positions.len());
    for (a, &i) in positions.iter().enumerate() {
        for (b, &j) in positions.iter().enumerate() {
            if ![(0, 0), (0, last), (last, 0)].contains(&(a, b)) {
                centers.push((i, j));
            }
        }
    }
    centers
}

/// Get the 18 bit version information (version number followed by its BCH code). Only meaningful
/// for versions 7 and up.
/// # Example
/// ```
/// use qrenc_core::{qrstandard, Version};
/// assert_eq!(qrstandard::version_info(Version::V07), 0x07c94);
/// ```
pub fn version_info(version: Version) -> u32 {
    const GENERATOR: u32 = 0x1f25;
    let data = version.number() as u32;
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * GENERATOR);
    }
    data << 12 | rem
}
