use std::borrow::Cow;
use std::ops::{Bound, RangeBounds, RangeInclusive};

use bitvec::{order::Msb0, vec::BitVec, view::BitView};
use itertools::Itertools;

use qrenc_core::qrstandard;
use qrenc_core::{Ecl, Mask, MaskTable, Version};
use qrenc_core::{Meta, QrCode};
use qrenc_core::{Mode, Segment};

use crate::ecc;
use crate::paint::Painter;

/// Encoder for a QR code.
#[derive(Debug, Clone)]
pub struct Encoder {
    constraints: Constraints,
}

impl Encoder {
    /// Construct a new, unconstrained encoder.
    pub fn new() -> Self {
        Self {
            constraints: Default::default(),
        }
    }

    /// Encode `data`.
    pub fn encode<T: AsRef<[u8]>>(&self, data: T) -> Result<QrCode, EncodingError> {
        let data = self.fold_case(data.as_ref());
        let mut segmenter = Segmenter::new(&data, &self.constraints)?;
        let meta = self.resolve_constraints(&data, &mut segmenter)?;
        let segments = segmenter.segment(meta.version);
        let codewords = SegmentEncoder::new(&meta).encode(&data, segments);
        let qrcode = self.finish(meta, &codewords);
        tracing::debug!(
            bytes = data.len(),
            version = %qrcode.meta().version,
            ecl = %qrcode.meta().ecl,
            mask = %qrcode.meta().mask,
            "encoded symbol"
        );
        Ok(qrcode)
    }

    /// Encode `data` as a structured append sequence: the data is split over as few symbols of
    /// the single allowed [Version] as possible, each one knowing its place in the sequence.
    /// Data fitting in one symbol gives a plain symbol without structured append header.
    ///
    /// The lowest allowed [Ecl] is used for every symbol.
    pub fn encode_structured<T: AsRef<[u8]>>(
        &self,
        data: T,
    ) -> Result<Vec<QrCode>, EncodingError> {
        let (version, vmax) = self.allowed_version_extremes();
        if version != vmax {
            return Err(EncodingError::StructuredVersionRequired);
        }
        let (ecl, _) = self.allowed_ecl_extremes();
        let data = self.fold_case(data.as_ref());
        let capacity = qrstandard::num_data_bits(version, ecl) - qrstandard::STRUCTURED_HEADER_LEN;

        // Greedily take the longest prefix that fits in a symbol.
        let mut chunks = Vec::new();
        let mut rest: &[u8] = &data;
        while !rest.is_empty() {
            if !self.chunk_fits(&rest[..1], version, capacity)? {
                return Err(EncodingError::DataTooBig(data.len(), version, ecl));
            }
            let (mut lo, mut hi) = (1, rest.len());
            while lo < hi {
                let mid = (lo + hi + 1) / 2;
                if self.chunk_fits(&rest[..mid], version, capacity)? {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            let (chunk, tail) = rest.split_at(lo);
            chunks.push(chunk);
            rest = tail;
        }
        if chunks.len() > qrstandard::MAX_STRUCTURED_SYMBOLS {
            return Err(EncodingError::TooManySymbols(
                chunks.len(),
                qrstandard::MAX_STRUCTURED_SYMBOLS,
            ));
        }

        let parity = data.iter().fold(0u8, |acc, byte| acc ^ byte);
        let total = chunks.len();
        let mut symbols = Vec::with_capacity(total);
        for (index, chunk) in chunks.into_iter().enumerate() {
            let meta = Meta {
                version,
                ecl,
                mask: Mask::M000,
            };
            let segments = Segmenter::new(chunk, &self.constraints)?.segment(version);
            let mut encoder = SegmentEncoder::new(&meta);
            // A lone symbol is a plain one.
            if total > 1 {
                encoder.encode_structured_header(index, total, parity);
            }
            let codewords = encoder.encode(chunk, segments);
            symbols.push(self.finish(meta, &codewords));
        }
        tracing::debug!(
            bytes = data.len(),
            symbols = symbols.len(),
            version = %version,
            ecl = %ecl,
            "encoded structured append sequence"
        );
        Ok(symbols)
    }

    /// Add error correction to `codewords` and paint them.
    fn finish(&self, meta: Meta, codewords: &[u8]) -> QrCode {
        let codewords = ecc::add_error_correction(codewords, meta.version, meta.ecl);
        Painter::new(&meta).paint(codewords, &self.constraints.mask)
    }

    /// Check whether `chunk` can be encoded in `capacity` bits with the given `version`.
    fn chunk_fits(
        &self,
        chunk: &[u8],
        version: Version,
        capacity: usize,
    ) -> Result<bool, EncodingError> {
        let segments = Segmenter::new(chunk, &self.constraints)?.segment(version);
        Ok(encoded_len(&segments, version) <= capacity)
    }

    /// Upper-case ASCII letters when the encoder is case insensitive.
    pub(crate) fn fold_case<'a>(&self, data: &'a [u8]) -> Cow<'a, [u8]> {
        if self.constraints.case_sensitive || !data.iter().any(u8::is_ascii_lowercase) {
            Cow::Borrowed(data)
        } else {
            Cow::Owned(data.to_ascii_uppercase())
        }
    }

    /// Transform a range of any type to an inclusive range, given the absolute minimum and maximum values as well as
    /// functions to increment and decrement values.
    fn any_range_to_inclusive<T, R, I, D>(
        range: R,
        abs_min: T,
        abs_max: T,
        incr: I,
        decr: D,
    ) -> RangeInclusive<T>
    where
        T: Clone + Copy,
        R: RangeBounds<T>,
        I: FnOnce(T) -> Option<T>,
        D: FnOnce(T) -> Option<T>,
    {
        let min = match range.start_bound() {
            Bound::Included(&min) => min,
            Bound::Excluded(&min) => incr(min).unwrap_or(abs_max),
            Bound::Unbounded => abs_min,
        };
        let max = match range.end_bound() {
            Bound::Included(&max) => max,
            Bound::Excluded(&max) => decr(max).unwrap_or(abs_min),
            Bound::Unbounded => abs_max,
        };
        min..=max
    }

    /// Get the range of allowed [Version]s.
    pub fn allowed_versions(&self) -> &RangeInclusive<Version> {
        &self.constraints.version
    }

    /// Constrain to the specified `version`.
    pub fn with_version(mut self, version: Version) -> Self {
        self.constraints.version = version..=version;
        self
    }

    /// Constrain [Version] to be inside `range`.
    pub fn with_version_in<T: RangeBounds<Version>>(mut self, range: T) -> Self {
        self.constraints.version = Self::any_range_to_inclusive(
            range,
            Version::V01,
            Version::V40,
            Version::incr,
            Version::decr,
        );
        self
    }

    /// Get the range of allowed [Ecl]s.
    pub fn allowed_ecls(&self) -> &RangeInclusive<Ecl> {
        &self.constraints.ecl
    }

    /// Constrain to the specified `ecl`.
    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.constraints.ecl = ecl..=ecl;
        self
    }

    /// Get the table of allowed [Mask]s.
    pub fn allowed_masks(&self) -> &MaskTable<bool> {
        &self.constraints.mask
    }

    /// Constrain [Mask] to be `mask`.
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.constraints.mask.fill(false);
        self.constraints.mask[mask] = true;
        self
    }

    /// Get the current [Mode] constraint.
    pub fn mode_constraint(&self) -> &ModeConstraint {
        &self.constraints.mode
    }

    /// Constrain the [Mode] selection with `constraint` while encoding.
    pub fn with_mode(mut self, constraint: ModeConstraint) -> Self {
        self.constraints.mode = constraint;
        self
    }

    /// Check whether lower case letters are kept as they are.
    pub fn is_case_sensitive(&self) -> bool {
        self.constraints.case_sensitive
    }

    /// Choose whether lower case letters are kept as they are (`true`, the default) or upper-cased before encoding,
    /// which lets them use the denser alphanumeric mode.
    pub fn with_case_sensitivity(mut self, case_sensitive: bool) -> Self {
        self.constraints.case_sensitive = case_sensitive;
        self
    }

    /// Get the minimum and maximum allowed [Version]s according to the constraints.
    fn allowed_version_extremes(&self) -> (Version, Version) {
        (
            *self.constraints.version.start(),
            *self.constraints.version.end(),
        )
    }

    /// Get the minimum and maximum allowed [Ecl]s according to the constraints.
    fn allowed_ecl_extremes(&self) -> (Ecl, Ecl) {
        (*self.constraints.ecl.start(), *self.constraints.ecl.end())
    }

    /// Resolve the constraints and decide the [Version] and [Ecl].
    fn resolve_constraints(
        &self,
        data: &[u8],
        segmenter: &mut Segmenter,
    ) -> Result<Meta, EncodingError> {
        let (vmin, vmax) = self.allowed_version_extremes();
        let (emin, emax) = self.allowed_ecl_extremes();
        // The smallest version that fits the data with the least demanding ECL.
        let (version, data_enc_len) = vmin
            .up_to(vmax)
            .map(|v| (v, encoded_len(&segmenter.segment(v), v)))
            .find(|&(v, len)| len <= qrstandard::num_data_bits(v, emin))
            .ok_or(EncodingError::DataTooBig(data.len(), vmax, emin))?;
        // Version has been chosen, choose the highest possible ECL.
        let mut ecl = emax;
        while ecl > emin && data_enc_len > qrstandard::num_data_bits(version, ecl) {
            let Some(new_ecl) = ecl.decr() else {
                break;
            };
            ecl = new_ecl;
        }
        Ok(Meta {
            version,
            ecl,
            // The painter picks the mask.
            mask: Mask::M000,
        })
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Constraints {
    ecl: RangeInclusive<Ecl>,
    version: RangeInclusive<Version>,
    mask: MaskTable<bool>,
    mode: ModeConstraint,
    case_sensitive: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        let mut mask = MaskTable::default();
        mask.fill(true);
        Self {
            ecl: Ecl::L..=Ecl::H,
            version: Version::V01..=Version::V40,
            mask,
            mode: ModeConstraint::AnyMixed,
            case_sensitive: true,
        }
    }
}

/// Constraint on the encoding mode of data segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeConstraint {
    /// Allow the free choice of the best [Mode] for each data [Segment].
    AnyMixed,
    /// Enforce a [Mode] or fail encoding if not applicable.
    Only(Mode),
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("cannot encode byte 0x{0:x} using mode {1:?}")]
    CannotEncodeWithMode(u8, Mode),
    #[error("cannot encode {0} B of data with best case version {1} and ECL {2} according to the constraints")]
    DataTooBig(usize, Version, Ecl),
    #[error("structured append needs exactly one allowed version")]
    StructuredVersionRequired,
    #[error("structured append needs {0} symbols but at most {1} are allowed")]
    TooManySymbols(usize, usize),
    #[error("Micro QR version must be between 1 and 4, got {0}")]
    InvalidMicroVersion(u8),
    #[error("Micro QR symbols do not support ECL {0}")]
    MicroEcl(Ecl),
    #[error("cannot encode {0} B of data in a Micro QR symbol up to version M{1} with ECL {2}")]
    MicroDataTooBig(usize, u8, Ecl),
}

/// Get the number of bits taken by all the `segments` in the given `version`.
fn encoded_len(segments: &[Segment], version: Version) -> usize {
    segments
        .iter()
        .map(|segment| qrstandard::segment_encoding_len(segment, version))
        .sum()
}

struct Segmenter {
    uncompressed: Vec<Segment>,
    compressed_cache: [Option<Vec<Segment>>; 3],
}

impl Segmenter {
    pub fn new(data: &[u8], constraints: &Constraints) -> Result<Self, EncodingError> {
        // Determine the ideal mode for each byte regardless of constraints.
        let free_modes = data.iter().map(|&byte| Mode::from(byte));
        // Apply the constraint to create the segments.
        let segmenter = match constraints.mode {
            ModeConstraint::AnyMixed => {
                let uncompressed = free_modes
                    .chunk_by(|mode| *mode)
                    .into_iter()
                    .map(|(mode, chunk)| Segment::new(mode, chunk.count()))
                    .collect();
                Self {
                    uncompressed,
                    compressed_cache: [None, None, None],
                }
            }
            ModeConstraint::Only(constr) => {
                for &byte in data {
                    let desired = Mode::from(byte);
                    if !desired.could_be_promoted_to(constr) {
                        return Err(EncodingError::CannotEncodeWithMode(byte, constr));
                    }
                }
                Self::single(constr, data.len())
            }
        };
        Ok(segmenter)
    }

    /// Build a segmenter which always yields a single segment.
    fn single(mode: Mode, len: usize) -> Self {
        let segments = if len == 0 {
            Vec::new()
        } else {
            vec![Segment::new(mode, len)]
        };
        Self {
            uncompressed: segments.clone(),
            compressed_cache: std::array::from_fn(|_| Some(segments.clone())),
        }
    }

    /// Segment `data` by associating a [Mode] to each group of bytes and smartly apply promotions to minimize the data
    /// storage space.
    pub fn segment(&mut self, version: Version) -> Vec<Segment> {
        // We already have an uncompressed segmentation, we only need to compress it according to
        // `version`.
        use qrstandard::segment_encoding_len as encoding_len;

        let group = qrstandard::char_count_version_group(version);

        // Do we already have some cache about this version group?
        if let Some(compressed) = self.compressed_cache[group].as_ref() {
            return compressed.clone();
        }

        let Some((first, others)) = self.uncompressed.split_first() else {
            return Vec::new();
        };
        let mut compressed = Vec::with_capacity(self.uncompressed.len());
        let mut current = first.clone();
        let mut current_enc_len = encoding_len(&current, version);
        for segment in others {
            let segment_enc_len = encoding_len(segment, version);
            let unmerged_enc_len = current_enc_len + segment_enc_len;
            let merged = current.merge(segment);
            let merged_enc_len = encoding_len(&merged, version);
            // Determine whether merging is convenient.
            if merged_enc_len <= unmerged_enc_len {
                current = merged;
                current_enc_len = merged_enc_len;
            } else {
                compressed.push(current);
                current = segment.clone();
                current_enc_len = segment_enc_len;
            }
        }
        compressed.push(current);
        // Store the result in cache and return it.
        self.compressed_cache[group] = Some(compressed.clone());
        compressed
    }
}

struct SegmentEncoder {
    version: Version,
    capacity: usize,
    bits: BitVec<u8, Msb0>,
}

impl SegmentEncoder {
    /// Construct a new segment encoder.
    pub fn new(meta: &Meta) -> Self {
        let capacity = qrstandard::num_data_bits(meta.version, meta.ecl);
        Self {
            version: meta.version,
            capacity,
            bits: BitVec::with_capacity(capacity),
        }
    }

    /// Encode segments into codewords.
    pub fn encode<S: IntoIterator<Item = Segment>>(mut self, data: &[u8], segments: S) -> Vec<u8> {
        let mut offset = 0;
        for segment in segments.into_iter() {
            self.encode_header(&segment);
            let data = &data[offset..(offset + segment.len)];
            match segment.mode {
                Mode::Bytes => self.encode_body_bytes(data),
                Mode::Alnum => self.encode_body_alnum(data),
                Mode::Num => self.encode_body_num(data),
            }
            offset += segment.len;
        }
        self.add_padding();
        self.bits.into_vec()
    }

    /// Append `len` low bits of `value`, most significant first.
    fn push_bits(&mut self, value: usize, len: usize) {
        let bits = value.view_bits::<Msb0>();
        self.bits.extend_from_bitslice(&bits[bits.len() - len..])
    }

    /// Encode the structured append header: this is symbol `index` (0-based) of `total`, and
    /// `parity` is the XOR of every data byte of the sequence.
    fn encode_structured_header(&mut self, index: usize, total: usize, parity: u8) {
        const STRUCTURED_APPEND_INDICATOR: usize = 0b0011;
        self.push_bits(STRUCTURED_APPEND_INDICATOR, qrstandard::MODE_INDICATOR_LEN);
        self.push_bits(index, 4);
        self.push_bits(total - 1, 4);
        self.push_bits(parity as usize, 8);
    }

    /// Encode the header of the segment, which contains the segment mode indicator and the
    /// character count.
    fn encode_header(&mut self, segment: &Segment) {
        // Encode the mode indicator.
        self.push_bits(segment.mode.indicator() as usize, qrstandard::MODE_INDICATOR_LEN);
        // Encode the character count.
        let char_count_len = qrstandard::char_count_len(segment.mode, self.version);
        self.push_bits(segment.len, char_count_len)
    }

    /// Encode the body of a segment in byte mode.
    fn encode_body_bytes(&mut self, data: &[u8]) {
        self.bits.extend_from_raw_slice(data)
    }

    /// Encode the body of a segment in alphanumeric mode.
    fn encode_body_alnum(&mut self, data: &[u8]) {
        fn encode(c: u8) -> usize {
            match c {
                c @ b'0'..=b'9' => (c - b'0') as usize,
                c @ b'A'..=b'Z' => (c - b'A') as usize + 10,
                b' ' => 36,
                b'$' => 37,
                b'%' => 38,
                b'*' => 39,
                b'+' => 40,
                b'-' => 41,
                b'.' => 42,
                b'/' => 43,
                b':' => 44,
                invalid => panic!("cannot encode byte 0x{:x} in alphanumeric mode", invalid),
            }
        }
        // Collect input into pairs.
        let mut pairs = data.chunks_exact(2);
        for pair in &mut pairs {
            let (first, second) = (encode(pair[0]), encode(pair[1]));
            self.push_bits(45 * first + second, 11);
        }
        // If there is any leftover:
        if let Some(&leftover) = pairs.remainder().first() {
            self.push_bits(encode(leftover), 6);
        }
    }

    /// Encode the body of a segment in numeric mode.
    fn encode_body_num(&mut self, data: &[u8]) {
        const DIGIT_GROUPING: usize = 3;
        for dec_digits in data.chunks(DIGIT_GROUPING) {
            let dec_digits = String::from_utf8_lossy(dec_digits);
            let number: usize = dec_digits
                .parse()
                .ok()
                .filter(|_| dec_digits.bytes().all(|b| b.is_ascii_digit()))
                .unwrap_or_else(|| panic!("cannot encode '{}' in numeric mode", dec_digits));
            self.push_bits(number, 3 * dec_digits.len() + 1);
        }
    }

    /// Append the terminator, complete any last incomplete codeword, and then append the
    /// predefined padding codewords until the end.
    fn add_padding(&mut self) {
        debug_assert!(self.bits.len() <= self.capacity);
        // Terminator of up to four zeros.
        let terminator = (self.capacity - self.bits.len()).min(4);
        self.bits.resize(self.bits.len() + terminator, false);
        // Pad with zeros until the last codeword is filled.
        let last_codeword_missing_bits = (8 - self.bits.len() % 8) % 8;
        self.bits
            .resize(self.bits.len() + last_codeword_missing_bits, false);
        // Append padding codewords.
        let mut padding = 0b11101100u8;
        const PADDING_TOGGLE: u8 = 0b11111101u8;
        while self.capacity - self.bits.len() >= 8 {
            self.bits.extend_from_bitslice(padding.view_bits::<Msb0>());
            padding ^= PADDING_TOGGLE;
        }
    }
}

#[cfg(test)]
mod test {
    use bitvec::{bits, order::Lsb0};

    use super::*;

    fn encode_single_segment<T: AsRef<[u8]>>(
        data: T,
        mode: Mode,
        version: Version,
    ) -> BitVec<u8, Msb0> {
        let meta = Meta {
            version,
            ecl: Ecl::L,
            mask: Mask::M000,
        };
        let mut encoder = SegmentEncoder::new(&meta);
        let data = data.as_ref();
        encoder.encode_header(&Segment::new(mode, data.len()));
        match mode {
            Mode::Bytes => encoder.encode_body_bytes(data),
            Mode::Alnum => encoder.encode_body_alnum(data),
            Mode::Num => encoder.encode_body_num(data),
        }
        encoder.bits
    }

    #[test]
    fn test_segment_header_encoding() {
        let meta = Meta {
            version: Version::V01,
            ecl: Ecl::L,
            mask: Mask::M000,
        };
        let mut encoder = SegmentEncoder::new(&meta);
        encoder.encode_header(&Segment::new(Mode::Bytes, 5));
        assert_eq!(
            encoder.bits,
            bits![
                0, 1, 0, 0, // Mode indicator
                0, 0, 0, 0, 0, 1, 0, 1, // Character count
            ]
        )
    }

    #[test]
    fn test_structured_header_encoding() {
        let meta = Meta {
            version: Version::V05,
            ecl: Ecl::L,
            mask: Mask::M000,
        };
        let mut encoder = SegmentEncoder::new(&meta);
        encoder.encode_structured_header(1, 3, 0xa5);
        #[rustfmt::skip]
        assert_eq!(
            encoder.bits,
            bits![
                0, 0, 1, 1,             // Mode indicator
                0, 0, 0, 1,             // Index
                0, 0, 1, 0,             // Total - 1
                1, 0, 1, 0, 0, 1, 0, 1, // Parity
            ]
        );
    }

    #[test]
    fn test_bytes_encoding() {
        #[rustfmt::skip]
        assert_eq!(
            encode_single_segment("hello", Mode::Bytes, Version::V01),
            bits![
                // Header
                0, 1, 0, 0,             // Mode indicator
                0, 0, 0, 0, 0, 1, 0, 1, // Character count
                // Data
                0, 1, 1, 0, 1, 0, 0, 0, // h
                0, 1, 1, 0, 0, 1, 0, 1, // e
                0, 1, 1, 0, 1, 1, 0, 0, // l
                0, 1, 1, 0, 1, 1, 0, 0, // l
                0, 1, 1, 0, 1, 1, 1, 1, // o
            ]
        );
    }

    #[test]
    fn test_valid_num_encoding() {
        #[rustfmt::skip]
        assert_eq!(
            encode_single_segment("01234567", Mode::Num, Version::V01),
            bits![
                // Header
                0, 0, 0, 1,                     // Mode indicator
                0, 0, 0, 0, 0, 0, 1, 0, 0, 0,   // Character count
                // Data
                0, 0, 0, 0, 0, 0, 1, 1, 0, 0,   // 012
                0, 1, 0, 1, 0, 1, 1, 0, 0, 1,   // 345
                1, 0, 0, 0, 0, 1, 1,            // 67
            ]
        );
    }

    #[test]
    #[should_panic(expected = "cannot encode 'aaa' in numeric mode")]
    fn test_invalid_num_encoding() {
        encode_single_segment("012aaa567", Mode::Num, Version::V25);
    }

    #[test]
    fn test_valid_alnum_encoding() {
        #[rustfmt::skip]
        assert_eq!(
            encode_single_segment("AC-42", Mode::Alnum, Version::V01),
            bits![
                // Header
                0, 0, 1, 0,                         // Mode indicator
                0, 0, 0, 0, 0, 0, 1, 0, 1,          // Character count
                // Data
                0, 0, 1, 1, 1, 0, 0, 1, 1, 1, 0,    // AC
                1, 1, 1, 0, 0, 1, 1, 1, 0, 0, 1,    // -4
                0, 0, 0, 0, 1, 0                    // 2
            ]
        );
    }

    #[test]
    #[should_panic(expected = "cannot encode byte 0x63 in alphanumeric mode")]
    fn test_invalid_alnum_encoding() {
        encode_single_segment("Ac-42", Mode::Alnum, Version::V01);
    }

    /// Test the full encoding (header, data, and padding) of some data using a single mode.
    #[test]
    fn test_bytes_full_encoding() {
        let data = "hello".as_bytes();
        let meta = Meta {version: Version::V01, ecl: Ecl::M, mask: Mask::M000};
        let enc = SegmentEncoder::new(&meta);
        let codewords = enc.encode(data, [Segment::new(Mode::Bytes, data.len())]);
        assert_eq!(codewords.len()*8, qrstandard::num_data_bits(meta.version, meta.ecl));
        assert_eq!(
            &codewords,
            &vec![
                0x40, 0x56, 0x86, 0x56, 0xC6, 0xC6, 0xF0, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
                0x11, 0xEC
            ]
        );
    }

    #[test]
    fn test_alnum_full_encoding() {
        let data = "HELLO WORLD".as_bytes();
        let meta = Meta {version: Version::V01, ecl: Ecl::M, mask: Mask::M000};
        let codewords = SegmentEncoder::new(&meta).encode(data, [Segment::new(Mode::Alnum, data.len())]);
        assert_eq!(
            codewords,
            vec![
                0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11
            ]
        );
    }

    #[test]
    fn test_segmenter_merges_short_runs() {
        let constraints = Constraints::default();
        // A single digit between letters costs more as its own segment.
        let mut segmenter = Segmenter::new(b"ABC1DEF", &constraints).unwrap();
        assert_eq!(
            segmenter.segment(Version::V01),
            vec![Segment::new(Mode::Alnum, 7)]
        );
        // A long numeric run is worth its own segment.
        let mut segmenter = Segmenter::new(b"a0123456789012345678", &constraints).unwrap();
        assert_eq!(
            segmenter.segment(Version::V01),
            vec![Segment::new(Mode::Bytes, 1), Segment::new(Mode::Num, 19)]
        );
    }

    #[test]
    fn test_segmenter_only_mode() {
        let constraints = Constraints {
            mode: ModeConstraint::Only(Mode::Alnum),
            ..Default::default()
        };
        assert!(matches!(
            Segmenter::new(b"abc", &constraints),
            Err(EncodingError::CannotEncodeWithMode(b'a', Mode::Alnum))
        ));
        let constraints = Constraints {
            mode: ModeConstraint::Only(Mode::Bytes),
            ..Default::default()
        };
        let mut segmenter = Segmenter::new(b"123", &constraints).unwrap();
        assert_eq!(
            segmenter.segment(Version::V01),
            vec![Segment::new(Mode::Bytes, 3)]
        );
    }

    #[test]
    fn test_version_selection() {
        let encoder = Encoder::new().with_ecl(Ecl::L);
        // 17 bytes fit in version 1 at ECL L.
        let qrcode = encoder.encode([b'a'; 17]).unwrap();
        assert_eq!(qrcode.meta().version, Version::V01);
        let qrcode = encoder.encode([b'a'; 18]).unwrap();
        assert_eq!(qrcode.meta().version, Version::V02);
        // A minimum version is honoured.
        let qrcode = Encoder::new()
            .with_ecl(Ecl::L)
            .with_version_in(Version::V05..)
            .encode("a")
            .unwrap();
        assert_eq!(qrcode.meta().version, Version::V05);
    }

    #[test]
    fn test_ecl_boost() {
        let qrcode = Encoder::new().with_version(Version::V01).encode("1").unwrap();
        assert_eq!(qrcode.meta().ecl, Ecl::H);
        let qrcode = Encoder::new()
            .with_version(Version::V01)
            .with_ecl(Ecl::M)
            .encode("1")
            .unwrap();
        assert_eq!(qrcode.meta().ecl, Ecl::M);
    }

    #[test]
    fn test_data_too_big() {
        let result = Encoder::new().with_version(Version::V01).encode([b'x'; 18]);
        assert!(matches!(
            result,
            Err(EncodingError::DataTooBig(18, Version::V01, Ecl::L))
        ));
    }

    #[test]
    fn test_case_folding() {
        let sensitive = Encoder::new().with_ecl(Ecl::H);
        let insensitive = sensitive.clone().with_case_sensitivity(false);
        // 20 lower case letters need version 3 as bytes, version 2 as alphanumeric.
        let data = "abcdefghijabcdefghij";
        assert_eq!(sensitive.encode(data).unwrap().meta().version, Version::V03);
        assert_eq!(insensitive.encode(data).unwrap().meta().version, Version::V02);
        let upper = insensitive.encode(data.to_ascii_uppercase()).unwrap();
        assert!(upper.canvas() == insensitive.encode(data).unwrap().canvas());
    }

    #[test]
    fn test_empty_data() {
        let qrcode = Encoder::new().encode("").unwrap();
        assert_eq!(qrcode.meta().version, Version::V01);
    }

    #[test]
    fn test_structured_append() {
        let encoder = Encoder::new().with_version(Version::V01).with_ecl(Ecl::L);
        let data = [b'x'; 40];
        let symbols = encoder.encode_structured(data).unwrap();
        // Version 1-L has 152 data bits: 20 for the header, 12 for the byte header, 15 bytes.
        assert_eq!(symbols.len(), 3);
        assert!(symbols.iter().all(|s| s.meta().version == Version::V01));
    }

    #[test]
    fn test_structured_single_symbol() {
        let encoder = Encoder::new().with_version(Version::V02).with_ecl(Ecl::M);
        let symbols = encoder.encode_structured("short").unwrap();
        assert_eq!(symbols.len(), 1);
        // Without a header the symbol is the same as a regular one.
        let plain = encoder.encode("short").unwrap();
        assert!(symbols[0].canvas() == plain.canvas());
    }

    #[test]
    fn test_structured_append_constraints() {
        let encoder = Encoder::new().with_ecl(Ecl::L);
        assert!(matches!(
            encoder.encode_structured("abc"),
            Err(EncodingError::StructuredVersionRequired)
        ));
        let encoder = encoder.with_version(Version::V01);
        assert!(matches!(
            encoder.encode_structured([b'x'; 15 * 16 + 1]),
            Err(EncodingError::TooManySymbols(17, 16))
        ));
    }
}
