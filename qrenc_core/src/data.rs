/// Encoding mode of a data segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mode {
    /// Encoding for digits 0-9.
    Num,
    /// Encoding for digits 0-9, capital characters A-Z and ` $%*+-./:`.
    Alnum,
    /// Encoding for arbitrary text or byte string.
    Bytes,
}

impl Mode {
    /// Return the [Mode] that is the most generic between `self` and `other`.
    /// # Example
    /// ```
    /// use qrenc_core::Mode;
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Bytes), Mode::Bytes);
    /// assert_eq!(Mode::Alnum.most_generic(Mode::Num), Mode::Alnum);
    /// ```
    pub fn most_generic(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Determine whether data needing `self` can be stored with `other`, meaning that `other` is the same or a more
    /// generic data representation.
    /// # Example
    /// ```
    /// use qrenc_core::Mode;
    /// assert!(Mode::Alnum.could_be_promoted_to(Mode::Bytes));
    /// assert!(Mode::Bytes.could_be_promoted_to(Mode::Bytes));
    /// assert!(!Mode::Bytes.could_be_promoted_to(Mode::Num));
    /// ```
    pub fn could_be_promoted_to(self, other: Self) -> bool {
        self <= other
    }

    /// Get the 4 bit mode indicator written before a segment.
    pub fn indicator(self) -> u8 {
        match self {
            Mode::Num => 0b0001,
            Mode::Alnum => 0b0010,
            Mode::Bytes => 0b0100,
        }
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value {
            0x30..=0x39 => Mode::Num,
            0x20 | 0x24 | 0x25 | 0x2a | 0x2b | 0x2d..=0x2f | 0x3a | 0x41..=0x5a => Mode::Alnum,
            _ => Mode::Bytes,
        }
    }
}

/// Contiguous segment of data with a [Mode].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub mode: Mode,
    pub len: usize,
}

impl Segment {
    /// Construct a new [Segment] with the given `mode` and `len`.
    pub fn new(mode: Mode, len: usize) -> Self {
        Self { mode, len }
    }

    /// Merge two data segments, choosing the most generic [Mode] of the two.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            mode: self.mode.most_generic(other.mode),
            len: self.len + other.len,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mode_classification() {
        assert_eq!(Mode::from(b'7'), Mode::Num);
        assert_eq!(Mode::from(b'Q'), Mode::Alnum);
        assert_eq!(Mode::from(b':'), Mode::Alnum);
        assert_eq!(Mode::from(b'q'), Mode::Bytes);
        assert_eq!(Mode::from(0xc3), Mode::Bytes);
    }

    #[test]
    fn test_segment_merge() {
        let merged = Segment::new(Mode::Num, 3).merge(&Segment::new(Mode::Alnum, 2));
        assert_eq!(merged, Segment::new(Mode::Alnum, 5));
    }
}
