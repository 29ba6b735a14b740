use crate::qrstandard;

/// Version, error correction level and mask of an encoded symbol. The encoder fills it in once
/// the constraints are resolved, and the painter reads it to draw the format and version areas.
#[derive(Debug, Clone)]
pub struct Meta {
    pub version: Version,
    pub ecl: Ecl,
    pub mask: Mask,
}

impl Meta {
    /// Side of the symbol in modules, quiet zone excluded.
    pub fn canvas_size(&self) -> usize {
        qrstandard::canvas_size(self.version)
    }
}

/// Regular QR code version, from 1 (21x21 modules) to 40 (177x177 modules). Micro QR versions
/// are plain numbers and never reach this type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Version {
    V01 =  1, V02 =  2, V03 =  3, V04 =  4, V05 =  5, V06 =  6, V07 =  7, V08 =  8, V09 =  9, V10 = 10,
    V11 = 11, V12 = 12, V13 = 13, V14 = 14, V15 = 15, V16 = 16, V17 = 17, V18 = 18, V19 = 19, V20 = 20,
    V21 = 21, V22 = 22, V23 = 23, V24 = 24, V25 = 25, V26 = 26, V27 = 27, V28 = 28, V29 = 29, V30 = 30,
    V31 = 31, V32 = 32, V33 = 33, V34 = 34, V35 = 35, V36 = 36, V37 = 37, V38 = 38, V39 = 39, V40 = 40,
}

impl Version {
    /// Look up a version by number. 0, the "smallest that fits" setting, has no version.
    /// # Example
    /// ```
    /// use qrenc_core::Version;
    /// assert_eq!(Version::new(7), Some(Version::V07));
    /// assert!(Version::new(0).is_none());
    /// assert!(Version::new(41).is_none());
    /// ```
    pub const fn new(number: u8) -> Option<Self> {
        let version = match number {
             1 => Self::V01,  2 => Self::V02,  3 => Self::V03,  4 => Self::V04,  5 => Self::V05,  6 => Self::V06,  7 => Self::V07,  8 => Self::V08,  9 => Self::V09, 10 => Self::V10,
            11 => Self::V11, 12 => Self::V12, 13 => Self::V13, 14 => Self::V14, 15 => Self::V15, 16 => Self::V16, 17 => Self::V17, 18 => Self::V18, 19 => Self::V19, 20 => Self::V20,
            21 => Self::V21, 22 => Self::V22, 23 => Self::V23, 24 => Self::V24, 25 => Self::V25, 26 => Self::V26, 27 => Self::V27, 28 => Self::V28, 29 => Self::V29, 30 => Self::V30,
            31 => Self::V31, 32 => Self::V32, 33 => Self::V33, 34 => Self::V34, 35 => Self::V35, 36 => Self::V36, 37 => Self::V37, 38 => Self::V38, 39 => Self::V39, 40 => Self::V40,
            _ => return None,
        };
        Some(version)
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Following version, used to turn an excluded lower bound into an included one.
    /// # Example
    /// ```
    /// use qrenc_core::Version;
    /// assert_eq!(Version::V09.incr(), Some(Version::V10));
    /// assert_eq!(Version::V40.incr(), None);
    /// ```
    pub fn incr(self) -> Option<Self> {
        Self::new(self.number() + 1)
    }

    /// Preceding version, used to turn an excluded upper bound into an included one.
    pub fn decr(self) -> Option<Self> {
        Self::new(self.number() - 1)
    }

    /// Candidates of the version search, smallest first: every version from `self` to `last`,
    /// both included. Empty when `last` is smaller.
    /// # Example
    /// ```
    /// use qrenc_core::Version;
    /// let candidates: Vec<_> = Version::V03.up_to(Version::V05).collect();
    /// assert_eq!(candidates, [Version::V03, Version::V04, Version::V05]);
    /// assert_eq!(Version::V05.up_to(Version::V03).count(), 0);
    /// ```
    pub fn up_to(self, last: Version) -> impl Iterator<Item = Version> {
        (self.number()..=last.number()).filter_map(Version::new)
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        value.number()
    }
}

impl std::fmt::Display for Ecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::fmt::Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{:03b}", self.code())
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.number())
    }
}

/// Error correction level, ordered from the fewest to the most recovery codewords. The
/// `setlevel` command selects it by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ecl {
    /// About 7% of the codewords can be restored.
    L,
    /// About 15%.
    M,
    /// About 25%.
    Q,
    /// About 30%.
    H,
}

impl Ecl {
    /// Map a `setlevel` index to a level: 0 is [Ecl::L] and 3 is [Ecl::H].
    /// # Example
    /// ```
    /// use qrenc_core::Ecl;
    /// assert_eq!(Ecl::from_index(2), Some(Ecl::Q));
    /// assert_eq!(Ecl::from_index(4), None);
    /// ```
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::L),
            1 => Some(Self::M),
            2 => Some(Self::Q),
            3 => Some(Self::H),
            _ => None,
        }
    }

    /// Two bit indicator placed before the mask code in the format information. It does not
    /// follow the recovery order.
    /// # Example
    /// ```
    /// use qrenc_core::Ecl;
    /// assert_eq!(Ecl::L.code(), 0b01);
    /// assert_eq!(Ecl::M.code(), 0b00);
    /// ```
    pub fn code(self) -> u8 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }

    /// Next weaker level. The encoder walks down from the strongest allowed level until the
    /// data fits the chosen version.
    /// # Example
    /// ```
    /// use qrenc_core::Ecl;
    /// assert_eq!(Ecl::Q.decr(), Some(Ecl::M));
    /// assert_eq!(Ecl::L.decr(), None)
    /// ```
    pub fn decr(self) -> Option<Self> {
        match self {
            Self::L => None,
            Self::M => Some(Self::L),
            Self::Q => Some(Self::M),
            Self::H => Some(Self::Q),
        }
    }
}

/// Data mask pattern. The painter tries the allowed ones and keeps the lowest penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Mask {
    M000 = 0b000,
    M001 = 0b001,
    M010 = 0b010,
    M011 = 0b011,
    M100 = 0b100,
    M101 = 0b101,
    M110 = 0b110,
    M111 = 0b111,
}

impl Mask {
    /// Every mask, ordered by code. Ties between equal penalties go to the first one.
    pub const ALL: [Mask; NUM_MASKS] = [
        Self::M000,
        Self::M001,
        Self::M010,
        Self::M011,
        Self::M100,
        Self::M101,
        Self::M110,
        Self::M111,
    ];

    /// Three bit mask reference written in the format information.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Condition on row `i` and column `j` under which a data module is flipped.
    /// # Example
    /// ```
    /// use qrenc_core::Mask;
    /// let flips = Mask::M001.function();
    /// assert!(flips(0, 5));
    /// assert!(!flips(1, 5));
    /// ```
    pub fn function(&self) -> fn(usize, usize) -> bool {
        match self {
            Self::M000 => |i, j| (i + j) % 2 == 0,
            Self::M001 => |i, _| i % 2 == 0,
            Self::M010 => |_, j| j % 3 == 0,
            Self::M011 => |i, j| (i + j) % 3 == 0,
            Self::M100 => |i, j| (i / 2 + j / 3) % 2 == 0,
            Self::M101 => |i, j| (i * j) % 2 + (i * j) % 3 == 0,
            Self::M110 => |i, j| ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            Self::M111 => |i, j| ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }
}

const NUM_MASKS: usize = 8;

/// One value per [Mask], such as the set of masks an encoder may pick from.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct MaskTable<T> {
    data: [T; NUM_MASKS],
}

impl<T: Clone> MaskTable<T> {
    pub fn fill(&mut self, value: T) {
        self.data.fill(value)
    }
}

impl<T> MaskTable<T> {
    /// Pairs of mask and value, ordered by mask code.
    pub fn iter(&self) -> impl Iterator<Item = (Mask, &T)> {
        Mask::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MaskTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter().map(|(mask, value)| (mask.to_string(), value))).finish()
    }
}

impl<T> std::ops::Index<Mask> for MaskTable<T> {
    type Output = T;

    fn index(&self, index: Mask) -> &Self::Output {
        &self.data[index.code() as usize]
    }
}

impl<T> std::ops::IndexMut<Mask> for MaskTable<T> {
    fn index_mut(&mut self, index: Mask) -> &mut Self::Output {
        &mut self.data[index.code() as usize]
    }
}
