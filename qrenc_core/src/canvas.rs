use bitvec::vec::BitVec;

use crate::{qrstandard, Version};

/// Module (aka, a pixel) of a QR code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    Light,
    Dark,
}

impl Module {
    /// Get the inverted module.
    /// # Example
    /// ```
    /// use qrenc_core::Module;
    /// assert_eq!(Module::Dark.inverted(), Module::Light);
    /// assert_eq!(Module::Light.inverted(), Module::Dark);
    /// ```
    pub fn inverted(&self) -> Self {
        match self {
            Module::Dark => Module::Light,
            Module::Light => Module::Dark,
        }
    }
}

impl From<bool> for Module {
    fn from(value: bool) -> Self {
        match value {
            true => Module::Dark,
            false => Module::Light,
        }
    }
}

impl From<Module> for bool {
    fn from(value: Module) -> Self {
        match value {
            Module::Dark => true,
            Module::Light => false,
        }
    }
}

/// A square matrix of bits.
#[derive(Clone, PartialEq, Eq)]
struct BitMatrix {
    data: BitVec,
    size: usize,
}

impl BitMatrix {
    /// Return a matrix of size `size` filled with `value`.
    pub fn filled(size: usize, value: bool) -> Self {
        Self {
            data: BitVec::repeat(value, size * size),
            size,
        }
    }

    /// Get the size of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the 1D index of the data array corresponding to position `(i, j)`, checking for validity.
    #[inline]
    fn linearized_index(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.size && j < self.size {
            Some(self.size * i + j)
        } else {
            None
        }
    }

    /// Get the 1D index of the data array corresponding to position `(i, j)`, checking for validity and panicking if invalid.
    /// # Panics
    /// Panics if either `i` or `j` is out of bounds.
    #[inline]
    fn linearized_index_unwrapped(&self, i: usize, j: usize) -> usize {
        self.linearized_index(i, j).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the size is {} but the index is ({}, {})",
                self.size, i, j
            )
        })
    }

    /// Get the bit at position `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        self.data.get(self.linearized_index(i, j)?).map(|bit| *bit)
    }

    /// Set the bit at position `(i, j)`.
    /// # Panics
    /// Panics if position `(i, j)` is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        let index = self.linearized_index_unwrapped(i, j);
        self.data.set(index, value)
    }

    /// Fill a rectangle with it upper-left corner at (`i`, `j`) of size `width` and `height` with
    /// `value`.
    /// # Panics
    /// Panics if any access is out of bounds.
    #[inline]
    pub fn fill(&mut self, value: bool, i: usize, j: usize, width: usize, height: usize) {
        if width == 0 {
            return;
        }
        let (jmin, jmax) = (j, j + width);
        for line in i..(i + height) {
            let range = self.linearized_index_unwrapped(line, jmin)
                ..=self.linearized_index_unwrapped(line, jmax - 1);
            self.data[range].fill(value)
        }
    }

    /// Count the set bits.
    pub fn count_ones(&self) -> usize {
        self.data.count_ones()
    }
}

/// A square canvas of modules.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    matrix: BitMatrix,
}

impl Canvas {
    /// Return a canvas of size `size` filled with `module`.
    #[inline]
    pub fn filled(size: usize, module: Module) -> Self {
        Self {
            matrix: BitMatrix::filled(size, module.into()),
        }
    }

    /// Get the size of the canvas.
    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Get the module at position `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<Module> {
        self.matrix.get(i, j).map(Module::from)
    }

    /// Check whether the module at position `(i, j)` is dark. Positions outside the canvas are
    /// light, which is how the quiet zone around a symbol looks.
    /// # Example
    /// ```
    /// use qrenc_core::{Canvas, Module};
    /// let canvas = Canvas::filled(3, Module::Dark);
    /// assert!(canvas.is_dark(2, 2));
    /// assert!(!canvas.is_dark(3, 0));
    /// ```
    #[inline]
    pub fn is_dark(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j).unwrap_or(false)
    }

    /// Set the module at position `(i, j)`.
    /// # Panics
    /// Panics if position `(i, j)` is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Module) {
        self.matrix.set(i, j, value.into())
    }

    /// Toggle the pixels in the canvas according to `rule`: wherever `rule(i, j)` is true, the
    /// pixel at position `(i, j)` is toggled.
    #[inline]
    pub fn toggle<F: Fn(usize, usize) -> bool>(&mut self, rule: F) {
        let size = self.size();
        for i in 0..size {
            for j in 0..size {
                if rule(i, j) {
                    let index = self.matrix.linearized_index_unwrapped(i, j);
                    let bit = self.matrix.data[index];
                    self.matrix.data.set(index, !bit);
                }
            }
        }
    }

    /// Fill a rectangle with it upper-left corner at (`i`, `j`) of size `width` and `height` with
    /// `value`.
    /// # Panics
    /// Panics if any access is out of bounds.
    #[inline]
    pub fn fill(&mut self, value: Module, i: usize, j: usize, width: usize, height: usize) {
        self.matrix.fill(value.into(), i, j, width, height)
    }

    /// Count the dark modules.
    pub fn dark_count(&self) -> usize {
        self.matrix.count_ones()
    }
}

impl AsRef<Canvas> for Canvas {
    fn as_ref(&self) -> &Canvas {
        self
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.size() {
            for j in 0..self.size() {
                f.write_str(if self.is_dark(i, j) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Side of a finder pattern.
pub const FINDER_SIZE: usize = 7;
/// Finder pattern plus its separator.
const FINDER_TOT_SIZE: usize = FINDER_SIZE + 1;
/// Row and column holding the timing patterns.
pub const TIMING_POS: usize = 6;

/// An atlas to check whether certain indices of a [Canvas] are reserved for QR code standard
/// specific information such as timing or locator patterns.
pub struct ReservedAreaAtlas {
    matrix: BitMatrix,
}

impl ReservedAreaAtlas {
    /// Create a new atlas for the given `version`.
    pub fn new(version: Version) -> Self {
        let mut matrix = BitMatrix::filled(qrstandard::canvas_size(version), false);
        let size = matrix.size();

        // Timing patterns.
        matrix.fill(true, TIMING_POS, 0, size, 1);
        matrix.fill(true, 0, TIMING_POS, 1, size);

        // Locator patterns.
        for (i, j) in [
            (0, 0),
            (size - FINDER_TOT_SIZE, 0),
            (0, size - FINDER_TOT_SIZE),
        ] {
            matrix.fill(true, i, j, FINDER_TOT_SIZE, FINDER_TOT_SIZE);
        }

        // Format information (includes the always dark module).
        const FINFO_OFFSET: usize = FINDER_TOT_SIZE;
        const FINFO_SIZE: usize = 8;
        matrix.fill(true, FINFO_OFFSET, 0, FINFO_SIZE + 1, 1);
        matrix.fill(true, FINFO_OFFSET, size - FINFO_SIZE, FINFO_SIZE, 1);
        matrix.fill(true, 0, FINFO_OFFSET, 1, FINFO_SIZE);
        matrix.fill(true, size - FINFO_SIZE, FINFO_OFFSET, 1, FINFO_SIZE);

        // Alignment patterns.
        for (i, j) in qrstandard::alignment_pattern_centers(version) {
            matrix.fill(true, i - 2, j - 2, 5, 5);
        }

        // Version information: 3x6 above the bottom-left locator and 6x3 left of the top-right one.
        const VINFO_SHORT: usize = 3;
        const VINFO_LONG: usize = 6;
        if version >= Version::V07 {
            let offset = size - FINDER_TOT_SIZE - VINFO_SHORT;
            matrix.fill(true, 0, offset, VINFO_SHORT, VINFO_LONG);
            matrix.fill(true, offset, 0, VINFO_LONG, VINFO_SHORT);
        }

        Self { matrix }
    }

    #[inline]
    /// Get the size of the atlas.
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    #[inline]
    /// Check whether position (`i`, `j`) is reserved.
    /// # Example
    /// ```
    /// use qrenc_core::{Version, ReservedAreaAtlas};
    /// let atlas = ReservedAreaAtlas::new(Version::V01);
    /// assert!(atlas.is_reserved(0, 0));
    /// assert!(!atlas.is_reserved(20, 20));
    /// ```
    pub fn is_reserved(&self, i: usize, j: usize) -> bool {
        self.matrix.get(i, j).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the size is {} but the index is ({}, {})",
                self.size(),
                i,
                j
            )
        })
    }

    /// Count the modules left for data and error correction.
    pub fn free_count(&self) -> usize {
        self.size() * self.size() - self.matrix.count_ones()
    }
}

/// Calculate the (`i`, `j`) position of bit at `index` in a canvas of the given `size`.
///
/// Valid indices are `0..size * (size - 1)`: every column but the vertical timing one, two
/// modules per row.
pub fn canvas_position(index: usize, size: usize) -> (usize, usize) {
    const TIMING_COL: usize = 7;
    // `i` and `j` move in a zig-zag.
    let (mut i, mut j) = (index / 2, index % 2);
    // `i` is limited by `size`, but keep track of which cycle we are in.
    let k = i / size;
    i %= size;
    // On odd cycles `i` is inverted.
    if k % 2 != 0 {
        i = size - 1 - i;
    }
    // `j` is shifted depending on the cycle.
    j += 2 * k;
    // The vertical timing column pushes `j` by 1.
    if j > size - 1 - TIMING_COL {
        j += 1;
    }
    // Invert becasue in fact bits are placed bottom-right to top-left.
    (size - 1 - i, size - 1 - j)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_free_modules_match_raw_capacity() {
        for number in 1..=40 {
            let version = Version::new(number).unwrap();
            let atlas = ReservedAreaAtlas::new(version);
            assert_eq!(
                atlas.free_count(),
                qrstandard::num_raw_data_modules(version),
                "version {}",
                version
            );
        }
    }

    #[test]
    fn test_canvas_position_zig_zag() {
        let size = 21;
        assert_eq!(canvas_position(0, size), (20, 20));
        assert_eq!(canvas_position(1, size), (20, 19));
        assert_eq!(canvas_position(2, size), (19, 20));
        // Second column pair goes downwards.
        assert_eq!(canvas_position(2 * size, size), (0, 18));
        assert_eq!(canvas_position(2 * size + 1, size), (0, 17));
    }

    #[test]
    fn test_canvas_position_skips_timing_column() {
        let size = 21;
        let columns: Vec<usize> = (0..size * (size - 1))
            .map(|index| canvas_position(index, size).1)
            .collect();
        assert!(!columns.contains(&TIMING_POS));
        assert_eq!(*columns.last().unwrap(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut canvas = Canvas::filled(4, Module::Light);
        canvas.toggle(|i, j| i == j);
        assert_eq!(canvas.dark_count(), 4);
        assert_eq!(canvas.get(1, 1), Some(Module::Dark));
        assert_eq!(canvas.get(1, 2), Some(Module::Light));
        canvas.toggle(|i, _| i == 0);
        assert_eq!(canvas.get(0, 0), Some(Module::Light));
        assert_eq!(canvas.get(0, 3), Some(Module::Dark));
    }

    #[test]
    fn test_fill() {
        let mut canvas = Canvas::filled(5, Module::Light);
        canvas.fill(Module::Dark, 1, 2, 3, 2);
        assert_eq!(canvas.dark_count(), 6);
        assert!(canvas.is_dark(1, 4));
        assert!(canvas.is_dark(2, 2));
        assert!(!canvas.is_dark(3, 2));
    }
}
