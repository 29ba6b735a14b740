//! Shared vocabulary of QR code symbols: modules and canvases, versions, error correction levels,
//! masks, data modes and the numeric tables of the QR code standard.

mod canvas;
mod data;
mod meta;
pub mod qrstandard;

pub use canvas::{canvas_position, Canvas, Module, ReservedAreaAtlas, FINDER_SIZE, TIMING_POS};
pub use data::{Mode, Segment};
pub use meta::{Ecl, Mask, MaskTable, Meta, Version};

/// QR code.
#[derive(Clone)]
pub struct QrCode {
    canvas: Canvas,
    meta: Meta,
}

impl QrCode {
    /// Construct a new [QrCode]. Returns `None` if the canvas is incompatible with `meta` (e.g.: the [Version] and,
    /// thus, the canvas size).
    pub fn new(canvas: Canvas, meta: Meta) -> Option<Self> {
        if canvas.size() == meta.canvas_size() {
            Some(Self { canvas, meta })
        } else {
            None
        }
    }

    /// Get the underlying canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Get the metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Get the width of the symbol in modules, quiet zone excluded.
    pub fn width(&self) -> usize {
        self.canvas.size()
    }
}

impl std::fmt::Debug for QrCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "QrCode {{ version: {}, ecl: {}, mask: {} }}",
            self.meta.version, self.meta.ecl, self.meta.mask
        )?;
        write!(f, "{:?}", self.canvas)
    }
}

impl AsRef<Canvas> for QrCode {
    fn as_ref(&self) -> &Canvas {
        self.canvas()
    }
}

impl From<QrCode> for Canvas {
    fn from(value: QrCode) -> Self {
        value.canvas
    }
}
