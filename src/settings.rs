//! Encoder state shared by every encode call of a [Session](crate::Session).
//!
//! Setters take integers the way script commands hand them over: flags are enabled by any
//! positive value and out of range numbers either fall back to a default or are rejected.

use qrenc_core::{Ecl, Mode, Version};
use qrenc_encode::{Encoder, ModeConstraint};
use qrenc_render::{Color, ColorError, ImageType, RenderOptions};

pub use qrenc_encode::MAX_MICRO_VERSION;

/// Highest version of a regular QR symbol.
pub const MAX_VERSION: u8 = 40;

const DEFAULT_DPI: u32 = 72;
/// Resolution restored by a non positive dpi.
const RESET_DPI: u32 = 720;
const MARGIN: usize = 4;
const MICRO_MARGIN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("module size must be positive, got {0}")]
    InvalidSize(i64),
    #[error("version must be between 0 and {max}, got {version}")]
    InvalidVersion { version: i64, max: u8 },
    #[error(transparent)]
    InvalidColor(#[from] ColorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    eight_bit: bool,
    case_sensitive: bool,
    kanji: bool,
    micro: bool,
    dpi: u32,
    level: Ecl,
    size: usize,
    structured: bool,
    rle: bool,
    file_type: ImageType,
    version: u8,
    foreground: Color,
    background: Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            eight_bit: false,
            case_sensitive: true,
            kanji: false,
            micro: false,
            dpi: DEFAULT_DPI,
            level: Ecl::L,
            size: 3,
            structured: false,
            rle: false,
            file_type: ImageType::Png,
            version: 0,
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode the whole input in byte mode.
    pub fn set_eight_bit(&mut self, value: i64) {
        self.eight_bit = value > 0;
    }

    /// Keep lowercase letters as they are. When disabled, ASCII letters are uppercased so that
    /// they fit the alphanumeric mode.
    pub fn set_case_sensitive(&mut self, value: i64) {
        self.case_sensitive = value > 0;
    }

    /// Record the kanji hint. It has no effect on encoding: input is UTF-8, not Shift JIS, so
    /// non ASCII text always goes through the byte mode.
    pub fn set_kanji(&mut self, value: i64) {
        self.kanji = value > 0;
    }

    pub fn set_micro(&mut self, value: i64) {
        self.micro = value > 0;
    }

    /// Set the resolution of PNG and SVG images. Non positive values select 720 dpi.
    pub fn set_dpi(&mut self, value: i64) {
        self.dpi = u32::try_from(value)
            .ok()
            .filter(|&dpi| dpi > 0)
            .unwrap_or(RESET_DPI);
    }

    /// Set the error correction level from 0 (L) to 3 (H). Anything else selects L.
    pub fn set_level(&mut self, value: i64) {
        self.level = Ecl::from_index(value).unwrap_or(Ecl::L);
    }

    /// Set the module size in pixels.
    pub fn set_size(&mut self, value: i64) -> Result<(), SettingsError> {
        self.size = usize::try_from(value)
            .ok()
            .filter(|&size| size > 0)
            .ok_or(SettingsError::InvalidSize(value))?;
        Ok(())
    }

    pub fn set_structured(&mut self, value: i64) {
        self.structured = value > 0;
    }

    pub fn set_rle(&mut self, value: i64) {
        self.rle = value > 0;
    }

    /// Select the output format by name, ignoring case. Unknown names select PNG.
    pub fn set_file_type(&mut self, name: &str) {
        self.file_type = name.parse().unwrap_or_else(|error| {
            tracing::warn!(%error, "falling back to png");
            ImageType::Png
        });
    }

    /// Set the version, 0 meaning the smallest that fits. The upper bound depends on the Micro QR
    /// flag at the time of the call.
    pub fn set_version(&mut self, value: i64) -> Result<(), SettingsError> {
        let max = self.max_version();
        self.version = u8::try_from(value)
            .ok()
            .filter(|&version| version <= max)
            .ok_or(SettingsError::InvalidVersion {
                version: value,
                max,
            })?;
        Ok(())
    }

    /// Set the color of dark modules from `RRGGBB` or `RRGGBBAA`.
    pub fn set_foreground(&mut self, color: &str) -> Result<(), SettingsError> {
        self.foreground = color.parse()?;
        Ok(())
    }

    /// Set the color of light modules and of the quiet zone from `RRGGBB` or `RRGGBBAA`.
    pub fn set_background(&mut self, color: &str) -> Result<(), SettingsError> {
        self.background = color.parse()?;
        Ok(())
    }

    pub fn eight_bit(&self) -> bool {
        self.eight_bit
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn kanji(&self) -> bool {
        self.kanji
    }

    pub fn micro(&self) -> bool {
        self.micro
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn level(&self) -> Ecl {
        self.level
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn structured(&self) -> bool {
        self.structured
    }

    pub fn rle(&self) -> bool {
        self.rle
    }

    pub fn file_type(&self) -> ImageType {
        self.file_type
    }

    /// Get the requested version, 0 meaning automatic.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Get the highest version allowed by the current symbol kind.
    pub fn max_version(&self) -> u8 {
        if self.micro {
            MAX_MICRO_VERSION
        } else {
            MAX_VERSION
        }
    }

    /// Get the width of the quiet zone, in modules.
    pub fn margin(&self) -> usize {
        if self.micro {
            MICRO_MARGIN
        } else {
            MARGIN
        }
    }

    /// Build the drawing parameters.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            scale: self.size,
            margin: self.margin(),
            dpi: self.dpi,
            foreground: self.foreground,
            background: self.background,
            rle: self.rle,
        }
    }

    /// Build an encoder. The error correction level is fixed and the version is a lower bound,
    /// except for structured append where it is exact. Micro QR symbols take their version
    /// separately, see [Encoder::encode_micro].
    pub fn encoder(&self) -> Encoder {
        let mut encoder = Encoder::new().with_ecl(self.level);
        if let Some(version) = Version::new(self.version).filter(|_| !self.micro) {
            encoder = if self.structured {
                encoder.with_version(version)
            } else {
                encoder.with_version_in(version..)
            };
        }
        // Kanji needs Shift JIS input, so text always goes through the byte mode instead.
        if self.eight_bit {
            encoder
                .with_mode(ModeConstraint::Only(Mode::Bytes))
                .with_case_sensitivity(true)
        } else {
            encoder
                .with_mode(ModeConstraint::AnyMixed)
                .with_case_sensitivity(self.case_sensitive)
        }
    }
}
