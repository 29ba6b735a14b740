//! Serializers turning the module matrix of a QR code into image files and terminal art.
//!
//! Every format draws the symbol surrounded by a light quiet zone of `margin` modules. Raster and
//! vector formats scale each module to `scale` pixels (or points); terminal formats always use
//! one character cell (or two columns) per module.

mod ansi;
mod ascii;
mod color;
mod eps;
mod png;
mod svg;
mod utf8;
mod xpm;

use std::io::Write;
use std::str::FromStr;

use qrenc_core::Canvas;

pub use ansi::{AnsiPalette, AnsiRenderer};
pub use ascii::AsciiRenderer;
pub use color::{Color, ColorError};
pub use eps::EpsRenderer;
pub use self::png::PngRenderer;
pub use svg::SvgRenderer;
pub use utf8::Utf8Renderer;
pub use xpm::XpmRenderer;

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    /// PNG, RGB unless a color is translucent.
    Png,
    /// PNG, always RGBA.
    Png32,
    /// Encapsulated PostScript.
    Eps,
    Svg,
    /// X PixMap.
    Xpm,
    /// Terminal background colors from the basic 8 color palette.
    Ansi,
    /// Terminal background colors from the 256 color palette.
    Ansi256,
    /// `#` for dark modules.
    Ascii,
    /// `#` for light modules.
    AsciiInverted,
    /// Half block characters, two module rows per line.
    Utf8,
    /// Half block characters wrapped in terminal colors.
    AnsiUtf8,
    Utf8Inverted,
    AnsiUtf8Inverted,
}

impl ImageType {
    /// Every output format.
    pub const ALL: [ImageType; 13] = [
        Self::Png,
        Self::Png32,
        Self::Eps,
        Self::Svg,
        Self::Xpm,
        Self::Ansi,
        Self::Ansi256,
        Self::Ascii,
        Self::AsciiInverted,
        Self::Utf8,
        Self::AnsiUtf8,
        Self::Utf8Inverted,
        Self::AnsiUtf8Inverted,
    ];

    /// Get the name the format is selected with.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Png32 => "png32",
            Self::Eps => "eps",
            Self::Svg => "svg",
            Self::Xpm => "xpm",
            Self::Ansi => "ansi",
            Self::Ansi256 => "ansi256",
            Self::Ascii => "ascii",
            Self::AsciiInverted => "asciii",
            Self::Utf8 => "utf8",
            Self::AnsiUtf8 => "ansiutf8",
            Self::Utf8Inverted => "utf8i",
            Self::AnsiUtf8Inverted => "ansiutf8i",
        }
    }

    /// Get the file name suffix for the format.
    /// # Example
    /// ```
    /// use qrenc_render::ImageType;
    /// assert_eq!(ImageType::Png32.suffix(), ".png");
    /// assert_eq!(ImageType::AnsiUtf8.suffix(), ".txt");
    /// ```
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Png | Self::Png32 => ".png",
            Self::Eps => ".eps",
            Self::Svg => ".svg",
            Self::Xpm => ".xpm",
            _ => ".txt",
        }
    }

    /// Check whether the format is drawn with characters rather than pixels. Text formats ignore
    /// the scale.
    pub fn is_text(self) -> bool {
        self.suffix() == ".txt"
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [ImageType] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image type '{0}'")]
pub struct UnknownImageType(pub String);

impl FromStr for ImageType {
    type Err = UnknownImageType;

    /// Parse a format name, ignoring case.
    /// # Example
    /// ```
    /// use qrenc_render::ImageType;
    /// assert_eq!("SVG".parse(), Ok(ImageType::Svg));
    /// assert!("gif".parse::<ImageType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownImageType(s.to_string()))
    }
}

/// Drawing parameters shared by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per module, raster and vector formats only.
    pub scale: usize,
    /// Width of the quiet zone in modules.
    pub margin: usize,
    /// Resolution used to give SVG images a physical size.
    pub dpi: u32,
    pub foreground: Color,
    pub background: Color,
    /// Merge horizontal runs of dark modules into a single SVG rectangle.
    pub rle: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 3,
            margin: 4,
            dpi: 72,
            foreground: Color::BLACK,
            background: Color::WHITE,
            rle: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cannot write PNG image: {0}")]
    Png(#[from] ::png::EncodingError),
    #[error("an image of {0}x{0} pixels is too large")]
    TooLarge(usize),
}

/// Render `canvas` as `kind` into `output`.
pub fn render<C, W>(
    kind: ImageType,
    canvas: C,
    options: &RenderOptions,
    output: &mut W,
) -> Result<(), RenderError>
where
    C: AsRef<Canvas>,
    W: Write,
{
    let canvas = canvas.as_ref();
    tracing::trace!(%kind, width = canvas.size(), ?options, "rendering");
    match kind {
        ImageType::Png => PngRenderer::new(options).render(output, canvas)?,
        ImageType::Png32 => PngRenderer::new(options).with_alpha().render(output, canvas)?,
        ImageType::Eps => EpsRenderer::new(options).render(output, canvas)?,
        ImageType::Svg => SvgRenderer::new(options).render(output, canvas)?,
        ImageType::Xpm => XpmRenderer::new(options).render(output, canvas)?,
        ImageType::Ansi => AnsiRenderer::new(AnsiPalette::Basic)
            .with_margin(options.margin)
            .render(output, canvas)?,
        ImageType::Ansi256 => AnsiRenderer::new(AnsiPalette::Extended)
            .with_margin(options.margin)
            .render(output, canvas)?,
        ImageType::Ascii => AsciiRenderer::new()
            .with_margin(options.margin)
            .render(output, canvas)?,
        ImageType::AsciiInverted => AsciiRenderer::new()
            .with_margin(options.margin)
            .inverted()
            .render(output, canvas)?,
        ImageType::Utf8 => Utf8Renderer::new()
            .with_margin(options.margin)
            .render(output, canvas)?,
        ImageType::AnsiUtf8 => Utf8Renderer::new()
            .with_margin(options.margin)
            .with_ansi()
            .render(output, canvas)?,
        ImageType::Utf8Inverted => Utf8Renderer::new()
            .with_margin(options.margin)
            .inverted()
            .render(output, canvas)?,
        ImageType::AnsiUtf8Inverted => Utf8Renderer::new()
            .with_margin(options.margin)
            .with_ansi()
            .inverted()
            .render(output, canvas)?,
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_image_type_names_round_trip() {
        for kind in ImageType::ALL {
            assert_eq!(kind.name().parse(), Ok(kind));
            assert_eq!(kind.name().to_uppercase().parse(), Ok(kind));
        }
        assert_eq!(
            "bmp".parse::<ImageType>(),
            Err(UnknownImageType("bmp".to_string()))
        );
    }

    #[test]
    fn test_every_format_renders() {
        let qrcode = qrenc_encode::Encoder::new().encode("every format").unwrap();
        let options = RenderOptions::default();
        for kind in ImageType::ALL {
            let mut output = Vec::new();
            render(kind, &qrcode, &options, &mut output).unwrap();
            assert!(!output.is_empty(), "{} rendered nothing", kind);
        }
    }
}
