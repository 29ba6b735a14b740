use std::io::Write;

use ::png::{BitDepth, ColorType, PixelDimensions, Unit};
use qrenc_core::Canvas;

use crate::{Color, RenderError, RenderOptions};

const INCHES_PER_METER: f64 = 100.0 / 2.54;

/// PNG renderer. Images are written as 8 bit RGB, or RGBA when an alpha channel is requested or
/// needed by a translucent color. Pixel rows are streamed to the output one at a time.
pub struct PngRenderer {
    options: RenderOptions,
    alpha: bool,
}

impl PngRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            options: *options,
            alpha: false,
        }
    }

    /// Always write an alpha channel.
    pub fn with_alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    fn needs_alpha(&self) -> bool {
        self.alpha || !self.options.foreground.is_opaque() || !self.options.background.is_opaque()
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> Result<(), RenderError>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let RenderOptions {
            scale,
            margin,
            dpi,
            foreground,
            background,
            ..
        } = self.options;
        let real_width = (canvas.size() + 2 * margin) * scale;
        let width = u32::try_from(real_width)
            .ok()
            .filter(|width| width.checked_mul(*width).is_some())
            .ok_or(RenderError::TooLarge(real_width))?;

        let (color_type, channels) = if self.needs_alpha() {
            (ColorType::Rgba, 4)
        } else {
            (ColorType::Rgb, 3)
        };
        let mut encoder = ::png::Encoder::new(output, width, width);
        encoder.set_color(color_type);
        encoder.set_depth(BitDepth::Eight);
        let pixels_per_meter = (f64::from(dpi) * INCHES_PER_METER).round() as u32;
        encoder.set_pixel_dims(Some(PixelDimensions {
            xppu: pixels_per_meter,
            yppu: pixels_per_meter,
            unit: Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        let mut stream = writer.stream_writer()?;

        let pixel = |color: Color| [color.r, color.g, color.b, color.a];
        let (dark, light) = (pixel(foreground), pixel(background));
        let light_row: Vec<u8> = light[..channels].repeat(real_width);
        let mut row = light_row.clone();
        for _ in 0..margin * scale {
            stream.write_all(&light_row)?;
        }
        for i in 0..canvas.size() {
            row.copy_from_slice(&light_row);
            for j in (0..canvas.size()).filter(|&j| canvas.is_dark(i, j)) {
                let start = (margin + j) * scale * channels;
                for px in row[start..start + scale * channels].chunks_exact_mut(channels) {
                    px.copy_from_slice(&dark[..channels]);
                }
            }
            for _ in 0..scale {
                stream.write_all(&row)?;
            }
        }
        for _ in 0..margin * scale {
            stream.write_all(&light_row)?;
        }
        stream.finish()?;
        writer.finish()?;
        Ok(())
    }
}
