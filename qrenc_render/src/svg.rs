use std::io::Write;

use itertools::Itertools;
use qrenc_core::Canvas;

use crate::{Color, RenderOptions};

const INCHES_PER_METER: f64 = 100.0 / 2.54;

/// SVG renderer. The view box is measured in modules, while the physical size of the document
/// follows from the scale and the resolution.
pub struct SvgRenderer {
    options: RenderOptions,
}

impl SvgRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self { options: *options }
    }

    /// Get the side of the rendered image in centimeters.
    fn physical_width(&self, symbol_width: usize) -> f64 {
        let pixels_per_cm = f64::from(self.options.dpi) * INCHES_PER_METER / 100.0;
        (symbol_width * self.options.scale) as f64 / pixels_per_cm
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let RenderOptions {
            margin,
            foreground,
            background,
            rle,
            ..
        } = self.options;
        let symbol_width = canvas.size() + 2 * margin;
        let cm = self.physical_width(symbol_width);

        writeln!(
            output,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
        )?;
        writeln!(
            output,
            "<!-- Created with qrenc {} -->",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(
            output,
            r#"<svg width="{cm:.2}cm" height="{cm:.2}cm" viewBox="0 0 {symbol_width} {symbol_width}" preserveAspectRatio="none" version="1.1" xmlns="http://www.w3.org/2000/svg">"#
        )?;
        writeln!(output, "\t<g id=\"QRcode\">")?;
        writeln!(
            output,
            "\t\t<rect x=\"0\" y=\"0\" width=\"{symbol_width}\" height=\"{symbol_width}\" fill=\"{}/>",
            fill(background)
        )?;
        writeln!(
            output,
            "\t\t<g id=\"Pattern\" transform=\"translate({margin},{margin})\">"
        )?;
        let fill = fill(foreground);
        for i in 0..canvas.size() {
            for (start, len) in dark_runs(canvas, i, rle) {
                writeln!(
                    output,
                    "\t\t\t<rect x=\"{start}\" y=\"{i}\" width=\"{len}\" height=\"1\" fill=\"{fill}/>"
                )?;
            }
        }
        writeln!(output, "\t\t</g>")?;
        writeln!(output, "\t</g>")?;
        writeln!(output, "</svg>")
    }
}

/// Attributes painting with `color`, without the opening quote of `fill`. Opaque colors leave the
/// opacity out.
fn fill(color: Color) -> String {
    if color.is_opaque() {
        format!("#{}\"", color.hex_rgb())
    } else {
        format!(
            "#{}\" fill-opacity=\"{:.6}\"",
            color.hex_rgb(),
            color.opacity()
        )
    }
}

/// Horizontal runs of dark modules in row `i` as `(start, length)` pairs. Without `rle` every
/// dark module is its own run.
fn dark_runs(canvas: &Canvas, i: usize, rle: bool) -> Vec<(usize, usize)> {
    let dark = (0..canvas.size()).filter(|&j| canvas.is_dark(i, j));
    if !rle {
        return dark.map(|j| (j, 1)).collect();
    }
    dark.map(|j| (j, 1))
        .coalesce(|(start, len), (next, _)| {
            if start + len == next {
                Ok((start, len + 1))
            } else {
                Err(((start, len), (next, 1)))
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use qrenc_core::Module;

    fn sample() -> Canvas {
        let mut canvas = Canvas::filled(4, Module::Light);
        canvas.fill(Module::Dark, 0, 0, 2, 1);
        canvas.set(0, 3, Module::Dark);
        canvas
    }

    fn render_to_string(options: &RenderOptions, canvas: &Canvas) -> String {
        let mut output = Vec::new();
        SvgRenderer::new(options).render(&mut output, canvas).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_runs() {
        let canvas = sample();
        assert_eq!(dark_runs(&canvas, 0, false), [(0, 1), (1, 1), (3, 1)]);
        assert_eq!(dark_runs(&canvas, 0, true), [(0, 2), (3, 1)]);
        assert!(dark_runs(&canvas, 1, true).is_empty());
    }

    #[test]
    fn test_document() {
        let options = RenderOptions {
            margin: 2,
            rle: true,
            ..Default::default()
        };
        let text = render_to_string(&options, &sample());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        // 8 modules of 3 pixels at 72 dpi.
        assert!(lines[2].starts_with(r#"<svg width="0.85cm" height="0.85cm" viewBox="0 0 8 8""#));
        assert_eq!(
            lines[4],
            "\t\t<rect x=\"0\" y=\"0\" width=\"8\" height=\"8\" fill=\"#ffffff\"/>"
        );
        assert_eq!(lines[5], "\t\t<g id=\"Pattern\" transform=\"translate(2,2)\">");
        assert_eq!(
            lines[6],
            "\t\t\t<rect x=\"0\" y=\"0\" width=\"2\" height=\"1\" fill=\"#000000\"/>"
        );
        assert_eq!(
            lines[7],
            "\t\t\t<rect x=\"3\" y=\"0\" width=\"1\" height=\"1\" fill=\"#000000\"/>"
        );
        assert_eq!(&lines[8..], ["\t\t</g>", "\t</g>", "</svg>"]);
    }

    #[test]
    fn test_translucent_colors() {
        let options = RenderOptions {
            foreground: Color::rgba(0, 0, 255, 0x80),
            background: Color::rgba(255, 255, 255, 0),
            ..Default::default()
        };
        let text = render_to_string(&options, &sample());
        assert!(text.contains(r##"fill="#ffffff" fill-opacity="0.000000"/>"##));
        assert!(text.contains(r##"fill="#0000ff" fill-opacity="0.501961"/>"##));
    }
}
