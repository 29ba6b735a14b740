use std::io::Write;

use qrenc_core::Canvas;

use crate::{Color, RenderOptions};

/// Encapsulated PostScript renderer. Each dark module is a unit square filled by the `p`
/// procedure in a coordinate system scaled to the module size.
pub struct EpsRenderer {
    options: RenderOptions,
}

impl EpsRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self { options: *options }
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let RenderOptions {
            scale,
            margin,
            foreground,
            background,
            ..
        } = self.options;
        let real_width = (canvas.size() + 2 * margin) * scale;

        writeln!(output, "%!PS-Adobe-2.0 EPSF-1.2")?;
        writeln!(output, "%%BoundingBox: 0 0 {real_width} {real_width}")?;
        writeln!(output, "%%Pages: 1 1")?;
        writeln!(output, "%%EndComments")?;
        writeln!(
            output,
            "/p {{ moveto 0 1 rlineto 1 0 rlineto 0 -1 rlineto fill }} bind def"
        )?;
        writeln!(output, "gsave")?;
        write_rgb(output, background)?;
        writeln!(output, "{real_width} {real_width} scale")?;
        writeln!(output, "0 0 p")?;
        writeln!(output, "grestore")?;
        write_rgb(output, foreground)?;
        writeln!(output, "{scale} {scale} scale")?;

        // PostScript puts the origin in the lower left corner.
        for i in 0..canvas.size() {
            let y = margin + canvas.size() - i - 1;
            for j in (0..canvas.size()).filter(|&j| canvas.is_dark(i, j)) {
                write!(output, "{} {} p ", margin + j, y)?;
            }
        }
        write!(output, "\n%%EOF\n")
    }
}

fn write_rgb<W: Write>(output: &mut W, color: Color) -> std::io::Result<()> {
    let [r, g, b] = color.ratios();
    writeln!(output, "{r:.6} {g:.6} {b:.6} setrgbcolor")
}

#[cfg(test)]
mod test {
    use super::*;
    use qrenc_core::Module;

    #[test]
    fn test_render() {
        let mut canvas = Canvas::filled(2, Module::Light);
        canvas.set(0, 1, Module::Dark);
        canvas.set(1, 0, Module::Dark);
        let options = RenderOptions {
            scale: 2,
            margin: 1,
            foreground: Color::rgb(255, 0, 0),
            ..Default::default()
        };
        let mut output = Vec::new();
        EpsRenderer::new(&options).render(&mut output, &canvas).unwrap();
        let expected = "%!PS-Adobe-2.0 EPSF-1.2\n\
            %%BoundingBox: 0 0 8 8\n\
            %%Pages: 1 1\n\
            %%EndComments\n\
            /p { moveto 0 1 rlineto 1 0 rlineto 0 -1 rlineto fill } bind def\n\
            gsave\n\
            1.000000 1.000000 1.000000 setrgbcolor\n\
            8 8 scale\n\
            0 0 p\n\
            grestore\n\
            1.000000 0.000000 0.000000 setrgbcolor\n\
            2 2 scale\n\
            2 2 p 1 1 p \n\
            %%EOF\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }
}
