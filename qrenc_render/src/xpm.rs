use std::io::Write;

use qrenc_core::Canvas;

use crate::RenderOptions;

/// X PixMap renderer with one character per pixel: `F` for the foreground and `B` for the
/// background.
pub struct XpmRenderer {
    options: RenderOptions,
}

impl XpmRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self { options: *options }
    }

    /// Get the pixel rows of the image.
    fn pixel_rows(&self, canvas: &Canvas) -> Vec<String> {
        let RenderOptions { scale, margin, .. } = self.options;
        let real_width = (canvas.size() + 2 * margin) * scale;
        let quiet_line = "B".repeat(real_width);
        let quiet_side = "B".repeat(margin * scale);

        let mut rows = Vec::with_capacity(real_width);
        rows.extend(std::iter::repeat(quiet_line.clone()).take(margin * scale));
        for i in 0..canvas.size() {
            let mut row = String::with_capacity(real_width);
            row.push_str(&quiet_side);
            for j in 0..canvas.size() {
                let pixel = if canvas.is_dark(i, j) { 'F' } else { 'B' };
                row.extend(std::iter::repeat(pixel).take(scale));
            }
            row.push_str(&quiet_side);
            rows.extend(std::iter::repeat(row).take(scale));
        }
        rows.extend(std::iter::repeat(quiet_line).take(margin * scale));
        rows
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let real_width = (canvas.size() + 2 * self.options.margin) * self.options.scale;
        writeln!(output, "/* XPM */")?;
        writeln!(output, "static const char *const qrcode_xpm[] = {{")?;
        writeln!(output, "/* width height ncolors chars_per_pixel */")?;
        writeln!(output, "\"{real_width} {real_width} 2 1\",")?;
        writeln!(output, "/* colors */")?;
        writeln!(output, "\"F c #{}\",", self.options.foreground.hex_rgb())?;
        writeln!(output, "\"B c #{}\",", self.options.background.hex_rgb())?;
        writeln!(output, "/* pixels */")?;
        let rows = self.pixel_rows(canvas);
        let last = rows.len().saturating_sub(1);
        for (index, row) in rows.iter().enumerate() {
            let end = if index == last { "};" } else { "," };
            writeln!(output, "\"{row}\"{end}")?;
        }
        if rows.is_empty() {
            writeln!(output, "}};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Color;
    use qrenc_core::Module;

    #[test]
    fn test_render() {
        let mut canvas = Canvas::filled(2, Module::Light);
        canvas.set(0, 0, Module::Dark);
        let options = RenderOptions {
            scale: 2,
            margin: 1,
            foreground: Color::rgb(0x11, 0x22, 0x33),
            ..Default::default()
        };
        let mut output = Vec::new();
        XpmRenderer::new(&options).render(&mut output, &canvas).unwrap();
        let expected = "/* XPM */\n\
            static const char *const qrcode_xpm[] = {\n\
            /* width height ncolors chars_per_pixel */\n\
            \"8 8 2 1\",\n\
            /* colors */\n\
            \"F c #112233\",\n\
            \"B c #ffffff\",\n\
            /* pixels */\n\
            \"BBBBBBBB\",\n\
            \"BBBBBBBB\",\n\
            \"BBFFBBBB\",\n\
            \"BBFFBBBB\",\n\
            \"BBBBBBBB\",\n\
            \"BBBBBBBB\",\n\
            \"BBBBBBBB\",\n\
            \"BBBBBBBB\"};\n";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }
}
