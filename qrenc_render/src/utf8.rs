use std::io::Write;

use qrenc_core::Canvas;

const EMPTY: char = ' ';
const LOWER_HALF: char = '▄';
const UPPER_HALF: char = '▀';
const FULL: char = '█';

const ANSI_WHITE: &str = "\x1b[40;37;1m";
const ANSI_RESET: &str = "\x1b[0m";

/// Compact text renderer packing two module rows into each line with block elements. Light
/// modules are drawn with the glyph, so the output reads on a dark terminal background.
pub struct Utf8Renderer {
    margin: usize,
    ansi: bool,
    inverted: bool,
}

impl Utf8Renderer {
    pub fn new() -> Self {
        Self {
            margin: 4,
            ansi: false,
            inverted: false,
        }
    }

    /// Set the width of the quiet zone, in modules. Vertically, the quiet zone takes half as many
    /// lines.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Wrap every line in escape sequences selecting white on black.
    pub fn with_ansi(mut self) -> Self {
        self.ansi = true;
        self
    }

    /// Draw dark modules with the glyph instead of light ones.
    pub fn inverted(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    /// Glyph for a cell whose upper and lower modules are dark as given.
    fn glyph(&self, upper_dark: bool, lower_dark: bool) -> char {
        let glyph = match (upper_dark, lower_dark) {
            (true, true) => EMPTY,
            (true, false) => LOWER_HALF,
            (false, true) => UPPER_HALF,
            (false, false) => FULL,
        };
        if !self.inverted {
            return glyph;
        }
        match glyph {
            EMPTY => FULL,
            FULL => EMPTY,
            LOWER_HALF => UPPER_HALF,
            _ => LOWER_HALF,
        }
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let (start, end) = if self.ansi {
            (ANSI_WHITE, ANSI_RESET)
        } else {
            ("", "")
        };
        let quiet = self.glyph(false, false);
        let quiet_line: String = std::iter::repeat(quiet)
            .take(canvas.size() + 2 * self.margin)
            .collect();
        let quiet_side: String = std::iter::repeat(quiet).take(self.margin).collect();

        for _ in 0..self.margin / 2 {
            writeln!(output, "{start}{quiet_line}{end}")?;
        }
        let mut line = String::new();
        for i in (0..canvas.size()).step_by(2) {
            line.clear();
            line.push_str(&quiet_side);
            // Rows past the bottom edge read as light.
            line.extend(
                (0..canvas.size())
                    .map(|j| self.glyph(canvas.is_dark(i, j), canvas.is_dark(i + 1, j))),
            );
            line.push_str(&quiet_side);
            writeln!(output, "{start}{line}{end}")?;
        }
        for _ in 0..self.margin / 2 {
            writeln!(output, "{start}{quiet_line}{end}")?;
        }
        Ok(())
    }
}

impl Default for Utf8Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use qrenc_core::Module;

    fn render_to_string(renderer: &Utf8Renderer, canvas: &Canvas) -> String {
        let mut output = Vec::new();
        renderer.render(&mut output, canvas).unwrap();
        String::from_utf8(output).unwrap()
    }

    /// Dark first column, light second column, dark top-right corner.
    fn sample() -> Canvas {
        let mut canvas = Canvas::filled(3, Module::Light);
        for i in 0..3 {
            canvas.set(i, 0, Module::Dark);
        }
        canvas.set(0, 2, Module::Dark);
        canvas
    }

    #[test]
    fn test_half_blocks() {
        let text = render_to_string(&Utf8Renderer::new().with_margin(0), &sample());
        assert_eq!(text, " █▄\n▄██\n");
    }

    #[test]
    fn test_inverted() {
        let text = render_to_string(&Utf8Renderer::new().with_margin(0).inverted(), &sample());
        assert_eq!(text, "█ ▀\n▀  \n");
    }

    #[test]
    fn test_margin_and_ansi() {
        let canvas = Canvas::filled(1, Module::Dark);
        let text = render_to_string(&Utf8Renderer::new().with_margin(3).with_ansi(), &canvas);
        assert_eq!(
            text,
            "\x1b[40;37;1m███████\x1b[0m\n\x1b[40;37;1m███▄███\x1b[0m\n\x1b[40;37;1m███████\x1b[0m\n"
        );
    }
}
