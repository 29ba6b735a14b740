use std::io::Write;

use qrenc_core::Canvas;

const RESET: &str = "\x1b[0m";
/// Every module is two columns wide so that it looks roughly square.
const CELL: &str = "  ";

/// Terminal color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiPalette {
    /// White and black from the 8 basic colors.
    Basic,
    /// White and black from the 256 color cube.
    Extended,
}

impl AnsiPalette {
    fn light(self) -> &'static str {
        match self {
            Self::Basic => "\x1b[47m",
            Self::Extended => "\x1b[48;5;231m",
        }
    }

    fn dark(self) -> &'static str {
        match self {
            Self::Basic => "\x1b[40m",
            Self::Extended => "\x1b[48;5;16m",
        }
    }
}

/// Renderer painting modules as colored blank cells. An escape sequence is only emitted when the
/// color changes along a line.
pub struct AnsiRenderer {
    palette: AnsiPalette,
    margin: usize,
}

impl AnsiRenderer {
    pub fn new(palette: AnsiPalette) -> Self {
        Self { palette, margin: 4 }
    }

    /// Set the width of the quiet zone, in modules.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let light = self.palette.light();
        let dark = self.palette.dark();
        let quiet_line = format!(
            "{}{}{}",
            light,
            CELL.repeat(canvas.size() + 2 * self.margin),
            RESET
        );
        let quiet_side = CELL.repeat(self.margin);

        for _ in 0..self.margin {
            writeln!(output, "{}", quiet_line)?;
        }
        let mut line = String::new();
        for i in 0..canvas.size() {
            line.clear();
            line.push_str(light);
            line.push_str(&quiet_side);
            let mut last_dark = false;
            for j in 0..canvas.size() {
                let is_dark = canvas.is_dark(i, j);
                if is_dark != last_dark {
                    line.push_str(if is_dark { dark } else { light });
                    last_dark = is_dark;
                }
                line.push_str(CELL);
            }
            if last_dark {
                line.push_str(light);
            }
            line.push_str(&quiet_side);
            line.push_str(RESET);
            writeln!(output, "{}", line)?;
        }
        for _ in 0..self.margin {
            writeln!(output, "{}", quiet_line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use qrenc_core::Module;

    fn render_to_string(renderer: &AnsiRenderer, canvas: &Canvas) -> String {
        let mut output = Vec::new();
        renderer.render(&mut output, canvas).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_color_changes_only() {
        let mut canvas = Canvas::filled(3, Module::Light);
        canvas.set(0, 0, Module::Dark);
        canvas.set(0, 1, Module::Dark);
        canvas.set(1, 2, Module::Dark);
        let text = render_to_string(&AnsiRenderer::new(AnsiPalette::Basic).with_margin(0), &canvas);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "\x1b[47m\x1b[40m    \x1b[47m  \x1b[0m",
                "\x1b[47m    \x1b[40m  \x1b[47m\x1b[0m",
                "\x1b[47m      \x1b[0m",
            ]
        );
    }

    #[test]
    fn test_margin() {
        let canvas = Canvas::filled(1, Module::Dark);
        let text = render_to_string(&AnsiRenderer::new(AnsiPalette::Extended).with_margin(1), &canvas);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "\x1b[48;5;231m      \x1b[0m",
                "\x1b[48;5;231m  \x1b[48;5;16m  \x1b[48;5;231m  \x1b[0m",
                "\x1b[48;5;231m      \x1b[0m",
            ]
        );
    }
}
