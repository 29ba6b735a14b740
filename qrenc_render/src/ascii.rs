use std::io::Write;

use qrenc_core::Canvas;

/// Plain text renderer printing two characters per module.
pub struct AsciiRenderer {
    light_pattern: &'static str,
    dark_pattern: &'static str,
    margin: usize,
}

impl AsciiRenderer {
    /// Construct a new [AsciiRenderer] that uses "##" to render dark modules and "  " to print light ones, with a
    /// margin of 4 modules.
    pub fn new() -> Self {
        Self {
            light_pattern: "  ",
            dark_pattern: "##",
            margin: 4,
        }
    }

    /// Set the width of the quiet zone, in modules.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Invert the light and dark patterns. The quiet zone is inverted too.
    pub fn inverted(mut self) -> Self {
        std::mem::swap(&mut self.light_pattern, &mut self.dark_pattern);
        self
    }

    /// Peek at the pattern used to render light modules.
    pub fn light_pattern(&self) -> &str {
        self.light_pattern
    }

    /// Peek at the pattern used to render dark modules.
    pub fn dark_pattern(&self) -> &str {
        self.dark_pattern
    }

    /// Render the `canvas` into `output`.
    pub fn render<C, W>(&self, output: &mut W, canvas: C) -> std::io::Result<()>
    where
        C: AsRef<Canvas>,
        W: Write,
    {
        let canvas = canvas.as_ref();
        let quiet_line = self.light_pattern().repeat(canvas.size() + 2 * self.margin);
        let quiet_side = self.light_pattern().repeat(self.margin);
        for _ in 0..self.margin {
            writeln!(output, "{}", quiet_line)?;
        }
        for i in 0..canvas.size() {
            write!(output, "{}", quiet_side)?;
            for j in 0..canvas.size() {
                let pattern = if canvas.is_dark(i, j) {
                    self.dark_pattern()
                } else {
                    self.light_pattern()
                };
                write!(output, "{}", pattern)?;
            }
            writeln!(output, "{}", quiet_side)?;
        }
        for _ in 0..self.margin {
            writeln!(output, "{}", quiet_line)?;
        }
        Ok(())
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}
