use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use parking_lot::Mutex;

use qrenc_core::Canvas;
use qrenc_render::{ImageType, RenderError, RenderOptions};

use crate::{Error, Settings};

/// Output target meaning standard output.
pub const STDOUT: &str = "-";

/// Encoder settings and the lock serializing encode calls.
#[derive(Debug, Default)]
pub struct Session {
    settings: Mutex<Settings>,
}

impl Session {
    /// Construct a session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    /// Get a copy of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.lock().clone()
    }

    /// Change the settings. Waits for a running encode to finish first.
    pub fn update<R, F: FnOnce(&mut Settings) -> R>(&self, f: F) -> R {
        f(&mut self.settings.lock())
    }

    /// Encode `text` with the current settings and write the result to `outfile`, or to stdout
    /// when it is `-`. The settings stay locked until every symbol is written.
    ///
    /// Structured symbols are numbered from 1, see [structured_file_names]. Returns the paths
    /// of the written files.
    pub fn encode<T: AsRef<[u8]>>(&self, text: T, outfile: &str) -> Result<Vec<PathBuf>, Error> {
        let text = text.as_ref();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }
        if outfile.is_empty() {
            return Err(Error::EmptyOutput);
        }

        let settings = self.settings.lock();
        let max = settings.max_version();
        if settings.version() > max {
            return Err(Error::VersionTooHigh {
                version: settings.version(),
                max,
            });
        }
        if settings.micro() {
            if settings.version() == 0 {
                return Err(Error::MicroVersionRequired);
            }
            if settings.structured() {
                return Err(Error::MicroStructured);
            }
        }

        let kind = settings.file_type();
        let options = settings.render_options();
        let encoder = settings.encoder();
        if settings.micro() {
            let canvas = encoder.encode_micro(text, settings.version())?;
            return Ok(write_symbol(kind, &canvas, &options, outfile)?
                .into_iter()
                .collect());
        }
        if !settings.structured() {
            let qrcode = encoder.encode(text)?;
            return Ok(write_symbol(kind, &qrcode, &options, outfile)?
                .into_iter()
                .collect());
        }

        if outfile == STDOUT {
            return Err(Error::StructuredToStdout);
        }
        let symbols = encoder.encode_structured(text)?;
        let names = structured_file_names(outfile, kind.suffix(), symbols.len());
        let mut written = Vec::with_capacity(symbols.len());
        for (qrcode, name) in symbols.iter().zip(&names) {
            written.extend(write_symbol(kind, qrcode, &options, name)?);
        }
        Ok(written)
    }
}

/// Render `canvas` into the file at `target`, or into stdout. Returns the path of the written
/// file.
fn write_symbol<C: AsRef<Canvas>>(
    kind: ImageType,
    canvas: C,
    options: &RenderOptions,
    target: &str,
) -> Result<Option<PathBuf>, Error> {
    if target == STDOUT {
        let mut stdout = std::io::stdout().lock();
        qrenc_render::render(kind, canvas, options, &mut stdout)
            .and_then(|()| stdout.flush().map_err(RenderError::from))
            .map_err(Error::Stdout)?;
        return Ok(None);
    }
    let path = PathBuf::from(target);
    let write = || -> Result<(), RenderError> {
        let mut writer = BufWriter::new(File::create(&path)?);
        qrenc_render::render(kind, canvas, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    };
    match write() {
        Ok(()) => {
            tracing::debug!(path = %path.display(), %kind, "wrote symbol");
            Ok(Some(path))
        }
        Err(source) => Err(Error::Write { path, source }),
    }
}

/// Name the files of a structured append sequence of `count` symbols after `outfile`: when it
/// ends with `suffix` (ignoring case) the number goes before the suffix, otherwise after the
/// whole name.
/// # Example
/// ```
/// use qrenc::structured_file_names;
/// assert_eq!(structured_file_names("out.PNG", ".png", 2), ["out-01.PNG", "out-02.PNG"]);
/// assert_eq!(structured_file_names("out", ".png", 1), ["out-01"]);
/// ```
pub fn structured_file_names(outfile: &str, suffix: &str, count: usize) -> Vec<String> {
    let split = outfile
        .len()
        .checked_sub(suffix.len())
        .filter(|&at| at > 0 && outfile.is_char_boundary(at))
        .filter(|&at| outfile[at..].eq_ignore_ascii_case(suffix));
    let (base, suffix) = match split {
        Some(at) => outfile.split_at(at),
        None => (outfile, ""),
    };
    (1..=count)
        .map(|index| format!("{base}-{index:02}{suffix}"))
        .collect()
}
