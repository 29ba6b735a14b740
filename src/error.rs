use std::path::PathBuf;

use qrenc_encode::EncodingError;
use qrenc_render::RenderError;

use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("nothing to encode")]
    EmptyInput,
    #[error("no output file given")]
    EmptyOutput,
    #[error("version {version} exceeds the maximum of {max}")]
    VersionTooHigh { version: u8, max: u8 },
    #[error("a Micro QR symbol needs an explicit version")]
    MicroVersionRequired,
    #[error("Micro QR symbols cannot be structured")]
    MicroStructured,
    #[error("structured symbols must be written to files, not to stdout")]
    StructuredToStdout,
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("cannot encode the input: {0}")]
    Encoding(#[from] EncodingError),
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("cannot write to stdout: {0}")]
    Stdout(#[source] RenderError),
}
