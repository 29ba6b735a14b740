//! QR code generation driven by global settings.
//!
//! A [Session] keeps the encoder [Settings] and turns text into QR symbols written as PNG, EPS,
//! SVG, XPM or terminal art. The same operations are available as `qrencode::*` script commands
//! through the [commands] module.
//!
//! # Example
//! ```no_run
//! use qrenc::Session;
//!
//! let session = Session::new();
//! session.update(|settings| {
//!     settings.set_level(2);
//!     settings.set_file_type("svg");
//! });
//! session.encode("Hello, World!", "hello.svg").unwrap();
//! ```

pub mod commands;
mod error;
mod session;
mod settings;

pub use commands::CommandError;
pub use error::Error;
pub use session::{structured_file_names, Session, STDOUT};
pub use settings::{Settings, SettingsError, MAX_MICRO_VERSION, MAX_VERSION};

pub use qrenc_core::{Ecl, QrCode, Version};
pub use qrenc_encode::{Encoder, EncodingError};
pub use qrenc_render::{render, Color, ImageType, RenderError, RenderOptions};
