use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qrenc::commands::run_script;
use qrenc::{Color, ImageType, Session, Settings, STDOUT};

#[derive(Parser)]
#[command(name = "qrenc")]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "Generate QR codes from the command line", long_about = None)]
struct Cli {
    /// Log more, repeat for even more. RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a QR code
    #[command(flatten_help = true)]
    Encode {
        #[arg(help = "Input file or stdin if unspecified")]
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file", help = "Text to encode")]
        text: Option<String>,
        #[arg(
            short,
            long,
            help = "Output file or stdout if unspecified",
            long_help = "Output file or stdout if unspecified or '-'. Unless --type is given, the output format is \
            determined based on the extension. Supported extensions are:\n\
            * text: .txt (UTF-8 half blocks)\n\
            * images: .png, .eps, .svg, .xpm"
        )]
        output: Option<String>,
        #[arg(short = 't', long = "type", help = "Output format, overriding the extension")]
        kind: Option<ImageType>,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Run a script of qrencode:: commands
    Run {
        #[arg(help = "Script file or stdin if unspecified")]
        script: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// Error correction level: L, M, Q or H
    #[arg(short, long, default_value = "L", value_parser = parse_level)]
    level: i64,
    /// Module size in pixels
    #[arg(short, long, default_value_t = 3)]
    size: i64,
    /// Minimum version, 0 for the smallest that fits
    #[arg(long = "qr-version", default_value_t = 0)]
    version: i64,
    /// Resolution of PNG and SVG images
    #[arg(long, default_value_t = 72)]
    dpi: i64,
    /// Encode the input as raw bytes
    #[arg(long)]
    eight_bit: bool,
    /// Uppercase ASCII letters to make the symbol smaller
    #[arg(short, long)]
    ignore_case: bool,
    #[arg(long)]
    kanji: bool,
    /// Generate a Micro QR symbol
    #[arg(long)]
    micro: bool,
    /// Split the input over numbered symbols of exactly --qr-version
    #[arg(long)]
    structured: bool,
    /// Merge runs of dark modules in SVG images
    #[arg(long)]
    rle: bool,
    /// Color of dark modules as RRGGBB[AA]
    #[arg(long)]
    foreground: Option<Color>,
    /// Color of light modules as RRGGBB[AA]
    #[arg(long)]
    background: Option<Color>,
}

impl SettingsArgs {
    fn into_settings(self, kind: ImageType) -> Result<Settings> {
        let mut settings = Settings::new();
        settings.set_eight_bit(self.eight_bit.into());
        settings.set_case_sensitive((!self.ignore_case).into());
        settings.set_kanji(self.kanji.into());
        settings.set_micro(self.micro.into());
        settings.set_structured(self.structured.into());
        settings.set_rle(self.rle.into());
        settings.set_level(self.level);
        settings.set_dpi(self.dpi);
        settings.set_size(self.size)?;
        settings.set_version(self.version)?;
        settings.set_file_type(kind.name());
        if let Some(color) = self.foreground {
            settings.set_foreground(&color.to_string())?;
        }
        if let Some(color) = self.background {
            settings.set_background(&color.to_string())?;
        }
        Ok(settings)
    }
}

fn parse_level(value: &str) -> Result<i64, String> {
    match value.to_ascii_uppercase().as_str() {
        "L" | "0" => Ok(0),
        "M" | "1" => Ok(1),
        "Q" | "2" => Ok(2),
        "H" | "3" => Ok(3),
        _ => Err(format!("invalid level '{value}', expected L, M, Q or H")),
    }
}

fn determine_output_kind(output: &str, requested: Option<ImageType>) -> Result<ImageType> {
    if let Some(kind) = requested {
        return Ok(kind);
    }
    if output == STDOUT {
        return Ok(ImageType::Utf8);
    }
    match Path::new(output).extension().and_then(|ext| ext.to_str()) {
        Some("txt") => Ok(ImageType::Utf8),
        Some(ext @ ("png" | "eps" | "svg" | "xpm")) => Ok(ext.parse()?),
        Some(invalid) => bail!("invalid output extension '{}'", invalid),
        None => bail!("requested output has no extension"),
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match path {
        Some(path) => {
            std::fs::File::open(path)
                .with_context(|| format!("cannot open '{}'", path.display()))?
                .read_to_end(&mut bytes)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut bytes)?;
        }
    }
    Ok(bytes)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Encode {
            file,
            text,
            output,
            kind,
            settings,
        } => {
            // Before doing anything, make sure the requested output is valid.
            let output = output.unwrap_or_else(|| STDOUT.to_string());
            let kind = determine_output_kind(&output, kind)?;
            let session = Session::with_settings(settings.into_settings(kind)?);
            let input = match text {
                Some(text) => text.into_bytes(),
                None => read_input(file.as_deref())?,
            };
            for path in session.encode(&input, &output)? {
                tracing::info!(path = %path.display(), "written");
            }
        }
        Command::Run { script } => {
            let bytes = read_input(script.as_deref())?;
            let script = String::from_utf8(bytes).context("script is not valid UTF-8")?;
            let count = run_script(&Session::new(), &script)?;
            tracing::info!(count, "ran commands");
        }
    }
    Ok(())
}
