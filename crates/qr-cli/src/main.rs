//! Command-line front end: encodes a payload to a PNG file.

mod error;

use std::fs;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use error::CliError;
use qr_core::{CodeEcc, Mask, Version};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Level {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<Level> for CodeEcc {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => CodeEcc::Low,
            Level::Medium => CodeEcc::Medium,
            Level::Quartile => CodeEcc::Quartile,
            Level::High => CodeEcc::High,
        }
    }
}

/// Encodes text as a QR Code PNG.
#[derive(Parser, Debug)]
#[command(name = "qr-cli", about)]
struct Args {
    /// Payload to encode.
    #[arg(short, long)]
    payload: String,

    /// Error correction level.
    #[arg(short, long, value_enum, default_value_t = Level::Medium)]
    level: Level,

    /// Symbol version (1-40). Omit to let the encoder pick the smallest fit.
    #[arg(short, long)]
    version: Option<u8>,

    /// Output PNG path.
    #[arg(short, long)]
    output: String,

    /// Force a specific mask pattern (0-7). Omit to auto-select.
    #[arg(long)]
    pattern: Option<u8>,

    /// Omit the quiet zone border.
    #[arg(long)]
    no_quiet_zone: bool,

    /// Byte-mode character encoding (e.g. "utf-8", "iso-8859-1").
    #[arg(long, default_value = "utf-8")]
    byte_encoding: String,

    /// Pixels per module in the output PNG.
    #[arg(long, default_value_t = 8)]
    scale: u32,
}

fn run(args: Args) -> Result<(), CliError> {
    let level: CodeEcc = args.level.into();
    let pattern = match args.pattern {
        Some(p) if p <= 7 => Some(Mask::new(p)),
        Some(p) => {
            return Err(CliError::InvalidArgument(format!(
                "mask pattern {} out of range [0,7]",
                p
            )))
        }
        None => None,
    };

    let preferences: Vec<(Version, CodeEcc)> = match args.version {
        Some(v) => vec![(
            Version::try_new(v as u32).map_err(|e| CliError::InvalidArgument(e.to_string()))?,
            level,
        )],
        None => (Version::MIN.value()..=Version::MAX.value())
            .map(|v| (Version::new(v), level))
            .collect(),
    };

    let options = qr_core::EncodeOptions {
        pattern,
        include_quiet_zone: !args.no_quiet_zone,
        byte_mode_encoding: args.byte_encoding.clone(),
    };

    log::info!(
        "qr-cli: encoding payload of {} chars, level {:?}, output {}",
        args.payload.chars().count(),
        level,
        args.output
    );

    let png = qr_render::generate_qr_image(&args.payload, &preferences, &options, args.scale)?;

    fs::write(&args.output, png).map_err(|source| CliError::Io {
        path: args.output.clone(),
        source,
    })?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("qr-cli: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
