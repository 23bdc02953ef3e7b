use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use faw::process::wrap::Packing;
use faw::structs::wav::WavHeader;

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{} (faw {}, {}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("FAW_VERSION").unwrap_or("unknown"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("no git"),
        option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
});

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION.as_str(),
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Tools for extracting, wrapping and mixing FAW audio carried in PCM containers",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on the first corrupt frame).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn fail_level(&self) -> log::Level {
        if self.strict {
            log::Level::Warn
        } else {
            log::Level::Error
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract the elementary stream(s) carried in a PCM container.
    Decode(DecodeArgs),

    /// Wrap an ADTS elementary stream into a PCM container.
    Encode(EncodeArgs),

    /// Wrap two ADTS elementary streams into one Mix-packed PCM container.
    Mix(MixArgs),

    /// Print stream information
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Input PCM container (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path of the first track; defaults to INPUT with an .aac extension.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Give up when no packing is recognised within this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub probe_limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ContainerArgs {
    /// Container sample rate.
    #[arg(long, value_name = "HZ", default_value_t = 48000)]
    pub sample_rate: u32,

    /// Container channel count.
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub channels: u16,

    /// Container bits per sample.
    #[arg(long, value_name = "N", default_value_t = 16)]
    pub bits: u16,
}

impl ContainerArgs {
    pub fn header(&self) -> WavHeader {
        WavHeader::new(self.sample_rate, self.channels, self.bits)
    }
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Input ADTS elementary stream (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output PCM container.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,

    /// Packing of the wrapped frames.
    #[arg(long, value_enum, default_value_t = PackingArg::Full)]
    pub mode: PackingArg,

    /// Delay in milliseconds; negative values drop leading frames.
    #[arg(long, value_name = "MS", default_value_t = 0, allow_negative_numbers = true)]
    pub delay: i32,

    #[command(flatten)]
    pub container: ContainerArgs,
}

#[derive(Debug, Args)]
pub struct MixArgs {
    /// Elementary stream carried in the high byte.
    #[arg(value_name = "INPUT_A")]
    pub input_a: PathBuf,

    /// Elementary stream carried in the low byte.
    #[arg(value_name = "INPUT_B")]
    pub input_b: PathBuf,

    /// Output PCM container.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,

    /// Delay of INPUT_A in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 0, allow_negative_numbers = true)]
    pub delay_a: i32,

    /// Delay of INPUT_B in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 0, allow_negative_numbers = true)]
    pub delay_b: i32,

    #[command(flatten)]
    pub container: ContainerArgs,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input PCM container (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum PackingArg {
    /// Wrapped bytes are the sample bytes.
    Full,
    /// One wrapped byte per 16-bit sample.
    Half,
}

impl From<PackingArg> for Packing {
    fn from(value: PackingArg) -> Self {
        match value {
            PackingArg::Full => Packing::Full,
            PackingArg::Half => Packing::Half,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ReportFormat {
    /// Aligned human-readable text.
    Text,
    /// YAML document.
    Yaml,
}
