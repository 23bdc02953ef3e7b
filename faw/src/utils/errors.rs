#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err.into());
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("No FAW format could be determined from {bytes} bytes of input")]
    Undetermined { bytes: u64 },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error(
        "Checksum mismatch in frame at sample {sample}. Calculated {calculated:#010X}, Read {read:#010X}"
    )]
    ChecksumMismatch {
        sample: u64,
        calculated: u32,
        read: u32,
    },

    #[error("Frame length mismatch at sample {sample}: aac_frame_length = {header}, block = {block}")]
    LengthMismatch {
        sample: u64,
        header: usize,
        block: usize,
    },

    #[error("Stale frame at sample {sample} dropped, {output} samples already emitted")]
    StaleFrame { sample: u64, output: u64 },
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(thiserror::Error, Debug)]
pub enum WavError {
    #[error("Invalid RIFF id, Read {0:?}")]
    InvalidRiff([u8; 4]),

    #[error("Invalid WAVE id, Read {0:?}")]
    InvalidWave([u8; 4]),

    #[error("Missing fmt chunk before data chunk")]
    MissingFormat,

    #[error("Container header truncated: needed {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("Unsupported sample format tag {0:#06X}")]
    UnsupportedFormat(u16),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Container has zero bytes per sample ({channels} channels, {bits} bits)")]
    EmptySample { channels: u16, bits: u16 },

    #[error("Half packing needs at least 16 bits per sample, got {0}")]
    HalfNeedsWideSamples(u16),

    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,
}
