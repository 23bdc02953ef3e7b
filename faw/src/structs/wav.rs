//! PCM container header
//!
//! Reads the RIFF/WAVE header in front of captured sample data and writes
//! the canonical 44-byte PCM header for wrapped output.

use std::fmt::{Display, Formatter};

use anyhow::{Result, bail, ensure};
use fawutil_macros::ToBytes;
use log::debug;

use crate::byteorder::WriteBytesLe;
use crate::utils::errors::{ConfigError, WavError};

const RIFF_ID: [u8; 4] = *b"RIFF";
const WAVE_ID: [u8; 4] = *b"WAVE";
const FMT_ID: [u8; 4] = *b"fmt ";
const DATA_ID: [u8; 4] = *b"data";

pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the header written by [`WavHeader::to_bytes`].
pub const CANONICAL_HEADER_LEN: usize = 44;

/// Format and size fields of a PCM container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Raw `data` chunk size; `u32::MAX` for unterminated captures.
    pub data_size: u32,
}

#[derive(ToBytes)]
struct CanonicalHeader {
    riff: [u8; 4],
    riff_size: u32,
    wave: [u8; 4],
    fmt: [u8; 4],
    fmt_size: u32,
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    data: [u8; 4],
    data_size: u32,
}

impl WavHeader {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample,
            data_size: 0,
        }
    }

    /// Parses a RIFF/WAVE header.
    ///
    /// Returns the header and the offset at which sample data begins.
    pub fn parse(buffer: &[u8]) -> Result<(Self, usize)> {
        ensure_len(buffer, 12)?;

        let riff: [u8; 4] = read_array(buffer, 0);
        if riff != RIFF_ID {
            bail!(WavError::InvalidRiff(riff));
        }
        let wave: [u8; 4] = read_array(buffer, 8);
        if wave != WAVE_ID {
            bail!(WavError::InvalidWave(wave));
        }

        let mut fmt_fields: Option<(u16, u32, u16)> = None;
        let mut pos = 12;
        loop {
            ensure_len(buffer, pos + 8)?;
            let id: [u8; 4] = read_array(buffer, pos);
            let size = u32::from_le_bytes(read_array(buffer, pos + 4)) as usize;
            let body = pos + 8;

            match id {
                FMT_ID => {
                    ensure_len(buffer, body + 16)?;
                    let mut format_tag = u16::from_le_bytes(read_array(buffer, body));
                    let channels = u16::from_le_bytes(read_array(buffer, body + 2));
                    let sample_rate = u32::from_le_bytes(read_array(buffer, body + 4));
                    let bits_per_sample = u16::from_le_bytes(read_array(buffer, body + 14));

                    if format_tag == WAVE_FORMAT_EXTENSIBLE && size >= 40 {
                        ensure_len(buffer, body + 26)?;
                        // First two bytes of the SubFormat GUID
                        format_tag = u16::from_le_bytes(read_array(buffer, body + 24));
                    }
                    if format_tag != WAVE_FORMAT_PCM {
                        bail!(WavError::UnsupportedFormat(format_tag));
                    }
                    fmt_fields = Some((channels, sample_rate, bits_per_sample));
                }
                DATA_ID => {
                    let Some((channels, sample_rate, bits_per_sample)) = fmt_fields else {
                        bail!(WavError::MissingFormat);
                    };
                    let header = Self {
                        channels,
                        sample_rate,
                        bits_per_sample,
                        data_size: size as u32,
                    };
                    debug!("{header}, data at offset {body}");
                    return Ok((header, body));
                }
                _ => {
                    debug!(
                        "Skipping chunk {:?} ({size} bytes)",
                        String::from_utf8_lossy(&id)
                    );
                }
            }

            // Chunks are padded to an even size
            pos = body + size + (size & 1);
        }
    }

    /// Serializes the canonical 44-byte PCM header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = CanonicalHeader {
            riff: RIFF_ID,
            riff_size: self
                .data_size
                .saturating_add((CANONICAL_HEADER_LEN - 8) as u32),
            wave: WAVE_ID,
            fmt: FMT_ID,
            fmt_size: 16,
            format_tag: WAVE_FORMAT_PCM,
            channels: self.channels,
            sample_rate: self.sample_rate,
            byte_rate: self.byte_rate(),
            block_align: self.bytes_per_sample() as u16,
            bits_per_sample: self.bits_per_sample,
            data: DATA_ID,
            data_size: self.data_size,
        };

        let mut vec = Vec::with_capacity(CANONICAL_HEADER_LEN);
        header.write_le(&mut vec);
        vec
    }

    /// Sets the data size, saturating at the largest representable value.
    pub fn set_data_size(&mut self, bytes: u64) {
        self.data_size = bytes.min(u32::MAX as u64) as u32;
    }

    /// Bytes per whole (all-channel) sample.
    pub fn bytes_per_sample(&self) -> usize {
        self.channels as usize * self.bits_per_sample as usize / 8
    }

    /// Bytes per whole sample once each 16-bit word is reduced to one byte.
    pub fn half_bytes_per_sample(&self) -> usize {
        self.channels as usize * self.bits_per_sample as usize / 16
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate
            .saturating_mul(self.bytes_per_sample() as u32)
    }

    /// Rejects layouts no FAW stream can be carried in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bytes_per_sample() == 0 {
            return Err(ConfigError::EmptySample {
                channels: self.channels,
                bits: self.bits_per_sample,
            });
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        Ok(())
    }
}

impl Display for WavHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PCM {} Hz, {} ch, {}-bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}

fn ensure_len(buffer: &[u8], needed: usize) -> Result<()> {
    ensure!(
        buffer.len() >= needed,
        WavError::Truncated {
            needed,
            actual: buffer.len()
        }
    );
    Ok(())
}

#[inline]
fn read_array<const N: usize>(buffer: &[u8], pos: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buffer[pos..pos + N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_layout() {
        let mut header = WavHeader::new(48000, 2, 16);
        header.set_data_size(4096);
        let bytes = header.to_bytes();

        assert_eq!(bytes.len(), CANONICAL_HEADER_LEN);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 4096 + 36);
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 192000);
        assert_eq!(u16::from_le_bytes([bytes[32], bytes[33]]), 4);
        assert_eq!(&bytes[36..40], b"data");
    }

    #[test]
    fn parse_what_we_write() -> Result<()> {
        let mut header = WavHeader::new(44100, 6, 24);
        header.set_data_size(12345);
        let (parsed, offset) = WavHeader::parse(&header.to_bytes())?;
        assert_eq!(parsed, header);
        assert_eq!(offset, CANONICAL_HEADER_LEN);
        assert_eq!(parsed.bytes_per_sample(), 18);
        assert_eq!(parsed.half_bytes_per_sample(), 9);
        Ok(())
    }

    #[test]
    fn skips_unknown_chunks() -> Result<()> {
        let header = WavHeader::new(48000, 2, 16).to_bytes();
        let mut bytes = header[..36].to_vec();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3, 0]); // padded to even
        bytes.extend_from_slice(&header[36..]);

        let (parsed, offset) = WavHeader::parse(&bytes)?;
        assert_eq!(parsed.sample_rate, 48000);
        assert_eq!(offset, CANONICAL_HEADER_LEN + 12);
        Ok(())
    }

    #[test]
    fn truncated_header() {
        let bytes = WavHeader::new(48000, 2, 16).to_bytes();
        let err = WavHeader::parse(&bytes[..30]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WavError>(),
            Some(WavError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_non_pcm() {
        let mut bytes = WavHeader::new(48000, 2, 16).to_bytes();
        bytes[20] = 3; // IEEE float
        let err = WavHeader::parse(&bytes).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WavError>(),
            Some(WavError::UnsupportedFormat(3))
        ));

        let mut bytes = WavHeader::new(48000, 2, 16).to_bytes();
        bytes[0] = b'X';
        assert!(WavHeader::parse(&bytes).is_err());
    }

    #[test]
    fn data_size_saturates() {
        let mut header = WavHeader::new(48000, 2, 16);
        header.set_data_size(u64::MAX);
        assert_eq!(header.data_size, u32::MAX);
        let bytes = header.to_bytes();
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), u32::MAX);
    }

    #[test]
    fn validate_layouts() {
        assert!(WavHeader::new(48000, 2, 16).validate().is_ok());
        assert_eq!(
            WavHeader::new(48000, 0, 16).validate(),
            Err(ConfigError::EmptySample {
                channels: 0,
                bits: 16
            })
        );
        assert_eq!(
            WavHeader::new(0, 2, 16).validate(),
            Err(ConfigError::ZeroSampleRate)
        );
    }
}
