//! ADTS frame header
//!
//! The fixed 7-byte prefix that starts every elementary-stream frame carried
//! inside a FAW frame. Only the fields needed for resynchronization and
//! silence selection are interpreted; validity is judged later by the frame
//! checksum and the length match.

use std::fmt::{Display, Formatter};
use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader};
use log::trace;

/// Length in bytes of the fixed ADTS header.
pub const ADTS_HEADER_LEN: usize = 7;

/// Samples per channel carried by one AAC frame.
pub const AAC_BLOCK_SAMPLES: u64 = 1024;

const SAMPLE_RATES: [u32; 14] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350, 0,
];

/// Parsed ADTS fixed + variable header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdtsHeader {
    pub id: bool,
    pub protection_absent: bool,
    /// 0 = main, 1 = LC, 2 = SSR
    pub profile: u8,
    /// Sampling rate in Hz, 0 when the index is reserved.
    pub sample_rate: u32,
    pub private_bit: bool,
    pub channel_count: u8,
    pub original: bool,
    pub home: bool,
    pub copyright_bit: bool,
    pub copyright_start: bool,
    /// Total frame length in bytes, header included.
    pub frame_length: usize,
    pub buffer_fullness: u16,
    pub raw_data_blocks_minus1: u8,
}

impl AdtsHeader {
    /// Parses the first [`ADTS_HEADER_LEN`] bytes of `bytes`.
    ///
    /// Never fails: the sync word is not checked and missing trailing bytes
    /// read as zero, so garbage yields a structurally valid header.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut buf = [0u8; ADTS_HEADER_LEN];
        let n = bytes.len().min(ADTS_HEADER_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);

        // 56 bits read from a 7-byte array cannot run out of input
        let header = Self::read_fields(&buf).unwrap_or_default();
        trace!("{header}");
        header
    }

    fn read_fields(buf: &[u8; ADTS_HEADER_LEN]) -> io::Result<Self> {
        let mut bs = BitReader::endian(&buf[..], BigEndian);

        bs.skip(12)?; // syncword
        let id = bs.read_bit()?;
        bs.skip(2)?; // layer
        let protection_absent = bs.read_bit()?;
        let profile = bs.read_unsigned_var::<u8>(2)?;
        let sample_rate_index = bs.read_unsigned_var::<u8>(4)?;
        let private_bit = bs.read_bit()?;
        let channel_count = bs.read_unsigned_var::<u8>(3)?;
        let original = bs.read_bit()?;
        let home = bs.read_bit()?;
        let copyright_bit = bs.read_bit()?;
        let copyright_start = bs.read_bit()?;
        let frame_length = bs.read_unsigned_var::<u16>(13)? as usize;
        let buffer_fullness = bs.read_unsigned_var::<u16>(11)?;
        let raw_data_blocks_minus1 = bs.read_unsigned_var::<u8>(2)?;

        Ok(Self {
            id,
            protection_absent,
            profile,
            sample_rate: sample_rate_from_index(sample_rate_index),
            private_bit,
            channel_count,
            original,
            home,
            copyright_bit,
            copyright_start,
            frame_length,
            buffer_fullness,
            raw_data_blocks_minus1,
        })
    }
}

impl Display for AdtsHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ADTS: profile {}, {} Hz, {} ch, frame_length {}, fullness {:#05X}, blocks {}",
            self.profile,
            self.sample_rate,
            self.channel_count,
            self.frame_length,
            self.buffer_fullness,
            self.raw_data_blocks_minus1 + 1
        )
    }
}

/// Maps a 4-bit sampling frequency index to Hz; reserved indices map to 0.
pub fn sample_rate_from_index(index: u8) -> u32 {
    SAMPLE_RATES[(index as usize).min(SAMPLE_RATES.len() - 1)]
}

/// Checks for the 12-bit ADTS sync word at the start of `bytes`.
#[inline]
pub fn is_sync(bytes: &[u8]) -> bool {
    matches!(bytes, [0xFF, b, ..] if b & 0xF0 == 0xF0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bitstream_io::{BitWrite, BitWriter};

    /// Builds an ADTS frame of `frame_length` bytes with a deterministic payload.
    pub(crate) fn adts_frame(channels: u8, frame_length: usize, seed: u8) -> Vec<u8> {
        let mut bw = BitWriter::endian(Vec::new(), BigEndian);
        bw.write_var::<u16>(12, 0xFFF).unwrap();
        bw.write_bit(false).unwrap(); // id
        bw.write_var::<u8>(2, 0).unwrap(); // layer
        bw.write_bit(true).unwrap(); // protection_absent
        bw.write_var::<u8>(2, 1).unwrap(); // LC
        bw.write_var::<u8>(4, 3).unwrap(); // 48 kHz
        bw.write_bit(false).unwrap();
        bw.write_var::<u8>(3, channels).unwrap();
        bw.write_var::<u8>(4, 0).unwrap();
        bw.write_var::<u16>(13, frame_length as u16).unwrap();
        bw.write_var::<u16>(11, 0x7FF).unwrap();
        bw.write_var::<u8>(2, 0).unwrap();
        let mut frame = bw.into_writer();
        assert_eq!(frame.len(), ADTS_HEADER_LEN);

        frame.extend((0..frame_length - ADTS_HEADER_LEN).map(|i| {
            (i as u8).wrapping_mul(29).wrapping_add(seed)
        }));
        frame
    }

    #[test]
    fn parse_built_header() {
        let frame = adts_frame(6, 371, 0);
        let h = AdtsHeader::parse(&frame);
        assert!(!h.id);
        assert!(h.protection_absent);
        assert_eq!(h.profile, 1);
        assert_eq!(h.sample_rate, 48000);
        assert_eq!(h.channel_count, 6);
        assert_eq!(h.frame_length, 371);
        assert_eq!(h.buffer_fullness, 0x7FF);
        assert_eq!(h.raw_data_blocks_minus1, 0);
        assert!(is_sync(&frame));
    }

    #[test]
    fn channel_count_spans_byte_boundary() {
        // channel bits: last bit of byte 2, first two bits of byte 3
        let h = AdtsHeader::parse(&[0xFF, 0xF1, 0x4D, 0x40, 0x00, 0x00, 0x00]);
        assert_eq!(h.channel_count, 0b101);
    }

    #[test]
    fn reserved_sample_rate_index() {
        assert_eq!(sample_rate_from_index(12), 7350);
        assert_eq!(sample_rate_from_index(13), 0);
        assert_eq!(sample_rate_from_index(15), 0);

        // index 15 in bits 2..6 of byte 2
        let h = AdtsHeader::parse(&[0xFF, 0xF1, 0x3C, 0x80, 0x00, 0x00, 0x00]);
        assert_eq!(h.sample_rate, 0);
    }

    #[test]
    fn short_input_never_fails() {
        let h = AdtsHeader::parse(&[0x12, 0x34]);
        assert_eq!(h.frame_length, 0);
        // Zero padding reads as sample-rate index 0
        let h = AdtsHeader::parse(&[]);
        assert_eq!(h.frame_length, 0);
        assert_eq!(h.channel_count, 0);
        assert_eq!(h.sample_rate, 96000);
    }

    #[test]
    fn sync_word() {
        assert!(is_sync(&[0xFF, 0xF9]));
        assert!(!is_sync(&[0xFF, 0xE9]));
        assert!(!is_sync(&[0xFF]));
    }
}
