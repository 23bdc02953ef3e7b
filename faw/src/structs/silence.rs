//! Silence templates
//!
//! Complete, validly framed silent AAC-LC frames at 48 kHz, one per supported
//! channel layout. Each lasts [`AAC_BLOCK_SAMPLES`](super::adts::AAC_BLOCK_SAMPLES)
//! samples.

const SILENCE_CH0: [u8; 16] = [
    0xFF, 0xF9, 0x4C, 0x00, 0x02, 0x1F, 0xFC, 0x21, 0x00, 0x49, 0x90, 0x02, 0x19, 0x00, 0x23, 0x80,
];

const SILENCE_CH1: [u8; 13] = [
    0xFF, 0xF9, 0x4C, 0x40, 0x01, 0xBF, 0xFC, 0x00, 0xC8, 0x40, 0x80, 0x23, 0x80,
];

const SILENCE_CH2: [u8; 16] = [
    0xFF, 0xF9, 0x4C, 0x80, 0x02, 0x1F, 0xFC, 0x21, 0x00, 0x49, 0x90, 0x02, 0x19, 0x00, 0x23, 0x80,
];

const SILENCE_CH6: [u8; 33] = [
    0xFF, 0xF9, 0x4D, 0x80, 0x04, 0x3F, 0xFC, 0x00, 0xC8, 0x00, 0x80, 0x20, 0x84, 0x01, 0x26, 0x40,
    0x08, 0x64, 0x00, 0x82, 0x30, 0x04, 0x99, 0x00, 0x21, 0x90, 0x02, 0x18, 0x32, 0x00, 0x20, 0x08,
    0xE0,
];

/// Returns the silent frame for `channels`; any layout other than 0, 1, 2
/// or 6 falls back to stereo.
pub fn silence_template(channels: u8) -> &'static [u8] {
    match channels {
        0 => &SILENCE_CH0,
        1 => &SILENCE_CH1,
        6 => &SILENCE_CH6,
        _ => &SILENCE_CH2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::adts::{AdtsHeader, is_sync};

    #[test]
    fn templates_are_self_describing() {
        for channels in [0u8, 1, 2, 6] {
            let frame = silence_template(channels);
            let header = AdtsHeader::parse(frame);
            assert!(is_sync(frame));
            assert_eq!(header.channel_count, channels);
            assert_eq!(header.frame_length, frame.len());
            assert_eq!(header.sample_rate, 48000);
        }
    }

    #[test]
    fn unknown_layouts_use_stereo() {
        for channels in [3u8, 4, 5, 7] {
            assert_eq!(silence_template(channels), &SILENCE_CH2);
        }
    }
}
